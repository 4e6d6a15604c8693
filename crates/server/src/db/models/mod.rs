//! SeaORM entity models
//!
//! One module per table: `catalogos`, `catalogo_produtos`, `pedidos`,
//! `pedido_itens`.

pub mod catalogo;
pub mod pedido;
pub mod pedido_item;
pub mod produto;
