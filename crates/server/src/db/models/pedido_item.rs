//! Order line entity, keyed by `(pedido_id, ref)`
//!
//! `qtd_multiplo` and `preco` are snapshots taken at add/sync time; they do
//! not follow later product edits.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pedido_itens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub pedido_id: Uuid,

    #[sea_orm(primary_key, auto_increment = false, column_name = "ref")]
    #[serde(rename = "ref")]
    pub reference: String,

    #[sea_orm(column_type = "Text")]
    pub nome: String,

    pub pagina: Option<i32>,

    pub qtd: i32,

    pub qtd_multiplo: i32,

    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub preco: Decimal,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pedido::Entity",
        from = "Column::PedidoId",
        to = "super::pedido::Column::Id",
        on_delete = "Cascade"
    )]
    Pedido,
}

impl Related<super::pedido::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pedido.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for catalogo_core::types::OrderItem {
    fn from(m: Model) -> Self {
        Self {
            r#ref: m.reference,
            nome: m.nome,
            pagina: m.pagina,
            qtd: m.qtd,
            qtd_multiplo: m.qtd_multiplo,
            preco: m.preco,
        }
    }
}
