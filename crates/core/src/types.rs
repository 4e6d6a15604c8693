//! Wire types shared by the server and the buyer client
//!
//! Field names keep the Portuguese domain vocabulary used on the wire
//! (`nome`, `pagina`, `qtd_multiplo`, `preco`, ...).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product catalog bound to one source PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub id: i32,
    pub nome: String,
    pub ano: Option<i32>,
    pub pdf_url: String,
    pub empresa_nome: Option<String>,
    pub whatsapp_phone: Option<String>,
    pub politica: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A catalog line item bound to a PDF page, identified by `ref` within its
/// catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub pagina: i32,
    pub nome: String,
    pub r#ref: String,
    pub qtd_multiplo: i32,
    pub preco: Decimal,
}

/// A persisted order header (`pedido`). Items live separately as
/// [`OrderItem`] rows keyed by `(pedido_id, ref)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub catalogo_id: i32,
    pub cliente_nome: Option<String>,
    pub cliente_contato: Option<String>,
    pub observacao: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One order line. Price and multiple are snapshotted from the product at
/// add/sync time — an order is a point-in-time quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub r#ref: String,
    pub nome: String,
    pub pagina: Option<i32>,
    pub qtd: i32,
    pub qtd_multiplo: i32,
    pub preco: Decimal,
}

impl OrderItem {
    /// Line subtotal (`preco * qtd`).
    pub fn subtotal(&self) -> Decimal {
        self.preco * Decimal::from(self.qtd)
    }
}

/// Order header plus its lines, as returned by the order-link lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub itens: Vec<OrderItem>,
}

/// Total across a set of order lines.
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::subtotal).sum()
}
