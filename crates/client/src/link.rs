//! Order link resolution
//!
//! A shared order link (`/p/<id>`) carries only the opaque order id; the
//! resolver turns it back into the owning catalog and the persisted lines.
//! Consulted once per visit — the only path where server state overwrites a
//! local cart.

use catalogo_core::types::{Order, OrderItem};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::OrderApi;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ResolvedOrder {
    pub catalogo_id: i32,
    pub order: Order,
    pub items: Vec<OrderItem>,
}

pub struct OrderLinkResolver {
    api: Arc<dyn OrderApi>,
}

impl OrderLinkResolver {
    pub fn new(api: Arc<dyn OrderApi>) -> Self {
        Self { api }
    }

    /// Look up an order id. Unknown ids surface as a 404 [`crate::ClientError::Api`];
    /// callers fall back to an empty cart instead of blocking the page.
    pub async fn resolve(&self, order_id: Uuid) -> Result<ResolvedOrder> {
        let detail = self.api.fetch_order(order_id).await?;

        Ok(ResolvedOrder {
            catalogo_id: detail.order.catalogo_id,
            order: detail.order,
            items: detail.itens,
        })
    }
}
