//! Order store service
//!
//! The durable side of the cart protocol: lazy order creation, the
//! full-replace sync primitive, and the incremental add/remove shortcuts.

use catalogo_core::types::{Order, OrderDetail, OrderItem};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::{OrderDraft, OrderPatch, Repository};
use crate::errors::{AppError, Result};
use crate::not_found;
use crate::services::clean_str;

pub struct OrderService {
    repo: Repository,
}

impl OrderService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create an order against an existing catalog.
    ///
    /// Idempotent by client-supplied id: if the id already exists the stored
    /// order is returned unchanged, never overwritten.
    pub async fn create(
        &self,
        catalogo_id: Option<i32>,
        id: Option<Uuid>,
        draft: OrderDraft,
    ) -> Result<Order> {
        let catalogo_id =
            catalogo_id.ok_or_else(|| AppError::MissingField("catalogo_id".into()))?;

        if self.repo.find_catalog(catalogo_id).await?.is_none() {
            return Err(AppError::InvalidReference(format!(
                "catalogo_id {} does not exist",
                catalogo_id
            )));
        }

        if let Some(id) = id {
            if let Some(existing) = self.repo.find_order(id).await? {
                return Ok(existing.into());
            }
        }

        let id = id.unwrap_or_else(Uuid::new_v4);
        let order = self.repo.insert_order(id, catalogo_id, draft).await?;

        metrics::counter!("catalogo_orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, catalog_id = catalogo_id, "Order created");

        Ok(order.into())
    }

    /// Order header plus lines — also the order-link resolution lookup.
    pub async fn get(&self, id: Uuid) -> Result<OrderDetail> {
        let order = self
            .repo
            .find_order(id)
            .await?
            .ok_or_else(|| not_found!("pedido", id))?;

        let itens = self
            .repo
            .order_items(id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(OrderDetail {
            order: order.into(),
            itens,
        })
    }

    pub async fn patch(&self, id: Uuid, patch: OrderPatch) -> Result<Order> {
        if !patch.has_fields() {
            return Err(AppError::Validation("no fields to update".into()));
        }
        let order = self.repo.patch_order(id, patch).await?;
        Ok(order.into())
    }

    /// Full cart sync: overwrite the order's line set with the provided
    /// snapshot. An empty snapshot empties the order but keeps it alive.
    pub async fn replace_items(&self, id: Uuid, items: Vec<OrderItem>) -> Result<()> {
        if self.repo.find_order(id).await?.is_none() {
            return Err(not_found!("pedido", id));
        }

        let lines = sanitize_lines(items);
        self.repo.replace_items(id, &lines).await?;

        metrics::counter!("catalogo_cart_syncs_total").increment(1);
        Ok(())
    }

    /// Incremental add: `delta` accumulates onto an existing line.
    pub async fn add_item(
        &self,
        id: Uuid,
        reference: Option<String>,
        delta: Option<i32>,
        meta: ItemMeta,
    ) -> Result<OrderItem> {
        let reference = clean_str(reference).ok_or_else(|| AppError::MissingField("ref".into()))?;

        if self.repo.find_order(id).await?.is_none() {
            return Err(not_found!("pedido", id));
        }

        // delta of 0 behaves like the default single step
        let delta = match delta {
            None | Some(0) => 1,
            Some(d) => d,
        };

        let line = OrderItem {
            r#ref: reference,
            nome: clean_str(meta.nome).unwrap_or_default(),
            pagina: meta.pagina,
            qtd: delta,
            qtd_multiplo: meta.qtd_multiplo.unwrap_or(1).max(1),
            preco: meta.preco.unwrap_or(Decimal::ZERO).max(Decimal::ZERO),
        };

        let item = self.repo.upsert_item_delta(id, &line).await?;
        Ok(item.into())
    }

    /// Idempotent removal; absence of the line (or even the order) is fine.
    pub async fn remove_item(&self, id: Uuid, reference: Option<String>) -> Result<()> {
        let reference = clean_str(reference).ok_or_else(|| AppError::MissingField("ref".into()))?;
        self.repo.remove_item(id, &reference).await
    }
}

/// Item metadata snapshotted alongside an incremental add.
#[derive(Debug, Clone, Default)]
pub struct ItemMeta {
    pub nome: Option<String>,
    pub pagina: Option<i32>,
    pub qtd_multiplo: Option<i32>,
    pub preco: Option<Decimal>,
}

/// Normalize a replace-items payload: lines without a ref are dropped,
/// quantities are floored at 0 and zero lines dropped (qtd=0 is "absent",
/// not a stored row), multiples floored at 1, prices clamped at 0.
fn sanitize_lines(items: Vec<OrderItem>) -> Vec<OrderItem> {
    items
        .into_iter()
        .filter_map(|item| {
            let reference = item.r#ref.trim().to_string();
            if reference.is_empty() {
                return None;
            }

            let qtd = item.qtd.max(0);
            if qtd == 0 {
                return None;
            }

            Some(OrderItem {
                r#ref: reference,
                nome: item.nome.trim().to_string(),
                pagina: item.pagina,
                qtd,
                qtd_multiplo: item.qtd_multiplo.max(1),
                preco: item.preco.max(Decimal::ZERO),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(r#ref: &str, qtd: i32) -> OrderItem {
        OrderItem {
            r#ref: r#ref.into(),
            nome: "Produto".into(),
            pagina: Some(1),
            qtd,
            qtd_multiplo: 3,
            preco: Decimal::new(1000, 2),
        }
    }

    #[test]
    fn test_sanitize_drops_lines_without_ref() {
        let lines = sanitize_lines(vec![line("", 3), line("  ", 3), line("A1", 3)]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].r#ref, "A1");
    }

    #[test]
    fn test_sanitize_drops_non_positive_quantities() {
        let lines = sanitize_lines(vec![line("A1", 0), line("A2", -5), line("A3", 6)]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].r#ref, "A3");
        assert_eq!(lines[0].qtd, 6);
    }

    #[test]
    fn test_sanitize_floors_multiple_and_price() {
        let mut raw = line("A1", 3);
        raw.qtd_multiplo = 0;
        raw.preco = Decimal::new(-100, 2);

        let lines = sanitize_lines(vec![raw]);
        assert_eq!(lines[0].qtd_multiplo, 1);
        assert_eq!(lines[0].preco, Decimal::ZERO);
    }

    #[test]
    fn test_sanitize_trims_fields() {
        let mut raw = line("  A1  ", 3);
        raw.nome = "  Boneca X  ".into();

        let lines = sanitize_lines(vec![raw]);
        assert_eq!(lines[0].r#ref, "A1");
        assert_eq!(lines[0].nome, "Boneca X");
    }
}
