//! Repository pattern for database operations
//!
//! All multi-statement mutations (product import, full item replace) run
//! inside a single transaction so concurrent readers never observe a
//! half-applied catalog or order.

use catalogo_core::types::OrderItem;
use catalogo_core::Product;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};
use std::str::FromStr;
use uuid::Uuid;

use crate::db::models::{catalogo, pedido, pedido_item, produto};
use crate::errors::{AppError, Result};
use crate::not_found;

/// Import behavior for a product batch.
///
/// `Replace` drops the catalog's entire product set before inserting;
/// `Append` upserts by `(catalogo_id, ref)` and leaves the rest untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    Replace,
    Append,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Append => "append",
        }
    }
}

impl FromStr for ImportMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "append" => Ok(Self::Append),
            other => Err(AppError::InvalidFormat(format!(
                "mode must be \"replace\" or \"append\", got \"{}\"",
                other
            ))),
        }
    }
}

/// Fields for a new catalog.
#[derive(Debug, Clone)]
pub struct NewCatalog {
    pub nome: String,
    pub ano: Option<i32>,
    pub pdf_url: String,
    pub empresa_nome: Option<String>,
    pub whatsapp_phone: Option<String>,
    pub politica: Option<String>,
}

/// Partial catalog update. Outer `None` means "leave untouched"; for the
/// nullable columns the inner `None` clears the value.
#[derive(Debug, Clone, Default)]
pub struct CatalogPatch {
    pub nome: Option<String>,
    pub ano: Option<i32>,
    pub pdf_url: Option<String>,
    pub empresa_nome: Option<Option<String>>,
    pub whatsapp_phone: Option<Option<String>>,
    pub politica: Option<Option<String>>,
}

impl CatalogPatch {
    pub fn has_fields(&self) -> bool {
        self.nome.is_some()
            || self.ano.is_some()
            || self.pdf_url.is_some()
            || self.empresa_nome.is_some()
            || self.whatsapp_phone.is_some()
            || self.politica.is_some()
    }
}

/// Optional header fields supplied at order creation.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub cliente_nome: Option<String>,
    pub cliente_contato: Option<String>,
    pub observacao: Option<String>,
    pub status: Option<String>,
}

/// Partial order header update, same outer/inner convention as
/// [`CatalogPatch`].
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub cliente_nome: Option<Option<String>>,
    pub cliente_contato: Option<Option<String>>,
    pub observacao: Option<Option<String>>,
    pub status: Option<String>,
}

impl OrderPatch {
    pub fn has_fields(&self) -> bool {
        self.cliente_nome.is_some()
            || self.cliente_contato.is_some()
            || self.observacao.is_some()
            || self.status.is_some()
    }
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    db: DatabaseConnection,
}

impl Repository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.db
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| AppError::DatabaseConnection(format!("Ping failed: {}", e)))?;
        Ok(())
    }

    // ========================================================================
    // Catalog Operations
    // ========================================================================

    pub async fn list_catalogs(&self) -> Result<Vec<catalogo::Model>> {
        catalogo::Entity::find()
            .order_by_desc(catalogo::Column::Id)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn find_catalog(&self, id: i32) -> Result<Option<catalogo::Model>> {
        catalogo::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn create_catalog(&self, new: NewCatalog) -> Result<catalogo::Model> {
        let now = chrono::Utc::now();

        let catalog = catalogo::ActiveModel {
            nome: Set(new.nome),
            ano: Set(new.ano),
            pdf_url: Set(new.pdf_url),
            empresa_nome: Set(new.empresa_nome),
            whatsapp_phone: Set(new.whatsapp_phone),
            politica: Set(new.politica),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        catalog.insert(&self.db).await.map_err(Into::into)
    }

    pub async fn patch_catalog(&self, id: i32, patch: CatalogPatch) -> Result<catalogo::Model> {
        let mut catalog: catalogo::ActiveModel = catalogo::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| not_found!("catalogo", id))?
            .into();

        if let Some(nome) = patch.nome {
            catalog.nome = Set(nome);
        }
        if let Some(ano) = patch.ano {
            catalog.ano = Set(Some(ano));
        }
        if let Some(pdf_url) = patch.pdf_url {
            catalog.pdf_url = Set(pdf_url);
        }
        if let Some(empresa_nome) = patch.empresa_nome {
            catalog.empresa_nome = Set(empresa_nome);
        }
        if let Some(whatsapp_phone) = patch.whatsapp_phone {
            catalog.whatsapp_phone = Set(whatsapp_phone);
        }
        if let Some(politica) = patch.politica {
            catalog.politica = Set(politica);
        }
        catalog.updated_at = Set(chrono::Utc::now().into());

        catalog.update(&self.db).await.map_err(Into::into)
    }

    // ========================================================================
    // Product Operations
    // ========================================================================

    /// Bulk import, all-or-nothing.
    ///
    /// Any row failure rolls the whole batch back so a partial import is
    /// never observable.
    pub async fn import_products(
        &self,
        catalog_id: i32,
        records: &[Product],
        mode: ImportMode,
    ) -> Result<u64> {
        let txn = self.db.begin().await?;

        if mode == ImportMode::Replace {
            produto::Entity::delete_many()
                .filter(produto::Column::CatalogoId.eq(catalog_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::ImportAborted(e.to_string()))?;
        }

        for record in records {
            let stmt = Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                INSERT INTO catalogo_produtos (catalogo_id, pagina, ref, nome, qtd_multiplo, preco)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (catalogo_id, ref)
                DO UPDATE SET
                    pagina = EXCLUDED.pagina,
                    nome = EXCLUDED.nome,
                    qtd_multiplo = EXCLUDED.qtd_multiplo,
                    preco = EXCLUDED.preco,
                    updated_at = now()
                "#,
                vec![
                    catalog_id.into(),
                    record.pagina.into(),
                    record.r#ref.clone().into(),
                    record.nome.clone().into(),
                    record.qtd_multiplo.into(),
                    record.preco.into(),
                ],
            );

            txn.execute(stmt)
                .await
                .map_err(|e| AppError::ImportAborted(e.to_string()))?;
        }

        txn.commit().await?;
        Ok(records.len() as u64)
    }

    pub async fn products_by_page(&self, catalog_id: i32, page: i32) -> Result<Vec<produto::Model>> {
        produto::Entity::find()
            .filter(produto::Column::CatalogoId.eq(catalog_id))
            .filter(produto::Column::Pagina.eq(page))
            .order_by_asc(produto::Column::Nome)
            .order_by_asc(produto::Column::Reference)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    /// Case-insensitive substring search over `ref` and `nome`.
    ///
    /// Two-tier ranking: rows whose `ref` matches sort before rows where
    /// only `nome` matches, so a buyer typing a known part code lands that
    /// product first even amid many name matches. Within a tier: page, ref.
    pub async fn search_products(
        &self,
        catalog_id: i32,
        term: &str,
        limit: u64,
    ) -> Result<Vec<produto::Model>> {
        let pattern = format!("%{}%", term);

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT catalogo_id, pagina, ref, nome, qtd_multiplo, preco, created_at, updated_at
            FROM catalogo_produtos
            WHERE catalogo_id = $1
              AND (ref ILIKE $2 OR nome ILIKE $2)
            ORDER BY
                CASE WHEN ref ILIKE $2 THEN 0 ELSE 1 END,
                pagina ASC,
                ref ASC
            LIMIT $3
            "#,
            vec![catalog_id.into(), pattern.into(), (limit as i64).into()],
        );

        produto::Model::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Order Operations
    // ========================================================================

    pub async fn find_order(&self, id: Uuid) -> Result<Option<pedido::Model>> {
        pedido::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn insert_order(
        &self,
        id: Uuid,
        catalog_id: i32,
        draft: OrderDraft,
    ) -> Result<pedido::Model> {
        let now = chrono::Utc::now();

        let order = pedido::ActiveModel {
            id: Set(id),
            catalogo_id: Set(catalog_id),
            cliente_nome: Set(draft.cliente_nome),
            cliente_contato: Set(draft.cliente_contato),
            observacao: Set(draft.observacao),
            status: Set(draft.status.unwrap_or_else(|| "aberto".to_string())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        order.insert(&self.db).await.map_err(Into::into)
    }

    pub async fn patch_order(&self, id: Uuid, patch: OrderPatch) -> Result<pedido::Model> {
        let mut order: pedido::ActiveModel = pedido::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| not_found!("pedido", id))?
            .into();

        if let Some(cliente_nome) = patch.cliente_nome {
            order.cliente_nome = Set(cliente_nome);
        }
        if let Some(cliente_contato) = patch.cliente_contato {
            order.cliente_contato = Set(cliente_contato);
        }
        if let Some(observacao) = patch.observacao {
            order.observacao = Set(observacao);
        }
        if let Some(status) = patch.status {
            order.status = Set(status);
        }
        order.updated_at = Set(chrono::Utc::now().into());

        order.update(&self.db).await.map_err(Into::into)
    }

    // ========================================================================
    // Order Item Operations
    // ========================================================================

    pub async fn order_items(&self, order_id: Uuid) -> Result<Vec<pedido_item::Model>> {
        pedido_item::Entity::find()
            .filter(pedido_item::Column::PedidoId.eq(order_id))
            .order_by_asc(pedido_item::Column::Nome)
            .order_by_asc(pedido_item::Column::Reference)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    /// Full cart sync primitive: transactionally delete the order's lines
    /// and reinsert the provided set. Last-write-wins, not a merge.
    ///
    /// Callers pass already-normalized lines; this keeps the delete and the
    /// reinserts atomic and stamps the header's `updated_at`.
    pub async fn replace_items(&self, order_id: Uuid, items: &[OrderItem]) -> Result<()> {
        let txn = self.db.begin().await?;

        pedido_item::Entity::delete_many()
            .filter(pedido_item::Column::PedidoId.eq(order_id))
            .exec(&txn)
            .await?;

        for item in items {
            let stmt = Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                INSERT INTO pedido_itens (pedido_id, ref, nome, pagina, qtd, qtd_multiplo, preco)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (pedido_id, ref)
                DO UPDATE SET
                    nome = EXCLUDED.nome,
                    pagina = EXCLUDED.pagina,
                    qtd = EXCLUDED.qtd,
                    qtd_multiplo = EXCLUDED.qtd_multiplo,
                    preco = EXCLUDED.preco,
                    updated_at = now()
                "#,
                vec![
                    order_id.into(),
                    item.r#ref.clone().into(),
                    item.nome.clone().into(),
                    item.pagina.into(),
                    item.qtd.into(),
                    item.qtd_multiplo.into(),
                    item.preco.into(),
                ],
            );

            txn.execute(stmt).await?;
        }

        let touch = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE pedidos SET updated_at = now() WHERE id = $1",
            vec![order_id.into()],
        );
        txn.execute(touch).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Incremental upsert: adds `line.qtd` as a delta to an existing line
    /// (clamped at 0), or inserts the line. Metadata is re-stamped either
    /// way. Returns the resulting row.
    pub async fn upsert_item_delta(
        &self,
        order_id: Uuid,
        line: &OrderItem,
    ) -> Result<pedido_item::Model> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO pedido_itens (pedido_id, ref, nome, pagina, qtd, qtd_multiplo, preco)
            VALUES ($1, $2, $3, $4, GREATEST(0, $5), $6, $7)
            ON CONFLICT (pedido_id, ref)
            DO UPDATE SET
                qtd = GREATEST(0, pedido_itens.qtd + EXCLUDED.qtd),
                nome = EXCLUDED.nome,
                pagina = EXCLUDED.pagina,
                qtd_multiplo = EXCLUDED.qtd_multiplo,
                preco = EXCLUDED.preco,
                updated_at = now()
            RETURNING pedido_id, ref, nome, pagina, qtd, qtd_multiplo, preco, created_at, updated_at
            "#,
            vec![
                order_id.into(),
                line.r#ref.clone().into(),
                line.nome.clone().into(),
                line.pagina.into(),
                line.qtd.into(),
                line.qtd_multiplo.into(),
                line.preco.into(),
            ],
        );

        let item = pedido_item::Model::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("upsert returned no row for order {}", order_id))
            })?;

        self.touch_order(order_id).await?;
        Ok(item)
    }

    /// Idempotent removal by ref; absent lines are not an error.
    pub async fn remove_item(&self, order_id: Uuid, reference: &str) -> Result<()> {
        pedido_item::Entity::delete_many()
            .filter(pedido_item::Column::PedidoId.eq(order_id))
            .filter(pedido_item::Column::Reference.eq(reference))
            .exec(&self.db)
            .await?;

        self.touch_order(order_id).await?;
        Ok(())
    }

    async fn touch_order(&self, id: Uuid) -> Result<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE pedidos SET updated_at = now() WHERE id = $1",
            vec![id.into()],
        );
        self.db.execute(stmt).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_mode_parsing() {
        assert_eq!("replace".parse::<ImportMode>().unwrap(), ImportMode::Replace);
        assert_eq!("APPEND".parse::<ImportMode>().unwrap(), ImportMode::Append);
        assert!("merge".parse::<ImportMode>().is_err());
    }

    #[test]
    fn test_patch_has_fields() {
        assert!(!OrderPatch::default().has_fields());
        let patch = OrderPatch {
            status: Some("fechado".into()),
            ..Default::default()
        };
        assert!(patch.has_fields());

        assert!(!CatalogPatch::default().has_fields());
        let patch = CatalogPatch {
            // inner None still counts: it clears the column
            empresa_nome: Some(None),
            ..Default::default()
        };
        assert!(patch.has_fields());
    }
}
