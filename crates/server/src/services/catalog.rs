//! Catalog and product index service
//!
//! Owns the operator-facing side: catalog CRUD, bulk CSV import, and the
//! buyer-facing product reads (by PDF page, and ranked search).

use catalogo_core::import::parse_catalog_csv;
use catalogo_core::types::{Catalog, Product};
use serde::Serialize;

use crate::db::{CatalogPatch, ImportMode, NewCatalog, Repository};
use crate::errors::{AppError, Result};
use crate::not_found;

/// Search result cap; requests beyond it are clamped, not rejected.
const MAX_SEARCH_LIMIT: u64 = 200;
const DEFAULT_SEARCH_LIMIT: u64 = 50;

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub ok: bool,
    pub catalogo_id: i32,
    pub importados: u64,
    pub modo: String,
}

pub struct CatalogService {
    repo: Repository,
}

impl CatalogService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Catalog>> {
        let catalogs = self.repo.list_catalogs().await?;
        Ok(catalogs.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Catalog> {
        self.repo
            .find_catalog(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found!("catalogo", id))
    }

    pub async fn create(&self, new: NewCatalog) -> Result<Catalog> {
        if new.nome.trim().is_empty() {
            return Err(AppError::MissingField("nome".into()));
        }
        if new.pdf_url.trim().is_empty() {
            return Err(AppError::MissingField("pdf_url".into()));
        }

        let catalog = self.repo.create_catalog(new).await?;
        tracing::info!(catalog_id = catalog.id, "Catalog created");
        Ok(catalog.into())
    }

    pub async fn patch(&self, id: i32, patch: CatalogPatch) -> Result<Catalog> {
        if !patch.has_fields() {
            return Err(AppError::Validation("no fields to update".into()));
        }
        let catalog = self.repo.patch_catalog(id, patch).await?;
        Ok(catalog.into())
    }

    /// Bulk import workflow:
    /// 1. Validate the target catalog exists
    /// 2. Transform CSV text into normalized records (pure, row-skipping)
    /// 3. Apply the batch transactionally in the requested mode
    pub async fn import_csv(
        &self,
        catalog_id: i32,
        csv_text: &str,
        mode: ImportMode,
    ) -> Result<ImportSummary> {
        if self.repo.find_catalog(catalog_id).await?.is_none() {
            return Err(not_found!("catalogo", catalog_id));
        }

        let records =
            parse_catalog_csv(csv_text).map_err(|e| AppError::InvalidFormat(e.to_string()))?;
        if records.is_empty() {
            return Err(AppError::Validation("CSV contains no valid rows".into()));
        }

        let count = self.repo.import_products(catalog_id, &records, mode).await?;

        metrics::counter!("catalogo_import_batches_total").increment(1);
        metrics::counter!("catalogo_import_rows_total").increment(count);
        tracing::info!(
            catalog_id,
            rows = count,
            mode = mode.as_str(),
            "Products imported"
        );

        Ok(ImportSummary {
            ok: true,
            catalogo_id: catalog_id,
            importados: count,
            modo: mode.as_str().to_string(),
        })
    }

    /// Products bound to one PDF page, ordered by name then ref.
    pub async fn products_by_page(&self, catalog_id: i32, page: i32) -> Result<Vec<Product>> {
        if page < 1 {
            return Err(AppError::Validation(
                "page must be a positive integer".into(),
            ));
        }

        let products = self.repo.products_by_page(catalog_id, page).await?;
        Ok(products.into_iter().map(Into::into).collect())
    }

    /// Ranked catalog search. An empty term yields an empty result, never
    /// the whole catalog.
    pub async fn search(
        &self,
        catalog_id: i32,
        term: &str,
        limit: Option<u64>,
    ) -> Result<Vec<Product>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let limit = limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);

        let products = self.repo.search_products(catalog_id, term, limit).await?;
        metrics::counter!("catalogo_search_ops_total").increment(1);

        Ok(products.into_iter().map(Into::into).collect())
    }
}
