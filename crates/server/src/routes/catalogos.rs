//! Catalog routes: CRUD, CSV import, page listing and search

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use catalogo_core::types::{Catalog, Product};
use serde::Deserialize;
use tracing::instrument;

use crate::db::{CatalogPatch, ImportMode, NewCatalog};
use crate::errors::AppError;
use crate::services::{clean_str, AppState};

#[instrument(skip(state))]
pub async fn list_catalogs(
    State(state): State<AppState>,
) -> Result<Json<Vec<Catalog>>, AppError> {
    Ok(Json(state.catalogs.list().await?))
}

#[instrument(skip(state))]
pub async fn get_catalog(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Catalog>, AppError> {
    Ok(Json(state.catalogs.get(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateCatalogRequest {
    pub nome: Option<String>,
    pub ano: Option<i32>,
    pub pdf_url: Option<String>,
    pub empresa_nome: Option<String>,
    pub whatsapp_phone: Option<String>,
    pub politica: Option<String>,
}

#[instrument(skip(state, payload))]
pub async fn create_catalog(
    State(state): State<AppState>,
    Json(payload): Json<CreateCatalogRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = NewCatalog {
        nome: payload.nome.unwrap_or_default().trim().to_string(),
        ano: payload.ano,
        pdf_url: payload.pdf_url.unwrap_or_default().trim().to_string(),
        empresa_nome: clean_str(payload.empresa_nome),
        whatsapp_phone: clean_str(payload.whatsapp_phone),
        politica: clean_str(payload.politica),
    };

    let catalog = state.catalogs.create(new).await?;
    Ok((StatusCode::CREATED, Json(catalog)))
}

/// Provided-but-empty strings clear the nullable columns; absent fields are
/// left untouched.
#[derive(Debug, Deserialize)]
pub struct PatchCatalogRequest {
    pub nome: Option<String>,
    pub ano: Option<i32>,
    pub pdf_url: Option<String>,
    pub empresa_nome: Option<String>,
    pub whatsapp_phone: Option<String>,
    pub politica: Option<String>,
}

#[instrument(skip(state, payload))]
pub async fn patch_catalog(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<PatchCatalogRequest>,
) -> Result<Json<Catalog>, AppError> {
    let patch = CatalogPatch {
        nome: payload.nome.map(|v| v.trim().to_string()),
        ano: payload.ano,
        pdf_url: payload.pdf_url.map(|v| v.trim().to_string()),
        empresa_nome: payload.empresa_nome.map(|v| clean_str(Some(v))),
        whatsapp_phone: payload.whatsapp_phone.map(|v| clean_str(Some(v))),
        politica: payload.politica.map(|v| clean_str(Some(v))),
    };

    Ok(Json(state.catalogs.patch(id, patch).await?))
}

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    pub mode: Option<String>,
}

/// CSV upload as multipart, field name `file`.
#[instrument(skip(state, multipart))]
pub async fn import_products(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ImportQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mode: ImportMode = query.mode.as_deref().unwrap_or("replace").parse()?;

    let mut csv_text: Option<String> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidFormat(format!("invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidFormat(format!("failed to read upload: {}", e)))?;
            let text = String::from_utf8(bytes.to_vec())
                .map_err(|_| AppError::InvalidFormat("file must be UTF-8 text".into()))?;
            csv_text = Some(text);
            break;
        }
    }

    let csv_text = csv_text.ok_or_else(|| AppError::MissingField("file".into()))?;
    let summary = state.catalogs.import_csv(id, &csv_text, mode).await?;
    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub page: Option<i32>,
    /// Panel compatibility: `?search=term` on the products route behaves
    /// like the dedicated search endpoint.
    pub search: Option<String>,
    pub limit: Option<u64>,
}

#[instrument(skip(state))]
pub async fn products_by_page(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    if let Some(term) = query.search.as_deref() {
        return Ok(Json(state.catalogs.search(id, term, query.limit).await?));
    }

    let page = query.page.unwrap_or(1);
    Ok(Json(state.catalogs.products_by_page(id, page).await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<u64>,
}

#[instrument(skip(state))]
pub async fn search_products(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let term = query.q.unwrap_or_default();
    Ok(Json(state.catalogs.search(id, &term, query.limit).await?))
}
