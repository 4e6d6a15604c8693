//! Order routes: creation, lookup, header patch, and the item sync
//! primitives (full replace + incremental add/remove)

use axum::{
    extract::{Path, State},
    Json,
};
use catalogo_core::types::{Order, OrderDetail, OrderItem};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::db::{OrderDraft, OrderPatch};
use crate::errors::AppError;
use crate::services::orders::ItemMeta;
use crate::services::{clean_str, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub catalogo_id: Option<i32>,
    /// Optional client-supplied id; an existing order is returned unchanged.
    pub id: Option<Uuid>,
    pub cliente_nome: Option<String>,
    pub cliente_contato: Option<String>,
    pub observacao: Option<String>,
    pub status: Option<String>,
}

#[instrument(skip(state, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let draft = OrderDraft {
        cliente_nome: clean_str(payload.cliente_nome),
        cliente_contato: clean_str(payload.cliente_contato),
        observacao: clean_str(payload.observacao),
        status: clean_str(payload.status),
    };

    let order = state
        .orders
        .create(payload.catalogo_id, payload.id, draft)
        .await?;
    Ok(Json(order))
}

#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetail>, AppError> {
    Ok(Json(state.orders.get(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct PatchOrderRequest {
    pub cliente_nome: Option<String>,
    pub cliente_contato: Option<String>,
    pub observacao: Option<String>,
    pub status: Option<String>,
}

#[instrument(skip(state, payload))]
pub async fn patch_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PatchOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let patch = OrderPatch {
        cliente_nome: payload.cliente_nome.map(|v| clean_str(Some(v))),
        cliente_contato: payload.cliente_contato.map(|v| clean_str(Some(v))),
        observacao: payload.observacao.map(|v| clean_str(Some(v))),
        // a blank status resets to the default open state
        status: payload
            .status
            .map(|v| clean_str(Some(v)).unwrap_or_else(|| "aberto".to_string())),
    };

    Ok(Json(state.orders.patch(id, patch).await?))
}

/// Loose line payload: anything may be missing, normalization decides what
/// survives.
#[derive(Debug, Deserialize)]
pub struct ItemPayload {
    pub r#ref: Option<String>,
    pub nome: Option<String>,
    pub pagina: Option<i32>,
    pub qtd: Option<i32>,
    pub qtd_multiplo: Option<i32>,
    pub preco: Option<Decimal>,
}

impl From<ItemPayload> for OrderItem {
    fn from(p: ItemPayload) -> Self {
        Self {
            r#ref: p.r#ref.unwrap_or_default(),
            nome: p.nome.unwrap_or_default(),
            pagina: p.pagina,
            qtd: p.qtd.unwrap_or(0),
            qtd_multiplo: p.qtd_multiplo.unwrap_or(1),
            preco: p.preco.unwrap_or(Decimal::ZERO),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReplaceItemsRequest {
    pub itens: Option<Vec<ItemPayload>>,
}

/// Full cart sync (PUT): last-write-wins overwrite of the order's lines.
#[instrument(skip(state, payload))]
pub async fn replace_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReplaceItemsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let itens = payload
        .itens
        .ok_or_else(|| AppError::MissingField("itens".into()))?;

    let items: Vec<OrderItem> = itens.into_iter().map(Into::into).collect();
    state.orders.replace_items(id, items).await?;

    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub r#ref: Option<String>,
    pub nome: Option<String>,
    pub pagina: Option<i32>,
    pub delta: Option<i32>,
    pub qtd_multiplo: Option<i32>,
    pub preco: Option<Decimal>,
}

#[instrument(skip(state, payload))]
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<OrderItem>, AppError> {
    let meta = ItemMeta {
        nome: payload.nome,
        pagina: payload.pagina,
        qtd_multiplo: payload.qtd_multiplo,
        preco: payload.preco,
    };

    let item = state
        .orders
        .add_item(id, payload.r#ref, payload.delta, meta)
        .await?;
    Ok(Json(item))
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub r#ref: Option<String>,
}

#[instrument(skip(state, payload))]
pub async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RemoveItemRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.orders.remove_item(id, payload.r#ref).await?;
    Ok(Json(json!({ "ok": true })))
}
