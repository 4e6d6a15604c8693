//! Order store port
//!
//! [`OrderApi`] is the sync boundary the cart controller talks through;
//! [`HttpOrderApi`] is the real reqwest-backed implementation. Tests inject
//! their own mock.

use async_trait::async_trait;
use catalogo_core::types::{Catalog, Order, OrderDetail, OrderItem};
use serde_json::json;
use uuid::Uuid;

use crate::error::{ClientError, Result};

/// Optional order header fields sent at creation.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub cliente_nome: Option<String>,
    pub cliente_contato: Option<String>,
    pub observacao: Option<String>,
}

#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn fetch_catalog(&self, catalogo_id: i32) -> Result<Catalog>;
    async fn create_order(&self, catalogo_id: i32, draft: &OrderDraft) -> Result<Order>;
    async fn fetch_order(&self, order_id: Uuid) -> Result<OrderDetail>;
    async fn replace_items(&self, order_id: Uuid, items: &[OrderItem]) -> Result<()>;
}

/// HTTP implementation against the catalogo-server API.
pub struct HttpOrderApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrderApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Map non-2xx responses to [`ClientError::Api`], pulling the message
    /// out of the server's error envelope when present.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body["error"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string()),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    async fn fetch_catalog(&self, catalogo_id: i32) -> Result<Catalog> {
        let response = self
            .client
            .get(format!("{}/catalogos/{}", self.base_url, catalogo_id))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_order(&self, catalogo_id: i32, draft: &OrderDraft) -> Result<Order> {
        let body = json!({
            "catalogo_id": catalogo_id,
            "cliente_nome": draft.cliente_nome,
            "cliente_contato": draft.cliente_contato,
            "observacao": draft.observacao,
        });

        let response = self
            .client
            .post(format!("{}/pedidos", self.base_url))
            .json(&body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn fetch_order(&self, order_id: Uuid) -> Result<OrderDetail> {
        let response = self
            .client
            .get(format!("{}/pedidos/{}", self.base_url, order_id))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn replace_items(&self, order_id: Uuid, items: &[OrderItem]) -> Result<()> {
        let response = self
            .client
            .put(format!("{}/pedidos/{}/itens", self.base_url, order_id))
            .json(&json!({ "itens": items }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
