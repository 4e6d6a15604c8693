//! Client-resident cart controller
//!
//! One instance per catalog-scoped buyer session. Local mutations apply
//! synchronously (and mirror into [`CartStorage`]), then a detached task
//! pushes the full cart snapshot to the order store. Sync failures are
//! swallowed: local state is authoritative for the UI, and because every
//! sync sends the snapshot taken at call time, the last one to land wins
//! and the store converges on the next edit.

use catalogo_core::message;
use catalogo_core::qty::round_to_multiple;
use catalogo_core::types::{order_total, Catalog, OrderItem, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::api::{OrderApi, OrderDraft};
use crate::error::Result;
use crate::link::OrderLinkResolver;
use crate::storage::CartStorage;

/// Client-local mirror of an order line; may be transiently ahead of or
/// behind the store.
pub type CartEntry = OrderItem;

/// Local-storage layout, keyed `catalogo_cart_<id>`.
#[derive(Serialize, Deserialize)]
struct StoredCart {
    cart: Vec<CartEntry>,
}

/// Local-storage layout, keyed `catalogo_pedido_<id>`.
#[derive(Serialize, Deserialize)]
struct StoredOrder {
    #[serde(rename = "pedidoId")]
    pedido_id: Uuid,
}

pub struct CartController {
    inner: Arc<CartInner>,
}

struct CartInner {
    catalogo_id: i32,
    cart_key: String,
    order_key: String,
    items: Mutex<Vec<CartEntry>>,
    order_id: Mutex<Option<Uuid>>,
    /// Serializes lazy order creation so rapid first edits don't create
    /// duplicate orders.
    create_guard: tokio::sync::Mutex<()>,
    storage: Arc<dyn CartStorage>,
    api: Arc<dyn OrderApi>,
    /// Monotonic sync generation, for tracing superseded snapshots.
    generation: AtomicU64,
}

impl CartController {
    /// Build a controller for one catalog, restoring any cart and order id
    /// a previous session left in storage. Stored state is a cache of
    /// intent: unreadable blobs are dropped silently.
    pub fn new(catalogo_id: i32, storage: Arc<dyn CartStorage>, api: Arc<dyn OrderApi>) -> Self {
        let cart_key = format!("catalogo_cart_{}", catalogo_id);
        let order_key = format!("catalogo_pedido_{}", catalogo_id);

        let items = storage
            .get(&cart_key)
            .and_then(|raw| serde_json::from_str::<StoredCart>(&raw).ok())
            .map(|stored| stored.cart)
            .unwrap_or_default();

        let order_id = storage
            .get(&order_key)
            .and_then(|raw| serde_json::from_str::<StoredOrder>(&raw).ok())
            .map(|stored| stored.pedido_id);

        Self {
            inner: Arc::new(CartInner {
                catalogo_id,
                cart_key,
                order_key,
                items: Mutex::new(items),
                order_id: Mutex::new(order_id),
                create_guard: tokio::sync::Mutex::new(()),
                storage,
                api,
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn catalogo_id(&self) -> i32 {
        self.inner.catalogo_id
    }

    /// Snapshot of the current entries.
    pub fn items(&self) -> Vec<CartEntry> {
        self.inner.items.lock().unwrap().clone()
    }

    /// The pinned server order id, once one exists.
    pub fn order_id(&self) -> Option<Uuid> {
        *self.inner.order_id.lock().unwrap()
    }

    pub fn total(&self) -> Decimal {
        order_total(&self.items())
    }

    /// Add a product (or merge into its existing line), rounding through
    /// the multiple rule. Without a forced quantity one full multiple is
    /// added. Price and multiple are re-stamped from the current product —
    /// the quote only freezes at final sync.
    pub fn add_to_cart(&self, product: &Product, forced_qty: Option<i32>) -> CartEntry {
        let multiple = product.qtd_multiplo.max(1);
        let add_qty = forced_qty.unwrap_or(multiple);

        let (entry, snapshot) = {
            let mut items = self.inner.items.lock().unwrap();

            let entry = match items.iter_mut().find(|i| i.r#ref == product.r#ref) {
                Some(existing) => {
                    existing.qtd = round_to_multiple(existing.qtd + add_qty, multiple);
                    existing.qtd_multiplo = multiple;
                    existing.preco = product.preco;
                    existing.clone()
                }
                None => {
                    let entry = CartEntry {
                        r#ref: product.r#ref.clone(),
                        nome: product.nome.clone(),
                        pagina: Some(product.pagina),
                        qtd: round_to_multiple(add_qty, multiple),
                        qtd_multiplo: multiple,
                        preco: product.preco,
                    };
                    items.push(entry.clone());
                    entry
                }
            };

            (entry, items.clone())
        };

        self.after_mutation(snapshot);
        entry
    }

    /// Remove a line locally. Removal is its own operation — setting a
    /// quantity to zero is not a removal path.
    pub fn remove_from_cart(&self, reference: &str) {
        let snapshot = {
            let mut items = self.inner.items.lock().unwrap();
            items.retain(|i| i.r#ref != reference);
            items.clone()
        };

        self.after_mutation(snapshot);
    }

    /// Set a line's quantity, re-normalized against that line's multiple.
    /// Unknown refs are a no-op.
    pub fn set_qty(&self, reference: &str, qty: i32) -> Option<CartEntry> {
        let (entry, snapshot) = {
            let mut items = self.inner.items.lock().unwrap();
            let entry = items.iter_mut().find(|i| i.r#ref == reference).map(|item| {
                item.qtd = round_to_multiple(qty, item.qtd_multiplo);
                item.clone()
            });
            (entry, items.clone())
        };

        if entry.is_some() {
            self.after_mutation(snapshot);
        }
        entry
    }

    /// Empty the cart; the background sync propagates the empty list, which
    /// deletes all server-side lines but keeps the order alive.
    pub fn clear(&self) {
        {
            let mut items = self.inner.items.lock().unwrap();
            items.clear();
        }

        self.after_mutation(Vec::new());
    }

    /// Awaited full sync, used by explicit actions (checkout, copy link).
    /// Returns the order id the snapshot landed on.
    pub async fn sync_now(&self) -> Result<Uuid> {
        let snapshot = self.items();
        let order_id = CartInner::ensure_order_id(&self.inner).await?;
        self.inner.api.replace_items(order_id, &snapshot).await?;
        Ok(order_id)
    }

    /// Rehydrate from an order link: local state is replaced wholesale by
    /// the fetched order (server wins, only here) and the order id is
    /// pinned. On failure the local cart is kept and `false` returned so
    /// the caller can carry on with a fresh session.
    pub async fn hydrate_from_link(&self, resolver: &OrderLinkResolver, order_id: Uuid) -> bool {
        match resolver.resolve(order_id).await {
            Ok(resolved) => {
                let snapshot = {
                    let mut items = self.inner.items.lock().unwrap();
                    *items = resolved.items;
                    items.clone()
                };
                *self.inner.order_id.lock().unwrap() = Some(resolved.order.id);

                self.inner.persist_cart(&snapshot);
                self.inner.persist_order_id(resolved.order.id);
                true
            }
            Err(err) => {
                tracing::debug!(%err, %order_id, "order link resolution failed, keeping local cart");
                false
            }
        }
    }

    /// Build the WhatsApp handoff URL. Syncs first so the embedded link
    /// points at the persisted order; if the sync fails the text still goes
    /// out with the local snapshot and whatever order id already exists.
    pub async fn checkout_whatsapp(&self, catalog: &Catalog, origin: &str) -> String {
        let order_id = match self.sync_now().await {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::debug!(%err, "checkout sync failed, using local snapshot");
                self.order_id()
            }
        };

        let link = order_id.map(|id| format!("{}/p/{}", origin.trim_end_matches('/'), id));
        let text = message::order_text(catalog, &self.items(), link.as_deref());
        message::whatsapp_link(catalog.whatsapp_phone.as_deref(), &text)
    }

    /// Persist locally, then fire the detached sync with this snapshot.
    fn after_mutation(&self, snapshot: Vec<CartEntry>) {
        self.inner.persist_cart(&snapshot);
        self.spawn_sync(snapshot);
    }

    /// Fire-and-forget push. The task gets the snapshot taken at call time;
    /// its outcome never reaches the caller. Superseding edits simply spawn
    /// a newer generation with a fresher snapshot.
    fn spawn_sync(&self, snapshot: Vec<CartEntry>) {
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(generation, "no async runtime, background sync skipped");
            return;
        };

        let inner = Arc::clone(&self.inner);
        handle.spawn(async move {
            if let Err(err) = CartInner::push_snapshot(&inner, &snapshot).await {
                tracing::debug!(%err, generation, "background cart sync failed");
            }
        });
    }
}

impl CartInner {
    /// Reuse the known order id or lazily create the server order. The
    /// guard serializes concurrent first-syncs; losers re-check and reuse.
    async fn ensure_order_id(inner: &Arc<Self>) -> Result<Uuid> {
        if let Some(id) = *inner.order_id.lock().unwrap() {
            return Ok(id);
        }

        let _guard = inner.create_guard.lock().await;
        if let Some(id) = *inner.order_id.lock().unwrap() {
            return Ok(id);
        }

        let draft = OrderDraft {
            cliente_nome: None,
            cliente_contato: Some("WhatsApp".into()),
            observacao: Some("B2B".into()),
        };
        let order = inner.api.create_order(inner.catalogo_id, &draft).await?;

        *inner.order_id.lock().unwrap() = Some(order.id);
        inner.persist_order_id(order.id);

        Ok(order.id)
    }

    async fn push_snapshot(inner: &Arc<Self>, snapshot: &[CartEntry]) -> Result<()> {
        let order_id = Self::ensure_order_id(inner).await?;
        inner.api.replace_items(order_id, snapshot).await
    }

    fn persist_cart(&self, items: &[CartEntry]) {
        match serde_json::to_string(&StoredCart {
            cart: items.to_vec(),
        }) {
            Ok(raw) => self.storage.set(&self.cart_key, &raw),
            Err(err) => tracing::debug!(%err, "failed to serialize cart for local storage"),
        }
    }

    fn persist_order_id(&self, id: Uuid) {
        match serde_json::to_string(&StoredOrder { pedido_id: id }) {
            Ok(raw) => self.storage.set(&self.order_key, &raw),
            Err(err) => tracing::debug!(%err, "failed to serialize order id for local storage"),
        }
    }
}
