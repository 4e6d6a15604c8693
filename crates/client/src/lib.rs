//! Catalogo Client Library
//!
//! The buyer-session side of the catalog ordering tool:
//! - [`CartController`]: optimistic local cart with the case-pack rounding
//!   rule and fire-and-forget background sync to the order store
//! - [`OrderApi`]: the order store port, with a reqwest implementation
//! - [`CartStorage`]: the local persistence port (the browser-local storage
//!   role), with an in-memory implementation
//! - [`OrderLinkResolver`]: turns a shared order id back into a cart
//!
//! Local cart state is authoritative for the UI; the server copy converges
//! through full-snapshot syncs where the last write wins.

pub mod api;
pub mod cart;
pub mod error;
pub mod link;
pub mod storage;

pub use api::{HttpOrderApi, OrderApi, OrderDraft};
pub use cart::{CartController, CartEntry};
pub use error::{ClientError, Result};
pub use link::{OrderLinkResolver, ResolvedOrder};
pub use storage::{CartStorage, MemoryStorage};
