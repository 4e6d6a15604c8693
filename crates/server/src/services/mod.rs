use crate::db::Repository;
use crate::services::catalog::CatalogService;
use crate::services::orders::OrderService;
use std::sync::Arc;

pub mod catalog;
pub mod orders;

// A container for all services to be injected into routes
#[derive(Clone)]
pub struct AppState {
    pub catalogs: Arc<CatalogService>,
    pub orders: Arc<OrderService>,
}

impl AppState {
    pub fn new(repo: Repository) -> Self {
        // Repository is cheap to clone (Arc-backed connection inside)
        Self {
            catalogs: Arc::new(CatalogService::new(repo.clone())),
            orders: Arc::new(OrderService::new(repo)),
        }
    }
}

/// Trim a value and map empty to `None` — the normalization applied to every
/// optional free-text field before it reaches the database.
pub(crate) fn clean_str(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_str() {
        assert_eq!(clean_str(None), None);
        assert_eq!(clean_str(Some("".into())), None);
        assert_eq!(clean_str(Some("   ".into())), None);
        assert_eq!(clean_str(Some("  ACME  ".into())), Some("ACME".into()));
    }
}
