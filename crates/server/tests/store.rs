//! Store integration tests
//!
//! These exercise the product index and order store against a real
//! Postgres. Point `DATABASE_URL` at a disposable database to run them;
//! without it each test skips itself so the suite stays green in plain
//! unit-test environments.

use catalogo_core::types::OrderItem;
use catalogo_server::config::DatabaseConfig;
use catalogo_server::db::{self, ImportMode, NewCatalog, OrderDraft, Repository};
use catalogo_server::errors::AppError;
use catalogo_server::services::catalog::CatalogService;
use catalogo_server::services::orders::{ItemMeta, OrderService};
use rust_decimal::Decimal;
use uuid::Uuid;

struct Harness {
    catalogs: CatalogService,
    orders: OrderService,
    catalog_id: i32,
}

/// Connect and create a fresh catalog so tests never share product sets.
async fn harness() -> Option<Harness> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping store test");
        return None;
    };

    let config = DatabaseConfig {
        url,
        max_connections: 5,
        min_connections: 1,
        connect_timeout: 10,
    };

    let conn = db::connect(&config).await.expect("database must be reachable");
    db::apply_schema(&conn).await.expect("schema must apply");
    let repo = Repository::new(conn);

    let catalog = repo
        .create_catalog(NewCatalog {
            nome: format!("Catalogo de teste {}", Uuid::new_v4()),
            ano: Some(2026),
            pdf_url: "https://example.com/catalogo.pdf".into(),
            empresa_nome: None,
            whatsapp_phone: None,
            politica: None,
        })
        .await
        .expect("catalog insert");

    Some(Harness {
        catalogs: CatalogService::new(repo.clone()),
        orders: OrderService::new(repo),
        catalog_id: catalog.id,
    })
}

fn csv(rows: &[&str]) -> String {
    let mut text = String::from("pagina,nome,ref,qtd_multiplo,preco\n");
    text.push_str(&rows.join("\n"));
    text
}

fn line(reference: &str, qtd: i32, multiple: i32) -> OrderItem {
    OrderItem {
        r#ref: reference.into(),
        nome: format!("Produto {}", reference),
        pagina: Some(1),
        qtd,
        qtd_multiplo: multiple,
        preco: Decimal::new(1000, 2),
    }
}

#[tokio::test]
async fn replace_import_drops_products_missing_from_the_new_set() {
    let Some(h) = harness().await else { return };

    let first = csv(&["1,Boneca X,A1,3,10.00", "2,Carrinho,A2,1,5.00"]);
    h.catalogs
        .import_csv(h.catalog_id, &first, ImportMode::Replace)
        .await
        .unwrap();

    let second = csv(&["2,Carrinho,A2,1,6.00", "3,Bola,A3,6,2.50"]);
    let summary = h
        .catalogs
        .import_csv(h.catalog_id, &second, ImportMode::Replace)
        .await
        .unwrap();
    assert_eq!(summary.importados, 2);

    // A1 is gone, A2 was overwritten, A3 is new
    assert!(h
        .catalogs
        .products_by_page(h.catalog_id, 1)
        .await
        .unwrap()
        .is_empty());

    let page2 = h.catalogs.products_by_page(h.catalog_id, 2).await.unwrap();
    assert_eq!(page2.len(), 1);
    assert_eq!(page2[0].r#ref, "A2");
    assert_eq!(page2[0].preco, Decimal::new(600, 2));
}

#[tokio::test]
async fn append_import_preserves_products_absent_from_the_new_set() {
    let Some(h) = harness().await else { return };

    let first = csv(&["1,Boneca X,A1,3,10.00"]);
    h.catalogs
        .import_csv(h.catalog_id, &first, ImportMode::Replace)
        .await
        .unwrap();

    let second = csv(&["1,Boneca X,A1,3,12.00", "2,Bola,B1,6,2.50"]);
    h.catalogs
        .import_csv(h.catalog_id, &second, ImportMode::Append)
        .await
        .unwrap();

    let page1 = h.catalogs.products_by_page(h.catalog_id, 1).await.unwrap();
    assert_eq!(page1.len(), 1);
    // upserted in place
    assert_eq!(page1[0].preco, Decimal::new(1200, 2));

    let page2 = h.catalogs.products_by_page(h.catalog_id, 2).await.unwrap();
    assert_eq!(page2.len(), 1);
    assert_eq!(page2[0].r#ref, "B1");
}

#[tokio::test]
async fn search_ranks_ref_matches_above_name_matches() {
    let Some(h) = harness().await else { return };

    // the name-only match sits on an earlier page to prove the tier wins
    let rows = csv(&["1,Boneca XYZ,A1,1,1.00", "5,Bola,XYZ9,1,1.00"]);
    h.catalogs
        .import_csv(h.catalog_id, &rows, ImportMode::Replace)
        .await
        .unwrap();

    let results = h.catalogs.search(h.catalog_id, "xyz", None).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].r#ref, "XYZ9");
    assert_eq!(results[1].r#ref, "A1");

    // empty term is an empty result, not the whole catalog
    assert!(h.catalogs.search(h.catalog_id, "  ", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_order_is_idempotent_by_client_id() {
    let Some(h) = harness().await else { return };

    let id = Uuid::new_v4();
    let draft = OrderDraft {
        cliente_contato: Some("WhatsApp".into()),
        ..Default::default()
    };

    let first = h
        .orders
        .create(Some(h.catalog_id), Some(id), draft.clone())
        .await
        .unwrap();
    assert_eq!(first.id, id);
    assert_eq!(first.status, "aberto");

    // second create with the same id returns the stored order unchanged
    let second = h
        .orders
        .create(
            Some(h.catalog_id),
            Some(id),
            OrderDraft {
                cliente_nome: Some("Outro".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(second.cliente_nome, None);
    assert_eq!(second.created_at, first.created_at);
}

#[tokio::test]
async fn create_order_rejects_unknown_catalog() {
    let Some(h) = harness().await else { return };

    let err = h
        .orders
        .create(Some(-1), None, OrderDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidReference(_)));
}

#[tokio::test]
async fn replace_items_is_idempotent_and_empty_sync_keeps_the_order() {
    let Some(h) = harness().await else { return };

    let order = h
        .orders
        .create(Some(h.catalog_id), None, OrderDraft::default())
        .await
        .unwrap();

    let snapshot = vec![line("A1", 3, 3), line("B2", 6, 3)];
    h.orders.replace_items(order.id, snapshot).await.unwrap();

    let stored = h.orders.get(order.id).await.unwrap().itens;
    assert_eq!(stored.len(), 2);

    // re-syncing the stored snapshot changes nothing
    h.orders
        .replace_items(order.id, stored.clone())
        .await
        .unwrap();
    assert_eq!(h.orders.get(order.id).await.unwrap().itens, stored);

    // an empty sync empties the lines but the order survives
    h.orders.replace_items(order.id, Vec::new()).await.unwrap();
    let detail = h.orders.get(order.id).await.unwrap();
    assert!(detail.itens.is_empty());
    assert_eq!(detail.order.id, order.id);
}

#[tokio::test]
async fn replace_items_drops_invalid_lines() {
    let Some(h) = harness().await else { return };

    let order = h
        .orders
        .create(Some(h.catalog_id), None, OrderDraft::default())
        .await
        .unwrap();

    let snapshot = vec![line("", 3, 3), line("Z0", 0, 3), line("A1", 3, 3)];
    h.orders.replace_items(order.id, snapshot).await.unwrap();

    let stored = h.orders.get(order.id).await.unwrap().itens;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].r#ref, "A1");
}

#[tokio::test]
async fn add_item_accumulates_deltas() {
    let Some(h) = harness().await else { return };

    let order = h
        .orders
        .create(Some(h.catalog_id), None, OrderDraft::default())
        .await
        .unwrap();

    let meta = ItemMeta {
        nome: Some("Boneca X".into()),
        pagina: Some(1),
        qtd_multiplo: Some(3),
        preco: Some(Decimal::new(1000, 2)),
    };

    let first = h
        .orders
        .add_item(order.id, Some("A1".into()), Some(3), meta.clone())
        .await
        .unwrap();
    assert_eq!(first.qtd, 3);

    let second = h
        .orders
        .add_item(order.id, Some("A1".into()), Some(3), meta.clone())
        .await
        .unwrap();
    assert_eq!(second.qtd, 6);

    // negative deltas clamp at zero instead of going negative
    let third = h
        .orders
        .add_item(order.id, Some("A1".into()), Some(-100), meta)
        .await
        .unwrap();
    assert_eq!(third.qtd, 0);
}

#[tokio::test]
async fn remove_item_is_idempotent() {
    let Some(h) = harness().await else { return };

    let order = h
        .orders
        .create(Some(h.catalog_id), None, OrderDraft::default())
        .await
        .unwrap();

    h.orders
        .replace_items(order.id, vec![line("A1", 3, 3)])
        .await
        .unwrap();

    h.orders
        .remove_item(order.id, Some("A1".into()))
        .await
        .unwrap();
    assert!(h.orders.get(order.id).await.unwrap().itens.is_empty());

    // removing again (or a ref that never existed) is not an error
    h.orders
        .remove_item(order.id, Some("A1".into()))
        .await
        .unwrap();
    h.orders
        .remove_item(order.id, Some("nunca-existiu".into()))
        .await
        .unwrap();
}
