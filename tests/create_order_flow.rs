//! End-to-end order creation against an embedded RocksDB store
//! Run: cargo test --test create_order_flow

use rust_decimal::Decimal;
use storefront::db::repository::record_id;
use storefront::{
    CheckoutError, Config, CreateOrderRequest, CustomerCreate, OrderLineInput, ProductCreate,
    RepoError, Storefront,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tempfile::TempDir;

async fn open_store() -> (TempDir, Surreal<Db>, Storefront) {
    let tmp = tempfile::tempdir().unwrap();
    let db = storefront::db::connect(tmp.path()).await.unwrap();
    let store = Storefront::with_db(db.clone());
    (tmp, db, store)
}

async fn seed_customer(store: &Storefront, name: &str, email: &str) -> String {
    store
        .customers
        .create(CustomerCreate {
            name: name.to_string(),
            email: email.to_string(),
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string()
}

async fn seed_product(store: &Storefront, name: &str, price: Decimal, quantity: i64) -> String {
    store
        .products
        .create(ProductCreate {
            name: name.to_string(),
            price,
            quantity,
        })
        .await
        .unwrap()
        .id
        .unwrap()
        .to_string()
}

fn order_request(customer_id: &str, lines: &[(&str, i64)]) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_id: customer_id.to_string(),
        products: lines
            .iter()
            .map(|(id, quantity)| OrderLineInput {
                product_id: id.to_string(),
                quantity: *quantity,
            })
            .collect(),
    }
}

#[tokio::test]
async fn open_via_config_and_create_order() {
    storefront::init_logger();
    let tmp = tempfile::tempdir().unwrap();
    let config = Config::with_data_dir(tmp.path().to_str().unwrap());
    let store = Storefront::open(&config).await.unwrap();

    let customer_id = seed_customer(&store, "Alice", "alice@example.com").await;
    let product_id = seed_product(&store, "Keyboard", Decimal::new(500, 2), 10).await;

    let order = store
        .create_order(order_request(&customer_id, &[(&product_id, 2)]))
        .await
        .unwrap();
    assert_eq!(order.lines[0].quantity, 2);
}

#[tokio::test]
async fn create_order_happy_path() {
    let (_tmp, _db, store) = open_store().await;
    let customer_id = seed_customer(&store, "Alice", "alice@example.com").await;
    let product_id = seed_product(&store, "Keyboard", Decimal::new(500, 2), 10).await;

    let order = store
        .create_order(order_request(&customer_id, &[(&product_id, 3)]))
        .await
        .unwrap();

    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0].name, "Keyboard");
    assert_eq!(order.lines[0].price, Decimal::new(500, 2));
    assert_eq!(order.lines[0].quantity, 3);

    // Stock decremented by exactly the requested amount
    let product = store.products.find_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity, 7);

    // Order is persisted and readable back under its generated id
    let order_id = order.id.clone().unwrap().to_string();
    let persisted = store.orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(persisted.customer.to_string(), customer_id);
    assert_eq!(persisted.lines, order.lines);
    assert_eq!(store.orders.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn insufficient_stock_changes_nothing() {
    let (_tmp, _db, store) = open_store().await;
    let customer_id = seed_customer(&store, "Alice", "alice@example.com").await;
    let product_id = seed_product(&store, "Keyboard", Decimal::new(500, 2), 10).await;

    let err = store
        .create_order(order_request(&customer_id, &[(&product_id, 15)]))
        .await
        .unwrap_err();

    match err {
        CheckoutError::InsufficientStock { name, .. } => assert_eq!(name, "Keyboard"),
        other => panic!("unexpected: {other:?}"),
    }

    let product = store.products.find_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity, 10);
    assert!(store.orders.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_customer_is_rejected() {
    let (_tmp, _db, store) = open_store().await;
    let product_id = seed_product(&store, "Keyboard", Decimal::new(500, 2), 10).await;

    let err = store
        .create_order(order_request("customer:ghost", &[(&product_id, 1)]))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::CustomerNotFound(_)));
    assert!(store.orders.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_product_is_rejected_without_mutation() {
    let (_tmp, _db, store) = open_store().await;
    let customer_id = seed_customer(&store, "Alice", "alice@example.com").await;
    let product_id = seed_product(&store, "Keyboard", Decimal::new(500, 2), 10).await;

    let err = store
        .create_order(order_request(
            &customer_id,
            &[(&product_id, 1), ("product:ghost", 1)],
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::ProductNotFound));
    let product = store.products.find_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity, 10);
    assert!(store.orders.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_requests_are_rejected() {
    let (_tmp, _db, store) = open_store().await;
    let customer_id = seed_customer(&store, "Alice", "alice@example.com").await;
    let product_id = seed_product(&store, "Keyboard", Decimal::new(500, 2), 10).await;

    let empty = store
        .create_order(order_request(&customer_id, &[]))
        .await
        .unwrap_err();
    assert!(matches!(empty, CheckoutError::InvalidRequest(_)));

    let zero = store
        .create_order(order_request(&customer_id, &[(&product_id, 0)]))
        .await
        .unwrap_err();
    assert!(matches!(zero, CheckoutError::InvalidRequest(_)));

    let duplicate = store
        .create_order(order_request(&customer_id, &[(&product_id, 1), (&product_id, 2)]))
        .await
        .unwrap_err();
    assert!(matches!(duplicate, CheckoutError::InvalidRequest(_)));

    let product = store.products.find_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity, 10);
}

#[tokio::test]
async fn order_price_is_immune_to_later_catalog_change() {
    let (_tmp, db, store) = open_store().await;
    let customer_id = seed_customer(&store, "Alice", "alice@example.com").await;
    let product_id = seed_product(&store, "Keyboard", Decimal::new(500, 2), 10).await;

    let order = store
        .create_order(order_request(&customer_id, &[(&product_id, 2)]))
        .await
        .unwrap();

    // Catalog price changes after the sale
    db.query("UPDATE $id SET price = $price")
        .bind(("id", record_id("product", &product_id)))
        .bind(("price", Decimal::new(999, 2)))
        .await
        .unwrap()
        .check()
        .unwrap();

    let order_id = order.id.unwrap().to_string();
    let persisted = store.orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(persisted.lines[0].price, Decimal::new(500, 2));

    let product = store.products.find_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.price, Decimal::new(999, 2));
}

#[tokio::test]
async fn repeated_product_reads_are_idempotent() {
    let (_tmp, _db, store) = open_store().await;
    seed_customer(&store, "Alice", "alice@example.com").await;
    let p1 = seed_product(&store, "Keyboard", Decimal::new(500, 2), 10).await;
    let p2 = seed_product(&store, "Mouse", Decimal::new(1250, 2), 4).await;

    let ids = vec![record_id("product", &p1), record_id("product", &p2)];
    let mut first = store.products.find_all_by_id(&ids).await.unwrap();
    let mut second = store.products.find_all_by_id(&ids).await.unwrap();

    first.sort_by_key(|p| p.id.clone().unwrap().to_string());
    second.sort_by_key(|p| p.id.clone().unwrap().to_string());
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn duplicate_email_and_product_name_are_rejected() {
    let (_tmp, _db, store) = open_store().await;
    seed_customer(&store, "Alice", "alice@example.com").await;
    seed_product(&store, "Keyboard", Decimal::new(500, 2), 10).await;

    let email_err = store
        .customers
        .create(CustomerCreate {
            name: "Other Alice".into(),
            email: "alice@example.com".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(email_err, RepoError::Duplicate(_)));

    let name_err = store
        .products
        .create(ProductCreate {
            name: "Keyboard".into(),
            price: Decimal::new(100, 2),
            quantity: 1,
        })
        .await
        .unwrap_err();
    assert!(matches!(name_err, RepoError::Duplicate(_)));
}
