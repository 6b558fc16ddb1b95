//! Integration test support for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! Tests start an [`InventoryServer`] on an ephemeral local port. It serves
//! the same endpoints as the real inventory API (`GET /stock` and
//! `GET /products/{id}`), and lets tests change stock, inject failures and
//! count requests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use parking_lot::Mutex;
use rocketshoes_core::{Product, ProductId, Stock};
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Fake inventory API bound to `127.0.0.1` on a random port.
pub struct InventoryServer {
    addr: SocketAddr,
    state: InventoryState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
}

#[derive(Clone, Default)]
struct InventoryState {
    inner: Arc<InventoryInner>,
}

#[derive(Default)]
struct InventoryInner {
    products: Mutex<Vec<Product>>,
    stock: Mutex<Vec<Stock>>,
    stock_failing: AtomicBool,
    stock_requests: AtomicUsize,
    product_requests: AtomicUsize,
}

impl InventoryServer {
    /// Start serving `products` and `stock`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start(products: Vec<Product>, stock: Vec<Stock>) -> std::io::Result<Self> {
        let state = InventoryState::default();
        *state.inner.products.lock() = products;
        *state.inner.stock.lock() = stock;

        let app = Router::new()
            .route("/stock", get(list_stock))
            .route("/products/{id}", get(get_product))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await
        });

        Ok(Self {
            addr,
            state,
            shutdown: Some(tx),
            handle: Some(handle),
        })
    }

    /// Base URL with trailing slash, e.g. `http://127.0.0.1:41234/`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Replace the stock level for one product (adding the entry if missing).
    pub fn set_stock(&self, id: i32, amount: u32) {
        let id = ProductId::new(id);
        let mut stock = self.state.inner.stock.lock();
        match stock.iter_mut().find(|s| s.id == id) {
            Some(entry) => entry.amount = amount,
            None => stock.push(Stock { id, amount }),
        }
    }

    /// Make `GET /stock` answer `500 Internal Server Error`.
    pub fn fail_stock(&self, failing: bool) {
        self.state
            .inner
            .stock_failing
            .store(failing, Ordering::SeqCst);
    }

    /// Number of `GET /stock` requests served.
    #[must_use]
    pub fn stock_requests(&self) -> usize {
        self.state.inner.stock_requests.load(Ordering::SeqCst)
    }

    /// Number of `GET /products/{id}` requests served.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.state.inner.product_requests.load(Ordering::SeqCst)
    }

    /// Stop the server and wait for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for InventoryServer {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

async fn list_stock(
    State(state): State<InventoryState>,
) -> Result<Json<Vec<Stock>>, (StatusCode, &'static str)> {
    state.inner.stock_requests.fetch_add(1, Ordering::SeqCst);

    if state.inner.stock_failing.load(Ordering::SeqCst) {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "stock service unavailable"));
    }

    Ok(Json(state.inner.stock.lock().clone()))
}

async fn get_product(
    State(state): State<InventoryState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, StatusCode> {
    state.inner.product_requests.fetch_add(1, Ordering::SeqCst);

    let product = state
        .inner
        .products
        .lock()
        .iter()
        .find(|p| p.id == ProductId::new(id))
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)?;

    // The catalog has no notion of an in-cart amount and uses `title`.
    let mut body =
        serde_json::to_value(&product).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if let Some(object) = body.as_object_mut() {
        object.remove("amount");
        if let Some(name) = object.remove("name") {
            object.insert("title".to_string(), name);
        }
    }

    Ok(Json(body))
}

/// The storefront's sample catalog.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    [
        (1, "Tênis de Caminhada Leve Confortável", 17_990),
        (2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 13_990),
        (3, "Tênis Adidas Duramo Lite 2.0", 21_990),
    ]
    .into_iter()
    .map(|(id, name, cents)| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Decimal::new(cents, 2),
        image: format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
        amount: 0,
    })
    .collect()
}

/// Stock entries built from `(id, amount)` pairs.
#[must_use]
pub fn stock(entries: &[(i32, u32)]) -> Vec<Stock> {
    entries
        .iter()
        .map(|&(id, amount)| Stock {
            id: ProductId::new(id),
            amount,
        })
        .collect()
}
