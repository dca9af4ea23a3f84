#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use dira::{
    model::{ContactMessage, NewApartment},
    store::MemoryStore,
    AppState, DynStore, Notifier,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub fn apartment(title: &str, city: &str, price: i64, rooms: i64) -> NewApartment {
    serde_json::from_value(serde_json::json!({
        "title": title,
        "description": format!("{title}, close to everything"),
        "location": format!("10 Main St, {city}"),
        "neighborhood": "Center",
        "city": city,
        "price": price,
        "rooms": rooms,
        "bedrooms": rooms - 1,
        "bathrooms": 1,
    }))
    .unwrap()
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub received: Mutex<Vec<(Uuid, ContactMessage)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, receipt: Uuid, message: &ContactMessage) -> anyhow::Result<()> {
        self.received.lock().unwrap().push((receipt, message.clone()));
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: DynStore,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub async fn with(apartments: Vec<NewApartment>) -> Self {
        let store: DynStore = Arc::new(MemoryStore::with_apartments(apartments).await.unwrap());
        Self::with_store(store)
    }

    pub fn with_store(store: DynStore) -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        let router = dira::router(AppState {
            store: store.clone(),
            notifier: notifier.clone(),
        });
        Self { router, store, notifier }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

pub fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect()
}
