mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{apartment, ids, TestApp};
use dira::{
    model::{Apartment, ApartmentId, ApartmentPatch, NewApartment, User, UserCredentials, UserId},
    store::{StoreError, StoreResult},
    Store,
};
use serde_json::json;

async fn two_cities() -> TestApp {
    TestApp::with(vec![
        apartment("Geula flat", "Jerusalem", 2500, 3),
        apartment("Rabbi Akiva flat", "Bnei Brak", 3500, 3),
    ])
    .await
}

#[tokio::test]
async fn lists_only_available_apartments() {
    let mut rented = apartment("Rented", "Safed", 3000, 2);
    rented.is_available = false;
    let app = TestApp::with(vec![apartment("Open", "Safed", 3000, 2), rented]).await;

    let (status, body) = app.get("/api/apartments").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), [1]);
    assert_eq!(body[0]["isAvailable"], true);
}

#[tokio::test]
async fn search_by_city_is_case_insensitive() {
    let app = two_cities().await;
    let (status, body) = app.get("/api/apartments/search?city=jerusalem").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), [1]);
}

#[tokio::test]
async fn search_by_price_range() {
    let app = two_cities().await;
    let (status, body) = app.get("/api/apartments/search?minPrice=3000&maxPrice=4000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), [2]);
}

#[tokio::test]
async fn search_without_filters_equals_listing() {
    let app = two_cities().await;
    let (_, all) = app.get("/api/apartments").await;
    let (_, searched) = app.get("/api/apartments/search").await;
    assert_eq!(all, searched);

    let (_, blank) = app.get("/api/apartments/search?location=&minPrice=&rooms=").await;
    assert_eq!(all, blank);
}

#[tokio::test]
async fn search_by_location_and_rooms() {
    let app = TestApp::with(vec![
        apartment("Small", "Jerusalem", 2000, 2),
        apartment("Big", "Jerusalem", 6000, 5),
        apartment("Bigger", "Jerusalem", 7000, 6),
    ])
    .await;
    let (_, body) = app.get("/api/apartments/search?location=JERU&rooms=5").await;
    assert_eq!(ids(&body), [2]);
}

#[tokio::test]
async fn search_text_is_not_trimmed() {
    let app = TestApp::with(vec![
        apartment("Padded", "Jerusalem ", 2500, 3),
        apartment("Plain", "Jerusalem", 2500, 3),
    ])
    .await;

    let (status, body) = app.get("/api/apartments/search?city=Jerusalem%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), [1]);

    let (_, body) = app.get("/api/apartments/search?city=Jerusalem").await;
    assert_eq!(ids(&body), [2]);

    let (_, body) = app.get("/api/apartments/search?location=St,%20").await;
    assert_eq!(ids(&body), [1, 2]);

    let (_, body) = app.get("/api/apartments/search?city=%20%20&bedrooms=%202").await;
    assert_eq!(ids(&body), [1, 2]);
}

#[tokio::test]
async fn malformed_search_numbers_are_rejected() {
    let app = two_cities().await;
    let (status, body) = app.get("/api/apartments/search?minPrice=abc&bedrooms=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid search parameters");
    assert_eq!(body["errors"][0]["field"], "minPrice");
}

#[tokio::test]
async fn featured_is_sorted_and_capped() {
    let ratings = [3.1, 4.9, 2.0, 4.4, 5.0, 1.5, 4.4, 3.8];
    let apartments = ratings
        .iter()
        .map(|&rating| {
            let mut new = apartment("Flat", "Ashdod", 2500, 3);
            new.rating = rating;
            new
        })
        .collect();
    let app = TestApp::with(apartments).await;

    let (status, body) = app.get("/api/apartments/featured").await;
    assert_eq!(status, StatusCode::OK);
    let got: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["rating"].as_f64().unwrap())
        .collect();
    assert_eq!(got, [5.0, 4.9, 4.4, 4.4, 3.8, 3.1]);
    assert_eq!(ids(&body)[2..4], [4, 7]);
}

#[tokio::test]
async fn detail_returns_every_field() {
    let mut new = apartment("Detailed", "Beit Shemesh", 4100, 4);
    new.images = vec!["/a.jpg".to_owned(), "/b.jpg".to_owned()];
    new.nearby_yeshivot = vec!["Lev HaTorah".to_owned()];
    new.security_deposit = Some(8200);
    let app = TestApp::with(vec![new.clone()]).await;

    let (status, body) = app.get("/api/apartments/1").await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Apartment = serde_json::from_value(body).unwrap();
    assert_eq!(fetched, new.build(1).unwrap());
}

#[tokio::test]
async fn detail_rejects_bad_and_missing_ids() {
    let app = two_cities().await;

    let (status, body) = app.get("/api/apartments/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Invalid apartment ID" }));

    let (status, body) = app.get("/api/apartments/999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Apartment not found" }));
}

#[tokio::test]
async fn inserted_apartment_is_served() {
    let app = two_cities().await;
    let inserted = app
        .store
        .insert_apartment(apartment("Fresh listing", "Lakewood", 2900, 3))
        .await
        .unwrap();

    let (status, body) = app.get(&format!("/api/apartments/{}", inserted.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Fresh listing");

    let (_, body) = app.get("/api/apartments/search?city=lakewood").await;
    assert_eq!(ids(&body), [inserted.id]);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = two_cities().await;
    let (status, body) = app.get("/api/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not found" }));

    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

/// Fails every call, for the 500 path.
struct BrokenStore;

fn broken<T>() -> StoreResult<T> {
    Err(StoreError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl Store for BrokenStore {
    async fn apartment(&self, _: ApartmentId) -> StoreResult<Option<Apartment>> {
        broken()
    }
    async fn available_apartments(&self) -> StoreResult<Vec<Apartment>> {
        broken()
    }
    async fn count_apartments(&self) -> StoreResult<usize> {
        broken()
    }
    async fn insert_apartment(&self, _: NewApartment) -> StoreResult<Apartment> {
        broken()
    }
    async fn update_apartment(&self, _: ApartmentId, _: ApartmentPatch) -> StoreResult<Option<Apartment>> {
        broken()
    }
    async fn delete_apartment(&self, _: ApartmentId) -> StoreResult<bool> {
        broken()
    }
    async fn user(&self, _: UserId) -> StoreResult<Option<User>> {
        broken()
    }
    async fn user_by_username(&self, _: &str) -> StoreResult<Option<User>> {
        broken()
    }
    async fn insert_user(&self, _: UserCredentials) -> StoreResult<User> {
        broken()
    }
}

#[tokio::test]
async fn storage_failures_are_generic_500s() {
    let app = TestApp::with_store(Arc::new(BrokenStore));
    for (uri, message) in [
        ("/api/apartments", "Failed to fetch apartments"),
        ("/api/apartments/featured", "Failed to fetch featured apartments"),
        ("/api/apartments/search?city=x", "Failed to search apartments"),
        ("/api/apartments/1", "Failed to fetch apartment"),
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body, json!({ "message": message }), "{uri}");
    }
}
