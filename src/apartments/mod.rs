mod detail;
mod featured;
mod list;
mod search;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/apartments", get(list::apartments))
        .route("/api/apartments/featured", get(featured::featured))
        .route("/api/apartments/search", get(search::search))
        .route("/api/apartments/{id}", get(detail::apartment))
}
