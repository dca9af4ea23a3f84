use axum::{debug_handler, extract::State, Json};

use crate::{appresult::OrInternal, model::Apartment, store::DynStore, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn featured(State(store): State<DynStore>) -> AppResult<Json<Vec<Apartment>>> {
    let apartments = store
        .featured_apartments()
        .await
        .or_internal("Failed to fetch featured apartments")?;
    Ok(Json(apartments))
}
