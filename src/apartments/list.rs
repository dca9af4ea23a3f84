use axum::{debug_handler, extract::State, Json};

use crate::{appresult::OrInternal, model::Apartment, store::DynStore, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn apartments(State(store): State<DynStore>) -> AppResult<Json<Vec<Apartment>>> {
    let apartments = store
        .available_apartments()
        .await
        .or_internal("Failed to fetch apartments")?;
    Ok(Json(apartments))
}
