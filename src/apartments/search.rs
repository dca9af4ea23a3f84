use axum::{
    debug_handler,
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::{
    appresult::OrInternal,
    model::Apartment,
    search::{SearchFilter, SearchParams},
    store::DynStore,
    validation::ValidationError,
    AppError, AppResult, AppState,
};

#[debug_handler(state = AppState)]
pub(crate) async fn search(
    State(store): State<DynStore>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<Vec<Apartment>>> {
    let Query(params) = query.map_err(|rejection| {
        tracing::debug!(%rejection, "unreadable search query");
        AppError::validation(ValidationError::new("Invalid search parameters"))
    })?;
    let filter = SearchFilter::try_from(params).map_err(AppError::validation)?;

    let apartments = store
        .search_apartments(&filter)
        .await
        .or_internal("Failed to search apartments")?;
    tracing::debug!(?filter, hits = apartments.len(), "apartment search");

    Ok(Json(apartments))
}
