use axum::{
    debug_handler,
    extract::{Path, State},
    Json,
};

use crate::{
    appresult::OrInternal,
    model::{Apartment, ApartmentId},
    store::DynStore,
    validation::ValidationError,
    AppError, AppResult, AppState,
};

#[debug_handler(state = AppState)]
pub(crate) async fn apartment(
    State(store): State<DynStore>,
    Path(id): Path<String>,
) -> AppResult<Json<Apartment>> {
    let Ok(id) = id.parse::<ApartmentId>() else {
        return Err(AppError::validation(ValidationError::new("Invalid apartment ID")));
    };

    let Some(apartment) = store.apartment(id).await.or_internal("Failed to fetch apartment")? else {
        return Err(AppError::NotFound("Apartment not found"));
    };

    Ok(Json(apartment))
}
