use axum::{
    debug_handler,
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    appresult::OrInternal,
    model::{ContactMessage, ContactPayload},
    validation::ValidationError,
    AppError, AppResult, AppState,
};

use super::DynNotifier;

#[derive(Debug, Serialize)]
pub(crate) struct Accepted {
    message: &'static str,
}

#[debug_handler(state = AppState)]
pub(crate) async fn submit(
    State(notifier): State<DynNotifier>,
    body: Result<Json<ContactPayload>, JsonRejection>,
) -> AppResult<Json<Accepted>> {
    let Json(payload) = body.map_err(|rejection| {
        tracing::debug!(%rejection, "unreadable contact body");
        AppError::validation(ValidationError::new("Invalid request body"))
    })?;
    let message = ContactMessage::try_from(payload).map_err(AppError::validation)?;

    let receipt = Uuid::now_v7();
    notifier
        .notify(receipt, &message)
        .await
        .or_internal("Failed to submit contact form")?;

    Ok(Json(Accepted {
        message: "Contact form submitted successfully",
    }))
}
