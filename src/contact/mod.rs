mod submit;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::post, Router};
use uuid::Uuid;

use crate::{model::ContactMessage, AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/contact", post(submit::submit))
}

/// Receives accepted contact submissions. Delivery (mail, CRM, ...) lives
/// behind this seam.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, receipt: Uuid, message: &ContactMessage) -> anyhow::Result<()>;
}

pub type DynNotifier = Arc<dyn Notifier>;

/// Writes each submission to the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, receipt: Uuid, message: &ContactMessage) -> anyhow::Result<()> {
        tracing::info!(
            %receipt,
            name = %message.name,
            email = %message.email,
            phone = message.phone.as_deref(),
            apartment_id = message.apartment_id,
            body = %message.message,
            "contact form submission"
        );
        Ok(())
    }
}
