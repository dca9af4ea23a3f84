use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::validation::ValidationError;

use super::ApartmentId;

pub const MIN_MESSAGE_CHARS: usize = 10;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

pub fn is_valid_email(email: &str) -> bool {
    let local = email.split('@').next().unwrap_or_default();
    !local.starts_with('.') && !email.contains("..") && EMAIL.is_match(email)
}

/// Body of `POST /api/contact` as submitted. Missing or mistyped fields
/// still deserialize, so they fail validation under their own name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactPayload {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(deserialize_with = "lenient_optional_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub message: String,
    /// Kept raw; checked for an integer after the text fields.
    pub apartment_id: Option<Value>,
}

/// Anything but a JSON string reads as empty.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A contact submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub apartment_id: Option<ApartmentId>,
}

impl TryFrom<ContactPayload> for ContactMessage {
    type Error = ValidationError;

    /// Checks fields in form order and reports only the first failure.
    fn try_from(payload: ContactPayload) -> Result<Self, Self::Error> {
        const MSG: &str = "Validation error";

        if payload.name.trim().is_empty() {
            return Err(ValidationError::field(MSG, "name", "Name is required"));
        }
        if !is_valid_email(payload.email.trim()) {
            return Err(ValidationError::field(MSG, "email", "Valid email is required"));
        }
        if payload.message.trim().chars().count() < MIN_MESSAGE_CHARS {
            return Err(ValidationError::field(
                MSG,
                "message",
                format!("Message must be at least {MIN_MESSAGE_CHARS} characters long"),
            ));
        }
        let apartment_id = match payload.apartment_id {
            None | Some(Value::Null) => None,
            Some(raw) => Some(raw.as_i64().ok_or_else(|| {
                ValidationError::field(MSG, "apartmentId", "Apartment ID must be a number")
            })?),
        };

        Ok(Self {
            name: payload.name.trim().to_owned(),
            email: payload.email.trim().to_owned(),
            phone: payload.phone.filter(|p| !p.trim().is_empty()),
            message: payload.message,
            apartment_id,
        })
    }
}
