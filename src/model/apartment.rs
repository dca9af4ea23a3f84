use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::validation::{FieldError, ValidationError};

pub type ApartmentId = i64;

pub const MAX_RATING: f64 = 5.0;

/// A rental listing. Only records with `is_available` set are ever surfaced
/// by listing, search and featured queries; point lookups ignore the flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    pub id: ApartmentId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub neighborhood: String,
    pub city: String,
    /// Monthly rent in whole shekels.
    pub price: i64,
    pub rooms: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    /// Square meters.
    pub area: Option<i64>,
    /// Display order; the first image is the primary one.
    #[sqlx(json)]
    pub images: Vec<String>,
    pub video_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[sqlx(json)]
    pub amenities: Vec<String>,
    #[sqlx(json)]
    pub nearby_yeshivot: Vec<String>,
    pub rating: f64,
    pub review_count: i64,
    pub is_available: bool,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub security_deposit: Option<i64>,
    pub furnished: bool,
    pub parking: bool,
    pub pet_friendly: bool,
}

impl Apartment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
            ("neighborhood", &self.neighborhood),
            ("city", &self.city),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, "must not be empty"));
            }
        }

        for (field, value) in [
            ("price", Some(self.price)),
            ("rooms", Some(self.rooms)),
            ("bedrooms", Some(self.bedrooms)),
            ("bathrooms", Some(self.bathrooms)),
            ("reviewCount", Some(self.review_count)),
            ("securityDeposit", self.security_deposit),
        ] {
            if value.is_some_and(|v| v < 0) {
                errors.push(FieldError::new(field, "must not be negative"));
            }
        }

        if self.area.is_some_and(|a| a <= 0) {
            errors.push(FieldError::new("area", "must be positive"));
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            errors.push(FieldError::new("rating", format!("must be between 0.0 and {MAX_RATING:.1}")));
        }
        if self.latitude.is_some_and(|l| !(-90.0..=90.0).contains(&l)) {
            errors.push(FieldError::new("latitude", "must be between -90 and 90"));
        }
        if self.longitude.is_some_and(|l| !(-180.0..=180.0).contains(&l)) {
            errors.push(FieldError::new("longitude", "must be between -180 and 180"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::with_errors("Invalid apartment", errors))
        }
    }

    /// Rounds the decimal columns to their stored scale.
    fn normalize(mut self) -> Self {
        self.rating = round_to(self.rating, 1);
        self.latitude = self.latitude.map(|l| round_to(l, 7));
        self.longitude = self.longitude.map(|l| round_to(l, 7));
        self
    }
}

fn round_to(value: f64, scale: i32) -> f64 {
    let factor = 10f64.powi(scale);
    (value * factor).round() / factor
}

fn default_true() -> bool {
    true
}

/// Insert shape for the administrative path: every field but `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApartment {
    pub title: String,
    pub description: String,
    pub location: String,
    pub neighborhood: String,
    pub city: String,
    pub price: i64,
    pub rooms: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    #[serde(default)]
    pub area: Option<i64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub nearby_yeshivot: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub security_deposit: Option<i64>,
    #[serde(default)]
    pub furnished: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub pet_friendly: bool,
}

impl NewApartment {
    /// Assigns `id`, validates and normalizes.
    pub fn build(self, id: ApartmentId) -> Result<Apartment, ValidationError> {
        let apartment = Apartment {
            id,
            title: self.title,
            description: self.description,
            location: self.location,
            neighborhood: self.neighborhood,
            city: self.city,
            price: self.price,
            rooms: self.rooms,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area: self.area,
            images: self.images,
            video_url: self.video_url,
            latitude: self.latitude,
            longitude: self.longitude,
            amenities: self.amenities,
            nearby_yeshivot: self.nearby_yeshivot,
            rating: self.rating,
            review_count: self.review_count,
            is_available: self.is_available,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            security_deposit: self.security_deposit,
            furnished: self.furnished,
            parking: self.parking,
            pet_friendly: self.pet_friendly,
        };
        apartment.validate()?;
        Ok(apartment.normalize())
    }
}

/// Distinguishes an absent key (`None`) from an explicit `null` (`Some(None)`).
fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Partial update. Absent fields are left untouched; nullable columns can be
/// cleared with an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApartmentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub price: Option<i64>,
    pub rooms: Option<i64>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub area: Option<Option<i64>>,
    pub images: Option<Vec<String>>,
    #[serde(deserialize_with = "nullable")]
    pub video_url: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub latitude: Option<Option<f64>>,
    #[serde(deserialize_with = "nullable")]
    pub longitude: Option<Option<f64>>,
    pub amenities: Option<Vec<String>>,
    pub nearby_yeshivot: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    pub is_available: Option<bool>,
    #[serde(deserialize_with = "nullable")]
    pub contact_phone: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub contact_email: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub security_deposit: Option<Option<i64>>,
    pub furnished: Option<bool>,
    pub parking: Option<bool>,
    pub pet_friendly: Option<bool>,
}

macro_rules! patch_fields {
    ($patch:ident, $target:ident; $($field:ident),* $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )*
    };
}

impl ApartmentPatch {
    /// Applies the patch on top of `current`. The `id` never changes.
    pub fn apply_to(self, mut current: Apartment) -> Result<Apartment, ValidationError> {
        let patch = self;
        patch_fields!(patch, current;
            title, description, location, neighborhood, city,
            price, rooms, bedrooms, bathrooms, area, images, video_url,
            latitude, longitude, amenities, nearby_yeshivot, rating,
            review_count, is_available, contact_phone, contact_email,
            security_deposit, furnished, parking, pet_friendly,
        );
        current.validate()?;
        Ok(current.normalize())
    }
}
