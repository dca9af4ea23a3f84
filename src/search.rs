//! Apartment search: a conjunction of optional predicates over the
//! available set. Text predicates are case-insensitive; numeric predicates
//! are inclusive bounds or exact matches. Result order is the input order.

use serde::Deserialize;

use crate::{
    model::Apartment,
    validation::{FieldError, ValidationError},
};

/// Query string of `GET /api/apartments/search`, exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub location: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub rooms: Option<String>,
    pub bedrooms: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub location: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// Exact room count; "5" does not match a 6-room apartment.
    pub rooms: Option<i64>,
    pub bedrooms: Option<i64>,
    pub city: Option<String>,
}

/// Blank values are absent; anything else is kept verbatim, since `city`
/// compares exactly and `location` as a substring.
fn text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn number(field: &str, value: Option<String>, errors: &mut Vec<FieldError>) -> Option<i64> {
    let value = text(value)?;
    match value.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.push(FieldError::new(field, format!("expected an integer, got {value:?}")));
            None
        }
    }
}

impl TryFrom<SearchParams> for SearchFilter {
    type Error = ValidationError;

    /// Empty values count as absent. Every malformed number is reported.
    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();
        let filter = SearchFilter {
            min_price: number("minPrice", params.min_price, &mut errors),
            max_price: number("maxPrice", params.max_price, &mut errors),
            rooms: number("rooms", params.rooms, &mut errors),
            bedrooms: number("bedrooms", params.bedrooms, &mut errors),
            location: text(params.location),
            city: text(params.city),
        };

        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(ValidationError::with_errors("Invalid search parameters", errors))
        }
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

impl SearchFilter {
    /// True when no predicate is set, so every available apartment matches.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluates only the predicates that compare text. The SQLite store
    /// pushes the numeric ones into SQL and finishes with this.
    pub fn matches_text(&self, apartment: &Apartment) -> bool {
        if let Some(location) = &self.location {
            let needle = location.to_lowercase();
            if !contains_ci(&apartment.location, &needle)
                && !contains_ci(&apartment.neighborhood, &needle)
                && !contains_ci(&apartment.city, &needle)
            {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if apartment.city.to_lowercase() != city.to_lowercase() {
                return false;
            }
        }
        true
    }

    pub fn matches_numbers(&self, apartment: &Apartment) -> bool {
        self.min_price.is_none_or(|min| apartment.price >= min)
            && self.max_price.is_none_or(|max| apartment.price <= max)
            && self.rooms.is_none_or(|rooms| apartment.rooms == rooms)
            && self.bedrooms.is_none_or(|bedrooms| apartment.bedrooms == bedrooms)
    }

    pub fn matches(&self, apartment: &Apartment) -> bool {
        apartment.is_available && self.matches_numbers(apartment) && self.matches_text(apartment)
    }

    pub fn apply(&self, apartments: Vec<Apartment>) -> Vec<Apartment> {
        apartments.into_iter().filter(|a| self.matches(a)).collect()
    }
}
