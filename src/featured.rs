use crate::model::Apartment;

pub const FEATURED_LIMIT: usize = 6;

/// Highest rated first. The sort is stable, so equal ratings keep store order.
pub fn select(mut apartments: Vec<Apartment>) -> Vec<Apartment> {
    apartments.retain(|a| a.is_available);
    apartments.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    apartments.truncate(FEATURED_LIMIT);
    apartments
}
