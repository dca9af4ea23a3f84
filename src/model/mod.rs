mod apartment;
mod contact;
mod user;

pub use apartment::{Apartment, ApartmentId, ApartmentPatch, NewApartment, MAX_RATING};
pub use contact::{is_valid_email, ContactMessage, ContactPayload, MIN_MESSAGE_CHARS};
pub use user::{CredentialsError, NewUser, User, UserCredentials, UserId};

#[cfg(test)]
pub(crate) use apartment::tests::sample as sample_apartment;
