mod memory;
mod seed;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use seed::seed_from_file;
pub use sqlite::SqliteStore;

use crate::{
    featured,
    model::{Apartment, ApartmentId, ApartmentPatch, NewApartment, User, UserCredentials, UserId},
    search::SearchFilter,
    validation::ValidationError,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("conflict: {0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub type DynStore = Arc<dyn Store>;

/// Apartment and user records. Handlers only see this trait; the concrete
/// store is picked at startup.
#[async_trait]
pub trait Store: Send + Sync {
    /// Point lookup, regardless of availability.
    async fn apartment(&self, id: ApartmentId) -> StoreResult<Option<Apartment>>;

    /// Every available apartment in storage order.
    async fn available_apartments(&self) -> StoreResult<Vec<Apartment>>;

    async fn search_apartments(&self, filter: &SearchFilter) -> StoreResult<Vec<Apartment>> {
        Ok(filter.apply(self.available_apartments().await?))
    }

    async fn featured_apartments(&self) -> StoreResult<Vec<Apartment>> {
        Ok(featured::select(self.available_apartments().await?))
    }

    async fn count_apartments(&self) -> StoreResult<usize>;

    async fn insert_apartment(&self, new: NewApartment) -> StoreResult<Apartment>;

    async fn update_apartment(&self, id: ApartmentId, patch: ApartmentPatch) -> StoreResult<Option<Apartment>>;

    async fn delete_apartment(&self, id: ApartmentId) -> StoreResult<bool>;

    async fn user(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Fails with [`StoreError::Conflict`] when the username is taken.
    async fn insert_user(&self, credentials: UserCredentials) -> StoreResult<User>;
}

/// Opens the store named by a database URL. `memory:` gives an empty
/// in-process store; anything else is handed to sqlx.
pub async fn connect(url: &str, max_connections: u32) -> StoreResult<DynStore> {
    if url == "memory:" {
        tracing::info!("using in-memory store");
        return Ok(Arc::new(MemoryStore::default()));
    }
    let store = SqliteStore::connect(url, max_connections).await?;
    Ok(Arc::new(store))
}
