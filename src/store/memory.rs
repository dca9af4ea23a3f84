use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::{Apartment, ApartmentId, ApartmentPatch, NewApartment, User, UserCredentials, UserId};

use super::{Store, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    apartments: BTreeMap<ApartmentId, Apartment>,
    last_apartment_id: ApartmentId,
    users: BTreeMap<UserId, User>,
    last_user_id: UserId,
}

/// In-process store. Ids start at 1 and are never reused, even after a
/// delete, matching an autoincrement column.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub async fn with_apartments(apartments: impl IntoIterator<Item = NewApartment>) -> StoreResult<Self> {
        let store = Self::default();
        for new in apartments {
            store.insert_apartment(new).await?;
        }
        Ok(store)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn apartment(&self, id: ApartmentId) -> StoreResult<Option<Apartment>> {
        Ok(self.tables.read().await.apartments.get(&id).cloned())
    }

    async fn available_apartments(&self) -> StoreResult<Vec<Apartment>> {
        Ok(self
            .tables
            .read()
            .await
            .apartments
            .values()
            .filter(|a| a.is_available)
            .cloned()
            .collect())
    }

    async fn count_apartments(&self) -> StoreResult<usize> {
        Ok(self.tables.read().await.apartments.len())
    }

    async fn insert_apartment(&self, new: NewApartment) -> StoreResult<Apartment> {
        let mut tables = self.tables.write().await;
        let apartment = new.build(tables.last_apartment_id + 1)?;
        tables.last_apartment_id = apartment.id;
        tables.apartments.insert(apartment.id, apartment.clone());
        Ok(apartment)
    }

    async fn update_apartment(&self, id: ApartmentId, patch: ApartmentPatch) -> StoreResult<Option<Apartment>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.apartments.get(&id).cloned() else {
            return Ok(None);
        };
        let updated = patch.apply_to(current)?;
        tables.apartments.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_apartment(&self, id: ApartmentId) -> StoreResult<bool> {
        Ok(self.tables.write().await.apartments.remove(&id).is_some())
    }

    async fn user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert_user(&self, credentials: UserCredentials) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == credentials.username) {
            return Err(StoreError::Conflict(format!("username {} is taken", credentials.username)));
        }
        let user = User {
            id: tables.last_user_id + 1,
            username: credentials.username,
            password_hash: credentials.password_hash,
        };
        tables.last_user_id = user.id;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}
