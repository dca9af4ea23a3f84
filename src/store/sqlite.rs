use async_trait::async_trait;
use sqlx::{
    query::Query,
    sqlite::{Sqlite, SqliteArguments, SqlitePoolOptions},
    types::Json,
    QueryBuilder, SqlitePool,
};

use crate::{
    model::{Apartment, ApartmentId, ApartmentPatch, NewApartment, User, UserCredentials, UserId},
    search::SearchFilter,
};

use super::{Store, StoreError, StoreResult};

const APARTMENT_SELECT: &str = "SELECT id,title,description,location,neighborhood,city,price,rooms,bedrooms,bathrooms,area,images,video_url,latitude,longitude,amenities,nearby_yeshivot,rating,review_count,is_available,contact_phone,contact_email,security_deposit,furnished,parking,pet_friendly FROM apartments";

const APARTMENT_INSERT: &str = "INSERT INTO apartments (title,description,location,neighborhood,city,price,rooms,bedrooms,bathrooms,area,images,video_url,latitude,longitude,amenities,nearby_yeshivot,rating,review_count,is_available,contact_phone,contact_email,security_deposit,furnished,parking,pet_friendly) VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?)";

const APARTMENT_UPDATE: &str = "UPDATE apartments SET title=?,description=?,location=?,neighborhood=?,city=?,price=?,rooms=?,bedrooms=?,bathrooms=?,area=?,images=?,video_url=?,latitude=?,longitude=?,amenities=?,nearby_yeshivot=?,rating=?,review_count=?,is_available=?,contact_phone=?,contact_email=?,security_deposit=?,furnished=?,parking=?,pet_friendly=? WHERE id=?";

/// Binds every column but `id`, in the order of `APARTMENT_INSERT`.
fn bind_columns<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    a: &'q Apartment,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(&a.title)
        .bind(&a.description)
        .bind(&a.location)
        .bind(&a.neighborhood)
        .bind(&a.city)
        .bind(a.price)
        .bind(a.rooms)
        .bind(a.bedrooms)
        .bind(a.bathrooms)
        .bind(a.area)
        .bind(Json(&a.images))
        .bind(&a.video_url)
        .bind(a.latitude)
        .bind(a.longitude)
        .bind(Json(&a.amenities))
        .bind(Json(&a.nearby_yeshivot))
        .bind(a.rating)
        .bind(a.review_count)
        .bind(a.is_available)
        .bind(&a.contact_phone)
        .bind(&a.contact_email)
        .bind(a.security_deposit)
        .bind(a.furnished)
        .bind(a.parking)
        .bind(a.pet_friendly)
}

#[derive(Clone)]
pub struct SqliteStore {
    db_pool: SqlitePool,
}

impl SqliteStore {
    /// Connects and brings the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Self::from_pool(db_pool).await
    }

    /// Single-connection private database; every connection to
    /// `sqlite::memory:` would otherwise see its own empty schema.
    pub async fn in_memory() -> StoreResult<Self> {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(db_pool).await
    }

    pub async fn from_pool(db_pool: SqlitePool) -> StoreResult<Self> {
        sqlx::migrate!().run(&db_pool).await?;
        tracing::debug!("sqlite schema migrated");
        Ok(Self { db_pool })
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn apartment(&self, id: ApartmentId) -> StoreResult<Option<Apartment>> {
        let apartment = sqlx::query_as(&format!("{APARTMENT_SELECT} WHERE id=?"))
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(apartment)
    }

    async fn available_apartments(&self) -> StoreResult<Vec<Apartment>> {
        let apartments = sqlx::query_as(&format!("{APARTMENT_SELECT} WHERE is_available=1 ORDER BY id"))
            .fetch_all(&self.db_pool)
            .await?;
        Ok(apartments)
    }

    /// Numeric predicates run in SQL; the case-insensitive text ones run here
    /// so that matching is Unicode-aware rather than SQLite's ASCII `LOWER`.
    async fn search_apartments(&self, filter: &SearchFilter) -> StoreResult<Vec<Apartment>> {
        if filter.is_empty() {
            return self.available_apartments().await;
        }
        let mut qb = QueryBuilder::<Sqlite>::new(format!("{APARTMENT_SELECT} WHERE is_available=1"));
        if let Some(min_price) = filter.min_price {
            qb.push(" AND price>=").push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            qb.push(" AND price<=").push_bind(max_price);
        }
        if let Some(rooms) = filter.rooms {
            qb.push(" AND rooms=").push_bind(rooms);
        }
        if let Some(bedrooms) = filter.bedrooms {
            qb.push(" AND bedrooms=").push_bind(bedrooms);
        }
        qb.push(" ORDER BY id");

        let candidates: Vec<Apartment> = qb.build_query_as().fetch_all(&self.db_pool).await?;
        Ok(candidates.into_iter().filter(|a| filter.matches_text(a)).collect())
    }

    async fn count_apartments(&self) -> StoreResult<usize> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM apartments")
            .fetch_one(&self.db_pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn insert_apartment(&self, new: NewApartment) -> StoreResult<Apartment> {
        let mut apartment = new.build(0)?;
        let result = bind_columns(sqlx::query(APARTMENT_INSERT), &apartment)
            .execute(&self.db_pool)
            .await?;
        apartment.id = result.last_insert_rowid();
        tracing::debug!(id = apartment.id, "apartment inserted");
        Ok(apartment)
    }

    async fn update_apartment(&self, id: ApartmentId, patch: ApartmentPatch) -> StoreResult<Option<Apartment>> {
        let mut tx = self.db_pool.begin().await?;

        let current: Option<Apartment> = sqlx::query_as(&format!("{APARTMENT_SELECT} WHERE id=?"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let updated = patch.apply_to(current)?;
        bind_columns(sqlx::query(APARTMENT_UPDATE), &updated)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn delete_apartment(&self, id: ApartmentId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM apartments WHERE id=?")
            .bind(id)
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn user(&self, id: UserId) -> StoreResult<Option<User>> {
        let user = sqlx::query_as("SELECT id,username,password_hash FROM users WHERE id=?")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as("SELECT id,username,password_hash FROM users WHERE username=?")
            .bind(username)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, credentials: UserCredentials) -> StoreResult<User> {
        let result = sqlx::query("INSERT INTO users (username,password_hash) VALUES (?,?)")
            .bind(&credentials.username)
            .bind(&credentials.password_hash)
            .execute(&self.db_pool)
            .await;

        match result {
            Ok(result) => Ok(User {
                id: result.last_insert_rowid(),
                username: credentials.username,
                password_hash: credentials.password_hash,
            }),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Conflict(format!(
                "username {} is taken",
                credentials.username
            ))),
            Err(e) => Err(e.into()),
        }
    }
}
