// src/db/location_repository.rs
// DOCUMENTATION: State / City / Area queries

use crate::errors::{is_unique_violation, HorooError};
use crate::models::{Area, City, State};
use sqlx::PgPool;
use uuid::Uuid;

pub struct LocationRepository;

fn map_insert_error(level: &str, name: &str, e: sqlx::Error) -> HorooError {
    if is_unique_violation(&e) {
        log::warn!("Duplicate {} name: {}", level, name);
        HorooError::AlreadyExists(format!("{} already exists", level))
    } else {
        log::error!("Failed to create {}: {}", level, e);
        HorooError::DatabaseError(e.to_string())
    }
}

fn map_read_error(what: &str, e: sqlx::Error) -> HorooError {
    log::error!("Failed to fetch {}: {}", what, e);
    HorooError::DatabaseError(e.to_string())
}

impl LocationRepository {
    pub async fn insert_state(pool: &PgPool, name: &str) -> Result<State, HorooError> {
        sqlx::query_as::<_, State>(
            "INSERT INTO states (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(|e| map_insert_error("State", name, e))
    }

    pub async fn insert_city(pool: &PgPool, name: &str, state_id: Uuid) -> Result<City, HorooError> {
        sqlx::query_as::<_, City>(
            r#"
            INSERT INTO cities (name, state_id) VALUES ($1, $2)
            RETURNING id, name, state_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(state_id)
        .fetch_one(pool)
        .await
        .map_err(|e| map_insert_error("City", name, e))
    }

    pub async fn insert_area(pool: &PgPool, name: &str, city_id: Uuid) -> Result<Area, HorooError> {
        sqlx::query_as::<_, Area>(
            r#"
            INSERT INTO areas (name, city_id) VALUES ($1, $2)
            RETURNING id, name, city_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(city_id)
        .fetch_one(pool)
        .await
        .map_err(|e| map_insert_error("Area", name, e))
    }

    pub async fn find_state(pool: &PgPool, id: Uuid) -> Result<Option<State>, HorooError> {
        sqlx::query_as::<_, State>("SELECT id, name, created_at, updated_at FROM states WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_read_error("state", e))
    }

    pub async fn find_city(pool: &PgPool, id: Uuid) -> Result<Option<City>, HorooError> {
        sqlx::query_as::<_, City>(
            "SELECT id, name, state_id, created_at, updated_at FROM cities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_read_error("city", e))
    }

    pub async fn find_area(pool: &PgPool, id: Uuid) -> Result<Option<Area>, HorooError> {
        sqlx::query_as::<_, Area>(
            "SELECT id, name, city_id, created_at, updated_at FROM areas WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_read_error("area", e))
    }

    pub async fn list_states(pool: &PgPool) -> Result<Vec<State>, HorooError> {
        sqlx::query_as::<_, State>("SELECT id, name, created_at, updated_at FROM states ORDER BY name")
            .fetch_all(pool)
            .await
            .map_err(|e| map_read_error("states", e))
    }

    pub async fn list_cities(pool: &PgPool) -> Result<Vec<City>, HorooError> {
        sqlx::query_as::<_, City>(
            "SELECT id, name, state_id, created_at, updated_at FROM cities ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error("cities", e))
    }

    pub async fn list_areas(pool: &PgPool) -> Result<Vec<Area>, HorooError> {
        sqlx::query_as::<_, Area>(
            "SELECT id, name, city_id, created_at, updated_at FROM areas ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error("areas", e))
    }

    pub async fn cities_by_state(pool: &PgPool, state_id: Uuid) -> Result<Vec<City>, HorooError> {
        sqlx::query_as::<_, City>(
            r#"
            SELECT id, name, state_id, created_at, updated_at FROM cities
            WHERE state_id = $1 ORDER BY name
            "#,
        )
        .bind(state_id)
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error("cities", e))
    }

    pub async fn areas_by_city(pool: &PgPool, city_id: Uuid) -> Result<Vec<Area>, HorooError> {
        sqlx::query_as::<_, Area>(
            r#"
            SELECT id, name, city_id, created_at, updated_at FROM areas
            WHERE city_id = $1 ORDER BY name
            "#,
        )
        .bind(city_id)
        .fetch_all(pool)
        .await
        .map_err(|e| map_read_error("areas", e))
    }
}
