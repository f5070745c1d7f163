// src/services/location_service.rs
// DOCUMENTATION: Business logic for the State > City > Area hierarchy

use crate::db::LocationRepository;
use crate::errors::HorooError;
use crate::models::de::non_blank;
use crate::models::{
    Area, City, CreateAreaRequest, CreateCityRequest, CreateStateRequest, LocationDetailsQuery,
    LocationNames, State,
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct LocationService;

impl LocationService {
    pub async fn add_state(pool: &PgPool, req: CreateStateRequest) -> Result<State, HorooError> {
        let name = non_blank(&req.name)
            .ok_or_else(|| HorooError::InvalidInput("State name is required".to_string()))?;

        let state = LocationRepository::insert_state(pool, name).await?;
        log::info!("Added state {}", state.name);
        Ok(state)
    }

    pub async fn add_city(pool: &PgPool, req: CreateCityRequest) -> Result<City, HorooError> {
        let (name, state_id) = match (non_blank(&req.name), req.state_id) {
            (Some(n), Some(s)) => (n, s),
            _ => {
                return Err(HorooError::InvalidInput(
                    "City name and state are required".to_string(),
                ))
            }
        };

        if LocationRepository::find_state(pool, state_id).await?.is_none() {
            return Err(HorooError::NotFound("State not found".to_string()));
        }

        let city = LocationRepository::insert_city(pool, name, state_id).await?;
        log::info!("Added city {} to state {}", city.name, state_id);
        Ok(city)
    }

    pub async fn add_area(pool: &PgPool, req: CreateAreaRequest) -> Result<Area, HorooError> {
        let (name, city_id) = match (non_blank(&req.name), req.city_id) {
            (Some(n), Some(c)) => (n, c),
            _ => {
                return Err(HorooError::InvalidInput(
                    "Area name and city are required".to_string(),
                ))
            }
        };

        if LocationRepository::find_city(pool, city_id).await?.is_none() {
            return Err(HorooError::NotFound("City not found".to_string()));
        }

        let area = LocationRepository::insert_area(pool, name, city_id).await?;
        log::info!("Added area {} to city {}", area.name, city_id);
        Ok(area)
    }

    pub async fn cities_by_state(pool: &PgPool, state_id: Uuid) -> Result<Vec<City>, HorooError> {
        if LocationRepository::find_state(pool, state_id).await?.is_none() {
            return Err(HorooError::NotFound("State not found".to_string()));
        }
        LocationRepository::cities_by_state(pool, state_id).await
    }

    pub async fn areas_by_city(pool: &PgPool, city_id: Uuid) -> Result<Vec<Area>, HorooError> {
        if LocationRepository::find_city(pool, city_id).await?.is_none() {
            return Err(HorooError::NotFound("City not found".to_string()));
        }
        LocationRepository::areas_by_city(pool, city_id).await
    }

    /// Names for any combination of ids; unknown ids yield null
    pub async fn location_details(
        pool: &PgPool,
        query: &LocationDetailsQuery,
    ) -> Result<LocationNames, HorooError> {
        let state = match query.state {
            Some(id) => LocationRepository::find_state(pool, id).await?.map(|s| s.name),
            None => None,
        };
        let city = match query.city {
            Some(id) => LocationRepository::find_city(pool, id).await?.map(|c| c.name),
            None => None,
        };
        let area = match query.area {
            Some(id) => LocationRepository::find_area(pool, id).await?.map(|a| a.name),
            None => None,
        };

        Ok(LocationNames { state, city, area })
    }

    /// Every id must exist and the area must sit in the city, the city in the state
    pub async fn ensure_hierarchy(
        pool: &PgPool,
        state_id: Uuid,
        city_id: Uuid,
        area_id: Uuid,
    ) -> Result<(), HorooError> {
        LocationRepository::find_state(pool, state_id)
            .await?
            .ok_or_else(|| HorooError::NotFound("State not found".to_string()))?;
        let city = LocationRepository::find_city(pool, city_id)
            .await?
            .ok_or_else(|| HorooError::NotFound("City not found".to_string()))?;
        let area = LocationRepository::find_area(pool, area_id)
            .await?
            .ok_or_else(|| HorooError::NotFound("Area not found".to_string()))?;

        check_parents(state_id, &city, &area)
    }
}

fn check_parents(state_id: Uuid, city: &City, area: &Area) -> Result<(), HorooError> {
    if city.state_id != state_id {
        log::warn!("City {} does not belong to state {}", city.id, state_id);
        return Err(HorooError::InvalidInput(
            "City does not belong to the selected state".to_string(),
        ));
    }
    if area.city_id != city.id {
        log::warn!("Area {} does not belong to city {}", area.id, city.id);
        return Err(HorooError::InvalidInput(
            "Area does not belong to the selected city".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn city(state_id: Uuid) -> City {
        City {
            id: Uuid::new_v4(),
            name: "Jabalpur".into(),
            state_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn area(city_id: Uuid) -> Area {
        Area {
            id: Uuid::new_v4(),
            name: "Napier Town".into(),
            city_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_consistent_hierarchy() {
        let state_id = Uuid::new_v4();
        let c = city(state_id);
        let a = area(c.id);
        assert!(check_parents(state_id, &c, &a).is_ok());
    }

    #[test]
    fn test_city_from_other_state() {
        let c = city(Uuid::new_v4());
        let a = area(c.id);
        let err = check_parents(Uuid::new_v4(), &c, &a).unwrap_err();
        assert!(matches!(err, HorooError::InvalidInput(_)));
    }

    #[test]
    fn test_area_from_other_city() {
        let state_id = Uuid::new_v4();
        let c = city(state_id);
        let a = area(Uuid::new_v4());
        let err = check_parents(state_id, &c, &a).unwrap_err();
        assert_eq!(err.to_string(), "Area does not belong to the selected city");
    }
}
