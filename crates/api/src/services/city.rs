use kindquest_core::error::CoreError;
use kindquest_core::types::DbId;
use kindquest_core::{bulk, cache_keys};
use kindquest_db::models::city::{City, CreateCity, UpdateCity};
use kindquest_db::repositories::{CityRepo, RegionRepo};

use super::{found, removed};
use crate::cache::read_through;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const ENTITY: &str = "City";

/// Cities are unique per region, so the conflict key names both.
fn city_key(region_id: DbId, name: &str) -> String {
    format!("{name}' in region '{region_id}")
}

fn name_taken(region_id: DbId, name: &str) -> CoreError {
    CoreError::already_exists(ENTITY, "name", &city_key(region_id, name))
}

async fn ensure_region(state: &AppState, region_id: DbId) -> AppResult<()> {
    found(RegionRepo::find_by_id(&state.pool, region_id).await?, "Region", region_id)?;
    Ok(())
}

pub async fn create(state: &AppState, input: &CreateCity) -> AppResult<City> {
    if CityRepo::find_by_name(&state.pool, input.region_id, &input.name, None)
        .await?
        .is_some()
    {
        return Err(name_taken(input.region_id, &input.name).into());
    }
    ensure_region(state, input.region_id).await?;

    let city = CityRepo::create(&state.pool, input)
        .await
        .map_err(|e| AppError::unique_or(e, name_taken(input.region_id, &input.name)))?;
    tracing::info!(city_id = city.id, region_id = city.region_id, "City created");
    Ok(city)
}

/// Create a batch of cities as one unit.
///
/// Checks run in order: duplicates inside the request, missing regions (one
/// query), names already taken (one query). Nothing is inserted unless all
/// pass.
pub async fn create_many(state: &AppState, items: &[CreateCity]) -> AppResult<Vec<City>> {
    bulk::ensure_not_empty("city", items)?;
    bulk::ensure_unique_in_batch(
        "city",
        items.iter().map(|c| city_key(c.region_id, &c.name)),
    )?;

    let region_ids = bulk::distinct_ids(items.iter().map(|c| c.region_id));
    let live_regions = RegionRepo::existing_ids(&state.pool, &region_ids).await?;
    bulk::ensure_all_present("Region", &region_ids, &live_regions)?;

    let pairs: Vec<(DbId, String)> = items.iter().map(|c| (c.region_id, c.name.clone())).collect();
    let taken: Vec<String> = CityRepo::existing_names(&state.pool, &pairs)
        .await?
        .into_iter()
        .map(|(region_id, name)| city_key(region_id, &name))
        .collect();
    bulk::ensure_none_existing(ENTITY, "name", &taken)?;

    let cities = CityRepo::create_many(&state.pool, items).await.map_err(|e| {
        AppError::unique_or(e, CoreError::Conflict("City already exists".to_string()))
    })?;
    tracing::info!(count = cities.len(), "Cities created in bulk");
    Ok(cities)
}

pub async fn find_one(state: &AppState, id: DbId) -> AppResult<City> {
    found(CityRepo::find_by_id(&state.pool, id).await?, ENTITY, id)
}

/// Live cities, optionally for one region, served through the cache.
pub async fn find_all(state: &AppState, region_id: Option<DbId>) -> AppResult<Vec<City>> {
    let key = match region_id {
        Some(id) => cache_keys::cities_by_region(id),
        None => cache_keys::CITIES_ALL.to_string(),
    };
    let pool = &state.pool;
    read_through(
        state.cache.as_ref(),
        &key,
        state.config.cache.ttl(),
        move || async move { CityRepo::list(pool, region_id).await.map_err(AppError::from) },
    )
    .await
}

pub async fn update(state: &AppState, id: DbId, input: &UpdateCity) -> AppResult<City> {
    let current = find_one(state, id).await?;

    let region_id = input.region_id.unwrap_or(current.region_id);
    let name = input.name.as_deref().unwrap_or(&current.name);
    if input.name.is_some() || input.region_id.is_some() {
        if CityRepo::find_by_name(&state.pool, region_id, name, Some(id))
            .await?
            .is_some()
        {
            return Err(name_taken(region_id, name).into());
        }
    }
    if let Some(region_id) = input.region_id {
        ensure_region(state, region_id).await?;
    }

    let updated = CityRepo::update(&state.pool, id, input)
        .await
        .map_err(|e| AppError::unique_or(e, name_taken(region_id, name)))?;
    found(updated, ENTITY, id)
}

pub async fn remove(state: &AppState, id: DbId) -> AppResult<()> {
    removed(CityRepo::soft_delete(&state.pool, id).await?, ENTITY, id)?;
    tracing::info!(city_id = id, "City deleted");
    Ok(())
}
