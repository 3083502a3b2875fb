use kindquest_core::cache_keys;
use kindquest_core::error::CoreError;
use kindquest_core::types::DbId;
use kindquest_db::models::region::{CreateRegion, Region, UpdateRegion};
use kindquest_db::repositories::RegionRepo;

use super::{found, removed};
use crate::cache::read_through;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const ENTITY: &str = "Region";

fn name_taken(name: &str) -> CoreError {
    CoreError::already_exists(ENTITY, "name", name)
}

async fn ensure_name_free(state: &AppState, name: &str, exclude_id: Option<DbId>) -> AppResult<()> {
    if RegionRepo::find_by_name(&state.pool, name, exclude_id).await?.is_some() {
        return Err(name_taken(name).into());
    }
    Ok(())
}

pub async fn create(state: &AppState, input: &CreateRegion) -> AppResult<Region> {
    ensure_name_free(state, &input.name, None).await?;
    let region = RegionRepo::create(&state.pool, input)
        .await
        .map_err(|e| AppError::unique_or(e, name_taken(&input.name)))?;
    tracing::info!(region_id = region.id, name = %region.name, "Region created");
    Ok(region)
}

pub async fn find_one(state: &AppState, id: DbId) -> AppResult<Region> {
    found(RegionRepo::find_by_id(&state.pool, id).await?, ENTITY, id)
}

/// All live regions, served through the cache.
pub async fn find_all(state: &AppState) -> AppResult<Vec<Region>> {
    let pool = &state.pool;
    read_through(
        state.cache.as_ref(),
        cache_keys::REGIONS_ALL,
        state.config.cache.ttl(),
        move || async move { RegionRepo::list(pool).await.map_err(AppError::from) },
    )
    .await
}

pub async fn update(state: &AppState, id: DbId, input: &UpdateRegion) -> AppResult<Region> {
    find_one(state, id).await?;
    if let Some(name) = &input.name {
        ensure_name_free(state, name, Some(id)).await?;
    }
    let updated = RegionRepo::update(&state.pool, id, input).await.map_err(|e| {
        AppError::unique_or(e, name_taken(input.name.as_deref().unwrap_or_default()))
    })?;
    found(updated, ENTITY, id)
}

pub async fn remove(state: &AppState, id: DbId) -> AppResult<()> {
    removed(RegionRepo::soft_delete(&state.pool, id).await?, ENTITY, id)?;
    tracing::info!(region_id = id, "Region deleted");
    Ok(())
}
