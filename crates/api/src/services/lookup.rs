//! Organization types, help types and categories.

use kindquest_core::bulk;
use kindquest_core::error::CoreError;
use kindquest_core::types::DbId;
use kindquest_db::models::lookup::{CreateLookup, Lookup, LookupKind, UpdateLookup};
use kindquest_db::repositories::LookupRepo;

use super::{found, removed};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn name_taken(kind: LookupKind, name: &str) -> CoreError {
    CoreError::already_exists(kind.entity(), "name", name)
}

async fn ensure_name_free(
    state: &AppState,
    kind: LookupKind,
    name: &str,
    exclude_id: Option<DbId>,
) -> AppResult<()> {
    if LookupRepo::find_by_name(&state.pool, kind, name, exclude_id)
        .await?
        .is_some()
    {
        return Err(name_taken(kind, name).into());
    }
    Ok(())
}

pub async fn create(state: &AppState, kind: LookupKind, input: &CreateLookup) -> AppResult<Lookup> {
    ensure_name_free(state, kind, &input.name, None).await?;
    let row = LookupRepo::create(&state.pool, kind, input)
        .await
        .map_err(|e| AppError::unique_or(e, name_taken(kind, &input.name)))?;
    tracing::info!(entity = kind.entity(), id = row.id, name = %row.name, "Lookup created");
    Ok(row)
}

/// Create a batch of rows as one unit: duplicates inside the request and
/// names already taken are rejected before anything is inserted.
pub async fn create_many(
    state: &AppState,
    kind: LookupKind,
    items: &[CreateLookup],
) -> AppResult<Vec<Lookup>> {
    let entity = kind.entity();
    bulk::ensure_not_empty(entity, items)?;
    bulk::ensure_unique_in_batch(entity, items.iter().map(|i| i.name.as_str()))?;

    let names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
    let taken = LookupRepo::existing_names(&state.pool, kind, &names).await?;
    bulk::ensure_none_existing(entity, "name", &taken)?;

    let rows = LookupRepo::create_many(&state.pool, kind, items)
        .await
        .map_err(|e| {
            AppError::unique_or(e, CoreError::Conflict(format!("{entity} already exists")))
        })?;
    tracing::info!(entity, count = rows.len(), "Lookups created in bulk");
    Ok(rows)
}

pub async fn find_one(state: &AppState, kind: LookupKind, id: DbId) -> AppResult<Lookup> {
    found(LookupRepo::find_by_id(&state.pool, kind, id).await?, kind.entity(), id)
}

pub async fn find_all(state: &AppState, kind: LookupKind) -> AppResult<Vec<Lookup>> {
    Ok(LookupRepo::list(&state.pool, kind).await?)
}

pub async fn update(
    state: &AppState,
    kind: LookupKind,
    id: DbId,
    input: &UpdateLookup,
) -> AppResult<Lookup> {
    find_one(state, kind, id).await?;
    if let Some(name) = &input.name {
        ensure_name_free(state, kind, name, Some(id)).await?;
    }
    let updated = LookupRepo::update(&state.pool, kind, id, input)
        .await
        .map_err(|e| {
            AppError::unique_or(e, name_taken(kind, input.name.as_deref().unwrap_or_default()))
        })?;
    found(updated, kind.entity(), id)
}

pub async fn remove(state: &AppState, kind: LookupKind, id: DbId) -> AppResult<()> {
    removed(LookupRepo::soft_delete(&state.pool, kind, id).await?, kind.entity(), id)
}

/// Fail with `NotFound` naming the first id in `ids` with no live row.
pub async fn ensure_all_exist(state: &AppState, kind: LookupKind, ids: &[DbId]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let ids = bulk::distinct_ids(ids.iter().copied());
    let live = LookupRepo::existing_ids(&state.pool, kind, &ids).await?;
    bulk::ensure_all_present(kind.entity(), &ids, &live)?;
    Ok(())
}
