//! Organizations and their owner-gated sub-resources.
//!
//! Every mutation except approval and bulk creation requires the acting user
//! to be listed in `organization_owners`. That check runs first, so a
//! non-owner gets `Forbidden` even for an organization that does not exist.

use kindquest_core::bulk;
use kindquest_core::error::CoreError;
use kindquest_core::storage_keys;
use kindquest_core::types::DbId;
use kindquest_db::models::lookup::LookupKind;
use kindquest_db::models::organization::{
    CreateOrganization, Organization, OrganizationDetail, OrganizationListParams,
    UpdateOrganization,
};
use kindquest_db::repositories::{
    CityRepo, LookupRepo, OrganizationHelpTypeRepo, OrganizationOwnerRepo, OrganizationRepo,
    UserRepo,
};

use super::upload::{self, IncomingFile};
use super::{forbidden, found, lookup, removed};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const ENTITY: &str = "Organization";

fn name_taken(name: &str) -> CoreError {
    CoreError::already_exists(ENTITY, "name", name)
}

async fn ensure_name_free(state: &AppState, name: &str, exclude_id: Option<DbId>) -> AppResult<()> {
    if OrganizationRepo::find_by_name(&state.pool, name, exclude_id)
        .await?
        .is_some()
    {
        return Err(name_taken(name).into());
    }
    Ok(())
}

/// Fail with `Forbidden` unless `user_id` owns the organization.
pub(crate) async fn ensure_owner(state: &AppState, id: DbId, user_id: DbId) -> AppResult<()> {
    if OrganizationOwnerRepo::is_owner(&state.pool, id, user_id).await? {
        Ok(())
    } else {
        Err(forbidden("Only organization owners may do this"))
    }
}

async fn load(state: &AppState, id: DbId) -> AppResult<Organization> {
    found(OrganizationRepo::find_by_id(&state.pool, id).await?, ENTITY, id)
}

async fn ensure_city(state: &AppState, city_id: DbId) -> AppResult<()> {
    found(CityRepo::find_by_id(&state.pool, city_id).await?, "City", city_id)?;
    Ok(())
}

async fn ensure_organization_type(state: &AppState, id: DbId) -> AppResult<()> {
    lookup::find_one(state, LookupKind::OrganizationType, id).await?;
    Ok(())
}

async fn detail(state: &AppState, organization: Organization) -> AppResult<OrganizationDetail> {
    let help_types = OrganizationHelpTypeRepo::list_for_organization(&state.pool, organization.id).await?;
    let owner_ids = OrganizationOwnerRepo::list_user_ids(&state.pool, organization.id).await?;
    let gallery_urls = upload::public_urls(state, &organization.gallery);
    Ok(OrganizationDetail {
        organization,
        help_types,
        owner_ids,
        gallery_urls,
    })
}

/// Create an organization. The creator becomes its first owner.
pub async fn create(
    state: &AppState,
    user_id: DbId,
    input: &CreateOrganization,
) -> AppResult<OrganizationDetail> {
    ensure_name_free(state, &input.name, None).await?;
    ensure_city(state, input.city_id).await?;
    ensure_organization_type(state, input.organization_type_id).await?;
    lookup::ensure_all_exist(state, LookupKind::HelpType, &input.help_type_ids).await?;

    let organization = OrganizationRepo::create(&state.pool, input, user_id)
        .await
        .map_err(|e| AppError::unique_or(e, name_taken(&input.name)))?;

    tracing::info!(organization_id = organization.id, user_id, "Organization created");
    detail(state, organization).await
}

/// Create a batch of organizations as one unit. The acting admin owns each,
/// and every item's help types are attached in the same transaction.
pub async fn create_many(
    state: &AppState,
    user_id: DbId,
    items: &[CreateOrganization],
) -> AppResult<Vec<Organization>> {
    bulk::ensure_not_empty("organization", items)?;
    bulk::ensure_unique_in_batch("organization", items.iter().map(|o| o.name.as_str()))?;

    let city_ids = bulk::distinct_ids(items.iter().map(|o| o.city_id));
    let live_cities = CityRepo::existing_ids(&state.pool, &city_ids).await?;
    bulk::ensure_all_present("City", &city_ids, &live_cities)?;

    let type_ids = bulk::distinct_ids(items.iter().map(|o| o.organization_type_id));
    let live_types =
        LookupRepo::existing_ids(&state.pool, LookupKind::OrganizationType, &type_ids).await?;
    bulk::ensure_all_present(LookupKind::OrganizationType.entity(), &type_ids, &live_types)?;

    let help_type_ids =
        bulk::distinct_ids(items.iter().flat_map(|o| o.help_type_ids.iter().copied()));
    if !help_type_ids.is_empty() {
        let live_help_types =
            LookupRepo::existing_ids(&state.pool, LookupKind::HelpType, &help_type_ids).await?;
        bulk::ensure_all_present(LookupKind::HelpType.entity(), &help_type_ids, &live_help_types)?;
    }

    let names: Vec<String> = items.iter().map(|o| o.name.clone()).collect();
    let taken = OrganizationRepo::existing_names(&state.pool, &names).await?;
    bulk::ensure_none_existing(ENTITY, "name", &taken)?;

    let organizations = OrganizationRepo::create_many(&state.pool, items, user_id)
        .await
        .map_err(|e| {
            AppError::unique_or(e, CoreError::Conflict("Organization already exists".into()))
        })?;

    tracing::info!(count = organizations.len(), user_id, "Organizations created in bulk");
    Ok(organizations)
}

pub async fn find_one(state: &AppState, id: DbId) -> AppResult<OrganizationDetail> {
    let organization = load(state, id).await?;
    detail(state, organization).await
}

pub async fn find_all(
    state: &AppState,
    params: &OrganizationListParams,
) -> AppResult<Vec<Organization>> {
    Ok(OrganizationRepo::list(&state.pool, params).await?)
}

pub async fn update(
    state: &AppState,
    user_id: DbId,
    id: DbId,
    input: &UpdateOrganization,
) -> AppResult<OrganizationDetail> {
    ensure_owner(state, id, user_id).await?;
    load(state, id).await?;

    if let Some(name) = &input.name {
        ensure_name_free(state, name, Some(id)).await?;
    }
    if let Some(city_id) = input.city_id {
        ensure_city(state, city_id).await?;
    }
    if let Some(type_id) = input.organization_type_id {
        ensure_organization_type(state, type_id).await?;
    }

    let updated = OrganizationRepo::update(&state.pool, id, input)
        .await
        .map_err(|e| AppError::unique_or(e, name_taken(input.name.as_deref().unwrap_or_default())))?;
    let organization = found(updated, ENTITY, id)?;
    detail(state, organization).await
}

pub async fn remove(state: &AppState, user_id: DbId, id: DbId) -> AppResult<()> {
    ensure_owner(state, id, user_id).await?;
    removed(OrganizationRepo::soft_delete(&state.pool, id).await?, ENTITY, id)?;
    tracing::info!(organization_id = id, user_id, "Organization deleted");
    Ok(())
}

pub async fn set_approved(state: &AppState, id: DbId, is_approved: bool) -> AppResult<Organization> {
    let organization = found(
        OrganizationRepo::set_approved(&state.pool, id, is_approved).await?,
        ENTITY,
        id,
    )?;
    tracing::info!(organization_id = id, is_approved, "Organization approval changed");
    Ok(organization)
}

// ---------------------------------------------------------------------------
// Owners
// ---------------------------------------------------------------------------

pub async fn add_owner(
    state: &AppState,
    acting_user_id: DbId,
    id: DbId,
    user_id: DbId,
) -> AppResult<Vec<DbId>> {
    ensure_owner(state, id, acting_user_id).await?;
    load(state, id).await?;
    found(UserRepo::find_by_id(&state.pool, user_id).await?, "User", user_id)?;

    let already = || CoreError::Conflict(format!("User {user_id} already owns organization {id}"));
    if OrganizationOwnerRepo::is_owner(&state.pool, id, user_id).await? {
        return Err(already().into());
    }
    OrganizationOwnerRepo::add(&state.pool, id, user_id)
        .await
        .map_err(|e| AppError::unique_or(e, already()))?;

    tracing::info!(organization_id = id, user_id, acting_user_id, "Owner added");
    Ok(OrganizationOwnerRepo::list_user_ids(&state.pool, id).await?)
}

/// Remove an owner. The last remaining owner cannot be removed.
pub async fn remove_owner(
    state: &AppState,
    acting_user_id: DbId,
    id: DbId,
    user_id: DbId,
) -> AppResult<()> {
    ensure_owner(state, id, acting_user_id).await?;
    load(state, id).await?;

    if !OrganizationOwnerRepo::is_owner(&state.pool, id, user_id).await? {
        return Err(CoreError::not_found("OrganizationOwner", user_id).into());
    }
    if OrganizationOwnerRepo::count(&state.pool, id).await? <= 1 {
        return Err(CoreError::Conflict(format!(
            "Cannot remove the last owner of organization {id}"
        ))
        .into());
    }
    removed(
        OrganizationOwnerRepo::remove(&state.pool, id, user_id).await?,
        "OrganizationOwner",
        user_id,
    )?;
    tracing::info!(organization_id = id, user_id, acting_user_id, "Owner removed");
    Ok(())
}

// ---------------------------------------------------------------------------
// Help types
// ---------------------------------------------------------------------------

pub async fn add_help_type(
    state: &AppState,
    user_id: DbId,
    id: DbId,
    help_type_id: DbId,
) -> AppResult<OrganizationDetail> {
    ensure_owner(state, id, user_id).await?;
    let organization = load(state, id).await?;
    lookup::find_one(state, LookupKind::HelpType, help_type_id).await?;

    let conflict = || {
        CoreError::Conflict(format!(
            "Organization {id} already has help type {help_type_id}"
        ))
    };
    let current = OrganizationHelpTypeRepo::list_for_organization(&state.pool, id).await?;
    if current.iter().any(|h| h.id == help_type_id) {
        return Err(conflict().into());
    }
    OrganizationHelpTypeRepo::add(&state.pool, id, help_type_id)
        .await
        .map_err(|e| AppError::unique_or(e, conflict()))?;

    detail(state, organization).await
}

pub async fn remove_help_type(
    state: &AppState,
    user_id: DbId,
    id: DbId,
    help_type_id: DbId,
) -> AppResult<()> {
    ensure_owner(state, id, user_id).await?;
    load(state, id).await?;
    removed(
        OrganizationHelpTypeRepo::remove(&state.pool, id, help_type_id).await?,
        "OrganizationHelpType",
        help_type_id,
    )
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

/// Store an image and append its key to the gallery.
pub async fn upload_gallery_image(
    state: &AppState,
    user_id: DbId,
    id: DbId,
    file: IncomingFile,
) -> AppResult<OrganizationDetail> {
    ensure_owner(state, id, user_id).await?;
    load(state, id).await?;

    let stored = upload::store(state, file, |ext| storage_keys::organization_key(id, ext)).await?;
    let organization = found(
        OrganizationRepo::append_gallery(&state.pool, id, &stored.key).await?,
        ENTITY,
        id,
    )?;
    detail(state, organization).await
}

/// Replace the gallery with `keys`. Objects no longer referenced are deleted
/// from storage on a best-effort basis.
pub async fn replace_gallery(
    state: &AppState,
    user_id: DbId,
    id: DbId,
    keys: &[String],
) -> AppResult<OrganizationDetail> {
    ensure_owner(state, id, user_id).await?;
    let current = load(state, id).await?;

    let prefix = format!("organizations/{id}/");
    if let Some(foreign) = keys.iter().find(|k| !k.starts_with(&prefix)) {
        return Err(CoreError::Validation(format!(
            "Key '{foreign}' does not belong to organization {id}"
        ))
        .into());
    }

    let stale = storage_keys::removed_keys(&current.gallery, keys);
    let organization = found(
        OrganizationRepo::replace_gallery(&state.pool, id, keys).await?,
        ENTITY,
        id,
    )?;
    upload::delete_best_effort(state, &stale).await;

    tracing::info!(organization_id = id, removed = stale.len(), "Gallery replaced");
    detail(state, organization).await
}
