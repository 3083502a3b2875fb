//! Handlers for the `/organizations` resource and its owner-gated
//! sub-resources (owners, help types, gallery).

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use kindquest_core::types::DbId;
use kindquest_db::models::organization::{
    ApproveOrganization, CreateOrganization, Organization, OrganizationDetail,
    OrganizationListParams, ReplaceGallery, UpdateOrganization,
};

use super::read_upload_form;
use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::services;
use crate::state::AppState;
use crate::validation::{validate_batch, validate_request};

/// POST /api/v1/organizations
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<CreateOrganization>,
) -> AppResult<(StatusCode, Json<OrganizationDetail>)> {
    validate_request(&input)?;
    let organization = services::organization::create(&state, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(organization)))
}

/// POST /api/v1/organizations/bulk
pub async fn create_bulk(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(input): AppJson<Vec<CreateOrganization>>,
) -> AppResult<(StatusCode, Json<Vec<Organization>>)> {
    validate_batch(&input)?;
    let organizations = services::organization::create_many(&state, admin.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(organizations)))
}

/// GET /api/v1/organizations?cityId=&organizationTypeId=&helpTypeId=
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<OrganizationListParams>,
) -> AppResult<Json<Vec<Organization>>> {
    Ok(Json(services::organization::find_all(&state, &params).await?))
}

/// GET /api/v1/organizations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<OrganizationDetail>> {
    Ok(Json(services::organization::find_one(&state, id).await?))
}

/// PATCH /api/v1/organizations/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateOrganization>,
) -> AppResult<Json<OrganizationDetail>> {
    validate_request(&input)?;
    Ok(Json(
        services::organization::update(&state, user.user_id, id, &input).await?,
    ))
}

/// DELETE /api/v1/organizations/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    services::organization::remove(&state, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/organizations/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<ApproveOrganization>,
) -> AppResult<Json<Organization>> {
    Ok(Json(
        services::organization::set_approved(&state, id, input.is_approved).await?,
    ))
}

/// POST /api/v1/organizations/{id}/owners/{user_id}
pub async fn add_owner(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, owner_id)): Path<(DbId, DbId)>,
) -> AppResult<(StatusCode, Json<Vec<DbId>>)> {
    let owners = services::organization::add_owner(&state, user.user_id, id, owner_id).await?;
    Ok((StatusCode::CREATED, Json(owners)))
}

/// DELETE /api/v1/organizations/{id}/owners/{user_id}
pub async fn remove_owner(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, owner_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    services::organization::remove_owner(&state, user.user_id, id, owner_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/organizations/{id}/help-types/{help_type_id}
pub async fn add_help_type(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, help_type_id)): Path<(DbId, DbId)>,
) -> AppResult<(StatusCode, Json<OrganizationDetail>)> {
    let organization =
        services::organization::add_help_type(&state, user.user_id, id, help_type_id).await?;
    Ok((StatusCode::CREATED, Json(organization)))
}

/// DELETE /api/v1/organizations/{id}/help-types/{help_type_id}
pub async fn remove_help_type(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, help_type_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    services::organization::remove_help_type(&state, user.user_id, id, help_type_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/organizations/{id}/gallery (multipart, field `file`)
pub async fn upload_gallery_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<OrganizationDetail>)> {
    let file = read_upload_form(multipart).await?.require_file()?;
    let organization =
        services::organization::upload_gallery_image(&state, user.user_id, id, file).await?;
    Ok((StatusCode::CREATED, Json(organization)))
}

/// PUT /api/v1/organizations/{id}/gallery
pub async fn replace_gallery(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<ReplaceGallery>,
) -> AppResult<Json<OrganizationDetail>> {
    validate_request(&input)?;
    Ok(Json(
        services::organization::replace_gallery(&state, user.user_id, id, &input.keys).await?,
    ))
}
