//! Progress posts on quests and organizations.
//!
//! Anyone may read posts of a live parent; only the parent's owners may
//! write them.

use kindquest_core::types::DbId;
use kindquest_db::models::progress_update::{
    CreateProgressUpdate, ProgressUpdate, UpdateParent, UpdateProgressUpdate,
};
use kindquest_db::repositories::{OrganizationRepo, ProgressUpdateRepo, QuestRepo};

use super::{found, organization, quest, removed};
use crate::error::AppResult;
use crate::state::AppState;

async fn ensure_parent(state: &AppState, parent: UpdateParent, parent_id: DbId) -> AppResult<()> {
    match parent {
        UpdateParent::Quest => {
            found(QuestRepo::find_by_id(&state.pool, parent_id).await?, "Quest", parent_id)?;
        }
        UpdateParent::Organization => {
            found(
                OrganizationRepo::find_by_id(&state.pool, parent_id).await?,
                "Organization",
                parent_id,
            )?;
        }
    }
    Ok(())
}

async fn ensure_author(
    state: &AppState,
    parent: UpdateParent,
    parent_id: DbId,
    user_id: DbId,
) -> AppResult<()> {
    match parent {
        UpdateParent::Quest => {
            quest::load_owned(state, parent_id, user_id).await?;
        }
        UpdateParent::Organization => {
            organization::ensure_owner(state, parent_id, user_id).await?;
            ensure_parent(state, parent, parent_id).await?;
        }
    }
    Ok(())
}

pub async fn list(
    state: &AppState,
    parent: UpdateParent,
    parent_id: DbId,
) -> AppResult<Vec<ProgressUpdate>> {
    ensure_parent(state, parent, parent_id).await?;
    Ok(ProgressUpdateRepo::list(&state.pool, parent, parent_id).await?)
}

pub async fn create(
    state: &AppState,
    user_id: DbId,
    parent: UpdateParent,
    parent_id: DbId,
    input: &CreateProgressUpdate,
) -> AppResult<ProgressUpdate> {
    ensure_author(state, parent, parent_id, user_id).await?;
    let post = ProgressUpdateRepo::create(&state.pool, parent, parent_id, input).await?;
    tracing::info!(entity = parent.entity(), parent_id, id = post.id, "Progress update posted");
    Ok(post)
}

pub async fn update(
    state: &AppState,
    user_id: DbId,
    parent: UpdateParent,
    parent_id: DbId,
    id: DbId,
    input: &UpdateProgressUpdate,
) -> AppResult<ProgressUpdate> {
    ensure_author(state, parent, parent_id, user_id).await?;
    found(
        ProgressUpdateRepo::update(&state.pool, parent, parent_id, id, input).await?,
        parent.entity(),
        id,
    )
}

pub async fn remove(
    state: &AppState,
    user_id: DbId,
    parent: UpdateParent,
    parent_id: DbId,
    id: DbId,
) -> AppResult<()> {
    ensure_author(state, parent, parent_id, user_id).await?;
    removed(
        ProgressUpdateRepo::soft_delete(&state.pool, parent, parent_id, id).await?,
        parent.entity(),
        id,
    )
}
