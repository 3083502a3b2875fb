//! Repository for the `organizations` table.

use std::collections::HashMap;

use kindquest_core::coordinates;
use kindquest_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::errors::log_db_error;
use crate::models::organization::{
    CreateOrganization, Organization, OrganizationListParams, UpdateOrganization,
};
use crate::models::record_status::{RecordStatus, LIVE};

const COLUMNS: &str = "id, name, city_id, organization_type_id, latitude, longitude, \
    summary, mission, description, goals, needs, address, contacts, gallery, \
    is_approved, record_status, created_at, updated_at";

const INSERT_COLUMNS: &str = "name, city_id, organization_type_id, latitude, longitude, \
    summary, mission, description, goals, needs, address, contacts";

/// Provides CRUD operations for organizations.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Insert a new organization together with its first owner and initial
    /// help types, in one transaction. New organizations start unapproved
    /// with an empty gallery.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrganization,
        owner_id: DbId,
    ) -> Result<Organization, sqlx::Error> {
        let params = format!("name={} owner_id={owner_id}", input.name);
        let on_err = |e: &sqlx::Error| log_db_error("organizations.create", &params, e);

        let mut tx = pool.begin().await.inspect_err(on_err)?;
        let query = format!(
            "INSERT INTO organizations ({INSERT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        let organization = sqlx::query_as::<_, Organization>(&query)
            .bind(&input.name)
            .bind(input.city_id)
            .bind(input.organization_type_id)
            .bind(coordinates::to_text_opt(input.latitude))
            .bind(coordinates::to_text_opt(input.longitude))
            .bind(&input.summary)
            .bind(&input.mission)
            .bind(&input.description)
            .bind(&input.goals)
            .bind(&input.needs)
            .bind(&input.address)
            .bind(Json(&input.contacts))
            .fetch_one(&mut *tx)
            .await
            .inspect_err(on_err)?;

        insert_owners(&mut tx, &[organization.id], owner_id)
            .await
            .inspect_err(on_err)?;
        let org_ids = vec![organization.id; input.help_type_ids.len()];
        insert_help_types(&mut tx, &org_ids, &input.help_type_ids)
            .await
            .inspect_err(on_err)?;

        tx.commit().await.inspect_err(on_err)?;
        Ok(organization)
    }

    /// Insert a batch of organizations, owner rows for `owner_id` and every
    /// item's help types. Either all of it lands or none of it does.
    pub async fn create_many(
        pool: &PgPool,
        items: &[CreateOrganization],
        owner_id: DbId,
    ) -> Result<Vec<Organization>, sqlx::Error> {
        let params = format!("count={} owner_id={owner_id}", items.len());
        let on_err = |e: &sqlx::Error| log_db_error("organizations.create_many", &params, e);

        let mut tx = pool.begin().await.inspect_err(on_err)?;
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("INSERT INTO organizations ({INSERT_COLUMNS}) "));
        builder.push_values(items, |mut row, org| {
            row.push_bind(&org.name)
                .push_bind(org.city_id)
                .push_bind(org.organization_type_id)
                .push_bind(coordinates::to_text_opt(org.latitude))
                .push_bind(coordinates::to_text_opt(org.longitude))
                .push_bind(&org.summary)
                .push_bind(&org.mission)
                .push_bind(&org.description)
                .push_bind(&org.goals)
                .push_bind(&org.needs)
                .push_bind(&org.address)
                .push_bind(Json(&org.contacts));
        });
        builder.push(format!(" RETURNING {COLUMNS}"));
        let organizations = builder
            .build_query_as::<Organization>()
            .fetch_all(&mut *tx)
            .await
            .inspect_err(on_err)?;

        let ids: Vec<DbId> = organizations.iter().map(|o| o.id).collect();
        insert_owners(&mut tx, &ids, owner_id)
            .await
            .inspect_err(on_err)?;

        // Names are unique within a batch, so they pair rows with their items.
        let by_name: HashMap<&str, DbId> =
            organizations.iter().map(|o| (o.name.as_str(), o.id)).collect();
        let (org_ids, help_type_ids): (Vec<DbId>, Vec<DbId>) = items
            .iter()
            .filter_map(|item| by_name.get(item.name.as_str()).map(|id| (*id, item)))
            .flat_map(|(id, item)| item.help_type_ids.iter().map(move |ht| (id, *ht)))
            .unzip();
        insert_help_types(&mut tx, &org_ids, &help_type_ids)
            .await
            .inspect_err(on_err)?;

        tx.commit().await.inspect_err(on_err)?;
        Ok(organizations)
    }

    /// Find a live organization by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE id = $1 AND {LIVE}");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("organizations.find_by_id", &format!("id={id}"), e))
    }

    /// Find a live organization by exact name, optionally ignoring one id.
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM organizations
             WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2) AND {LIVE}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(name)
            .bind(exclude_id)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("organizations.find_by_name", &format!("name={name}"), e))
    }

    /// Of the given names, return those already used by live organizations.
    pub async fn existing_names(pool: &PgPool, names: &[String]) -> Result<Vec<String>, sqlx::Error> {
        let query = format!("SELECT name FROM organizations WHERE name = ANY($1) AND {LIVE}");
        sqlx::query_scalar::<_, String>(&query)
            .bind(names)
            .fetch_all(pool)
            .await
            .inspect_err(|e| {
                log_db_error("organizations.existing_names", &format!("count={}", names.len()), e)
            })
    }

    /// List live organizations matching every provided filter.
    pub async fn list(
        pool: &PgPool,
        params: &OrganizationListParams,
    ) -> Result<Vec<Organization>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM organizations o
             WHERE ($1::BIGINT IS NULL OR o.city_id = $1)
               AND ($2::BIGINT IS NULL OR o.organization_type_id = $2)
               AND ($3::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM organization_help_types h
                    WHERE h.organization_id = o.id AND h.help_type_id = $3))
               AND o.{LIVE}
             ORDER BY o.id"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(params.city_id)
            .bind(params.organization_type_id)
            .bind(params.help_type_id)
            .fetch_all(pool)
            .await
            .inspect_err(|e| log_db_error("organizations.list", &format!("{params:?}"), e))
    }

    /// Update an organization. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOrganization,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!(
            "UPDATE organizations SET
                name = COALESCE($2, name),
                city_id = COALESCE($3, city_id),
                organization_type_id = COALESCE($4, organization_type_id),
                latitude = COALESCE($5, latitude),
                longitude = COALESCE($6, longitude),
                summary = COALESCE($7, summary),
                mission = COALESCE($8, mission),
                description = COALESCE($9, description),
                goals = COALESCE($10, goals),
                needs = COALESCE($11, needs),
                address = COALESCE($12, address),
                contacts = COALESCE($13, contacts),
                updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.city_id)
            .bind(input.organization_type_id)
            .bind(coordinates::to_text_opt(input.latitude))
            .bind(coordinates::to_text_opt(input.longitude))
            .bind(&input.summary)
            .bind(&input.mission)
            .bind(&input.description)
            .bind(&input.goals)
            .bind(&input.needs)
            .bind(&input.address)
            .bind(input.contacts.as_ref().map(Json))
            .fetch_optional(pool)
            .await
            .inspect_err(|e| log_db_error("organizations.update", &format!("id={id}"), e))
    }

    /// Set the moderation flag.
    pub async fn set_approved(
        pool: &PgPool,
        id: DbId,
        is_approved: bool,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!(
            "UPDATE organizations SET is_approved = $2, updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .bind(is_approved)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "organizations.set_approved",
                    &format!("id={id} is_approved={is_approved}"),
                    e,
                )
            })
    }

    /// Replace the gallery key list wholesale.
    pub async fn replace_gallery(
        pool: &PgPool,
        id: DbId,
        keys: &[String],
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!(
            "UPDATE organizations SET gallery = $2, updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .bind(keys)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| {
                log_db_error(
                    "organizations.replace_gallery",
                    &format!("id={id} count={}", keys.len()),
                    e,
                )
            })
    }

    /// Append one key to the end of the gallery.
    pub async fn append_gallery(
        pool: &PgPool,
        id: DbId,
        key: &str,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!(
            "UPDATE organizations SET gallery = array_append(gallery, $2), updated_at = NOW()
             WHERE id = $1 AND {LIVE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .bind(key)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| {
                log_db_error("organizations.append_gallery", &format!("id={id} key={key}"), e)
            })
    }

    /// Soft-delete an organization. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE organizations SET record_status = $2, updated_at = NOW()
             WHERE id = $1 AND {LIVE}"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(RecordStatus::Deleted)
            .execute(pool)
            .await
            .inspect_err(|e| log_db_error("organizations.soft_delete", &format!("id={id}"), e))?;
        Ok(result.rows_affected() > 0)
    }
}

async fn insert_owners(
    conn: &mut PgConnection,
    organization_ids: &[DbId],
    user_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO organization_owners (organization_id, user_id)
         SELECT UNNEST($1::BIGINT[]), $2",
    )
    .bind(organization_ids)
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// `organization_ids` and `help_type_ids` are parallel arrays of pairs.
async fn insert_help_types(
    conn: &mut PgConnection,
    organization_ids: &[DbId],
    help_type_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    if help_type_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO organization_help_types (organization_id, help_type_id)
         SELECT * FROM UNNEST($1::BIGINT[], $2::BIGINT[])
         ON CONFLICT DO NOTHING",
    )
    .bind(organization_ids)
    .bind(help_type_ids)
    .execute(conn)
    .await?;
    Ok(())
}
