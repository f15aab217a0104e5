use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::repositories::{
    BatchOutcome, RepositoryError, RepositoryResult, StaffRepository,
};
use crate::domain::staff::{Email, StaffChanges, StaffRecord};

const STAFF_COLUMNS: &str = "id, shop_id, email, user_name, first_name, last_name, phone, \
     employee_title, password_hash, new_password_token, permissions, active_status, \
     created_at, updated_at";

// SQLSTATE unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Row shape of the `staff` table
#[derive(Debug, FromRow)]
struct StaffRow {
    id: Uuid,
    shop_id: String,
    email: String,
    user_name: String,
    first_name: String,
    last_name: String,
    phone: String,
    employee_title: String,
    password_hash: String,
    new_password_token: Option<String>,
    permissions: Vec<String>,
    active_status: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StaffRow> for StaffRecord {
    type Error = RepositoryError;

    fn try_from(r: StaffRow) -> Result<Self, Self::Error> {
        let email = Email::new(&r.email)
            .map_err(|e| RepositoryError::Database(format!("Invalid email from database: {}", e)))?;

        Ok(StaffRecord {
            id: r.id,
            shop_id: r.shop_id,
            email,
            user_name: r.user_name,
            first_name: r.first_name,
            last_name: r.last_name,
            phone: r.phone,
            employee_title: r.employee_title,
            password_hash: r.password_hash,
            new_password_token: r.new_password_token,
            permissions: r.permissions,
            active_status: r.active_status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

fn map_error(context: &str, e: sqlx::Error) -> RepositoryError {
    let unique_violation = e
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);

    if unique_violation {
        RepositoryError::DuplicateEmail
    } else {
        RepositoryError::Database(format!("{}: {}", context, e))
    }
}

fn to_record(row: Option<StaffRow>) -> RepositoryResult<Option<StaffRecord>> {
    row.map(StaffRecord::try_from).transpose()
}

/// PostgreSQL implementation of StaffRepository
///
/// Uses runtime-checked queries against the `staff` table created by the
/// migrations in `migrations/`.
#[derive(Clone)]
pub struct PostgresStaffRepository {
    pool: PgPool,
}

impl PostgresStaffRepository {
    /// Creates a new PostgresStaffRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffRepository for PostgresStaffRepository {
    async fn create(&self, staff: StaffRecord) -> RepositoryResult<StaffRecord> {
        let sql = format!(
            r#"
            INSERT INTO staff (
                id, shop_id, email, user_name, first_name, last_name, phone,
                employee_title, password_hash, new_password_token, permissions,
                active_status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {STAFF_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, StaffRow>(&sql)
            .bind(staff.id)
            .bind(&staff.shop_id)
            .bind(staff.email.as_str())
            .bind(&staff.user_name)
            .bind(&staff.first_name)
            .bind(&staff.last_name)
            .bind(&staff.phone)
            .bind(&staff.employee_title)
            .bind(&staff.password_hash)
            .bind(&staff.new_password_token)
            .bind(&staff.permissions)
            .bind(staff.active_status)
            .bind(staff.created_at)
            .bind(staff.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_error("Failed to create staff member", e))?;

        StaffRecord::try_from(row)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<StaffRecord>> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = $1");

        let row = sqlx::query_as::<_, StaffRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_error("Failed to find staff member by id", e))?;

        to_record(row)
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<StaffRecord>> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE email = $1");

        let row = sqlx::query_as::<_, StaffRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_error("Failed to find staff member by email", e))?;

        to_record(row)
    }

    async fn find_by_shop(&self, shop_id: &str) -> RepositoryResult<Vec<StaffRecord>> {
        let sql = format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE shop_id = $1 ORDER BY created_at, id"
        );

        let rows = sqlx::query_as::<_, StaffRow>(&sql)
            .bind(shop_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_error("Failed to find staff by shop", e))?;

        rows.into_iter().map(StaffRecord::try_from).collect()
    }

    async fn update_permissions(
        &self,
        id: Uuid,
        permissions: &[String],
    ) -> RepositoryResult<Option<StaffRecord>> {
        let sql = format!(
            r#"
            UPDATE staff
            SET permissions = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {STAFF_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, StaffRow>(&sql)
            .bind(id)
            .bind(permissions.to_vec())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_error("Failed to update permissions", e))?;

        to_record(row)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &StaffChanges,
    ) -> RepositoryResult<Option<StaffRecord>> {
        let sql = format!(
            r#"
            UPDATE staff SET
                shop_id = COALESCE($2, shop_id),
                email = COALESCE($3, email),
                user_name = COALESCE($4, user_name),
                first_name = COALESCE($5, first_name),
                last_name = COALESCE($6, last_name),
                phone = COALESCE($7, phone),
                employee_title = COALESCE($8, employee_title),
                permissions = COALESCE($9, permissions),
                active_status = COALESCE($10, active_status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STAFF_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, StaffRow>(&sql)
            .bind(id)
            .bind(changes.shop_id.as_deref())
            .bind(changes.email.as_ref().map(Email::as_str))
            .bind(changes.user_name.as_deref())
            .bind(changes.first_name.as_deref())
            .bind(changes.last_name.as_deref())
            .bind(changes.phone.as_deref())
            .bind(changes.employee_title.as_deref())
            .bind(changes.permissions.clone())
            .bind(changes.active_status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_error("Failed to update staff member", e))?;

        to_record(row)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM staff WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_error("Failed to delete staff member", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_permissions_batch(
        &self,
        ids: &[Uuid],
        permissions: &[String],
    ) -> RepositoryResult<Vec<BatchOutcome>> {
        // One statement, so the whole batch commits or none of it does
        let sql = format!(
            r#"
            UPDATE staff
            SET permissions = $2, updated_at = NOW()
            WHERE id = ANY($1)
            RETURNING {STAFF_COLUMNS}
            "#
        );

        let rows = sqlx::query_as::<_, StaffRow>(&sql)
            .bind(ids.to_vec())
            .bind(permissions.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_error("Failed to update batch permissions", e))?;

        let mut updated = HashMap::with_capacity(rows.len());
        for row in rows {
            let staff = StaffRecord::try_from(row)?;
            updated.insert(staff.id, staff);
        }

        Ok(ids
            .iter()
            .map(|id| match updated.get(id) {
                Some(staff) => BatchOutcome::Updated(staff.clone()),
                None => BatchOutcome::NotFound,
            })
            .collect())
    }
}
