use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::ApiJson;
use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::auth::password::hash_password_blocking;
use crate::domain::repositories::BatchOutcome;
use crate::domain::staff::value_objects::parse_staff_id;
use crate::domain::staff::{
    to_pair_strings, Email, NewStaff, PermissionMap, PermissionsInput, StaffChanges, StaffRecord,
};

const STAFF_NOT_FOUND: &str = "Staff member not found";

/// Request body for listing the staff of a shop
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStaffRequest {
    pub shop_id: String,
}

/// Request body for creating a staff account
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStaffRequest {
    pub shop_id: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, rename = "employeeTile")]
    pub employee_title: String,
    #[serde(default)]
    pub permissions: PermissionMap,
}

/// Request body for replacing one staff member's permissions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermissionsRequest {
    pub staff_id: String,
    pub permissions: PermissionsInput,
}

/// Request body for applying one permission set to many staff members
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdatePermissionsRequest {
    pub staff_ids: Vec<String>,
    pub permissions: PermissionsInput,
}

/// Partial profile update
///
/// Unknown keys are ignored, which is how `password`, `showPassword` and
/// `newPasswordToken` are kept out of this endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaffRequest {
    pub shop_id: Option<String>,
    pub email: Option<String>,
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "employeeTile")]
    pub employee_title: Option<String>,
    pub permissions: Option<PermissionsInput>,
    #[serde(rename = "activeStatue")]
    pub active_status: Option<bool>,
}

impl TryFrom<UpdateStaffRequest> for StaffChanges {
    type Error = ApiError;

    fn try_from(req: UpdateStaffRequest) -> Result<Self, Self::Error> {
        let email = req
            .email
            .map(Email::new)
            .transpose()
            .map_err(|e| ApiError::bad_request("Invalid email").with_error(e))?;

        Ok(StaffChanges {
            shop_id: req.shop_id,
            email,
            user_name: req.user_name,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            employee_title: req.employee_title,
            permissions: req.permissions.map(PermissionsInput::into_pair_strings),
            active_status: req.active_status,
        })
    }
}

/// Staff record as returned to clients
///
/// Has no credential fields, so nothing sensitive can be serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffResponse {
    pub id: Uuid,
    pub shop_id: String,
    pub email: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(rename = "employeeTile")]
    pub employee_title: String,
    pub permissions: Vec<String>,
    #[serde(rename = "activeStatue")]
    pub active_status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&StaffRecord> for StaffResponse {
    fn from(staff: &StaffRecord) -> Self {
        Self {
            id: staff.id,
            shop_id: staff.shop_id.clone(),
            email: staff.email.to_string(),
            user_name: staff.user_name.clone(),
            first_name: staff.first_name.clone(),
            last_name: staff.last_name.clone(),
            phone: staff.phone.clone(),
            employee_title: staff.employee_title.clone(),
            permissions: staff.permissions.clone(),
            active_status: staff.active_status,
            created_at: staff.created_at,
            updated_at: staff.updated_at,
        }
    }
}

/// Per-id result of a batch permission update
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BatchUpdateItem {
    Updated {
        #[serde(rename = "staffId")]
        staff_id: String,
        data: StaffResponse,
    },
    NotFound {
        #[serde(rename = "staffId")]
        staff_id: String,
    },
    Failed {
        #[serde(rename = "staffId")]
        staff_id: String,
        error: String,
    },
}

/// List all staff members of a shop
///
/// POST /getAll
pub async fn get_all_staff(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ListStaffRequest>,
) -> Result<ApiResponse<Vec<StaffResponse>>, ApiError> {
    let staff = state
        .staff
        .find_by_shop(&req.shop_id)
        .await
        .map_err(|e| ApiError::from_repository("Error fetching staff members", e))?;

    Ok(ApiResponse::success(
        staff.iter().map(StaffResponse::from).collect(),
    ))
}

/// Create a staff account
///
/// POST /add
pub async fn add_staff(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AddStaffRequest>,
) -> Result<(StatusCode, ApiResponse<StaffResponse>), ApiError> {
    const FAILURE: &str = "Error adding staff member";

    let permissions = to_pair_strings(&req.permissions);

    let email = Email::new(&req.email)
        .map_err(|e| ApiError::bad_request("Invalid email").with_error(e))?;

    // Email is unique across every shop
    let existing = state
        .staff
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::from_repository(FAILURE, e))?;
    if existing.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let password_hash = hash_password_blocking(req.password, state.bcrypt_cost)
        .await
        .map_err(|e| ApiError::internal_server_error(FAILURE).with_error(e))?;

    let staff = StaffRecord::new(
        NewStaff {
            shop_id: req.shop_id,
            email,
            user_name: req.user_name,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            employee_title: req.employee_title,
            permissions,
        },
        password_hash,
    );

    let created = state
        .staff
        .create(staff)
        .await
        .map_err(|e| ApiError::from_repository(FAILURE, e))?;

    tracing::info!(staff_id = %created.id, shop_id = %created.shop_id, "Staff member added");

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(StaffResponse::from(&created))
            .with_message("Staff member added successfully"),
    ))
}

/// Replace the permissions of one staff member
///
/// PUT /permissions
pub async fn update_permissions(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdatePermissionsRequest>,
) -> Result<ApiResponse<StaffResponse>, ApiError> {
    let id = parse_staff_id(&req.staff_id).ok_or_else(|| ApiError::not_found(STAFF_NOT_FOUND))?;
    let permissions = req.permissions.into_pair_strings();

    let updated = state
        .staff
        .update_permissions(id, &permissions)
        .await
        .map_err(|e| ApiError::from_repository("Error updating permissions", e))?
        .ok_or_else(|| ApiError::not_found(STAFF_NOT_FOUND))?;

    tracing::info!(staff_id = %updated.id, count = permissions.len(), "Permissions updated");

    Ok(ApiResponse::success(StaffResponse::from(&updated))
        .with_message("Permissions updated successfully"))
}

/// Apply one permission set to many staff members
///
/// PUT /permissions/batch
pub async fn batch_update_permissions(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BatchUpdatePermissionsRequest>,
) -> Result<ApiResponse<Vec<BatchUpdateItem>>, ApiError> {
    let permissions = req.permissions.into_pair_strings();

    // Ids that are not UUIDs are reported as not found without a lookup
    let parsed: Vec<Option<Uuid>> = req.staff_ids.iter().map(|id| parse_staff_id(id)).collect();
    let valid: Vec<Uuid> = parsed.iter().flatten().copied().collect();

    let mut outcomes = state
        .staff
        .update_permissions_batch(&valid, &permissions)
        .await
        .map_err(|e| ApiError::from_repository("Error updating batch permissions", e))?
        .into_iter();

    let items: Vec<BatchUpdateItem> = req
        .staff_ids
        .into_iter()
        .zip(parsed)
        .map(|(staff_id, id)| match id.and_then(|_| outcomes.next()) {
            Some(BatchOutcome::Updated(staff)) => BatchUpdateItem::Updated {
                staff_id,
                data: StaffResponse::from(&staff),
            },
            Some(BatchOutcome::Failed(error)) => BatchUpdateItem::Failed { staff_id, error },
            Some(BatchOutcome::NotFound) | None => BatchUpdateItem::NotFound { staff_id },
        })
        .collect();

    let updated = items
        .iter()
        .filter(|item| matches!(item, BatchUpdateItem::Updated { .. }))
        .count();
    tracing::info!(requested = items.len(), updated, "Batch permissions update");

    Ok(ApiResponse::success(items).with_message("Batch permissions update successful"))
}

/// Update profile fields of a staff member
///
/// PUT /:staffId
pub async fn update_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    ApiJson(req): ApiJson<UpdateStaffRequest>,
) -> Result<ApiResponse<StaffResponse>, ApiError> {
    const FAILURE: &str = "Error updating staff member";

    let id = parse_staff_id(&staff_id).ok_or_else(|| ApiError::not_found(STAFF_NOT_FOUND))?;

    // An unknown id is reported before any problem with the body
    let existing = state
        .staff
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::from_repository(FAILURE, e))?
        .ok_or_else(|| ApiError::not_found(STAFF_NOT_FOUND))?;

    let changes = StaffChanges::try_from(req)?;
    let updated = if changes.is_empty() {
        existing
    } else {
        state
            .staff
            .update(id, &changes)
            .await
            .map_err(|e| ApiError::from_repository(FAILURE, e))?
            .ok_or_else(|| ApiError::not_found(STAFF_NOT_FOUND))?
    };

    tracing::info!(staff_id = %updated.id, "Staff member updated");

    Ok(ApiResponse::success(StaffResponse::from(&updated))
        .with_message("Staff member updated successfully"))
}

/// Delete a staff member
///
/// DELETE /:staffId
pub async fn delete_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = parse_staff_id(&staff_id).ok_or_else(|| ApiError::not_found(STAFF_NOT_FOUND))?;

    let deleted = state
        .staff
        .delete(id)
        .await
        .map_err(|e| ApiError::from_repository("Error deleting staff member", e))?;

    if !deleted {
        return Err(ApiError::not_found(STAFF_NOT_FOUND));
    }

    tracing::info!(staff_id = %id, "Staff member deleted");

    Ok(ApiResponse::confirmation("Staff member deleted successfully"))
}
