use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::Email;

/// Staff account belonging to a shop
///
/// Holds the bcrypt password hash and the reset token; neither may leave the
/// service, so API responses are built from a separate view type.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffRecord {
    pub id: Uuid,
    pub shop_id: String,
    pub email: Email,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub employee_title: String,
    pub password_hash: String,
    pub new_password_token: Option<String>,
    pub permissions: Vec<String>,
    pub active_status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile data for a staff account that does not exist yet
#[derive(Debug, Clone)]
pub struct NewStaff {
    pub shop_id: String,
    pub email: Email,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub employee_title: String,
    pub permissions: Vec<String>,
}

impl StaffRecord {
    /// Builds an active staff record with a fresh id
    ///
    /// # Arguments
    /// * `staff` - Profile and permission data
    /// * `password_hash` - Already hashed password, never the raw secret
    pub fn new(staff: NewStaff, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            shop_id: staff.shop_id,
            email: staff.email,
            user_name: staff.user_name,
            first_name: staff.first_name,
            last_name: staff.last_name,
            phone: staff.phone,
            employee_title: staff.employee_title,
            password_hash,
            new_password_token: None,
            permissions: staff.permissions,
            active_status: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a staff profile
///
/// `None` leaves the stored value untouched. Credentials are not part of this
/// type, so a profile update can never overwrite them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffChanges {
    pub shop_id: Option<String>,
    pub email: Option<Email>,
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub employee_title: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub active_status: Option<bool>,
}

impl StaffChanges {
    pub fn is_empty(&self) -> bool {
        *self == StaffChanges::default()
    }

    /// Applies the present fields to `record` and bumps `updated_at`
    pub fn apply_to(&self, record: &mut StaffRecord) {
        if let Some(shop_id) = &self.shop_id {
            record.shop_id = shop_id.clone();
        }
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
        if let Some(user_name) = &self.user_name {
            record.user_name = user_name.clone();
        }
        if let Some(first_name) = &self.first_name {
            record.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            record.last_name = last_name.clone();
        }
        if let Some(phone) = &self.phone {
            record.phone = phone.clone();
        }
        if let Some(employee_title) = &self.employee_title {
            record.employee_title = employee_title.clone();
        }
        if let Some(permissions) = &self.permissions {
            record.permissions = permissions.clone();
        }
        if let Some(active_status) = self.active_status {
            record.active_status = active_status;
        }
        record.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_staff() -> NewStaff {
        NewStaff {
            shop_id: "shop-1".to_string(),
            email: Email::new("clerk@shop.test").unwrap(),
            user_name: "clerk".to_string(),
            first_name: "Cora".to_string(),
            last_name: "Lee".to_string(),
            phone: "555-0100".to_string(),
            employee_title: "Cashier".to_string(),
            permissions: vec!["sales:read".to_string()],
        }
    }

    #[test]
    fn new_record_is_active() {
        let record = StaffRecord::new(new_staff(), "$2b$hash".to_string());

        assert!(record.active_status);
        assert_eq!(record.password_hash, "$2b$hash");
        assert_eq!(record.new_password_token, None);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn new_records_get_distinct_ids() {
        let a = StaffRecord::new(new_staff(), "h".to_string());
        let b = StaffRecord::new(new_staff(), "h".to_string());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn apply_changes_only_present_fields() {
        let mut record = StaffRecord::new(new_staff(), "h".to_string());
        let changes = StaffChanges {
            phone: Some("555-0199".to_string()),
            active_status: Some(false),
            ..Default::default()
        };

        changes.apply_to(&mut record);

        assert_eq!(record.phone, "555-0199");
        assert!(!record.active_status);
        assert_eq!(record.first_name, "Cora");
        assert_eq!(record.permissions, vec!["sales:read".to_string()]);
        assert_eq!(record.password_hash, "h");
    }

    #[test]
    fn empty_changes() {
        assert!(StaffChanges::default().is_empty());
        assert!(!StaffChanges {
            user_name: Some("x".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
