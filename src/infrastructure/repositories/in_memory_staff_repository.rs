use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::{RepositoryError, RepositoryResult, StaffRepository};
use crate::domain::staff::{Email, StaffChanges, StaffRecord};

/// Process-local StaffRepository
///
/// Records are kept in insertion order, which doubles as creation order for
/// `find_by_shop`. Used for local development (`STAFF_STORE=memory`) and by
/// the HTTP tests. Batch updates use the trait's concurrent fan-out.
#[derive(Clone, Default)]
pub struct InMemoryStaffRepository {
    staff: Arc<RwLock<Vec<StaffRecord>>>,
}

impl InMemoryStaffRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.staff.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.staff.read().await.is_empty()
    }
}

fn email_taken(staff: &[StaffRecord], email: &Email, except: Option<Uuid>) -> bool {
    staff
        .iter()
        .any(|s| s.email == *email && Some(s.id) != except)
}

#[async_trait]
impl StaffRepository for InMemoryStaffRepository {
    async fn create(&self, staff: StaffRecord) -> RepositoryResult<StaffRecord> {
        let mut all = self.staff.write().await;

        if email_taken(&all, &staff.email, None) {
            return Err(RepositoryError::DuplicateEmail);
        }
        if all.iter().any(|s| s.id == staff.id) {
            return Err(RepositoryError::Database(format!(
                "Staff member already exists: {}",
                staff.id
            )));
        }

        all.push(staff.clone());
        Ok(staff)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<StaffRecord>> {
        let all = self.staff.read().await;
        Ok(all.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<StaffRecord>> {
        let all = self.staff.read().await;
        Ok(all.iter().find(|s| s.email == *email).cloned())
    }

    async fn find_by_shop(&self, shop_id: &str) -> RepositoryResult<Vec<StaffRecord>> {
        let all = self.staff.read().await;
        Ok(all.iter().filter(|s| s.shop_id == shop_id).cloned().collect())
    }

    async fn update_permissions(
        &self,
        id: Uuid,
        permissions: &[String],
    ) -> RepositoryResult<Option<StaffRecord>> {
        let mut all = self.staff.write().await;

        Ok(all.iter_mut().find(|s| s.id == id).map(|staff| {
            staff.permissions = permissions.to_vec();
            staff.updated_at = Utc::now();
            staff.clone()
        }))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &StaffChanges,
    ) -> RepositoryResult<Option<StaffRecord>> {
        let mut all = self.staff.write().await;

        let index = match all.iter().position(|s| s.id == id) {
            Some(index) => index,
            None => return Ok(None),
        };

        if let Some(email) = &changes.email {
            if email_taken(&all, email, Some(id)) {
                return Err(RepositoryError::DuplicateEmail);
            }
        }

        let staff = &mut all[index];
        changes.apply_to(staff);
        Ok(Some(staff.clone()))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut all = self.staff.write().await;

        match all.iter().position(|s| s.id == id) {
            Some(index) => {
                all.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::BatchOutcome;
    use crate::domain::staff::NewStaff;

    fn staff(shop_id: &str, email: &str) -> StaffRecord {
        StaffRecord::new(
            NewStaff {
                shop_id: shop_id.to_string(),
                email: Email::new(email).unwrap(),
                user_name: "user".to_string(),
                first_name: "First".to_string(),
                last_name: "Last".to_string(),
                phone: String::new(),
                employee_title: "Clerk".to_string(),
                permissions: vec![],
            },
            "hash".to_string(),
        )
    }

    fn perms(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email_across_shops() {
        let repo = InMemoryStaffRepository::new();
        repo.create(staff("shop-a", "same@shop.test")).await.unwrap();

        let result = repo.create(staff("shop-b", "same@shop.test")).await;

        assert_eq!(result, Err(RepositoryError::DuplicateEmail));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn find_by_shop_keeps_creation_order() {
        let repo = InMemoryStaffRepository::new();
        let first = repo.create(staff("shop-a", "1@shop.test")).await.unwrap();
        repo.create(staff("shop-b", "2@shop.test")).await.unwrap();
        let third = repo.create(staff("shop-a", "3@shop.test")).await.unwrap();

        let found = repo.find_by_shop("shop-a").await.unwrap();

        assert_eq!(
            found.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![first.id, third.id]
        );
    }

    #[tokio::test]
    async fn update_permissions_replaces_list() {
        let repo = InMemoryStaffRepository::new();
        let mut record = staff("shop-a", "p@shop.test");
        record.permissions = perms(&["sales:read", "hr:read"]);
        let created = repo.create(record).await.unwrap();

        let updated = repo
            .update_permissions(created.id, &perms(&["inventory:write"]))
            .await
            .unwrap()
            .expect("record exists");

        assert_eq!(updated.permissions, perms(&["inventory:write"]));
        assert!(repo
            .update_permissions(Uuid::new_v4(), &perms(&["x:y"]))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_rejects_email_of_another_record() {
        let repo = InMemoryStaffRepository::new();
        let a = repo.create(staff("shop-a", "a@shop.test")).await.unwrap();
        repo.create(staff("shop-a", "b@shop.test")).await.unwrap();

        let taken = StaffChanges {
            email: Some(Email::new("b@shop.test").unwrap()),
            ..Default::default()
        };
        assert_eq!(
            repo.update(a.id, &taken).await,
            Err(RepositoryError::DuplicateEmail)
        );

        let own = StaffChanges {
            email: Some(Email::new("a@shop.test").unwrap()),
            first_name: Some("Ada".to_string()),
            ..Default::default()
        };
        let updated = repo.update(a.id, &own).await.unwrap().unwrap();
        assert_eq!(updated.first_name, "Ada");
    }

    #[tokio::test]
    async fn update_of_missing_record_is_none_even_with_taken_email() {
        let repo = InMemoryStaffRepository::new();
        repo.create(staff("shop-a", "held@shop.test")).await.unwrap();

        let changes = StaffChanges {
            email: Some(Email::new("held@shop.test").unwrap()),
            ..Default::default()
        };

        assert_eq!(repo.update(Uuid::new_v4(), &changes).await, Ok(None));
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let repo = InMemoryStaffRepository::new();
        let created = repo.create(staff("shop-a", "d@shop.test")).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn batch_update_reports_each_id_in_order() {
        let repo = InMemoryStaffRepository::new();
        let a = repo.create(staff("shop-a", "a@shop.test")).await.unwrap();
        let c = repo.create(staff("shop-a", "c@shop.test")).await.unwrap();
        let missing = Uuid::new_v4();

        let outcomes = repo
            .update_permissions_batch(&[a.id, missing, c.id], &perms(&["sales:write"]))
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(&outcomes[0], BatchOutcome::Updated(s) if s.id == a.id));
        assert_eq!(outcomes[1], BatchOutcome::NotFound);
        assert!(matches!(&outcomes[2], BatchOutcome::Updated(s) if s.permissions == perms(&["sales:write"])));
    }
}
