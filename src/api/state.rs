use std::sync::Arc;

use crate::auth::AuthPolicy;
use crate::domain::repositories::StaffRepository;

/// Shared state handed to every handler
///
/// Cheap to clone; the repository is shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub staff: Arc<dyn StaffRepository>,
    pub auth: AuthPolicy,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(staff: Arc<dyn StaffRepository>, auth: AuthPolicy, bcrypt_cost: u32) -> Self {
        Self {
            staff,
            auth,
            bcrypt_cost,
        }
    }
}
