// Password hashing utilities
// Staff passwords are stored only as salted bcrypt hashes

use bcrypt::{hash, verify};

pub use bcrypt::DEFAULT_COST;

/// Lowest work factor bcrypt accepts
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts
pub const MAX_COST: u32 = 31;

/// Hashes a password using bcrypt
///
/// # Arguments
/// * `password` - The plaintext password to hash
/// * `cost` - bcrypt work factor, between `MIN_COST` and `MAX_COST`
///
/// # Returns
/// * `Ok(String)` - The bcrypt hash
/// * `Err(String)` - If hashing fails
///
/// # Example
/// ```
/// use shop_staff_api::auth::password::{hash_password, MIN_COST};
///
/// let hash = hash_password("my_password", MIN_COST).expect("valid hash");
/// assert!(hash.starts_with("$2"));
/// ```
pub fn hash_password(password: &str, cost: u32) -> Result<String, String> {
    hash(password, cost).map_err(|e| e.to_string())
}

/// Hashes a password on the blocking thread pool
///
/// bcrypt is deliberately slow, so request handlers use this variant to keep
/// the async workers free.
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, String> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| format!("Password hashing task failed: {}", e))?
}

/// Verifies a password against a bcrypt hash
///
/// # Returns
/// * `Ok(bool)` - True if password matches, false otherwise
/// * `Err(String)` - If the hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify(password, hash).map_err(|e| e.to_string())
}
