// Authentication: password hashing, JWT verification, and the route auth policy

pub mod jwt;
pub mod password;
pub mod policy;

pub use policy::{AuthPolicy, AuthRejection};
