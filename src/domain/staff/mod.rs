// Staff domain module
// Contains the staff record, its value objects, and permission encoding

#![allow(clippy::module_inception)]

pub mod permissions;
pub mod staff;
pub mod value_objects;

// Re-export main types for convenience
pub use permissions::{to_map, to_pair_strings, PermissionMap, PermissionsInput};
pub use staff::{NewStaff, StaffChanges, StaffRecord};
pub use value_objects::Email;
