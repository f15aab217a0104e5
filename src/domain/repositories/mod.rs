// Repository ports implemented by the infrastructure layer

pub mod staff_repository;

pub use staff_repository::{BatchOutcome, RepositoryError, RepositoryResult, StaffRepository};
