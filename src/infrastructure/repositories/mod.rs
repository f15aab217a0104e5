// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory_staff_repository;
pub mod postgres_staff_repository;

pub use in_memory_staff_repository::InMemoryStaffRepository;
pub use postgres_staff_repository::PostgresStaffRepository;
