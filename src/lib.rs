//! Shop Staff API Library
//!
//! HTTP service for shop staff accounts and their module-level permission
//! grants, with PostgreSQL and in-memory persistence adapters.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
