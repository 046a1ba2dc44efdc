//! # Realty Database Crate
//!
//! This crate is the only place that knows how property rows are stored.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** Encapsulates all database-specific logic behind the
//!   `PropertyStore` trait. Callers never see SQL.
//! - **Explicit Context:** There is no global handle. A store is built once at
//!   startup and passed to whoever needs it; every call borrows a pooled
//!   connection only for its own duration.
//! - **Atomic Mutations:** Each write is a single statement against a single row.
//!   The view counter is incremented server-side (`view_count + 1`), never read
//!   and written back.
//!
//! ## Public API
//!
//! - `connect` / `connect_with`: establish the PostgreSQL connection pool.
//! - `run_migrations`: apply the embedded schema migrations.
//! - `PropertyStore`: the dataset accessor and mutation contract.
//! - `DbRepository`: the PostgreSQL implementation.
//! - `InMemoryRepository`: a process-local implementation for tests and demos.
//! - `DbError`: the error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_with, run_migrations, PoolOptions};
pub use error::DbError;
pub use memory::InMemoryRepository;
pub use repository::DbRepository;
pub use store::PropertyStore;
