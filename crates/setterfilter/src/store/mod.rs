//! # Storage Layer
//!
//! The storage layer is the raw persistence primitive that interceptors
//! delegate to. It knows nothing about filters: [`StorageBackend::raw_write`]
//! stores exactly the value it is given.
//!
//! ## Implementations
//!
//! - [`mem_backend::MemBackend`]: in-memory records, used by tests and
//!   embedders without their own persistence layer.
//!
//! Applications plug in their own persistence by implementing
//! [`StorageBackend`].

pub mod backend;
pub mod mem_backend;

pub use backend::StorageBackend;
pub use mem_backend::MemBackend;
