//! Core business logic module
//!
//! This module contains the ledger backends:
//! - `traits` - The `Ledger` trait shared by every backend
//! - `registry` - Single-threaded registry of accounts and loans
//! - `shared_registry` - Thread-safe registry with one lock per record

pub mod registry;
pub mod shared_registry;
pub mod traits;

pub use registry::Registry;
pub use shared_registry::SharedRegistry;
pub use traits::Ledger;
