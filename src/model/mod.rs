//! Core data model.
//!
//! Products carry vendor lifecycle dates. Everything else here either groups
//! products (vendors, product lists) or configures how those dates are kept
//! in sync with the vendor API.

pub mod product;
pub mod settings;
pub mod worker;

pub use product::{DisplayProduct, LifecycleUpdate, ProductList, ProductRecord, Vendor};
pub use settings::Settings;
pub use worker::{WorkerState, WorkerStatus};
