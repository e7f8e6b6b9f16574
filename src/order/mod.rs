//! Dependency install ordering
//!
//! Image builders cache layers by step position, so a rebuild is cheap only
//! while the leading install steps stay identical. The order recorded by the
//! previous build is kept per Python version and every new request is merged
//! against it: dependencies already known keep their recorded relative order,
//! new ones are appended at the end.

pub mod reconcile;
pub mod store;

pub use reconcile::{reconcile, ReconciledPlan};
pub use store::{FileOrderStore, OrderStore, StoredOrder};
