//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod identity;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use identity::HttpIdentityService;
pub use scheduled_tasks::{run_cleanup_sweep, start_scheduler};
pub use test_dependencies::StubIdentityService;
pub use traits::*;
