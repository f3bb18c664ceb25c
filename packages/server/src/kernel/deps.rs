//! Server dependencies for handlers (using traits for testability)
//!
//! This is the central dependency container passed to every handler
//! invocation. External services sit behind trait abstractions so tests can
//! swap them; the database pool is the one shared mutable resource.

use sqlx::PgPool;
use std::sync::Arc;

use crate::kernel::BaseIdentityService;

/// Server dependencies accessible to registration handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// External identity provider, called with the verified triple
    pub identity: Arc<dyn BaseIdentityService>,
}

impl ServerDeps {
    pub fn new(db_pool: PgPool, identity: Arc<dyn BaseIdentityService>) -> Self {
        Self { db_pool, identity }
    }
}
