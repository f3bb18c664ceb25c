// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The registration
// handlers decide; these traits only talk to external collaborators.
//
// Naming convention: Base* for trait names (e.g., BaseIdentityService)

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// Identity Provider Trait (Infrastructure - account creation)
// =============================================================================

/// Interface to the external identity provider that creates the durable
/// account once a registration has been verified.
#[async_trait]
pub trait BaseIdentityService: Send + Sync {
    /// Create the account for a verified triple.
    ///
    /// `password` is whatever was stored on the pending registration, i.e.
    /// the bcrypt hash (see DESIGN.md).
    async fn create_account(&self, email: &str, display_name: &str, password: &str)
        -> Result<()>;
}
