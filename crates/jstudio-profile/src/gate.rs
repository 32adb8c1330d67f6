//! Access checks and credit accounting around generations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jstudio_models::{GenerationMode, Profile};
use tracing::{debug, info, warn};

use crate::error::{ProfileError, ProfileResult};
use crate::store::ProfileStore;

/// Gates generations on profile state and charges one credit per success.
#[derive(Clone)]
pub struct CreditGate {
    store: Arc<dyn ProfileStore>,
}

impl CreditGate {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Verify the user may start a generation in `mode` at `now`.
    ///
    /// Checks run in order: profile exists, not expired, mode enabled,
    /// credits remaining.
    pub async fn check(
        &self,
        user_id: &str,
        mode: GenerationMode,
        now: DateTime<Utc>,
    ) -> ProfileResult<Profile> {
        let profile = self
            .store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| ProfileError::ProfileNotFound(user_id.to_string()))?;

        if let Some(expired_at) = profile.expires_at.filter(|_| profile.is_expired_at(now)) {
            return Err(ProfileError::AccessExpired { expired_at });
        }

        if !profile.permissions.allows(mode) {
            return Err(ProfileError::FeatureDisabled { mode });
        }

        if profile.permissions.max_credits <= 0 {
            return Err(ProfileError::OutOfCredits);
        }

        debug!(
            user_id = %user_id,
            mode = %mode,
            credits = profile.permissions.max_credits,
            "Generation allowed"
        );
        Ok(profile)
    }

    /// Spend one credit after a successful generation.
    ///
    /// Returns the new balance, or `None` when the charge could not be
    /// recorded. A failed charge never fails the generation it follows.
    pub async fn charge_success(&self, user_id: &str) -> Option<i64> {
        match self.try_charge(user_id).await {
            Ok(remaining) => {
                info!(user_id = %user_id, remaining, "Charged one credit");
                Some(remaining)
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to record credit charge");
                None
            }
        }
    }

    async fn try_charge(&self, user_id: &str) -> ProfileResult<i64> {
        let profile = self
            .store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| ProfileError::ProfileNotFound(user_id.to_string()))?;
        let remaining = (profile.permissions.max_credits - 1).max(0);
        self.store.set_credits(user_id, remaining).await?;
        Ok(remaining)
    }
}

impl std::fmt::Debug for CreditGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditGate").finish_non_exhaustive()
    }
}
