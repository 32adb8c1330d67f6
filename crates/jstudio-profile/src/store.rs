//! Key-value profile store contract.

use std::collections::HashMap;

use async_trait::async_trait;
use jstudio_models::{Profile, StudioConfig};
use tokio::sync::RwLock;

use crate::error::{ProfileError, ProfileResult};

/// Read/write access to profiles, credit balances and studio config.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> ProfileResult<Option<Profile>>;

    async fn save_profile(&self, user_id: &str, profile: &Profile) -> ProfileResult<()>;

    /// Overwrite the numeric credit balance of an existing profile.
    async fn set_credits(&self, user_id: &str, credits: i64) -> ProfileResult<()>;

    async fn load_config(&self) -> ProfileResult<StudioConfig>;

    async fn save_config(&self, config: &StudioConfig) -> ProfileResult<()>;
}

/// Process-local store, used by the CLI and tests.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
    config: RwLock<StudioConfig>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StudioConfig) -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            config: RwLock::new(config),
        }
    }

    /// Seed a profile (builder style).
    pub async fn insert(&self, user_id: impl Into<String>, profile: Profile) {
        self.profiles.write().await.insert(user_id.into(), profile);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, user_id: &str) -> ProfileResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn save_profile(&self, user_id: &str, profile: &Profile) -> ProfileResult<()> {
        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), profile.clone());
        Ok(())
    }

    async fn set_credits(&self, user_id: &str, credits: i64) -> ProfileResult<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| ProfileError::ProfileNotFound(user_id.to_string()))?;
        profile.permissions.max_credits = credits;
        Ok(())
    }

    async fn load_config(&self) -> ProfileResult<StudioConfig> {
        Ok(self.config.read().await.clone())
    }

    async fn save_config(&self, config: &StudioConfig) -> ProfileResult<()> {
        *self.config.write().await = config.clone();
        Ok(())
    }
}
