//! User profile as stored by the hosted backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generation mode a credit is spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    Photo,
    Video,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Photo => "photo",
            GenerationMode::Video => "video",
        }
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

/// Feature permissions and remaining credit balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermissions {
    pub can_use_photo: bool,
    pub can_use_video: bool,
    /// Remaining credits. One credit is spent per successful generation.
    pub max_credits: i64,
}

impl Default for UserPermissions {
    fn default() -> Self {
        Self {
            can_use_photo: true,
            can_use_video: true,
            max_credits: 10,
        }
    }
}

impl UserPermissions {
    pub fn allows(&self, mode: GenerationMode) -> bool {
        match mode {
            GenerationMode::Photo => self.can_use_photo,
            GenerationMode::Video => self.can_use_video,
        }
    }
}

/// Profile record keyed by user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Profile {
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub permissions: UserPermissions,
    /// Access ends at this instant when set.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn with_credits(credits: i64) -> Self {
        Self {
            permissions: UserPermissions {
                max_credits: credits,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| now > expiry)
    }
}
