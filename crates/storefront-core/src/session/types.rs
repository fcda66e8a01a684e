//! ============================================================================
//! Session Types - Signed-in identity and login providers
//! ============================================================================

use serde::{Deserialize, Serialize};

/// Avatar assigned to every demo identity
pub const DEFAULT_AVATAR: &str = "/placeholder.svg?height=40&width=40";

/// What the signed-in account may do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Seller,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Seller => "seller",
            Self::Admin => "admin",
        }
    }
}

/// Third-party login providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Discord,
    Google,
    Github,
}

impl SocialProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "discord" => Some(Self::Discord),
            "google" => Some(Self::Google),
            "github" => Some(Self::Github),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discord => "discord",
            Self::Google => "google",
            Self::Github => "github",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Discord => "Discord",
            Self::Google => "Google",
            Self::Github => "Github",
        }
    }
}

/// The authenticated account held by the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: UserRole,
    /// Set when the identity came from a social login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<SocialProvider>,
}

impl Identity {
    pub fn new(id: String, username: String, email: String, role: UserRole) -> Self {
        Self {
            id,
            username,
            email,
            avatar: Some(DEFAULT_AVATAR.to_string()),
            role,
            provider: None,
        }
    }

    pub fn with_provider(mut self, provider: SocialProvider) -> Self {
        self.provider = Some(provider);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_json_shape() {
        let identity = Identity::new(
            "user-1".into(),
            "DemoUser".into(),
            "demo@example.com".into(),
            UserRole::User,
        );
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["avatar"], DEFAULT_AVATAR);
        assert!(json.get("provider").is_none());

        let social = identity.with_provider(SocialProvider::Github);
        let json = serde_json::to_value(&social).unwrap();
        assert_eq!(json["provider"], "github");
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!(SocialProvider::from_str("Discord"), Some(SocialProvider::Discord));
        assert_eq!(SocialProvider::from_str("myspace"), None);
    }
}
