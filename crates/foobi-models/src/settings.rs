//! Account settings and login credentials.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub company: String,
    #[validate(length(max = 500))]
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub marketing_emails: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub profile_public: bool,
    pub analytics_sharing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    /// BCP 47 language tag
    #[validate(length(min = 2, max = 35))]
    pub language: String,
    pub auto_save: bool,
}

/// Settings page state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[validate(nested)]
    pub profile: Profile,
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
    #[validate(nested)]
    pub preferences: Preferences,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            profile: Profile {
                name: "田中太郎".to_string(),
                email: "tanaka@example.com".to_string(),
                company: "株式会社サンプル".to_string(),
                bio: "動画制作に情熱を注ぐクリエイターです。".to_string(),
            },
            notifications: NotificationSettings {
                email_notifications: true,
                push_notifications: true,
                marketing_emails: false,
            },
            privacy: PrivacySettings {
                profile_public: false,
                analytics_sharing: true,
            },
            preferences: Preferences {
                theme: Theme::Light,
                language: "ja".to_string(),
                auto_save: true,
            },
        }
    }
}

/// Email/password pair submitted from the login dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}
