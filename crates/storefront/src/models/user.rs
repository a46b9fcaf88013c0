//! User profiles and the signed-in user snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sable_core::{Email, UserId};

/// Whether an email address belongs to an administrator account.
///
/// Placeholder policy: the lowercase form of the address contains the
/// substring `"admin"`. It is evaluated exactly once, when the profile
/// document is created, and the stored flag is what gates the back-office
/// afterwards. Swapping in a real role system means replacing this one
/// predicate and the stored flag.
#[must_use]
pub fn is_admin_email(email: &str) -> bool {
    email.to_lowercase().contains("admin")
}

/// A profile document in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Derived at account-creation time from [`is_admin_email`].
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Build the profile document for a newly created account.
    #[must_use]
    pub fn for_new_account(
        email: Email,
        first_name: Option<String>,
        last_name: Option<String>,
        phone_number: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let is_admin = is_admin_email(email.as_str());
        Self {
            email,
            first_name,
            last_name,
            phone_number,
            is_admin,
            created_at,
        }
    }

    /// `"First Last"`, or `None` when both parts are missing.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_owned())
        }
    }
}

/// Split a provider display name into first and remaining parts.
pub(crate) fn split_display_name(name: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(name) = name else {
        return (None, None);
    };

    let mut parts = name.split_whitespace();
    let first = parts.next().map(str::to_owned);
    let rest = parts.collect::<Vec<_>>().join(" ");
    let last = if rest.is_empty() { None } else { Some(rest) };
    (first, last)
}

/// The signed-in user as mirrored into the auth store.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

impl AuthUser {
    /// Snapshot the profile document into the store's user shape.
    #[must_use]
    pub fn from_profile(id: UserId, profile: &UserProfile) -> Self {
        Self {
            id,
            email: profile.email.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            phone_number: profile.phone_number.clone(),
        }
    }

    /// `"First Last"`, or `None` when both parts are missing.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_owned())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_email_rule() {
        assert!(is_admin_email("admin@x.com"));
        assert!(is_admin_email("administrator@foo.com"));
        assert!(is_admin_email("ADMIN@SHOP.IO"));
        assert!(!is_admin_email("bob@x.com"));
    }

    #[test]
    fn test_new_account_derives_admin_flag() {
        let profile = UserProfile::for_new_account(
            Email::parse("admin@sable.studio").unwrap(),
            None,
            None,
            None,
            Utc::now(),
        );
        assert!(profile.is_admin);

        let profile = UserProfile::for_new_account(
            Email::parse("maya@sable.studio").unwrap(),
            None,
            None,
            None,
            Utc::now(),
        );
        assert!(!profile.is_admin);
    }

    #[test]
    fn test_split_display_name() {
        assert_eq!(split_display_name(None), (None, None));
        assert_eq!(
            split_display_name(Some("Maya")),
            (Some("Maya".to_owned()), None)
        );
        assert_eq!(
            split_display_name(Some("Maya de la Cruz")),
            (Some("Maya".to_owned()), Some("de la Cruz".to_owned()))
        );
    }

    #[test]
    fn test_display_name() {
        let profile = UserProfile::for_new_account(
            Email::parse("maya@sable.studio").unwrap(),
            Some("Maya".to_owned()),
            None,
            None,
            Utc::now(),
        );
        assert_eq!(profile.display_name().as_deref(), Some("Maya"));

        let profile = UserProfile::for_new_account(
            Email::parse("maya@sable.studio").unwrap(),
            None,
            None,
            None,
            Utc::now(),
        );
        assert!(profile.display_name().is_none());
    }
}
