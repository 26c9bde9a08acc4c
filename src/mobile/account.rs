//! Account page
//!
//! The page loads exactly one profile, owner or guest, depending on the role
//! id from the session token.

use crate::errors::AccountError;
use std::fmt;

/// Placeholder shown when a profile has no photo
pub const DEFAULT_AVATAR_URL: &str = "https://static.vecteezy.com/system/resources/previews/009/292/244/non_2x/default-avatar-icon-of-social-media-user-vector.jpg";

/// Photo the user service assigns to new profiles
pub const SERVICE_AVATAR_URL: &str = "https://default-avatar.com/user.jpg";

pub const UNKNOWN_USER: &str = "Unknown User";

pub const OWNER_ROLE_ID: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub photo_url: Option<String>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            photo_url: Some(SERVICE_AVATAR_URL.to_string()),
        }
    }
}

/// Owner XOR guest profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountProfile {
    Owner(UserProfile),
    Guest(UserProfile),
}

impl AccountProfile {
    pub fn profile(&self) -> &UserProfile {
        match self {
            AccountProfile::Owner(p) | AccountProfile::Guest(p) => p,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Owner,
    Guest,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRole::Owner => f.write_str("Owner"),
            AccountRole::Guest => f.write_str("Guest"),
        }
    }
}

/// Where the page gets profiles from
pub trait ProfileSource {
    fn owner_profile(&self) -> Result<UserProfile, AccountError>;
    fn guest_profile(&self) -> Result<UserProfile, AccountError>;
}

/// Fixed profiles, optionally failing like an unreachable user service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticProfiles {
    pub owner: UserProfile,
    pub guest: UserProfile,
    pub available: bool,
}

impl Default for StaticProfiles {
    fn default() -> Self {
        Self {
            owner: UserProfile::new("Hotel Owner"),
            guest: UserProfile::new("Guest User"),
            available: true,
        }
    }
}

impl StaticProfiles {
    fn check(&self) -> Result<(), AccountError> {
        if self.available {
            Ok(())
        } else {
            Err(AccountError::ServiceUnavailable(
                "could not reach the user service".to_string(),
            ))
        }
    }
}

impl ProfileSource for StaticProfiles {
    fn owner_profile(&self) -> Result<UserProfile, AccountError> {
        self.check()?;
        Ok(self.owner.clone())
    }

    fn guest_profile(&self) -> Result<UserProfile, AccountError> {
        self.check()?;
        Ok(self.guest.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSection {
    ProfileInformation,
    ProfilePreferences,
}

impl AccountSection {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Profile Information" => Some(AccountSection::ProfileInformation),
            "Profile Preferences" => Some(AccountSection::ProfilePreferences),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPage<S: ProfileSource = StaticProfiles> {
    role_id: Option<u32>,
    profile: Option<AccountProfile>,
    is_loading: bool,
    error: Option<AccountError>,
    source: S,
}

impl Default for AccountPage {
    fn default() -> Self {
        Self::new(StaticProfiles::default())
    }
}

impl<S: ProfileSource> AccountPage<S> {
    pub fn new(source: S) -> Self {
        Self {
            role_id: None,
            profile: None,
            is_loading: true,
            error: None,
            source,
        }
    }

    pub fn set_role_id(&mut self, role_id: Option<u32>) {
        self.role_id = role_id;
    }

    pub fn role_id(&self) -> Option<u32> {
        self.role_id
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Load the profile matching the role id: 1 is an owner, anything else a guest
    pub fn initialize(&mut self) -> Result<(), AccountError> {
        self.is_loading = true;
        self.error = None;

        let loaded = if self.role_id == Some(OWNER_ROLE_ID) {
            self.source.owner_profile().map(AccountProfile::Owner)
        } else {
            self.source.guest_profile().map(AccountProfile::Guest)
        };

        self.is_loading = false;
        match loaded {
            Ok(profile) => {
                self.profile = Some(profile);
                Ok(())
            }
            Err(e) => {
                tracing::debug!("Profile load failed: {}", e);
                self.profile = None;
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn retry(&mut self) -> Result<(), AccountError> {
        self.initialize()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&AccountError> {
        self.error.as_ref()
    }

    pub fn profile(&self) -> Option<&AccountProfile> {
        self.profile.as_ref()
    }

    /// `Owner` only when an owner profile is loaded
    pub fn role(&self) -> AccountRole {
        match self.profile {
            Some(AccountProfile::Owner(_)) => AccountRole::Owner,
            _ => AccountRole::Guest,
        }
    }

    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .map(|p| p.profile().name.as_str())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_USER)
    }

    pub fn photo_url(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|p| p.profile().photo_url.as_deref())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_AVATAR_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_role_id_loads_owner_profile() {
        let mut page: AccountPage = AccountPage::default();
        page.set_role_id(Some(1));
        page.initialize().unwrap();

        assert!(matches!(page.profile(), Some(AccountProfile::Owner(_))));
        assert_eq!(page.role(), AccountRole::Owner);
        assert_eq!(page.display_name(), "Hotel Owner");
        assert_eq!(page.photo_url(), SERVICE_AVATAR_URL);
    }

    #[test]
    fn test_any_other_role_id_loads_guest() {
        for role_id in [None, Some(2), Some(7)] {
            let mut page: AccountPage = AccountPage::default();
            page.set_role_id(role_id);
            page.initialize().unwrap();
            assert!(matches!(page.profile(), Some(AccountProfile::Guest(_))));
            assert_eq!(page.role().to_string(), "Guest");
        }
    }

    #[test]
    fn test_fallbacks_before_loading() {
        let page: AccountPage = AccountPage::default();
        assert!(page.is_loading());
        assert_eq!(page.display_name(), UNKNOWN_USER);
        assert_eq!(page.photo_url(), DEFAULT_AVATAR_URL);
        assert_eq!(page.role(), AccountRole::Guest);
    }

    #[test]
    fn test_blank_name_and_missing_photo() {
        let mut source = StaticProfiles::default();
        source.guest = UserProfile {
            name: "  ".into(),
            photo_url: None,
        };
        let mut page = AccountPage::new(source);
        page.initialize().unwrap();
        assert_eq!(page.display_name(), UNKNOWN_USER);
        assert_eq!(page.photo_url(), DEFAULT_AVATAR_URL);
    }

    #[test]
    fn test_error_then_retry() {
        let mut page = AccountPage::new(StaticProfiles {
            available: false,
            ..Default::default()
        });
        assert!(page.initialize().is_err());
        assert!(page.error().is_some());
        assert!(!page.is_loading());

        page.source_mut().available = true;
        page.retry().unwrap();
        assert!(page.error().is_none());
        assert_eq!(page.display_name(), "Guest User");
    }
}
