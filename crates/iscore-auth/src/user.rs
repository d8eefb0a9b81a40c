//! The user identity carried in a session.

use serde::{Deserialize, Serialize};

/// An authenticated user as remembered by the session.
///
/// # Examples
///
/// ```
/// use iscore_auth::SessionUser;
///
/// let user = SessionUser::new("alice").staff();
/// assert!(user.is_staff);
/// assert!(!user.is_superuser);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// The user's unique username.
    pub username: String,
    /// Whether this user can access the admin views.
    pub is_staff: bool,
    /// Whether this user has every permission.
    pub is_superuser: bool,
}

impl SessionUser {
    /// Creates a regular (non-staff) user.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_staff: false,
            is_superuser: false,
        }
    }

    /// Marks the user as staff.
    #[must_use]
    pub const fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    /// Marks the user as superuser. Superusers are staff too.
    #[must_use]
    pub const fn superuser(mut self) -> Self {
        self.is_staff = true;
        self.is_superuser = true;
        self
    }
}
