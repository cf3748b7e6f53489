//! Permission Definitions
//!
//! Access levels a route group can demand of the requesting user.

use super::CurrentUser;

/// Access level of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Anyone, authenticated or not
    AllowAny,
    /// Any logged-in user
    IsAuthenticated,
    /// Logged-in staff user
    IsAdminUser,
}

impl Permission {
    /// Whether `user` (None when anonymous) passes this check
    pub fn allows(self, user: Option<&CurrentUser>) -> bool {
        match self {
            Permission::AllowAny => true,
            Permission::IsAuthenticated => user.is_some(),
            Permission::IsAdminUser => user.is_some_and(|u| u.is_staff),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::AllowAny => "allow_any",
            Permission::IsAuthenticated => "is_authenticated",
            Permission::IsAdminUser => "is_admin_user",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
