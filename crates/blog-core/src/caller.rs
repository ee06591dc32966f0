//! Who is making a request.

use crate::domain::UserId;
use crate::view::ViewOutcome;

/// An authenticated account, as far as the operations care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Caller {
    #[default]
    Anonymous,
    Authenticated(AuthenticatedUser),
}

impl Caller {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Caller::Authenticated(_))
    }

    /// Guard for operations that need a logged-in caller.
    pub fn require(&self) -> Result<&AuthenticatedUser, ViewOutcome> {
        match self {
            Caller::Authenticated(user) => Ok(user),
            Caller::Anonymous => Err(ViewOutcome::LoginRequired),
        }
    }
}

impl From<AuthenticatedUser> for Caller {
    fn from(user: AuthenticatedUser) -> Self {
        Caller::Authenticated(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_caller_is_sent_to_login() {
        assert_eq!(Caller::Anonymous.require(), Err(ViewOutcome::LoginRequired));
        assert!(!Caller::default().is_authenticated());
    }

    #[test]
    fn authenticated_caller_passes_the_guard() {
        let caller = Caller::from(AuthenticatedUser::new(3, "editor"));
        assert!(caller.is_authenticated());
        assert_eq!(caller.require().unwrap().id, 3);
    }
}
