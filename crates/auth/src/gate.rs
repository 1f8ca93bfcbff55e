//! Capability predicates.
//!
//! Each route declares one [`Capability`]. A missing identity fails every
//! capability except [`Capability::Public`].

use crate::{AuthError, Identity};

/// What a caller must be to reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability<'a> {
    /// Anyone, with or without a token.
    Public,
    /// Any verified identity.
    LoggedIn,
    /// A verified identity with `isAdmin`.
    Admin,
    /// The user named by the route, or any admin.
    SameUserOrAdmin(&'a str),
}

impl Capability<'_> {
    /// Approve or reject `identity`.
    pub fn check(&self, identity: Option<&Identity>) -> Result<(), AuthError> {
        match self {
            Self::Public => Ok(()),
            Self::LoggedIn => ensure_logged_in(identity).map(|_| ()),
            Self::Admin => ensure_admin(identity).map(|_| ()),
            Self::SameUserOrAdmin(username) => {
                ensure_same_user_or_admin(identity, username).map(|_| ())
            }
        }
    }
}

pub fn ensure_logged_in(identity: Option<&Identity>) -> Result<&Identity, AuthError> {
    match identity {
        Some(identity) => Ok(identity),
        None => Err(AuthError::Unauthorized),
    }
}

pub fn ensure_admin(identity: Option<&Identity>) -> Result<&Identity, AuthError> {
    match identity {
        Some(identity) if identity.is_admin => Ok(identity),
        Some(_) | None => Err(AuthError::Unauthorized),
    }
}

pub fn ensure_same_user_or_admin<'a>(
    identity: Option<&'a Identity>,
    username: &str,
) -> Result<&'a Identity, AuthError> {
    match identity {
        Some(identity) if identity.is_admin || identity.username == username => Ok(identity),
        Some(_) | None => Err(AuthError::Unauthorized),
    }
}
