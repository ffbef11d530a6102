//! The principal on whose behalf an engine operation runs
//!
//! Session and login handling live outside the engine. The web layer resolves
//! the caller and hands the engine a [`Principal`]; the engine only checks
//! ownership and roles against it.

use crate::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role attached to an account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Player,
    Admin,
}

/// An authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// The calling account
    pub account: AccountId,
    /// The account's role
    pub role: Role,
}

impl Principal {
    /// A regular player
    pub fn player(account: impl Into<AccountId>) -> Self {
        Self {
            account: account.into(),
            role: Role::Player,
        }
    }

    /// An administrator
    pub fn admin(account: impl Into<AccountId>) -> Self {
        Self {
            account: account.into(),
            role: Role::Admin,
        }
    }

    /// Check if this principal holds the administrative role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            Role::Player => write!(f, "{}", self.account),
            Role::Admin => write!(f, "{} (admin)", self.account),
        }
    }
}
