//! Session descriptor and account input types

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::store::User;

/// The authenticated-caller handle: a user's name and admin flag, never its password hash.
///
/// Also embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub name: String,
    pub admin: bool,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            admin: user.admin,
        }
    }
}

/// A session descriptor together with the signed token asserting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUser {
    #[serde(flatten)]
    pub user: SessionUser,
    pub token: String,
}

/// Registration input: a plaintext password that is hashed before it is stored.
///
/// The password is wiped from memory when the value is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct NewUser {
    #[zeroize(skip)]
    pub name: String,
    pub password: String,
    #[zeroize(skip)]
    pub admin: bool,
}

impl NewUser {
    pub fn new(name: impl Into<String>, password: impl Into<String>, admin: bool) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            admin,
        }
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("admin", &self.admin)
            .finish()
    }
}
