//! Record types persisted by the store

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::StoreError;
use crate::constants::{TAB_PREFIX, USER_PREFIX};

/// One of the two disjoint key spaces inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `user_<name>`
    Users,
    /// `tab_<uuid>`
    Tabs,
}

impl Namespace {
    /// The key prefix for this namespace.
    pub fn prefix(&self) -> &'static str {
        match self {
            Namespace::Users => USER_PREFIX,
            Namespace::Tabs => TAB_PREFIX,
        }
    }

    /// Full engine key for `id` in this namespace.
    pub fn key(&self, id: &str) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.prefix().len() + id.len());
        key.extend_from_slice(self.prefix().as_bytes());
        key.extend_from_slice(id.as_bytes());
        key
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Users => f.write_str("user"),
            Namespace::Tabs => f.write_str("tab"),
        }
    }
}

/// A record kind stored under a fixed namespace.
pub trait Record: Serialize + serde::de::DeserializeOwned {
    /// Namespace the record lives in.
    const NAMESPACE: Namespace;

    /// Identifier appended to the namespace prefix.
    fn record_id(&self) -> String;
}

/// Globally unique, immutable tab identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(Uuid);

impl TabId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier supplied from outside the store.
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|source| StoreError::InvalidTabId {
                value: value.to_string(),
                source,
            })
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TabId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for TabId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// A user account.
///
/// `tabs` is a denormalized index of the tabs this user owns, in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique, case-sensitive account name
    pub name: String,
    /// Argon2id hash in PHC string format
    pub password_hash: String,
    /// Whether the account has administrative rights
    pub admin: bool,
    /// Owned tab identifiers
    #[serde(default)]
    pub tabs: Vec<TabId>,
}

impl User {
    /// Rejects names that cannot address a user record.
    pub fn validate_name(name: &str) -> Result<(), StoreError> {
        if name.is_empty() {
            return Err(StoreError::EmptyUserName);
        }
        Ok(())
    }
}

impl Record for User {
    const NAMESPACE: Namespace = Namespace::Users;

    fn record_id(&self) -> String {
        self.name.clone()
    }
}

/// A user-owned document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    /// Name of the owning user; never changes after creation
    pub owner: String,
    /// Visible on the public listing
    pub public: bool,
    /// Caller-encoded payload
    pub contents: String,
}

impl Tab {
    /// Builds a new tab with a fresh identifier.
    pub fn new(owner: impl Into<String>, public: bool, contents: impl Into<String>) -> Self {
        Self {
            id: TabId::new(),
            owner: owner.into(),
            public,
            contents: contents.into(),
        }
    }
}

impl Record for Tab {
    const NAMESPACE: Namespace = Namespace::Tabs;

    fn record_id(&self) -> String {
        self.id.to_string()
    }
}
