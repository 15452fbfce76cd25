//! Record store for users and tabs
//!
//! [`RecordStore`] keeps two record kinds in one [`Backend`], separated by key prefix:
//! users under `user_<name>` and tabs under `tab_<uuid>`. Records are JSON.
//!
//! Each user carries a denormalized list of the tabs it owns. Every write that touches a
//! user record or one of its tabs runs under that owner's lock, so concurrent tab writes
//! for one user never lose an index entry and a tab cannot outlive a concurrent
//! `remove_user` or `remove_tab`.
//!
//! Operations that touch a tab record *and* its owner's index (`create_tab`, `remove_tab`,
//! `remove_user`) are still separate engine writes. A crash between them leaves the index
//! and the tab records disagreeing until [`RecordStore::repair`] runs.
//!
//! Changes that can drop the number of administrators (`set_admin`, `remove_user`) also
//! take a store-wide lock and refuse to leave the store without one.

mod errors;
mod locks;
mod repair;
mod types;

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::Result;
use crate::backend::{Backend, KeyValue};

pub use errors::StoreError;
pub use repair::RepairReport;
pub use types::{Namespace, Record, Tab, TabId, User};

use locks::OwnerLocks;

struct StoreInner {
    backend: Box<dyn Backend>,
    owner_locks: OwnerLocks,
    // Taken before any owner lock, never after.
    admin_lock: Mutex<()>,
}

/// Shared handle to the user and tab records.
///
/// Cloning is cheap; every clone talks to the same engine and shares the same per-owner
/// locks, so one store can be handed to every request thread.
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}

/// Lazily decoded records from one prefix scan.
///
/// The underlying pairs are a snapshot taken when the scan started; records are
/// deserialized one at a time as the iterator advances.
pub struct RecordIter<R> {
    pairs: std::vec::IntoIter<KeyValue>,
    namespace: Namespace,
    _record: PhantomData<R>,
}

impl<R: Record> Iterator for RecordIter<R> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.pairs.next()?;
        Some(decode(self.namespace, &key, &value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}

fn decode<R: Record>(namespace: Namespace, key: &[u8], value: &[u8]) -> Result<R> {
    serde_json::from_slice(value).map_err(|source| {
        let id = String::from_utf8_lossy(&key[namespace.prefix().len().min(key.len())..]);
        StoreError::DeserializationFailed {
            namespace,
            id: id.into_owned(),
            source,
        }
        .into()
    })
}

impl RecordStore {
    /// Wraps an opened engine. The engine is released when the last clone is dropped.
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                backend,
                owner_locks: OwnerLocks::default(),
                admin_lock: Mutex::new(()),
            }),
        }
    }

    /// The engine underneath this store.
    pub fn backend(&self) -> &dyn Backend {
        self.inner.backend.as_ref()
    }

    // === Namespace layer ===

    /// Serializes `record` and writes it under `namespace`/`id`, replacing any previous value.
    pub fn put<R: Record>(&self, namespace: Namespace, id: &str, record: &R) -> Result<()> {
        let value = serde_json::to_vec(record)
            .map_err(|source| StoreError::SerializationFailed { namespace, source })?;
        self.backend().put(&namespace.key(id), &value)
    }

    /// Reads the record at `namespace`/`id`.
    ///
    /// # Errors
    /// `StoreError::NotFound` if the key is absent.
    pub fn get<R: Record>(&self, namespace: Namespace, id: &str) -> Result<R> {
        let key = namespace.key(id);
        let value = self.backend().get(&key).map_err(|e| {
            if e.is_not_found() {
                StoreError::NotFound {
                    namespace,
                    id: id.to_string(),
                }
                .into()
            } else {
                e
            }
        })?;
        decode(namespace, &key, &value)
    }

    /// Removes the record at `namespace`/`id`. Removing an absent record succeeds.
    pub fn delete(&self, namespace: Namespace, id: &str) -> Result<()> {
        self.backend().delete(&namespace.key(id))
    }

    /// Writes `record` under its own namespace and id.
    pub fn put_record<R: Record>(&self, record: &R) -> Result<()> {
        self.put(R::NAMESPACE, &record.record_id(), record)
    }

    /// Iterates every record of kind `R` in key order.
    pub fn scan<R: Record>(&self) -> Result<RecordIter<R>> {
        let pairs = self
            .backend()
            .scan_prefix(R::NAMESPACE.prefix().as_bytes())?;
        Ok(RecordIter {
            pairs: pairs.into_iter(),
            namespace: R::NAMESPACE,
            _record: PhantomData,
        })
    }

    /// Counts the records under `namespace` with a full scan.
    pub fn count(&self, namespace: Namespace) -> Result<usize> {
        Ok(self
            .backend()
            .scan_prefix(namespace.prefix().as_bytes())?
            .len())
    }

    // === Users ===

    /// Writes a full user record, replacing any existing record with the same name.
    pub fn create_user(&self, user: &User) -> Result<()> {
        self.update_user(user)
    }

    /// Overwrites the stored user with `user`, field for field.
    ///
    /// Runs under the owner's lock so it cannot interleave with an index update, but it
    /// still replaces the tab list with whatever `user.tabs` holds.
    ///
    /// # Errors
    /// `EmptyUserName` if `user.name` is empty.
    pub fn update_user(&self, user: &User) -> Result<()> {
        User::validate_name(&user.name)?;
        self.inner.owner_locks.with_owner(&user.name, || {
            debug!(user = %user.name, "writing user record");
            self.put_record(user)
        })
    }

    /// Writes `user` only if no user with that name exists.
    ///
    /// The existence check and the write happen under the owner's lock, so of two
    /// concurrent inserts for one name exactly one returns `true`.
    pub fn insert_user(&self, user: &User) -> Result<bool> {
        User::validate_name(&user.name)?;
        self.inner.owner_locks.with_owner(&user.name, || {
            match self.get_user(&user.name) {
                Ok(_) => return Ok(false),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
            self.put_record(user)?;
            Ok(true)
        })
    }

    /// Fetches a user by exact name.
    pub fn get_user(&self, name: &str) -> Result<User> {
        self.get(Namespace::Users, name)
    }

    /// All users, ordered by name bytes.
    pub fn get_users(&self) -> Result<Vec<User>> {
        self.scan::<User>()?.collect()
    }

    /// Number of user records.
    pub fn count_users(&self) -> Result<usize> {
        self.count(Namespace::Users)
    }

    /// Number of users with the admin flag set.
    pub fn count_admin_users(&self) -> Result<usize> {
        let mut admins = 0;
        for user in self.scan::<User>()? {
            if user?.admin {
                admins += 1;
            }
        }
        Ok(admins)
    }

    /// Sets the admin flag on an existing user, leaving every other field untouched.
    ///
    /// # Errors
    /// `LastAdmin` when clearing the flag on the only administrator.
    pub fn set_admin(&self, name: &str, value: bool) -> Result<()> {
        self.with_admin_lock(|| {
            self.inner.owner_locks.with_owner(name, || {
                let mut user = self.get_user(name)?;
                if !value {
                    self.ensure_not_last_admin(&user)?;
                }
                user.admin = value;
                self.put_record(&user)
            })
        })
    }

    /// Deletes a user and every tab listed in its index, then the user record itself.
    ///
    /// Tab deletions are individual engine writes; if one fails the error is returned
    /// immediately and the remaining tabs (and the user) are left in place.
    ///
    /// # Errors
    /// `LastAdmin` if `name` is the only administrator; nothing is deleted.
    pub fn remove_user(&self, name: &str) -> Result<()> {
        self.with_admin_lock(|| {
            self.inner.owner_locks.with_owner(name, || {
                let user = self.get_user(name)?;
                self.ensure_not_last_admin(&user)?;
                for id in &user.tabs {
                    self.delete(Namespace::Tabs, &id.to_string())?;
                }
                self.delete(Namespace::Users, name)?;
                debug!(user = %name, tabs = user.tabs.len(), "removed user");
                Ok(())
            })
        })
    }

    fn with_admin_lock<T>(&self, f: impl FnOnce() -> T) -> T {
        let _guard = self
            .inner
            .admin_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f()
    }

    /// Caller holds the admin lock.
    fn ensure_not_last_admin(&self, user: &User) -> Result<()> {
        if user.admin && self.count_admin_users()? <= 1 {
            return Err(StoreError::LastAdmin {
                name: user.name.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Read-modify-write of one user record under that user's lock.
    fn modify_user(&self, name: &str, change: impl FnOnce(&mut User)) -> Result<()> {
        self.inner
            .owner_locks
            .with_owner(name, || self.modify_user_locked(name, change))
    }

    /// Caller holds `name`'s lock.
    fn modify_user_locked(&self, name: &str, change: impl FnOnce(&mut User)) -> Result<()> {
        let mut user = self.get_user(name)?;
        change(&mut user);
        self.put_record(&user)
    }

    // === Owner index ===

    /// Appends `id` to `owner`'s tab list.
    pub fn add_tab_to_user(&self, owner: &str, id: TabId) -> Result<()> {
        self.modify_user(owner, |user| user.tabs.push(id))
    }

    /// Removes every occurrence of `id` from `owner`'s tab list.
    pub fn remove_tab_from_user(&self, owner: &str, id: TabId) -> Result<()> {
        self.modify_user(owner, |user| user.tabs.retain(|tab| *tab != id))
    }

    // === Tabs ===

    /// Records `tab` in its owner's index, then writes the tab itself.
    ///
    /// Both writes happen under the owner's lock. Fails with `NotFound` (and writes
    /// nothing) if the owner does not exist.
    pub fn create_tab(&self, tab: &Tab) -> Result<()> {
        self.inner.owner_locks.with_owner(&tab.owner, || {
            self.modify_user_locked(&tab.owner, |user| user.tabs.push(tab.id))?;
            self.put_record(tab)
        })?;
        debug!(tab = %tab.id, owner = %tab.owner, "created tab");
        Ok(())
    }

    /// Fetches a tab by id.
    pub fn get_tab(&self, id: TabId) -> Result<Tab> {
        self.get(Namespace::Tabs, &id.to_string())
    }

    /// Replaces the contents and visibility of an existing tab.
    ///
    /// # Errors
    /// - `NotFound` if no tab has this id (new tabs go through [`RecordStore::create_tab`])
    /// - `IdMismatch` if `tab.id` differs from `id`
    /// - `OwnerMismatch` if `tab.owner` differs from the stored owner
    pub fn set_tab(&self, id: TabId, tab: &Tab) -> Result<()> {
        if tab.id != id {
            return Err(StoreError::IdMismatch {
                addressed: id,
                carried: tab.id,
            }
            .into());
        }
        // A lying `tab.owner` takes the wrong lock, but then fails the owner check
        // below without writing.
        self.inner.owner_locks.with_owner(&tab.owner, || {
            let existing = self.get_tab(id)?;
            if existing.owner != tab.owner {
                return Err(StoreError::OwnerMismatch {
                    id,
                    owner: existing.owner,
                    attempted: tab.owner.clone(),
                }
                .into());
            }
            self.put_record(tab)
        })
    }

    /// Removes `tab` from its owner's index, then deletes the tab record, both under the
    /// owner's lock.
    pub fn remove_tab(&self, tab: &Tab) -> Result<()> {
        self.inner.owner_locks.with_owner(&tab.owner, || {
            self.modify_user_locked(&tab.owner, |user| user.tabs.retain(|t| *t != tab.id))?;
            self.delete(Namespace::Tabs, &tab.id.to_string())
        })?;
        debug!(tab = %tab.id, owner = %tab.owner, "removed tab");
        Ok(())
    }

    /// All tabs, ordered by id.
    pub fn get_tabs(&self) -> Result<Vec<Tab>> {
        self.scan::<Tab>()?.collect()
    }

    /// Tabs flagged public.
    pub fn get_public_tabs(&self) -> Result<Vec<Tab>> {
        let mut tabs = Vec::new();
        for tab in self.scan::<Tab>()? {
            let tab = tab?;
            if tab.public {
                tabs.push(tab);
            }
        }
        Ok(tabs)
    }

    /// Tabs listed in `user`'s index, in index order.
    ///
    /// Index entries whose tab record is missing are skipped.
    pub fn get_user_tabs(&self, user: &User) -> Result<Vec<Tab>> {
        let mut tabs = Vec::with_capacity(user.tabs.len());
        for id in &user.tabs {
            match self.get_tab(*id) {
                Ok(tab) => tabs.push(tab),
                Err(e) if e.is_not_found() => {
                    warn!(user = %user.name, tab = %id, "index references missing tab");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(tabs)
    }
}
