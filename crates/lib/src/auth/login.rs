//! Login manager: credentials, accounts and session tokens.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::config::LoginConfig;
use super::crypto::{generate_password, hash_password, verify_password};
use super::errors::AuthError;
use super::token::{Claims, SessionKey};
use super::types::{NewUser, SessionUser, TokenUser};
use crate::Result;
use crate::clock::{Clock, SystemClock};
use crate::constants::MIN_PASSWORD_LENGTH;
use crate::store::{RecordStore, User};

fn check_password_length(password: &str) -> std::result::Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Authentication front door over a [`RecordStore`].
///
/// Owns the session signing key. Password hashing and verification are deliberately
/// CPU-expensive and block the calling thread; call from threads that can afford to block.
#[derive(Debug)]
pub struct LoginManager {
    store: RecordStore,
    key: SessionKey,
    clock: Arc<dyn Clock>,
    config: LoginConfig,
}

impl LoginManager {
    /// Creates a login manager, bootstrapping an administrator if the store has no users.
    ///
    /// On an empty store one account named `config.admin_name` is created with admin rights
    /// and a random password. That password is logged once at `warn` level and is not
    /// retrievable afterwards.
    pub fn new(
        store: RecordStore,
        key: SessionKey,
        clock: Arc<dyn Clock>,
        config: LoginConfig,
    ) -> Result<Self> {
        config.validate()?;
        let manager = Self {
            store,
            key,
            clock,
            config,
        };
        manager.bootstrap()?;
        Ok(manager)
    }

    /// [`LoginManager::new`] with a fresh in-memory key, the system clock and default settings.
    pub fn open(store: RecordStore) -> Result<Self> {
        Self::new(
            store,
            SessionKey::generate(),
            Arc::new(SystemClock),
            LoginConfig::default(),
        )
    }

    fn bootstrap(&self) -> Result<()> {
        if self.store.count_users()? != 0 {
            return Ok(());
        }

        let password =
            generate_password(self.config.password_length, &self.config.password_charset)?;
        let admin = NewUser::new(self.config.admin_name.as_str(), password.as_str(), true);
        self.create_user(&admin)?;

        warn!(
            name = %admin.name,
            password = %password.as_str(),
            "created initial administrator account"
        );
        Ok(())
    }

    /// The store this manager reads and writes.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The active settings.
    pub fn config(&self) -> &LoginConfig {
        &self.config
    }

    /// Public half of the session signing key.
    pub fn verifying_key(&self) -> ed25519_dalek::VerifyingKey {
        self.key.verifying_key()
    }

    /// Checks `password` against the stored hash for `name`.
    ///
    /// # Errors
    /// `AuthenticationFailed` both for an unknown name and for a wrong password. Engine
    /// failures are returned as they are.
    pub fn log_in(&self, name: &str, password: &str) -> Result<SessionUser> {
        let user = match self.store.get_user(name) {
            Ok(user) => user,
            Err(e) if e.is_not_found() => {
                debug!(user = %name, "login for unknown user");
                return Err(AuthError::AuthenticationFailed.into());
            }
            Err(e) => return Err(e),
        };

        match verify_password(password, &user.password_hash) {
            Ok(()) => {
                debug!(user = %name, "login succeeded");
                Ok(SessionUser::from(&user))
            }
            Err(AuthError::MalformedHash { reason }) => {
                warn!(user = %name, %reason, "stored password hash is unreadable");
                Err(AuthError::AuthenticationFailed.into())
            }
            Err(e) => {
                debug!(user = %name, "login with wrong password");
                Err(e.into())
            }
        }
    }

    /// Registers a new account.
    ///
    /// # Returns
    /// `true` if an account with that name already exists; nothing is changed in that case,
    /// in particular the existing password is kept. `false` once the new account is stored.
    ///
    /// # Errors
    /// `EmptyUserName` or `PasswordTooShort` before anything is read or hashed.
    pub fn create_user(&self, user: &NewUser) -> Result<bool> {
        User::validate_name(&user.name)?;
        check_password_length(&user.password)?;
        match self.store.get_user(&user.name) {
            Ok(_) => return Ok(true),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let record = User {
            name: user.name.clone(),
            password_hash: hash_password(&user.password, self.config.hash_params)?,
            admin: user.admin,
            tabs: Vec::new(),
        };

        // Someone may have registered the name while we were hashing.
        if !self.store.insert_user(&record)? {
            return Ok(true);
        }
        info!(user = %record.name, admin = record.admin, "created user");
        Ok(false)
    }

    /// Like [`LoginManager::create_user`] but reports an existing name as a conflict.
    pub fn register(&self, user: &NewUser) -> Result<()> {
        if self.create_user(user)? {
            return Err(AuthError::UserAlreadyExists {
                name: user.name.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Re-hashes `new_password` and overwrites the whole record with `user`'s fields.
    ///
    /// `user` must be the current record: any field it lacks (for example a tab added
    /// since it was read) is lost by the overwrite.
    ///
    /// # Errors
    /// `PasswordTooShort` if `new_password` has fewer than 8 characters.
    pub fn change_password(&self, user: &User, new_password: &str) -> Result<()> {
        check_password_length(new_password)?;
        let updated = User {
            password_hash: hash_password(new_password, self.config.hash_params)?,
            ..user.clone()
        };
        self.store.update_user(&updated)?;
        info!(user = %updated.name, "changed password");
        Ok(())
    }

    /// Sets or clears the admin flag on an existing account.
    ///
    /// # Errors
    /// `LastAdmin` when clearing the flag on the only administrator.
    pub fn set_admin(&self, name: &str, value: bool) -> Result<()> {
        self.store.set_admin(name, value)?;
        info!(user = %name, admin = value, "changed admin flag");
        Ok(())
    }

    /// [`LoginManager::set_admin`] on behalf of `actor`.
    ///
    /// # Errors
    /// - `PermissionDenied` unless `actor` is an administrator
    /// - `OwnAdminFlag` if `actor` targets their own account
    pub fn set_admin_by(&self, actor: &User, name: &str, value: bool) -> Result<()> {
        if !actor.admin {
            return Err(AuthError::PermissionDenied {
                reason: "only administrators can change admin status".to_string(),
            }
            .into());
        }
        if actor.name == name {
            return Err(AuthError::OwnAdminFlag {
                name: actor.name.clone(),
            }
            .into());
        }
        self.set_admin(name, value)
    }

    /// Deletes an account and every tab it owns.
    ///
    /// # Errors
    /// `LastAdmin` if `name` is the only administrator.
    pub fn remove_user(&self, name: &str) -> Result<()> {
        self.store.remove_user(name)?;
        info!(user = %name, "removed user");
        Ok(())
    }

    /// [`LoginManager::remove_user`] on behalf of `actor`, who must be an administrator
    /// or the account being removed.
    pub fn remove_user_by(&self, actor: &User, name: &str) -> Result<()> {
        if !actor.admin && actor.name != name {
            return Err(AuthError::PermissionDenied {
                reason: "only administrators can remove other users".to_string(),
            }
            .into());
        }
        self.remove_user(name)
    }

    /// Issues a signed token for `user`, valid for the configured lifetime from now.
    pub fn new_assertion(&self, user: &SessionUser) -> Result<String> {
        let now = self.clock.now_secs();
        let exp = now
            .checked_add(self.config.token_ttl_secs)
            .ok_or_else(|| AuthError::InvalidConfig {
                reason: "token expiry overflows".to_string(),
            })?;
        let claims = Claims {
            sub: user.name.clone(),
            iat: now,
            exp,
            user: user.clone(),
        };
        Ok(self.key.sign(&claims)?)
    }

    /// Issues a token and returns it together with the descriptor it asserts.
    pub fn new_token_user(&self, user: SessionUser) -> Result<TokenUser> {
        let token = self.new_assertion(&user)?;
        Ok(TokenUser { user, token })
    }

    /// Verifies `token` and returns the subject's *current* record.
    ///
    /// The descriptor embedded in the token is not trusted: the user is re-read from the
    /// store, so revoked admin rights apply at once and a deleted user's tokens stop working.
    ///
    /// # Errors
    /// `AuthenticationFailed` for a bad signature, a malformed or expired token, or a
    /// subject that no longer exists. Engine failures are returned as they are.
    pub fn decode_assertion(&self, token: &str) -> Result<User> {
        let claims = match self.key.verify(token, self.clock.now_secs()) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(reason = %e, "rejected session token");
                return Err(AuthError::AuthenticationFailed.into());
            }
        };

        match self.store.get_user(&claims.sub) {
            Ok(user) => Ok(user),
            Err(e) if e.is_not_found() => {
                debug!(user = %claims.sub, "session token for deleted user");
                Err(AuthError::AuthenticationFailed.into())
            }
            Err(e) => Err(e),
        }
    }
}
