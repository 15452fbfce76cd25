//! Authentication for Tabkeep
//!
//! Password login, account administration and signed session tokens.
//! [`LoginManager`] is the single entry point; it reaches storage only through the
//! [`RecordStore`](crate::store::RecordStore).

pub mod config;
pub mod crypto;
pub mod errors;
mod login;
pub mod token;
pub mod types;

pub use config::{HashParams, LoginConfig};
pub use errors::AuthError;
pub use login::LoginManager;
pub use token::{Claims, SessionKey};
pub use types::{NewUser, SessionUser, TokenUser};
