//! Options, validated settings, and configuration errors for Sessgate.
//!
//! Raw [`AuthOptions`] come from JSON, the environment, or the typed builder.
//! [`AuthOptions::validate`] turns them into immutable [`Settings`] once at
//! startup; any problem is a [`ConfigError`] and never reaches request time.

mod config;
mod error;
mod settings;

pub use config::{
    AppendNext, AuthOptions, DEFAULT_COOKIE_VALUE_PREFIX, DEFAULT_NEXT_PARAM,
    DEFAULT_SESSION_ID_PREFIX, DEFAULT_STORE_HOST, DEFAULT_STORE_PORT, DEFAULT_USER_PROP,
    RedirectTo, StoreOptions,
};
pub use error::{ConfigError, ConfigResult};
pub use settings::{Settings, StoreSettings};
