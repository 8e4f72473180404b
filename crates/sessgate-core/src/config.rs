//! Raw authentication options.
//!
//! [`AuthOptions`] mirrors the options object accepted by the authenticator:
//! camelCase keys, `redirectTo` as a string or `false`, `appendNext` as a
//! boolean or a parameter name, and a nested `store` (alias `redis`) block.
//! Options can be deserialized from JSON, assembled with the typed builder,
//! or overlaid from environment variables before being validated into
//! [`Settings`].

use serde::{Deserialize, Serialize};
use tracing::warn;
use typed_builder::TypedBuilder;

use crate::error::{ConfigError, ConfigResult};
use crate::settings::{Settings, StoreSettings};

/// Default literal prefix in front of the signed token (`s:`).
pub const DEFAULT_COOKIE_VALUE_PREFIX: &str = "s:";
/// Default prefix joined to the session ID to form the store key.
pub const DEFAULT_SESSION_ID_PREFIX: &str = "sess:";
/// Default session field that must be truthy for a request to be accepted.
pub const DEFAULT_USER_PROP: &str = "user";
/// Default session store host.
pub const DEFAULT_STORE_HOST: &str = "127.0.0.1";
/// Default session store port.
pub const DEFAULT_STORE_PORT: u16 = 6379;
/// Query parameter used when `appendNext` is `true`.
pub const DEFAULT_NEXT_PARAM: &str = "next";

/// The `redirectTo` option: a URI, or `false` to disable redirects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RedirectTo {
    /// Only `false` is meaningful; `true` is rejected during validation.
    Flag(bool),
    /// Redirect rejected requests to this URI.
    Uri(String),
}

/// The `appendNext` option: a flag, or the name of the query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppendNext {
    /// `true` appends the request path as `next`, `false` disables it.
    Flag(bool),
    /// Append the request path under this parameter name.
    Param(String),
}

/// Connection options for the external session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StoreOptions {
    /// Store host name or address.
    #[builder(default = String::from(DEFAULT_STORE_HOST), setter(into))]
    #[serde(default = "default_store_host")]
    pub host: String,

    /// Store TCP port.
    #[builder(default = DEFAULT_STORE_PORT)]
    #[serde(default = "default_store_port")]
    pub port: u16,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            host: default_store_host(),
            port: default_store_port(),
        }
    }
}

/// Authentication options as supplied by the operator.
///
/// # Examples
///
/// ```
/// use sessgate_core::AuthOptions;
///
/// let settings = AuthOptions::builder()
///     .cookie_name("sid")
///     .secret("keyboard cat")
///     .build()
///     .validate()
///     .unwrap();
/// assert_eq!(settings.cookie_value_prefix(), "s:");
/// assert_eq!(settings.session_id_prefix(), "sess:");
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AuthOptions {
    /// Name of the cookie carrying the signed session ID.
    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    pub cookie_name: Option<String>,

    /// Literal prefix expected before the signed token.
    #[builder(default = String::from(DEFAULT_COOKIE_VALUE_PREFIX), setter(into))]
    #[serde(default = "default_cookie_value_prefix")]
    pub cookie_value_prefix: String,

    /// HMAC secret used to verify cookie signatures.
    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    pub secret: Option<String>,

    /// Prefix joined to the session ID to form the store key.
    #[builder(default = String::from(DEFAULT_SESSION_ID_PREFIX), setter(into))]
    #[serde(default = "default_session_id_prefix", rename = "sessionIDPrefix")]
    pub session_id_prefix: String,

    /// Session field whose truthy presence is required.
    #[builder(default = String::from(DEFAULT_USER_PROP), setter(into))]
    #[serde(default = "default_user_prop")]
    pub user_prop: String,

    /// Ask the caller to clear the cookie when its signature is invalid.
    #[builder(default)]
    #[serde(default)]
    pub clear_invalid: bool,

    /// Where to send rejected requests.
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub redirect_to: Option<RedirectTo>,

    /// Whether, and under which name, to append the request path to the redirect.
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub append_next: Option<AppendNext>,

    /// Session store connection.
    #[builder(default)]
    #[serde(default, alias = "redis")]
    pub store: StoreOptions,
}

impl std::fmt::Debug for AuthOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthOptions")
            .field("cookie_name", &self.cookie_name)
            .field("cookie_value_prefix", &self.cookie_value_prefix)
            .field("secret", &self.secret.as_ref().map(|_| "..."))
            .field("session_id_prefix", &self.session_id_prefix)
            .field("user_prop", &self.user_prop)
            .field("clear_invalid", &self.clear_invalid)
            .field("redirect_to", &self.redirect_to)
            .field("append_next", &self.append_next)
            .field("store", &self.store)
            .finish()
    }
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AuthOptions {
    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse options from a JSON file.
    pub fn from_file(path: &str) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load options from the environment.
    ///
    /// If `SESSGATE_CONFIG` names a JSON file it is loaded first; the
    /// variables below then override individual options.
    ///
    /// | Variable | Option |
    /// |----------|--------|
    /// | `SESSION_COOKIE_NAME` | `cookieName` |
    /// | `SESSION_SECRET` | `secret` |
    /// | `SESSION_COOKIE_PREFIX` | `cookieValuePrefix` |
    /// | `SESSION_ID_PREFIX` | `sessionIDPrefix` |
    /// | `SESSION_USER_PROP` | `userProp` |
    /// | `SESSION_CLEAR_INVALID` | `clearInvalid` |
    /// | `SESSION_REDIRECT_TO` | `redirectTo` |
    /// | `SESSION_APPEND_NEXT` | `appendNext` |
    /// | `REDIS_HOST` | `store.host` |
    /// | `REDIS_PORT` | `store.port` |
    pub fn from_env() -> ConfigResult<Self> {
        let mut options = match std::env::var("SESSGATE_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        options.apply_vars(|name| std::env::var(name).ok())?;
        Ok(options)
    }

    /// Overlay options from a variable lookup (see [`AuthOptions::from_env`]).
    pub fn apply_vars<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SESSION_COOKIE_NAME") {
            self.cookie_name = Some(v);
        }
        if let Some(v) = lookup("SESSION_SECRET") {
            self.secret = Some(v);
        }
        if let Some(v) = lookup("SESSION_COOKIE_PREFIX") {
            self.cookie_value_prefix = v;
        }
        if let Some(v) = lookup("SESSION_ID_PREFIX") {
            self.session_id_prefix = v;
        }
        if let Some(v) = lookup("SESSION_USER_PROP") {
            self.user_prop = v;
        }
        if let Some(v) = lookup("SESSION_CLEAR_INVALID") {
            self.clear_invalid = parse_bool(&v);
        }
        if let Some(v) = lookup("SESSION_REDIRECT_TO") {
            self.redirect_to = Some(if v.is_empty() || v.eq_ignore_ascii_case("false") {
                RedirectTo::Flag(false)
            } else {
                RedirectTo::Uri(v)
            });
        }
        if let Some(v) = lookup("SESSION_APPEND_NEXT") {
            self.append_next = Some(if v.is_empty() || v == "0" || v.eq_ignore_ascii_case("false")
            {
                AppendNext::Flag(false)
            } else if parse_bool(&v) {
                AppendNext::Flag(true)
            } else {
                AppendNext::Param(v)
            });
        }
        if let Some(v) = lookup("REDIS_HOST") {
            self.store.host = v;
        }
        if let Some(v) = lookup("REDIS_PORT") {
            self.store.port = v
                .parse()
                .map_err(|_| ConfigError::invalid("store.port", format!("not a port: {v}")))?;
        }
        Ok(())
    }

    /// Validate the options and resolve them into immutable [`Settings`].
    pub fn validate(self) -> ConfigResult<Settings> {
        let cookie_name = require("cookieName", self.cookie_name)?;
        if !is_cookie_token(&cookie_name) {
            return Err(ConfigError::invalid(
                "cookieName",
                format!("{cookie_name:?} is not a valid cookie name"),
            ));
        }

        let secret = require("secret", self.secret)?;
        non_empty("cookieValuePrefix", &self.cookie_value_prefix)?;
        non_empty("sessionIDPrefix", &self.session_id_prefix)?;
        non_empty("userProp", &self.user_prop)?;

        let redirect_to = match self.redirect_to {
            None | Some(RedirectTo::Flag(false)) => None,
            Some(RedirectTo::Flag(true)) => {
                return Err(ConfigError::invalid(
                    "redirectTo",
                    "must be a URI or false",
                ));
            }
            Some(RedirectTo::Uri(uri)) => {
                if uri.is_empty() || !uri.bytes().all(|b| b.is_ascii_graphic()) {
                    return Err(ConfigError::invalid(
                        "redirectTo",
                        format!("{uri:?} is not a usable redirect URI"),
                    ));
                }
                Some(uri)
            }
        };

        let append_next = match self.append_next {
            None | Some(AppendNext::Flag(false)) => None,
            Some(AppendNext::Flag(true)) => Some(DEFAULT_NEXT_PARAM.to_owned()),
            Some(AppendNext::Param(param)) if param.is_empty() => None,
            Some(AppendNext::Param(param)) => {
                if !param
                    .bytes()
                    .all(|b| b.is_ascii_graphic() && !b"&=#?".contains(&b))
                {
                    return Err(ConfigError::invalid(
                        "appendNext",
                        format!("{param:?} is not a usable query parameter name"),
                    ));
                }
                Some(param)
            }
        };

        if append_next.is_some() && redirect_to.is_none() {
            warn!("appendNext is set but redirectTo is not; it will have no effect");
        }

        non_empty("store.host", &self.store.host)?;
        if self.store.port == 0 {
            return Err(ConfigError::invalid("store.port", "must be between 1 and 65535"));
        }

        Ok(Settings {
            cookie_name,
            cookie_value_prefix: self.cookie_value_prefix,
            secret,
            session_id_prefix: self.session_id_prefix,
            user_prop: self.user_prop,
            clear_invalid: self.clear_invalid,
            redirect_to,
            append_next,
            store: StoreSettings {
                host: self.store.host,
                port: self.store.port,
            },
        })
    }
}

fn require(option: &'static str, value: Option<String>) -> ConfigResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingOption(option)),
    }
}

fn non_empty(option: &'static str, value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(ConfigError::invalid(option, "must not be empty"));
    }
    Ok(())
}

/// RFC 6265 cookie-name token: visible ASCII minus separators.
fn is_cookie_token(name: &str) -> bool {
    const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={}";
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !SEPARATORS.contains(&b))
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn default_cookie_value_prefix() -> String {
    DEFAULT_COOKIE_VALUE_PREFIX.to_owned()
}

fn default_session_id_prefix() -> String {
    DEFAULT_SESSION_ID_PREFIX.to_owned()
}

fn default_user_prop() -> String {
    DEFAULT_USER_PROP.to_owned()
}

fn default_store_host() -> String {
    DEFAULT_STORE_HOST.to_owned()
}

fn default_store_port() -> u16 {
    DEFAULT_STORE_PORT
}
