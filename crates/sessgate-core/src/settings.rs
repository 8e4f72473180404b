//! Validated, immutable authenticator settings.

/// Settings resolved once at startup by [`AuthOptions::validate`](crate::AuthOptions::validate).
///
/// There is no way to construct or mutate a `Settings` other than through
/// validation, so holders can share it behind an `Arc` for the life of the
/// process.
#[derive(Clone)]
pub struct Settings {
    pub(crate) cookie_name: String,
    pub(crate) cookie_value_prefix: String,
    pub(crate) secret: String,
    pub(crate) session_id_prefix: String,
    pub(crate) user_prop: String,
    pub(crate) clear_invalid: bool,
    pub(crate) redirect_to: Option<String>,
    pub(crate) append_next: Option<String>,
    pub(crate) store: StoreSettings,
}

impl Settings {
    /// Name of the cookie carrying the signed session ID.
    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Literal prefix expected before the signed token.
    #[must_use]
    pub fn cookie_value_prefix(&self) -> &str {
        &self.cookie_value_prefix
    }

    /// HMAC secret for signature verification.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Prefix joined to the session ID to form the store key.
    #[must_use]
    pub fn session_id_prefix(&self) -> &str {
        &self.session_id_prefix
    }

    /// Session field that must be truthy.
    #[must_use]
    pub fn user_prop(&self) -> &str {
        &self.user_prop
    }

    /// Whether an invalid signature should clear the cookie.
    #[must_use]
    pub fn clear_invalid(&self) -> bool {
        self.clear_invalid
    }

    /// Redirect target for rejected requests, if any.
    #[must_use]
    pub fn redirect_to(&self) -> Option<&str> {
        self.redirect_to.as_deref()
    }

    /// Query parameter name carrying the original path, if enabled.
    #[must_use]
    pub fn append_next(&self) -> Option<&str> {
        self.append_next.as_deref()
    }

    /// Session store connection settings.
    #[must_use]
    pub fn store(&self) -> &StoreSettings {
        &self.store
    }

    /// The store key for a session ID.
    ///
    /// ```
    /// use sessgate_core::AuthOptions;
    ///
    /// let settings = AuthOptions::builder()
    ///     .cookie_name("sid")
    ///     .secret("abc")
    ///     .build()
    ///     .validate()
    ///     .unwrap();
    /// assert_eq!(settings.session_key("xyz123"), "sess:xyz123");
    /// ```
    #[must_use]
    pub fn session_key(&self, session_id: &str) -> String {
        format!("{}{session_id}", self.session_id_prefix)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("cookie_name", &self.cookie_name)
            .field("cookie_value_prefix", &self.cookie_value_prefix)
            .field("secret", &"...")
            .field("session_id_prefix", &self.session_id_prefix)
            .field("user_prop", &self.user_prop)
            .field("clear_invalid", &self.clear_invalid)
            .field("redirect_to", &self.redirect_to)
            .field("append_next", &self.append_next)
            .field("store", &self.store)
            .finish()
    }
}

/// Validated session store connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub(crate) host: String,
    pub(crate) port: u16,
}

impl StoreSettings {
    /// Store host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Store port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Connection URL in `redis://host:port/` form.
    #[must_use]
    pub fn url(&self) -> String {
        if self.host.contains(':') {
            format!("redis://[{}]:{}/", self.host, self.port)
        } else {
            format!("redis://{}:{}/", self.host, self.port)
        }
    }
}
