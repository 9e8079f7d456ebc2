//! Opaque credential handle passed explicitly into every fetcher call

use std::fmt;

/// OAuth access token supplied by the calling session
///
/// The engine never refreshes or inspects it. `Debug` is redacted so the
/// token cannot leak through log fields.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
}

impl Credential {
    pub fn new<S: Into<String>>(access_token: S) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// Value for an `Authorization: Bearer` header
    pub fn bearer_token(&self) -> &str {
        &self.access_token
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
