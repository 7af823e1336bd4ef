//! Identity claims of the signed-in user.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims decoded from an identity assertion.
///
/// `id` is read from the standard `sub` claim when decoding a token and written
/// back as `id` when persisted. Claims without a dedicated field are kept in
/// `claims` so nothing the provider sends is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "sub")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl UserProfile {
    /// Returns the best available display label: name, then email, then id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }

    /// Looks up an extra claim by name.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }
}
