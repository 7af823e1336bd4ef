//! Client-side identity token decoding.
//!
//! Decoding here is for display only. The signature is not checked; token
//! validation belongs to the identity provider and the backend, and no
//! authorization decision may rest on these claims.

use crate::domain::error::{MarketdirError, Result};
use crate::domain::UserProfile;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Decodes the claims of a compact JWS (`header.payload.signature`).
///
/// Padding on the payload segment is tolerated.
///
/// # Errors
///
/// Returns [`MarketdirError::InvalidToken`] if the token does not have three
/// segments, the payload is not base64url, or the claims lack `sub`.
///
/// # Examples
///
/// ```
/// use base64::Engine;
/// use base64::engine::general_purpose::URL_SAFE_NO_PAD;
/// use marketdir::session::decode_id_token;
///
/// let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"auth0|1","name":"Ada"}"#);
/// let token = format!("e30.{payload}.sig");
/// let user = decode_id_token(&token)?;
/// assert_eq!(user.id, "auth0|1");
/// # Ok::<(), marketdir::MarketdirError>(())
/// ```
pub fn decode_id_token(id_token: &str) -> Result<UserProfile> {
    let mut segments = id_token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(MarketdirError::InvalidToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| MarketdirError::InvalidToken(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| MarketdirError::InvalidToken(format!("malformed claims: {e}")))
}
