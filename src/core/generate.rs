//! # Generate
//!
//! Generate random strings for use as session ids, authorization codes, and
//! access tokens.

use base64ct::{Base64UrlUnpadded, Encoding};
use uuid::Uuid;

/// Generates a new session id.
#[must_use]
pub fn session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a base64url encoded random string for authorization code.
#[must_use]
pub fn auth_code() -> String {
    random_string()
}

/// Generates a base64url encoded random string for access token.
#[must_use]
pub fn token() -> String {
    random_string()
}

// 32 bytes from the OS random source, URL-safe without padding.
fn random_string() -> String {
    let mut buf = [0u8; 32];
    buf[..16].copy_from_slice(Uuid::new_v4().as_bytes());
    buf[16..].copy_from_slice(Uuid::new_v4().as_bytes());
    Base64UrlUnpadded::encode_string(&buf)
}
