//! URL-safe slug generation for shareable wishlist links.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

/// Number of random bytes per slug. 8 bytes yields an 11-character
/// base64url string, enough entropy for unguessable share links.
const SLUG_BYTES: usize = 8;

/// Generates a random URL-safe slug.
pub fn generate_slug() -> String {
    let mut bytes = [0u8; SLUG_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
