//! Packing access tokens
//!
//! 32 bytes from the OS RNG, hex encoded. Opaque to the client; expiry and
//! consumption live on the assignment row.

use rand::RngCore;
use rand::rngs::OsRng;

const TOKEN_BYTES: usize = 32;

pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
