// ABOUTME: Shared utility functions for Reqflow
// ABOUTME: Prefixed ID generation and serde helpers for partial updates

use rand::Rng;
use serde::{Deserialize, Deserializer};

const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of the random part of generated IDs
pub const ID_LENGTH: usize = 8;

/// Generate an 8-character alphanumeric ID
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Generate an ID with a type prefix, e.g. `req-3fK9a0Qz`
pub fn generate_prefixed_id(prefix: &str) -> String {
    format!("{}-{}", prefix, generate_id())
}

/// Deserialize a present field (including `null`) as `Some(..)`.
///
/// Paired with `#[serde(default)]` so an absent field stays `None` and an
/// explicit `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
