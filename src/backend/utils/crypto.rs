// src/backend/utils/crypto.rs
use crate::models::common::TimestampNs;
use candid::Principal;
use sha2::{Digest, Sha256};
use std::cell::Cell;

const ID_HEX_LEN: usize = 20;
const SLUG_SUFFIX_LEN: usize = 6;

thread_local! {
    // Disambiguates ids minted within the same nanosecond. Cleared on upgrade,
    // which is fine because the timestamp moves on.
    static ID_COUNTER: Cell<u64> = const { Cell::new(0) };
}

/// Derives a unique hex id for `namespace` ("page", "media", ...).
pub fn generate_id(namespace: &str, principal: &Principal, now: TimestampNs) -> String {
    let counter = ID_COUNTER.with(|c| {
        let next = c.get().wrapping_add(1);
        c.set(next);
        next
    });
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(principal.as_slice());
    hasher.update(now.to_le_bytes());
    hasher.update(counter.to_le_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(ID_HEX_LEN);
    id
}

/// Human-readable slug: the name's words joined by '-', plus a short id suffix.
pub fn slugify(name: &str, page_id: &str) -> String {
    let words: Vec<String> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();
    let base = if words.is_empty() {
        "memorial".to_string()
    } else {
        words.join("-")
    };
    let suffix: String = page_id.chars().take(SLUG_SUFFIX_LEN).collect();
    format!("{}-{}", base, suffix)
}
