//! Hashing primitives for Proofchain.
//!
//! Block hashes are SHA-256 over a canonical JSON encoding of the block: object
//! keys are emitted in sorted order at every nesting level, with no whitespace.
//! Two blocks with the same logical content always hash the same, whatever
//! order their fields happen to be in.

use crate::blockchain::Block;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Canonical digest of a block. Pure and lock-free.
pub fn hash_block(block: &Block) -> String {
    sha256_hex(canonical_json(block).as_bytes())
}

/// Serializes `value` into JSON with sorted object keys.
pub fn canonical_json<T: Serialize>(value: &T) -> String {
    // Serializing plain structs and vectors into a Value cannot fail.
    let value = serde_json::to_value(value).unwrap_or(Value::Null);
    let mut out = String::new();
    write_canonical(&value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(val, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
