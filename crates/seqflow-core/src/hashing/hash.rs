//! Hash helpers sobre blake3.

use blake3::Hasher;
use serde_json::Value;

use super::to_canonical_json;

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hashea la forma canónica de un valor JSON.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_value_ignores_key_order() {
        let h1 = hash_value(&json!({"b": 2, "a": 1}));
        let h2 = hash_value(&json!({"a": 1, "b": 2}));
        assert_eq!(h1.len(), 64);
        assert_eq!(h1, h2);
    }
}
