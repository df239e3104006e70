use serde::Serialize;
use serde_json::{Map, Value};
use sha1::{Digest, Sha1};

/// Raised when a value has no JSON form to hash.
pub type HashError = serde_json::Error;

/// SHA-1 (lowercase hex) of the canonical JSON form of `value`.
///
/// Object keys are sorted at every depth before hashing, so two values that
/// only differ in map iteration order hash identically.
pub fn content_hash<T: Serialize + ?Sized>(value: &T) -> Result<String, HashError> {
    let canonical = canonicalize(serde_json::to_value(value)?);

    let mut hasher = Sha1::new();
    hasher.update(canonical.to_string().as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, canonicalize(value)))
                    .collect::<Map<_, _>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::content_hash;
    use serde_json::json;

    #[test]
    fn key_order_does_not_change_hash() {
        let a = json!({"b": 1, "a": {"y": [1, 2], "x": null}});
        let b = json!({"a": {"x": null, "y": [1, 2]}, "b": 1});
        assert_eq!(content_hash(&a).expect("hash"), content_hash(&b).expect("hash"));
    }

    #[test]
    fn array_order_changes_hash() {
        assert_ne!(
            content_hash(&json!([1, 2])).expect("hash"),
            content_hash(&json!([2, 1])).expect("hash")
        );
    }

    #[test]
    fn hash_is_sha1_hex() {
        let hash = content_hash(&json!({})).expect("hash");
        assert_eq!(hash.len(), 40);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
