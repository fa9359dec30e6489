//! JSON merge helper for layered configuration.

use serde_json::Value;

/// Merge overlay values into the base; objects merge key by key, everything
/// else is replaced by the overlay.
pub(super) fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::merge_json_values;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_and_scalars_replace() {
        let mut base = json!({
            "request": { "timeout_ms": 1000, "headers": { "A": "1" } },
            "service": { "service_type": "urn:base" }
        });
        let overlay = json!({
            "request": { "headers": { "B": "2" } },
            "service": { "service_type": "urn:overlay" }
        });

        merge_json_values(&mut base, &overlay);

        assert_eq!(
            base,
            json!({
                "request": { "timeout_ms": 1000, "headers": { "A": "1", "B": "2" } },
                "service": { "service_type": "urn:overlay" }
            })
        );
    }
}
