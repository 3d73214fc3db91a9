use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;

/// Trait for types that can be used as OpenAI structured output.
///
/// Automatically implemented for any type that is `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate an OpenAI-compatible JSON schema for this type.
    ///
    /// Strict mode requires `additionalProperties: false` on every object,
    /// all properties listed as `required`, and no `$ref` indirection.
    fn openai_schema() -> serde_json::Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        let definitions = value.get("definitions").cloned();
        rewrite_for_strict_mode(&mut value, definitions.as_ref());

        if let serde_json::Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        value
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Single recursive pass: inline `$ref`s, collapse single-entry `allOf`,
/// force `additionalProperties: false` and full `required` lists.
fn rewrite_for_strict_mode(
    value: &mut serde_json::Value,
    definitions: Option<&serde_json::Value>,
) {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.and_then(|d| d.get(name)) {
                        *value = def.clone();
                        rewrite_for_strict_mode(value, definitions);
                        return;
                    }
                }
            }

            if let Some(serde_json::Value::Array(all_of)) = map.get("allOf").cloned() {
                if all_of.len() == 1 {
                    *value = all_of.into_iter().next().unwrap_or_default();
                    rewrite_for_strict_mode(value, definitions);
                    return;
                }
            }

            if map.get("type") == Some(&serde_json::Value::String("object".to_string())) {
                map.insert(
                    "additionalProperties".to_string(),
                    serde_json::Value::Bool(false),
                );

                if let Some(serde_json::Value::Object(props)) = map.get("properties") {
                    let all_keys: Vec<serde_json::Value> = props
                        .keys()
                        .map(|k| serde_json::Value::String(k.clone()))
                        .collect();
                    map.insert("required".to_string(), serde_json::Value::Array(all_keys));
                }
            }

            for (_, v) in map.iter_mut() {
                rewrite_for_strict_mode(v, definitions);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                rewrite_for_strict_mode(item, definitions);
            }
        }
        _ => {}
    }
}
