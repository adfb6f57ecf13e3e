use serde_json::Value;

/// Lowercase runtime type name of a JSON value: `null`, `boolean`,
/// `number`, `string`, `array` or `object`.
pub fn type_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arrays_are_not_objects() {
        assert_eq!(type_of(&json!([])), "array");
        assert_eq!(type_of(&json!({})), "object");
        assert_eq!(type_of(&json!(null)), "null");
        assert_eq!(type_of(&json!(1.5)), "number");
    }
}
