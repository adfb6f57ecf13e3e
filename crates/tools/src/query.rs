use serde_json::Value;

const SEPARATOR: &str = "?.";

fn step<'a>(current: &'a Value, key: &str) -> Option<&'a Value> {
    match current {
        Value::Null => Some(current),
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Follow a `a?.b?.c` path through nested objects.
///
/// A non-object root is returned as is. A missing key yields `None`; a
/// `null` met along the way short-circuits and is returned.
pub fn query_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if !value.is_object() {
        return Some(value);
    }
    path.split(SEPARATOR)
        .try_fold(value, |current, key| step(current, key))
}

/// Optional chaining over objects and arrays.
///
/// Unlike [`query_path`], only containers can be chained into: any other
/// root yields `None`. Call segments such as `()` never resolve, since JSON
/// holds no functions.
pub fn opt_chain<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if !matches!(value, Value::Object(_) | Value::Array(_)) {
        return None;
    }
    path.split(SEPARATOR).try_fold(value, |current, key| {
        if key.starts_with('(') && !current.is_null() {
            return None;
        }
        step(current, key)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_path_walks_objects() {
        let v = json!({"a": {"b": {"c": 1}}, "n": null, "list": [10, 20]});
        assert_eq!(query_path(&v, "a?.b?.c"), Some(&json!(1)));
        assert_eq!(query_path(&v, "a?.x?.c"), None);
        assert_eq!(query_path(&v, "n?.deep"), Some(&Value::Null));
        assert_eq!(query_path(&v, "list?.1"), Some(&json!(20)));
    }

    #[test]
    fn query_path_passes_through_non_objects() {
        let v = json!("plain");
        assert_eq!(query_path(&v, "a?.b"), Some(&v));
    }

    #[test]
    fn opt_chain_rejects_scalars_and_calls() {
        assert_eq!(opt_chain(&json!(true), "a"), None);
        assert_eq!(opt_chain(&json!(5), "a"), None);

        let v = json!({"f": {"g": 2}});
        assert_eq!(opt_chain(&v, "f?.g"), Some(&json!(2)));
        assert_eq!(opt_chain(&v, "f?.()"), None);
        assert_eq!(opt_chain(&json!([{"k": "v"}]), "0?.k"), Some(&json!("v")));
    }
}
