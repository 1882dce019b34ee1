// ABOUTME: Lookups into structured API payloads whose nesting varies between responses.
// ABOUTME: Each field is an ordered list of JSON pointers; the first present value wins.

use serde_json::Value;

/// Returns the first pointer target that exists and is not null.
pub fn first_value<'a>(value: &'a Value, pointers: &[&str]) -> Option<&'a Value> {
    pointers
        .iter()
        .filter_map(|p| value.pointer(p))
        .find(|v| !v.is_null())
}

/// Returns the first pointer target that is a non-empty string, trimmed.
pub fn first_str(value: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|p| {
        value
            .pointer(p)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Returns the first pointer target that is an array, as its non-empty strings.
pub fn first_str_list(value: &Value, pointers: &[&str]) -> Option<Vec<String>> {
    let list = pointers
        .iter()
        .find_map(|p| value.pointer(p).and_then(Value::as_array))?;
    let items: Vec<String> = list
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn first_value_tries_nested_then_flat() {
        let nested = json!({"data": {"video": {"title": "a"}}});
        let flat = json!({"video": {"title": "b"}});
        let pointers = ["/data/video", "/video"];

        assert_eq!(first_value(&nested, &pointers).unwrap()["title"], "a");
        assert_eq!(first_value(&flat, &pointers).unwrap()["title"], "b");
        assert!(first_value(&json!({}), &pointers).is_none());
    }

    #[test]
    fn first_value_skips_null() {
        let value = json!({"data": {"video": null}, "video": {"id": 1}});
        assert_eq!(
            first_value(&value, &["/data/video", "/video"]).unwrap()["id"],
            1
        );
    }

    #[test]
    fn first_str_handles_list_or_scalar() {
        let pointers = ["/creator/0", "/creator", "/uploader"];
        assert_eq!(
            first_str(&json!({"creator": ["wombatpmv", "other"]}), &pointers),
            Some("wombatpmv".to_string())
        );
        assert_eq!(
            first_str(&json!({"creator": "solo"}), &pointers),
            Some("solo".to_string())
        );
        assert_eq!(
            first_str(&json!({"creator": [], "uploader": " up "}), &pointers),
            Some("up".to_string())
        );
        assert_eq!(first_str(&json!({"creator": 5}), &pointers), None);
    }

    #[test]
    fn first_str_list_filters_non_strings() {
        let value = json!({"tags": ["pmv", 3, "", "music"]});
        assert_eq!(
            first_str_list(&value, &["/tags"]),
            Some(vec!["pmv".to_string(), "music".to_string()])
        );
        assert_eq!(first_str_list(&json!({"tags": []}), &["/tags"]), None);
        assert_eq!(first_str_list(&json!({}), &["/tags"]), None);
    }
}
