/// Parse query parameters into a struct.
pub fn parse_query<T: Default + serde::de::DeserializeOwned>(
    query: &std::collections::HashMap<String, String>,
) -> T {
    let json_value =
        serde_json::to_value(query).unwrap_or(serde_json::Value::Object(Default::default()));
    serde_json::from_value(json_value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Default, Deserialize)]
    struct Query {
        #[serde(rename = "organizationId")]
        organization_id: Option<String>,
    }

    #[test]
    fn parses_present_keys_and_ignores_extras() {
        let mut raw = HashMap::new();
        raw.insert("organizationId".to_string(), "org-1".to_string());
        raw.insert("unrelated".to_string(), "x".to_string());

        let query: Query = parse_query(&raw);
        assert_eq!(query.organization_id.as_deref(), Some("org-1"));
    }

    #[test]
    fn missing_keys_fall_back_to_default() {
        let query: Query = parse_query(&HashMap::new());
        assert!(query.organization_id.is_none());
    }
}
