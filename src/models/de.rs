// src/models/de.rs
// DOCUMENTATION: Lenient deserializers for form-style JSON bodies
// PURPOSE: Admin panels post "" for empty references and single strings for tag lists

use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// Accept a UUID, null, or "" (treated as absent)
pub fn optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid id: {}", s))),
    }
}

/// Query-string value parsed with `FromStr`; `?state=` and `?page=` read as absent
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid value {}: {}", s, e))),
    }
}

/// Accept either a single string or an array of strings
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let raw: Option<OneOrMany> = Option::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        OneOrMany::One(s) if s.trim().is_empty() => Vec::new(),
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    }))
}

/// Trimmed, non-empty string or None
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Query;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "optional_uuid")]
        id: Option<Uuid>,
        #[serde(default, deserialize_with = "one_or_many")]
        tags: Option<Vec<String>>,
    }

    #[test]
    fn test_empty_string_uuid_is_none() {
        let probe: Probe = serde_json::from_str(r#"{"id": ""}"#).unwrap();
        assert!(probe.id.is_none());
        assert!(probe.tags.is_none());
    }

    #[test]
    fn test_invalid_uuid_is_error() {
        assert!(serde_json::from_str::<Probe>(r#"{"id": "abc"}"#).is_err());
    }

    #[test]
    fn test_single_string_becomes_list() {
        let probe: Probe = serde_json::from_str(r#"{"tags": "Boys"}"#).unwrap();
        assert_eq!(probe.tags, Some(vec!["Boys".to_string()]));

        let probe: Probe = serde_json::from_str(r#"{"tags": ["Boys", "Girls"]}"#).unwrap();
        assert_eq!(probe.tags.unwrap().len(), 2);
    }

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "blank_as_none")]
        state: Option<Uuid>,
        #[serde(default, deserialize_with = "blank_as_none")]
        availability: Option<bool>,
        #[serde(default, deserialize_with = "blank_as_none")]
        page: Option<i64>,
    }

    #[test]
    fn test_blank_query_values_are_none() {
        let params = Query::<Params>::from_query("state=&availability=&page=")
            .unwrap()
            .into_inner();
        assert!(params.state.is_none());
        assert!(params.availability.is_none());
        assert!(params.page.is_none());
    }

    #[test]
    fn test_query_values_are_parsed() {
        let id = Uuid::new_v4();
        let params = Query::<Params>::from_query(&format!("state={}&availability=false&page=2", id))
            .unwrap()
            .into_inner();
        assert_eq!(params.state, Some(id));
        assert_eq!(params.availability, Some(false));
        assert_eq!(params.page, Some(2));
    }

    #[test]
    fn test_bad_query_value_is_error() {
        assert!(Query::<Params>::from_query("availability=maybe").is_err());
        assert!(Query::<Params>::from_query("state=abc").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(&Some("  x ".to_string())), Some("x"));
        assert_eq!(non_blank(&Some("   ".to_string())), None);
        assert_eq!(non_blank(&None), None);
    }
}
