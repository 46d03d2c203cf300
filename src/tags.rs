use serde_json::{Map, Value};

use crate::error::{InventoryError, Result};

/// A resource tag. Within one resource's tag set, keys are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl From<&aws_sdk_ec2::types::Tag> for Tag {
    fn from(tag: &aws_sdk_ec2::types::Tag) -> Self {
        Tag::new(
            tag.key().unwrap_or_default(),
            tag.value().unwrap_or_default(),
        )
    }
}

pub fn from_ec2_tags(tags: &[aws_sdk_ec2::types::Tag]) -> Vec<Tag> {
    tags.iter().map(Tag::from).collect()
}

/// Parses a comma-separated list of `key=value` specs. Any entry without
/// exactly one `=` fails the whole list, so callers can abort before issuing
/// a single tagging call.
pub fn parse_tag_specs(specs: &str) -> Result<Vec<Tag>> {
    specs
        .split(',')
        .map(|spec| {
            let parts: Vec<&str> = spec.split('=').collect();
            match parts.as_slice() {
                [key, value] => Ok(Tag::new(*key, *value)),
                _ => Err(InventoryError::MalformedTag(spec.to_string())),
            }
        })
        .collect()
}

/// Merges requested tags into an existing tag set, last writer wins per key:
/// an existing tag whose key is re-requested is dropped and the requested tag
/// appended, unrelated tags are kept in order.
pub fn merge_tags(existing: &[Tag], requested: &[Tag]) -> Vec<Tag> {
    let mut merged = existing.to_vec();
    for tag in requested {
        merged.retain(|t| t.key != tag.key);
        merged.push(tag.clone());
    }
    merged
}

/// Value of the `Name` tag, or empty string when the resource has none.
pub fn name_tag(tags: &[Tag]) -> String {
    tag_value(tags, "Name")
}

pub fn tag_value(tags: &[Tag], key: &str) -> String {
    tags.iter()
        .find(|t| t.key == key)
        .map(|t| t.value.clone())
        .unwrap_or_default()
}

/// `key:value,key:value` rendering used by the EBS report's Tags column.
pub fn join_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|t| format!("{}:{}", t.key, t.value))
        .collect::<Vec<_>>()
        .join(",")
}

/// JSON array of single-key objects, e.g. `[{"team":"b"}]`, used by the tag
/// report's Tags column.
pub fn render_tags(tags: &[Tag]) -> String {
    let items: Vec<Value> = tags
        .iter()
        .map(|t| {
            let mut object = Map::new();
            object.insert(t.key.clone(), Value::String(t.value.clone()));
            Value::Object(object)
        })
        .collect();

    Value::Array(items).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_specs() {
        let tags = parse_tag_specs("env=dev,team=infra").unwrap();
        assert_eq!(
            tags,
            vec![Tag::new("env", "dev"), Tag::new("team", "infra")]
        );
    }

    #[test]
    fn spec_without_separator_is_rejected() {
        let err = parse_tag_specs("envdev").unwrap_err();
        assert!(matches!(err, InventoryError::MalformedTag(s) if s == "envdev"));
    }

    #[test]
    fn spec_with_two_separators_is_rejected() {
        assert!(parse_tag_specs("env=dev=extra").is_err());
    }

    #[test]
    fn one_bad_spec_fails_the_whole_list() {
        assert!(parse_tag_specs("env=dev,envdev").is_err());
    }

    #[test]
    fn empty_value_is_allowed() {
        let tags = parse_tag_specs("env=").unwrap();
        assert_eq!(tags, vec![Tag::new("env", "")]);
    }

    #[test]
    fn requested_tag_replaces_existing_key() {
        let existing = vec![Tag::new("env", "prod")];
        let merged = merge_tags(&existing, &[Tag::new("env", "dev")]);
        assert_eq!(merged, vec![Tag::new("env", "dev")]);
    }

    #[test]
    fn unrelated_tags_are_preserved() {
        let existing = vec![Tag::new("owner", "ops"), Tag::new("env", "prod")];
        let merged = merge_tags(&existing, &[Tag::new("env", "dev")]);
        assert_eq!(
            merged,
            vec![Tag::new("owner", "ops"), Tag::new("env", "dev")]
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let existing = vec![Tag::new("team", "a")];
        let requested = vec![Tag::new("team", "b")];
        let once = merge_tags(&existing, &requested);
        let twice = merge_tags(&once, &requested);
        assert_eq!(once, twice);
    }

    #[test]
    fn duplicate_requested_keys_collapse_last_wins() {
        let merged = merge_tags(&[], &[Tag::new("env", "a"), Tag::new("env", "b")]);
        assert_eq!(merged, vec![Tag::new("env", "b")]);
    }

    #[test]
    fn name_tag_lookup() {
        let tags = vec![Tag::new("env", "dev"), Tag::new("Name", "web-01")];
        assert_eq!(name_tag(&tags), "web-01");
        assert_eq!(name_tag(&[Tag::new("env", "dev")]), "");
    }

    #[test]
    fn join_tags_colon_comma_format() {
        let tags = vec![Tag::new("env", "dev"), Tag::new("drive", "d")];
        assert_eq!(join_tags(&tags), "env:dev,drive:d");
        assert_eq!(join_tags(&[]), "");
    }

    #[test]
    fn render_tags_as_json_objects() {
        let tags = vec![Tag::new("team", "b")];
        assert_eq!(render_tags(&tags), r#"[{"team":"b"}]"#);
    }
}
