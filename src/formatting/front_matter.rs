// src/formatting/front_matter.rs
//! Mapping of page properties into the front matter document.
//!
//! Keys are lower-cased; extraction is type-directed. Properties whose type
//! has no mapping, or whose value is null, are omitted rather than erroring.

use super::context::FrontMatterValue;
use super::rich_text::rich_text_to_markdown;
use crate::error::AppError;
use crate::model::{DateValue, Page, PropertyValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;

/// Builds the front matter map for a page from its property values.
pub fn build(page: &Page) -> IndexMap<String, FrontMatterValue> {
    let mut front_matter = IndexMap::new();
    for (key, property) in &page.properties {
        if let Some(value) = property_value(property) {
            front_matter.insert(key.to_lowercase(), value);
        }
    }
    front_matter
}

fn property_value(property: &PropertyValue) -> Option<FrontMatterValue> {
    match property {
        PropertyValue::Title { title } => {
            Some(FrontMatterValue::String(rich_text_to_markdown(title)))
        }
        PropertyValue::RichText { rich_text } => {
            Some(FrontMatterValue::String(rich_text_to_markdown(rich_text)))
        }
        PropertyValue::Select { select } => select
            .as_ref()
            .map(|option| FrontMatterValue::String(option.name.clone())),
        PropertyValue::MultiSelect { multi_select } => Some(FrontMatterValue::List(
            multi_select
                .iter()
                .map(|option| option.name.clone())
                .collect(),
        )),
        PropertyValue::Date { date } => date
            .as_ref()
            .and_then(format_date)
            .map(FrontMatterValue::String),
        PropertyValue::People { people } => people
            .iter()
            .find_map(|person| person.name.clone())
            .map(FrontMatterValue::String),
        PropertyValue::Number { number } => number.map(FrontMatterValue::Number),
        PropertyValue::Url { url: value }
        | PropertyValue::Email { email: value }
        | PropertyValue::PhoneNumber {
            phone_number: value,
        } => value.clone().map(FrontMatterValue::String),
        PropertyValue::Unsupported => None,
    }
}

/// Formats a date range: the start when present, the end otherwise.
///
/// The offset suffix is a fixed `+07:00`, matching the produced site's
/// timestamp convention rather than the source value's zone.
pub fn format_date(date: &DateValue) -> Option<String> {
    let raw = date
        .start
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| date.end.as_deref().filter(|s| !s.is_empty()))?;
    let naive = parse_lenient(raw)?;
    Some(format!("{}+07:00", naive.format("%Y-%m-%dT%H:%M:%S")))
}

fn parse_lenient(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.naive_local());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Serializes the front matter map as a `---`-fenced YAML block, or nothing
/// when the map is empty.
pub fn to_yaml(front_matter: &IndexMap<String, FrontMatterValue>) -> Result<String, AppError> {
    if front_matter.is_empty() {
        return Ok(String::new());
    }
    let yaml = serde_yaml::to_string(front_matter)?;
    Ok(format!("---\n{}---\n\n", yaml))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SelectOption, User};
    use crate::types::{PageId, RichTextItem};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn page(properties: Vec<(&str, PropertyValue)>) -> Page {
        Page {
            id: PageId::parse(&format!("{:032x}", 9u8)).unwrap(),
            created_time: Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap(),
            last_edited_time: Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap(),
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            cover: None,
        }
    }

    #[test]
    fn keys_are_lower_cased_and_values_type_directed() {
        let page = page(vec![
            (
                "Name",
                PropertyValue::Title {
                    title: vec![RichTextItem::text("My Post")],
                },
            ),
            (
                "Status",
                PropertyValue::Select {
                    select: Some(SelectOption {
                        name: "Finished".to_string(),
                    }),
                },
            ),
            (
                "Tags",
                PropertyValue::MultiSelect {
                    multi_select: vec![
                        SelectOption {
                            name: "rust".to_string(),
                        },
                        SelectOption {
                            name: "notion".to_string(),
                        },
                    ],
                },
            ),
            (
                "Author",
                PropertyValue::People {
                    people: vec![
                        User { name: None },
                        User {
                            name: Some("Ada".to_string()),
                        },
                    ],
                },
            ),
            ("Weight", PropertyValue::Number { number: Some(2.5) }),
        ]);

        let front_matter = build(&page);
        assert_eq!(
            front_matter.get("name"),
            Some(&FrontMatterValue::String("My Post".to_string()))
        );
        assert_eq!(
            front_matter.get("status"),
            Some(&FrontMatterValue::String("Finished".to_string()))
        );
        assert_eq!(
            front_matter.get("tags"),
            Some(&FrontMatterValue::List(vec![
                "rust".to_string(),
                "notion".to_string()
            ]))
        );
        assert_eq!(
            front_matter.get("author"),
            Some(&FrontMatterValue::String("Ada".to_string()))
        );
        assert_eq!(
            front_matter.get("weight"),
            Some(&FrontMatterValue::Number(2.5))
        );
    }

    #[test]
    fn null_and_unsupported_values_are_omitted() {
        let page = page(vec![
            ("Status", PropertyValue::Select { select: None }),
            ("Due", PropertyValue::Date { date: None }),
            ("Rollup", PropertyValue::Unsupported),
            ("Link", PropertyValue::Url { url: None }),
        ]);
        assert!(build(&page).is_empty());
    }

    #[test]
    fn dates_format_start_with_the_fixed_offset_suffix() {
        let date = DateValue {
            start: Some("2024-03-05T10:30:00.000+02:00".to_string()),
            end: None,
        };
        assert_eq!(format_date(&date).unwrap(), "2024-03-05T10:30:00+07:00");
    }

    #[test]
    fn date_only_values_and_end_fallback_work() {
        let date_only = DateValue {
            start: Some("2024-03-05".to_string()),
            end: None,
        };
        assert_eq!(
            format_date(&date_only).unwrap(),
            "2024-03-05T00:00:00+07:00"
        );

        let end_only = DateValue {
            start: None,
            end: Some("2024-04-01".to_string()),
        };
        assert_eq!(format_date(&end_only).unwrap(), "2024-04-01T00:00:00+07:00");
    }

    #[test]
    fn yaml_block_is_fenced_and_ordered() {
        let mut front_matter = IndexMap::new();
        front_matter.insert(
            "cover".to_string(),
            FrontMatterValue::String("/images/c.png".to_string()),
        );
        front_matter.insert(
            "title".to_string(),
            FrontMatterValue::String("My Post".to_string()),
        );

        let yaml = to_yaml(&front_matter).unwrap();
        assert_eq!(yaml, "---\ncover: /images/c.png\ntitle: My Post\n---\n\n");
    }

    #[test]
    fn empty_front_matter_emits_nothing() {
        assert_eq!(to_yaml(&IndexMap::new()).unwrap(), "");
    }
}
