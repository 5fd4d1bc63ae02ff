// src/api/parser.rs
//! Parsing of Notion API responses into the domain model.
//!
//! Object payloads are dispatched on their `type` string so that block and
//! property types this client does not know stay representable (`Unsupported`)
//! instead of failing the whole response.

use super::pagination::PaginatedResponse;
use crate::error::{AppError, NotionErrorCode};
use crate::model::{
    Block, BlockCommon, BookmarkBlock, BulletedListItemBlock, CalloutBlock, CodeBlock, ColumnBlock,
    ColumnListBlock, DividerBlock, EmbedBlock, FileObject, Heading1Block, Heading2Block,
    Heading3Block, Icon, ImageBlock, NumberedListItemBlock, Page, ParagraphBlock, PropertyValue,
    QuoteBlock, SyncedBlock, SyncedFrom, TableBlock, TableRowBlock, TemplateBlock,
    TextBlockContent, ToDoBlock, ToggleBlock, UnsupportedBlock,
};
use crate::types::{BlockId, PageId, RichTextItem};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// Property types with a front-matter mapping; everything else is kept as
/// `Unsupported` and silently omitted downstream.
const KNOWN_PROPERTY_TYPES: &[&str] = &[
    "title",
    "rich_text",
    "select",
    "multi_select",
    "date",
    "people",
    "number",
    "url",
    "email",
    "phone_number",
];

/// Parse one page of a database query response.
pub fn parse_pages_page(body: &str) -> Result<PaginatedResponse<Page>, AppError> {
    let value: Value = serde_json::from_str(body)?;
    let results = list_results(&value)?
        .iter()
        .map(parse_page)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PaginatedResponse {
        results,
        has_more: value.get("has_more").and_then(Value::as_bool).unwrap_or(false),
        next_cursor: value
            .get("next_cursor")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Parse one page of a block children listing.
pub fn parse_blocks_page(body: &str) -> Result<PaginatedResponse<Block>, AppError> {
    let value: Value = serde_json::from_str(body)?;
    let results = list_results(&value)?
        .iter()
        .map(parse_block)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PaginatedResponse {
        results,
        has_more: value.get("has_more").and_then(Value::as_bool).unwrap_or(false),
        next_cursor: value
            .get("next_cursor")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn list_results(value: &Value) -> Result<&Vec<Value>, AppError> {
    value
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::MalformedResponse("missing 'results' array".to_string()))
}

/// Parse a page object.
pub fn parse_page(value: &Value) -> Result<Page, AppError> {
    let id = PageId::parse(str_field(value, "id")?)?;
    let created_time = parse_datetime(str_field(value, "created_time")?)?;
    let last_edited_time = parse_datetime(str_field(value, "last_edited_time")?)?;

    let cover = match value.get("cover") {
        None | Some(Value::Null) => None,
        Some(cover) => Some(serde_json::from_value(cover.clone())?),
    };

    let mut properties = IndexMap::new();
    if let Some(raw) = value.get("properties").and_then(Value::as_object) {
        for (key, property) in raw {
            properties.insert(key.clone(), parse_property(property)?);
        }
    }

    Ok(Page {
        id,
        created_time,
        last_edited_time,
        properties,
        cover,
    })
}

fn parse_property(value: &Value) -> Result<PropertyValue, AppError> {
    let type_name = str_field(value, "type")?;
    if !KNOWN_PROPERTY_TYPES.contains(&type_name) {
        return Ok(PropertyValue::Unsupported);
    }
    Ok(serde_json::from_value(value.clone())?)
}

/// Parse a block object, defaulting unknown types to `Unsupported`.
pub fn parse_block(value: &Value) -> Result<Block, AppError> {
    let type_name = str_field(value, "type")?;
    let common = BlockCommon {
        id: BlockId::parse(str_field(value, "id")?)?,
        has_children: value
            .get("has_children")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        children: Vec::new(),
    };
    let payload = value.get(type_name).cloned().unwrap_or(Value::Null);

    let block = match type_name {
        "paragraph" => Block::Paragraph(ParagraphBlock {
            common,
            content: text_content(payload)?,
        }),
        "heading_1" => Block::Heading1(Heading1Block {
            common,
            content: text_content(payload)?,
        }),
        "heading_2" => Block::Heading2(Heading2Block {
            common,
            content: text_content(payload)?,
        }),
        "heading_3" => Block::Heading3(Heading3Block {
            common,
            content: text_content(payload)?,
        }),
        "bulleted_list_item" => Block::BulletedListItem(BulletedListItemBlock {
            common,
            content: text_content(payload)?,
        }),
        "numbered_list_item" => Block::NumberedListItem(NumberedListItemBlock {
            common,
            content: text_content(payload)?,
        }),
        "toggle" => Block::Toggle(ToggleBlock {
            common,
            content: text_content(payload)?,
        }),
        "quote" => Block::Quote(QuoteBlock {
            common,
            content: text_content(payload)?,
        }),
        "template" => Block::Template(TemplateBlock {
            common,
            content: text_content(payload)?,
        }),
        "to_do" => {
            #[derive(Deserialize, Default)]
            #[serde(default)]
            struct ToDoPayload {
                rich_text: Vec<RichTextItem>,
                checked: bool,
            }
            let data: ToDoPayload = payload_from(payload)?;
            Block::ToDo(ToDoBlock {
                common,
                content: TextBlockContent::from_spans(data.rich_text),
                checked: data.checked,
            })
        }
        "callout" => {
            #[derive(Deserialize, Default)]
            #[serde(default)]
            struct CalloutPayload {
                rich_text: Vec<RichTextItem>,
                icon: Option<Icon>,
            }
            let data: CalloutPayload = payload_from(payload)?;
            Block::Callout(CalloutBlock {
                common,
                content: TextBlockContent::from_spans(data.rich_text),
                icon: data.icon,
            })
        }
        "code" => {
            #[derive(Deserialize, Default)]
            #[serde(default)]
            struct CodePayload {
                rich_text: Vec<RichTextItem>,
                language: String,
                caption: Vec<RichTextItem>,
            }
            let data: CodePayload = payload_from(payload)?;
            Block::Code(CodeBlock {
                common,
                content: TextBlockContent::from_spans(data.rich_text),
                language: data.language,
                caption: data.caption,
            })
        }
        "bookmark" => {
            #[derive(Deserialize, Default)]
            #[serde(default)]
            struct BookmarkPayload {
                url: String,
                caption: Vec<RichTextItem>,
            }
            let data: BookmarkPayload = payload_from(payload)?;
            Block::Bookmark(BookmarkBlock {
                common,
                url: data.url,
                caption: data.caption,
                preview: None,
            })
        }
        "image" => {
            let image: FileObject = serde_json::from_value(payload.clone())?;
            let caption = payload
                .get("caption")
                .map(|c| serde_json::from_value(c.clone()))
                .transpose()?
                .unwrap_or_default();
            Block::Image(ImageBlock {
                common,
                image,
                caption,
            })
        }
        "embed" => {
            #[derive(Deserialize, Default)]
            #[serde(default)]
            struct EmbedPayload {
                url: String,
            }
            let data: EmbedPayload = payload_from(payload)?;
            Block::Embed(EmbedBlock {
                common,
                url: data.url,
            })
        }
        "divider" => Block::Divider(DividerBlock { common }),
        "table" => {
            #[derive(Deserialize, Default)]
            #[serde(default)]
            struct TablePayload {
                table_width: usize,
                has_column_header: bool,
                has_row_header: bool,
            }
            let data: TablePayload = payload_from(payload)?;
            Block::Table(TableBlock {
                common,
                table_width: data.table_width,
                has_column_header: data.has_column_header,
                has_row_header: data.has_row_header,
            })
        }
        "table_row" => {
            #[derive(Deserialize, Default)]
            #[serde(default)]
            struct TableRowPayload {
                cells: Vec<Vec<RichTextItem>>,
            }
            let data: TableRowPayload = payload_from(payload)?;
            Block::TableRow(TableRowBlock {
                common,
                cells: data.cells,
            })
        }
        "column_list" => Block::ColumnList(ColumnListBlock { common }),
        "column" => Block::Column(ColumnBlock { common }),
        "synced_block" => {
            #[derive(Deserialize, Default)]
            #[serde(default)]
            struct SyncedPayload {
                synced_from: Option<SyncedFrom>,
            }
            let data: SyncedPayload = payload_from(payload)?;
            Block::Synced(SyncedBlock {
                common,
                synced_from: data.synced_from,
            })
        }
        other => Block::Unsupported(UnsupportedBlock {
            common,
            block_type: other.to_string(),
        }),
    };

    Ok(block)
}

fn text_content(payload: Value) -> Result<TextBlockContent, AppError> {
    payload_from(payload)
}

fn payload_from<T: serde::de::DeserializeOwned + Default>(payload: Value) -> Result<T, AppError> {
    if payload.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(payload)?)
}

fn str_field<'a>(value: &'a Value, name: &str) -> Result<&'a str, AppError> {
    value.get(name).and_then(Value::as_str).ok_or_else(|| {
        AppError::MalformedResponse(format!("missing '{}' field in response object", name))
    })
}

fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::MalformedResponse(format!("bad timestamp '{}': {}", raw, e)))
}

/// Map a non-success API response to a typed error.
pub fn error_from_response(status: StatusCode, body: &str) -> AppError {
    #[derive(Deserialize)]
    struct NotionError {
        code: String,
        message: String,
    }

    match serde_json::from_str::<NotionError>(body) {
        Ok(error) => AppError::NotionService {
            code: NotionErrorCode::from_api_response(&error.code),
            message: error.message,
            status,
        },
        Err(_) => AppError::NotionService {
            code: NotionErrorCode::from_http_status(status.as_u16()),
            message: format!("HTTP {}", status),
            status,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_database_row_with_typed_properties() {
        let body = r#"{
            "object": "page",
            "id": "216cd412-8533-8087-a989-cf37889137c3",
            "created_time": "2024-03-05T10:00:00.000Z",
            "last_edited_time": "2024-03-06T12:30:00.000Z",
            "cover": { "type": "external", "external": { "url": "https://example.com/c.png" } },
            "properties": {
                "Name": { "id": "t", "type": "title", "title": [
                    { "type": "text", "text": { "content": "Hello World!" }, "plain_text": "Hello World!" }
                ]},
                "Status": { "id": "s", "type": "select", "select": { "name": "Finished", "color": "green" } },
                "Tags": { "id": "m", "type": "multi_select", "multi_select": [
                    { "name": "rust", "color": "orange" }, { "name": "notion" }
                ]},
                "Rollup": { "id": "r", "type": "rollup", "rollup": { "type": "number", "number": 3 } }
            }
        }"#;
        let value: Value = serde_json::from_str(body).unwrap();
        let page = parse_page(&value).unwrap();

        assert_eq!(page.id.as_str(), "216cd41285338087a989cf37889137c3");
        assert_eq!(page.title_rich_text().unwrap()[0].plain_text, "Hello World!");
        assert!(page.cover.is_some());
        assert_eq!(
            page.properties.get("Rollup"),
            Some(&PropertyValue::Unsupported)
        );
        match page.properties.get("Tags") {
            Some(PropertyValue::MultiSelect { multi_select }) => {
                assert_eq!(multi_select.len(), 2);
                assert_eq!(multi_select[0].name, "rust");
            }
            other => panic!("unexpected property: {:?}", other),
        }
    }

    #[test]
    fn parses_blocks_and_keeps_unknown_types_as_unsupported() {
        let body = r#"{
            "object": "list",
            "results": [
                { "object": "block", "id": "11111111-1111-1111-1111-111111111111",
                  "type": "paragraph", "has_children": false,
                  "paragraph": { "rich_text": [
                      { "type": "text", "text": { "content": "hi" }, "plain_text": "hi" }
                  ], "color": "default" } },
                { "object": "block", "id": "22222222-2222-2222-2222-222222222222",
                  "type": "to_do", "has_children": false,
                  "to_do": { "rich_text": [], "checked": true } },
                { "object": "block", "id": "33333333-3333-3333-3333-333333333333",
                  "type": "audio", "has_children": false,
                  "audio": { "type": "external", "external": { "url": "x" } } }
            ],
            "has_more": false,
            "next_cursor": null
        }"#;
        let page = parse_blocks_page(body).unwrap();
        assert_eq!(page.results.len(), 3);
        assert!(!page.has_more);

        match &page.results[0] {
            Block::Paragraph(p) => assert_eq!(p.content.rich_text[0].plain_text, "hi"),
            other => panic!("unexpected block: {:?}", other),
        }
        match &page.results[1] {
            Block::ToDo(todo) => assert!(todo.checked),
            other => panic!("unexpected block: {:?}", other),
        }
        match &page.results[2] {
            Block::Unsupported(unknown) => assert_eq!(unknown.block_type, "audio"),
            other => panic!("unexpected block: {:?}", other),
        }
    }

    #[test]
    fn api_error_bodies_become_typed_service_errors() {
        let body = r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find database"}"#;
        let error = error_from_response(StatusCode::NOT_FOUND, body);
        match error {
            AppError::NotionService { code, message, .. } => {
                assert_eq!(code, NotionErrorCode::ObjectNotFound);
                assert_eq!(message, "Could not find database");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn unparseable_error_bodies_fall_back_to_http_status() {
        let error = error_from_response(StatusCode::BAD_GATEWAY, "<html>gateway</html>");
        match error {
            AppError::NotionService { code, .. } => {
                assert_eq!(code, NotionErrorCode::from_http_status(502));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
