//! Typed views of the Trello REST payloads consumed by the export pipeline.
//!
//! Only the fields the export actually reads are declared; everything else in
//! the upstream JSON is ignored by serde. Fields that Trello may omit or send
//! as `null` are either `Option` or decode `null` to their default, so a
//! sparse payload never fails the whole board.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A board visible to the authenticated member.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub closed: bool,
    #[serde(default)]
    pub short_link: Option<String>,
}

impl Board {
    /// Short-link URL of the board, used as the `list_url` column.
    pub fn short_link_url(&self) -> Option<String> {
        self.short_link
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!("https://trello.com/b/{s}"))
    }
}

/// A list (column) on a board.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub closed: bool,
}

/// Board-scoped custom field definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomFieldDefinition {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<CustomFieldOption>,
}

impl CustomFieldDefinition {
    /// Display name, falling back to the definition id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }
}

/// One selectable option of a dropdown custom field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomFieldOption {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: OptionValue,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OptionValue {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl CustomFieldOption {
    /// Option text, then label, then the raw option id.
    pub fn display_value(&self) -> &str {
        fn non_empty(s: &Option<String>) -> Option<&str> {
            s.as_deref().filter(|v| !v.is_empty())
        }

        non_empty(&self.value.text)
            .or_else(|| non_empty(&self.value.label))
            .unwrap_or(&self.id)
    }
}

/// A card as returned by `GET /boards/{id}/cards`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub short_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pos: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub desc: String,
    #[serde(default)]
    pub date_last_activity: Option<String>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub due_complete: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub closed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id_list: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub check_items: Vec<CheckItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// `complete` or `incomplete`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Attachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// A `commentCard` action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub member_creator: Option<Member>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: CommentData,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommentData {
    #[serde(default)]
    pub text: Option<String>,
}

impl Comment {
    pub fn author(&self) -> &str {
        self.member_creator
            .as_ref()
            .map(|m| m.full_name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown")
    }

    pub fn text(&self) -> &str {
        self.data.text.as_deref().unwrap_or("")
    }
}

/// The `closed` flag of a card before or after a history event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardState {
    pub closed: Option<bool>,
}

/// A card action reduced to what archive extraction needs.
///
/// Decodes from the raw action shape (`type`, `date`, `data.old`, `data.card`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEvent {
    pub kind: String,
    pub timestamp: String,
    pub before: Option<CardState>,
    pub after: Option<CardState>,
}

impl<'de> Deserialize<'de> for HistoryEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RawState {
            #[serde(default)]
            closed: Option<bool>,
        }

        #[derive(Deserialize, Default)]
        struct RawData {
            #[serde(default)]
            old: Option<RawState>,
            #[serde(default)]
            card: Option<RawState>,
        }

        #[derive(Deserialize)]
        struct RawAction {
            #[serde(rename = "type")]
            kind: String,
            #[serde(default)]
            date: String,
            #[serde(default)]
            data: Option<RawData>,
        }

        let raw = RawAction::deserialize(deserializer)?;
        let data = raw.data.unwrap_or_default();
        Ok(HistoryEvent {
            kind: raw.kind,
            timestamp: raw.date,
            before: data.old.map(|s| CardState { closed: s.closed }),
            after: data.card.map(|s| CardState { closed: s.closed }),
        })
    }
}

/// The value carried by a custom field item.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomFieldValue {
    Text(String),
    Number(String),
    Date(String),
    Checked(bool),
    None,
}

/// A card's value for one custom field definition.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFieldItem {
    pub definition_id: String,
    pub value: CustomFieldValue,
    pub selected_option_id: Option<String>,
}

impl<'de> Deserialize<'de> for CustomFieldItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize, Default)]
        struct RawValue {
            #[serde(default)]
            text: Option<Value>,
            #[serde(default)]
            number: Option<Value>,
            #[serde(default)]
            date: Option<Value>,
            #[serde(default)]
            checked: Option<Value>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct RawItem {
            id_custom_field: String,
            #[serde(default)]
            value: Option<RawValue>,
            #[serde(default)]
            id_value: Option<String>,
        }

        let raw = RawItem::deserialize(deserializer)?;
        let value = raw.value.unwrap_or_default();
        let present = |v: Option<Value>| v.filter(|v| !v.is_null());

        let value = if let Some(text) = present(value.text) {
            CustomFieldValue::Text(scalar_to_string(&text))
        } else if let Some(number) = present(value.number) {
            CustomFieldValue::Number(scalar_to_string(&number))
        } else if let Some(date) = present(value.date) {
            CustomFieldValue::Date(scalar_to_string(&date))
        } else if let Some(checked) = value.checked {
            CustomFieldValue::Checked(match checked {
                Value::Bool(b) => b,
                Value::String(s) => s.eq_ignore_ascii_case("true"),
                _ => false,
            })
        } else {
            CustomFieldValue::None
        };

        Ok(CustomFieldItem {
            definition_id: raw.id_custom_field,
            value,
            selected_option_id: raw.id_value.filter(|id| !id.is_empty()),
        })
    }
}

/// Decode a field that Trello may send as `null` into its default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Every sub-resource fetched for one card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardDetails {
    pub labels: Vec<Label>,
    pub members: Vec<Member>,
    pub checklists: Vec<Checklist>,
    pub attachments: Vec<Attachment>,
    pub comments: Vec<Comment>,
    pub history: Vec<HistoryEvent>,
    pub custom_field_items: Vec<CustomFieldItem>,
}
