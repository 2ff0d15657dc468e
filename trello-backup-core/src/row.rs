//! Flattening of one card and its sub-resources into an [`ExportRow`].
//!
//! Every column is a string. Booleans render as `"true"`/`"false"`, absent
//! values as the empty string. Missing joins (list, custom field definition)
//! degrade to empty fields and never fail the row.

use chrono::{DateTime, SecondsFormat};
use std::collections::HashMap;

use crate::custom_fields::{format_custom_fields, index_definitions};
use crate::history::extract_archive_timestamps;
use crate::models::{
    Attachment, Board, Card, CardDetails, Checklist, Comment, CustomFieldDefinition, Label, List,
    Member,
};

/// Column order of the exported table.
pub const COLUMNS: [&str; 23] = [
    "board_name",
    "board_url",
    "board_closed",
    "list_name",
    "list_url",
    "list_closed",
    "card_name",
    "card_url",
    "card_pos",
    "desc",
    "created_at",
    "last_activity",
    "archived_at",
    "unarchived_at",
    "due",
    "due_complete",
    "closed",
    "members",
    "labels",
    "comments",
    "checklists",
    "attachments",
    "custom_fields",
];

/// One flattened card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExportRow {
    pub board_name: String,
    pub board_url: String,
    pub board_closed: String,
    pub list_name: String,
    pub list_url: String,
    pub list_closed: String,
    pub card_name: String,
    pub card_url: String,
    pub card_pos: String,
    pub desc: String,
    pub created_at: String,
    pub last_activity: String,
    pub archived_at: String,
    pub unarchived_at: String,
    pub due: String,
    pub due_complete: String,
    pub closed: String,
    pub members: String,
    pub labels: String,
    pub comments: String,
    pub checklists: String,
    pub attachments: String,
    pub custom_fields: String,
}

impl ExportRow {
    /// Values in [`COLUMNS`] order. The array length pins the column count.
    pub fn values(&self) -> [&str; COLUMNS.len()] {
        [
            self.board_name.as_str(),
            self.board_url.as_str(),
            self.board_closed.as_str(),
            self.list_name.as_str(),
            self.list_url.as_str(),
            self.list_closed.as_str(),
            self.card_name.as_str(),
            self.card_url.as_str(),
            self.card_pos.as_str(),
            self.desc.as_str(),
            self.created_at.as_str(),
            self.last_activity.as_str(),
            self.archived_at.as_str(),
            self.unarchived_at.as_str(),
            self.due.as_str(),
            self.due_complete.as_str(),
            self.closed.as_str(),
            self.members.as_str(),
            self.labels.as_str(),
            self.comments.as_str(),
            self.checklists.as_str(),
            self.attachments.as_str(),
            self.custom_fields.as_str(),
        ]
    }
}

/// Board-level lookups shared by every card of a board.
#[derive(Debug, Clone)]
pub struct BoardContext {
    pub board: Board,
    pub lists_by_id: HashMap<String, List>,
    pub field_definitions: HashMap<String, CustomFieldDefinition>,
}

impl BoardContext {
    pub fn new(board: Board, lists: Vec<List>, definitions: Vec<CustomFieldDefinition>) -> Self {
        Self {
            board,
            lists_by_id: lists.into_iter().map(|l| (l.id.clone(), l)).collect(),
            field_definitions: index_definitions(definitions),
        }
    }
}

/// Join a card with its board context and sub-resources.
pub fn build_row(card: &Card, ctx: &BoardContext, details: &CardDetails) -> ExportRow {
    let list = ctx.lists_by_id.get(&card.id_list);
    let archive = extract_archive_timestamps(&details.history);

    ExportRow {
        board_name: ctx.board.name.clone(),
        board_url: ctx.board.url.clone(),
        board_closed: ctx.board.closed.to_string(),
        list_name: list.map(|l| l.name.clone()).unwrap_or_default(),
        list_url: list
            .and_then(|_| ctx.board.short_link_url())
            .unwrap_or_default(),
        list_closed: list.map(|l| l.closed.to_string()).unwrap_or_default(),
        card_name: card.name.clone(),
        card_url: card
            .short_url
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| card.url.clone()),
        card_pos: card.pos.to_string(),
        desc: card.desc.clone(),
        created_at: card_created_at(&card.id).unwrap_or_default(),
        last_activity: card.date_last_activity.clone().unwrap_or_default(),
        archived_at: archive.archived_at,
        unarchived_at: archive.unarchived_at,
        due: card.due.clone().unwrap_or_default(),
        due_complete: card.due_complete.to_string(),
        closed: card.closed.to_string(),
        members: format_members(&details.members),
        labels: format_labels(&details.labels),
        comments: format_comments(&details.comments),
        checklists: format_checklists(&details.checklists),
        attachments: format_attachments(&details.attachments),
        custom_fields: format_custom_fields(&details.custom_field_items, &ctx.field_definitions),
    }
}

/// Creation time encoded in the first 8 hex characters of a Trello id.
pub fn card_created_at(card_id: &str) -> Option<String> {
    let prefix = card_id.get(..8)?;
    let seconds = u32::from_str_radix(prefix, 16).ok()?;
    let created = DateTime::from_timestamp(i64::from(seconds), 0)?;
    Some(created.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn format_comments(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|c| format!("{}: {}", c.author(), c.text()))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn format_checklists(checklists: &[Checklist]) -> String {
    checklists
        .iter()
        .map(|checklist| {
            let items = checklist
                .check_items
                .iter()
                .map(|item| format!("{} ({})", item.name, item.state))
                .collect::<Vec<_>>()
                .join("; ");
            format!("{}: {}", checklist.name, items)
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn format_attachments(attachments: &[Attachment]) -> String {
    attachments
        .iter()
        .map(|a| a.url.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_labels(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|l| l.name.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_members(members: &[Member]) -> String {
    members
        .iter()
        .map(|m| m.full_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
