//! # contract: seams between the export pipeline and its collaborators
//!
//! This module defines the two traits the pipeline is written against:
//!
//! - [`BoardSource`]: read-only access to a Trello workspace, one method per
//!   resource kind. [`crate::fetch::TrelloFetcher`] is the networked implementor.
//! - [`Sink`]: write-only destination for the serialized CSV payload, returning
//!   an opaque locator (a URL or path) on success.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`, so tests can drive the pipeline
//!   deterministically without a network or filesystem.
//!
//! ## Adding New Sinks
//! - Implement [`Sink`] for your destination and convert upstream failures to a
//!   boxed error. The pipeline treats every sink error as a failed run.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::FetchError;
use crate::models::{
    Attachment, Board, Card, Checklist, Comment, CustomFieldDefinition, CustomFieldItem,
    HistoryEvent, Label, List, Member,
};

/// Error type for [`Sink`] implementors.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Read-only access to every resource the export walks.
///
/// Implementors must be safe to call concurrently: the pipeline issues the
/// per-card methods for one card at the same time.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait BoardSource: Send + Sync {
    /// All boards of the authenticated member, open and closed.
    async fn boards(&self) -> Result<Vec<Board>, FetchError>;

    /// All lists of a board, including archived ones.
    async fn board_lists(&self, board_id: &str) -> Result<Vec<List>, FetchError>;

    /// Custom field definitions of a board.
    async fn board_custom_fields(
        &self,
        board_id: &str,
    ) -> Result<Vec<CustomFieldDefinition>, FetchError>;

    /// All cards of a board, including archived ones.
    async fn board_cards(&self, board_id: &str) -> Result<Vec<Card>, FetchError>;

    async fn card_labels(&self, card_id: &str) -> Result<Vec<Label>, FetchError>;

    async fn card_members(&self, card_id: &str) -> Result<Vec<Member>, FetchError>;

    async fn card_checklists(&self, card_id: &str) -> Result<Vec<Checklist>, FetchError>;

    async fn card_attachments(&self, card_id: &str) -> Result<Vec<Attachment>, FetchError>;

    /// Comment actions on a card.
    async fn card_comments(&self, card_id: &str) -> Result<Vec<Comment>, FetchError>;

    /// Update, create, copy and move actions on a card, in the order returned.
    async fn card_history(&self, card_id: &str) -> Result<Vec<HistoryEvent>, FetchError>;

    async fn card_custom_field_items(
        &self,
        card_id: &str,
    ) -> Result<Vec<CustomFieldItem>, FetchError>;
}

/// Destination for a finished export.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Sink: Send + Sync {
    /// Persist `payload` under `name` and return where it can be found.
    async fn store(&self, name: &str, payload: Vec<u8>) -> Result<String, SinkError>;
}
