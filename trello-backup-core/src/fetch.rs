//! [`BoardSource`] implementation backed by the Trello REST API.

use async_trait::async_trait;
use tracing::debug;

use crate::client::RateLimitedClient;
use crate::contract::BoardSource;
use crate::error::FetchError;
use crate::models::{
    Attachment, Board, Card, Checklist, Comment, CustomFieldDefinition, CustomFieldItem,
    HistoryEvent, Label, List, Member,
};

/// Action types requested for the archive history of a card.
pub const HISTORY_ACTION_FILTER: &str =
    "updateCard,createCard,copyCard,moveCardFromBoard,moveCardToBoard";
pub const COMMENT_ACTION_FILTER: &str = "commentCard";
/// Upper bound Trello accepts for `limit` on action queries.
pub const ACTION_LIMIT: &str = "1000";

/// Thin typed accessors, one request per call, all through one admission lane.
pub struct TrelloFetcher {
    client: RateLimitedClient,
}

impl TrelloFetcher {
    pub fn new(client: RateLimitedClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RateLimitedClient {
        &self.client
    }
}

#[async_trait]
impl BoardSource for TrelloFetcher {
    async fn boards(&self) -> Result<Vec<Board>, FetchError> {
        let boards: Vec<Board> = self
            .client
            .get_json("/members/me/boards", &[("filter", "all")])
            .await?;
        debug!(count = boards.len(), "Fetched boards");
        Ok(boards)
    }

    async fn board_lists(&self, board_id: &str) -> Result<Vec<List>, FetchError> {
        self.client
            .get_json(&format!("/boards/{board_id}/lists"), &[("filter", "all")])
            .await
    }

    async fn board_custom_fields(
        &self,
        board_id: &str,
    ) -> Result<Vec<CustomFieldDefinition>, FetchError> {
        self.client
            .get_json(&format!("/boards/{board_id}/customFields"), &[])
            .await
    }

    async fn board_cards(&self, board_id: &str) -> Result<Vec<Card>, FetchError> {
        self.client
            .get_json(&format!("/boards/{board_id}/cards"), &[("filter", "all")])
            .await
    }

    async fn card_labels(&self, card_id: &str) -> Result<Vec<Label>, FetchError> {
        self.client
            .get_json(&format!("/cards/{card_id}/labels"), &[])
            .await
    }

    async fn card_members(&self, card_id: &str) -> Result<Vec<Member>, FetchError> {
        self.client
            .get_json(&format!("/cards/{card_id}/members"), &[])
            .await
    }

    async fn card_checklists(&self, card_id: &str) -> Result<Vec<Checklist>, FetchError> {
        self.client
            .get_json(&format!("/cards/{card_id}/checklists"), &[])
            .await
    }

    async fn card_attachments(&self, card_id: &str) -> Result<Vec<Attachment>, FetchError> {
        self.client
            .get_json(&format!("/cards/{card_id}/attachments"), &[])
            .await
    }

    async fn card_comments(&self, card_id: &str) -> Result<Vec<Comment>, FetchError> {
        self.client
            .get_json(
                &format!("/cards/{card_id}/actions"),
                &[("filter", COMMENT_ACTION_FILTER), ("limit", ACTION_LIMIT)],
            )
            .await
    }

    async fn card_history(&self, card_id: &str) -> Result<Vec<HistoryEvent>, FetchError> {
        self.client
            .get_json(
                &format!("/cards/{card_id}/actions"),
                &[("filter", HISTORY_ACTION_FILTER), ("limit", ACTION_LIMIT)],
            )
            .await
    }

    async fn card_custom_field_items(
        &self,
        card_id: &str,
    ) -> Result<Vec<CustomFieldItem>, FetchError> {
        self.client
            .get_json(&format!("/cards/{card_id}/customFieldItems"), &[])
            .await
    }
}
