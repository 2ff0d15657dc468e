//! High-level pipeline: walks boards → lists → cards → card sub-resources.
//!
//! This module provides the orchestration that turns a whole Trello workspace
//! into an ordered sequence of [`ExportRow`]s:
//!   - Enumerates the member's boards, one board at a time
//!   - Per board, builds the list lookup and loads custom field definitions
//!   - Per card, fetches all sub-resources concurrently and flattens them
//!
//! # Error Handling
//! - Failing to list boards, or a board's lists or cards, aborts the run: no
//!   meaningful row can be built for that board without them.
//! - Failing to load custom field definitions degrades to an empty set.
//! - Failing any sub-resource of one card skips that card only; it is logged
//!   with the card's name and recorded in [`AggregationReport::skipped`].
//!
//! # Concurrency
//! Boards and cards are processed sequentially. Only the sub-resource fetches
//! of a single card run concurrently, and the first failure among them wins.
//! Actual dispatch is still serialised by the source's admission lane.
//!
//! # Navigation
//! - Main entrypoint: [`aggregate`]
//! - Supporting types: [`AggregationReport`], [`SkippedCard`].

use tracing::{info, warn};

use crate::contract::BoardSource;
use crate::error::{ExportError, FetchError};
use crate::models::{Board, CardDetails, CustomFieldDefinition};
use crate::row::{build_row, BoardContext, ExportRow};

/// Output of one aggregation run.
#[derive(Debug, Default)]
pub struct AggregationReport {
    /// Rows in board order, then card order within each board.
    pub rows: Vec<ExportRow>,
    pub skipped: Vec<SkippedCard>,
}

/// A card left out of the export because a sub-resource fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCard {
    pub board_name: String,
    pub card_id: String,
    pub card_name: String,
    pub reason: String,
}

pub async fn aggregate<S>(source: &S) -> Result<AggregationReport, ExportError>
where
    S: BoardSource + ?Sized,
{
    info!("[EXPORT] Starting workspace aggregation");

    let boards = source.boards().await.map_err(ExportError::Boards)?;
    info!(boards = boards.len(), "[EXPORT] Fetched boards");

    let mut report = AggregationReport::default();

    for board in boards {
        aggregate_board(source, board, &mut report).await?;
    }

    info!(
        rows = report.rows.len(),
        skipped = report.skipped.len(),
        "[EXPORT] Aggregation complete"
    );
    Ok(report)
}

async fn aggregate_board<S>(
    source: &S,
    board: Board,
    report: &mut AggregationReport,
) -> Result<(), ExportError>
where
    S: BoardSource + ?Sized,
{
    let lists = source
        .board_lists(&board.id)
        .await
        .map_err(|source| ExportError::Board {
            board: board.name.clone(),
            stage: "lists",
            source,
        })?;
    let definitions = custom_field_definitions_or_empty(source, &board).await;
    let cards = source
        .board_cards(&board.id)
        .await
        .map_err(|source| ExportError::Board {
            board: board.name.clone(),
            stage: "cards",
            source,
        })?;

    info!(
        board = %board.name,
        lists = lists.len(),
        custom_fields = definitions.len(),
        cards = cards.len(),
        "[EXPORT] Processing board"
    );

    let ctx = BoardContext::new(board, lists, definitions);

    for card in &cards {
        let outcome = fetch_card_details(source, &card.id)
            .await
            .map_err(|source| ExportError::Card {
                card: card.name.clone(),
                source,
            });
        match outcome {
            Ok(details) => report.rows.push(build_row(card, &ctx, &details)),
            Err(e) => {
                warn!(
                    board = %ctx.board.name,
                    card = %card.name,
                    error = %e,
                    "[EXPORT] Skipping card after failed fetch"
                );
                report.skipped.push(SkippedCard {
                    board_name: ctx.board.name.clone(),
                    card_id: card.id.clone(),
                    card_name: card.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Custom field definitions of `board`, or an empty set when the board does
/// not serve them. A board without custom fields still exports.
pub async fn custom_field_definitions_or_empty<S>(
    source: &S,
    board: &Board,
) -> Vec<CustomFieldDefinition>
where
    S: BoardSource + ?Sized,
{
    match source.board_custom_fields(&board.id).await {
        Ok(definitions) => definitions,
        Err(e) => {
            warn!(
                board = %board.name,
                error = %e,
                "[EXPORT] Custom field definitions unavailable, continuing without them"
            );
            Vec::new()
        }
    }
}

/// Fetch every sub-resource of one card concurrently.
pub async fn fetch_card_details<S>(source: &S, card_id: &str) -> Result<CardDetails, FetchError>
where
    S: BoardSource + ?Sized,
{
    let (labels, members, checklists, attachments, comments, history, custom_field_items) = futures::try_join!(
        source.card_labels(card_id),
        source.card_members(card_id),
        source.card_checklists(card_id),
        source.card_attachments(card_id),
        source.card_comments(card_id),
        source.card_history(card_id),
        source.card_custom_field_items(card_id),
    )?;

    Ok(CardDetails {
        labels,
        members,
        checklists,
        attachments,
        comments,
        history,
        custom_field_items,
    })
}
