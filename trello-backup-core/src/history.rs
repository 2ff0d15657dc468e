//! Archive and unarchive timestamps derived from a card's action history.

use crate::models::HistoryEvent;

/// Action type whose `closed` transitions are interpreted.
pub const CARD_UPDATED: &str = "updateCard";

/// First archive and first unarchive timestamp of a card. Empty when unseen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveTimestamps {
    pub archived_at: String,
    pub unarchived_at: String,
}

/// Scan `events` in the given order and keep the first open→closed and the
/// first closed→open transition. Later transitions never overwrite earlier
/// ones. Move, create and copy actions are ignored.
pub fn extract_archive_timestamps(events: &[HistoryEvent]) -> ArchiveTimestamps {
    let mut timestamps = ArchiveTimestamps::default();

    for event in events.iter().filter(|e| e.kind == CARD_UPDATED) {
        let before = event.before.and_then(|s| s.closed);
        let after = event.after.and_then(|s| s.closed);

        match (before, after) {
            (Some(false), Some(true)) if timestamps.archived_at.is_empty() => {
                timestamps.archived_at = event.timestamp.clone();
            }
            (Some(true), Some(false)) if timestamps.unarchived_at.is_empty() => {
                timestamps.unarchived_at = event.timestamp.clone();
            }
            _ => {}
        }

        if !timestamps.archived_at.is_empty() && !timestamps.unarchived_at.is_empty() {
            break;
        }
    }

    timestamps
}
