//! Change Events
//!
//! Notifies subscribers that cached board data is stale.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoardEvent {
    /// Contents of one board changed
    #[serde(rename_all = "camelCase")]
    BoardChanged { board_id: String },
    /// A board was created or deleted
    #[serde(rename_all = "camelCase")]
    BoardsListChanged { user_id: String },
}

/// Broadcast hub for [`BoardEvent`]s
#[derive(Clone)]
pub struct BoardEvents {
    tx: broadcast::Sender<BoardEvent>,
}

impl BoardEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.tx.subscribe()
    }

    pub fn board_changed(&self, board_id: &str) {
        self.emit(BoardEvent::BoardChanged {
            board_id: board_id.to_string(),
        });
    }

    pub fn boards_list_changed(&self, user_id: &str) {
        self.emit(BoardEvent::BoardsListChanged {
            user_id: user_id.to_string(),
        });
    }

    fn emit(&self, event: BoardEvent) {
        // No receivers is not an error
        if self.tx.send(event).is_err() {
            log::debug!("Board event dropped: no subscribers");
        }
    }
}

impl Default for BoardEvents {
    fn default() -> Self {
        Self::new()
    }
}
