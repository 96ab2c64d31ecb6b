//! Wire format: one JSON object per WebSocket text frame,
//! `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::game::{Board, GameOutcome, GameState, Player};
use crate::session::{Role, RoomCode};

pub const ROOM_NOT_FOUND: &str = "Room not found. :(";
pub const OPPONENT_LEFT: &str = "Your opponent has disconnected.";

/// Events a client may send.
///
/// Room codes arrive as raw strings; the gateway parses them so that a bad
/// code can still be answered with `join_error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    CreateRoom,
    JoinRoom(String),
    ClientReady(String),
    MakeMove(MovePayload),
    ResetGame(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePayload {
    #[serde(rename = "colIndex", alias = "column")]
    pub column: usize,
    #[serde(rename = "roomId", alias = "code")]
    pub room: String,
}

impl ClientEvent {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Events the server sends, either to one connection or to a whole room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    RoomCreated(RoomCode),
    RoomJoined(RoomCode),
    JoinError(String),
    PlayerAssigned(Role),
    GameUpdate(GameSnapshot),
    OpponentLeft(String),
}

impl ServerEvent {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Authoritative game state as pushed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: Board,
    pub current_player: Player,
    pub winner: Option<Player>,
    pub is_draw: bool,
}

impl From<&GameState> for GameSnapshot {
    fn from(state: &GameState) -> Self {
        GameSnapshot {
            board: *state.board(),
            current_player: state.current_player(),
            winner: match state.outcome() {
                Some(GameOutcome::Winner(player)) => Some(player),
                _ => None,
            },
            is_draw: state.outcome() == Some(GameOutcome::Draw),
        }
    }
}
