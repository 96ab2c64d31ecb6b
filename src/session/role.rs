use serde::{Deserialize, Serialize};

use crate::game::Player;

/// What a connection may do inside a room.
///
/// Serializes to the wire tags `"X"`, `"O"` and `"spectator"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    X,
    O,
    #[serde(rename = "spectator")]
    Spectator,
}

impl Role {
    /// The seat this role plays, `None` for spectators.
    pub fn player(self) -> Option<Player> {
        match self {
            Role::X => Some(Player::X),
            Role::O => Some(Player::O),
            Role::Spectator => None,
        }
    }

    pub fn is_player(self) -> bool {
        self.player().is_some()
    }
}

impl From<Player> for Role {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Role::X,
            Player::O => Role::O,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::X => f.write_str("X"),
            Role::O => f.write_str("O"),
            Role::Spectator => f.write_str("spectator"),
        }
    }
}
