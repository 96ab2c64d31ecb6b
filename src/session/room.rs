use std::collections::BTreeMap;

use crate::game::{GameState, MoveError, Placement, Player};

use super::{ConnectionId, Role, RoomCode};

/// One play session: its members and their single game.
#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    members: BTreeMap<ConnectionId, Role>,
    state: GameState,
}

impl Room {
    pub fn new(code: RoomCode) -> Self {
        Room {
            code,
            members: BTreeMap::new(),
            state: GameState::initial(),
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn role_of(&self, id: ConnectionId) -> Option<Role> {
        self.members.get(&id).copied()
    }

    /// Connection currently holding `player`'s seat.
    pub fn seat_holder(&self, player: Player) -> Option<ConnectionId> {
        let role = Role::from(player);
        self.members
            .iter()
            .find(|&(_, held)| *held == role)
            .map(|(&id, _)| id)
    }

    /// Number of occupied seats (0..=2), spectators excluded.
    pub fn seated(&self) -> usize {
        self.members.values().filter(|role| role.is_player()).count()
    }

    pub fn both_seats_taken(&self) -> bool {
        self.seated() == 2
    }

    /// Give `id` a role, or return the one it already has.
    ///
    /// Seats are granted from live occupancy: X if free, then O, otherwise
    /// spectator. A seat vacated by a departed member can be taken over
    /// mid-game.
    pub fn assign_role(&mut self, id: ConnectionId) -> Role {
        if let Some(role) = self.role_of(id) {
            return role;
        }

        let role = if self.seat_holder(Player::X).is_none() {
            Role::X
        } else if self.seat_holder(Player::O).is_none() {
            Role::O
        } else {
            Role::Spectator
        };
        self.members.insert(id, role);
        role
    }

    /// Add `id` as a spectator unless it already has a role.
    pub fn admit_spectator(&mut self, id: ConnectionId) -> Role {
        *self.members.entry(id).or_insert(Role::Spectator)
    }

    /// Drop `id` from the room. Returns whether the room is now empty.
    pub fn remove(&mut self, id: ConnectionId) -> bool {
        self.members.remove(&id);
        self.members.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Members in a stable order, used as the broadcast group.
    pub fn members(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.members.keys().copied()
    }

    /// Attempt a move on behalf of `id`. Spectators and strangers are
    /// always out of turn.
    pub fn apply_move(&mut self, id: ConnectionId, column: usize) -> Result<Placement, MoveError> {
        if self.state.is_terminal() {
            return Err(MoveError::GameOver);
        }
        let player = self
            .role_of(id)
            .and_then(Role::player)
            .ok_or(MoveError::NotYourTurn)?;
        self.state.apply_move(column, player)
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn snapshot(&self) -> GameState {
        self.state
    }
}
