use std::collections::HashMap;

use tracing::{debug, info};

use crate::game::GameOutcome;
use crate::protocol::{
    ClientEvent, GameSnapshot, MovePayload, ServerEvent, OPPONENT_LEFT, ROOM_NOT_FOUND,
};

use super::{ConnectionId, Role, Room, RoomCode, RoomRegistry};

/// One outgoing event addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub to: ConnectionId,
    pub event: ServerEvent,
}

/// Where a connection currently sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub room: RoomCode,
    pub role: Role,
}

/// Routes connection events into rooms and decides who hears about the
/// result.
///
/// Transport-free: every call returns the dispatches to deliver, in order.
/// Game rules live in `Room`; the gateway only resolves rooms and fans out.
pub struct Gateway {
    registry: RoomRegistry,
    memberships: HashMap<ConnectionId, Membership>,
}

impl Gateway {
    pub fn new(registry: RoomRegistry) -> Self {
        Gateway {
            registry,
            memberships: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub fn membership(&self, id: ConnectionId) -> Option<&Membership> {
        self.memberships.get(&id)
    }

    pub fn handle(&mut self, from: ConnectionId, event: ClientEvent) -> Vec<Dispatch> {
        match event {
            ClientEvent::CreateRoom => self.create_room(from),
            ClientEvent::JoinRoom(code) => self.join_room(from, &code),
            ClientEvent::ClientReady(code) => self.client_ready(from, &code),
            ClientEvent::MakeMove(payload) => self.make_move(from, payload),
            ClientEvent::ResetGame(code) => self.reset_game(from, &code),
        }
    }

    /// The transport reports the connection gone. Must be called once per
    /// connection.
    pub fn disconnect(&mut self, from: ConnectionId) -> Vec<Dispatch> {
        info!(connection = %from, "connection closed");
        let mut out = Vec::new();
        self.leave(from, &mut out);
        out
    }

    fn create_room(&mut self, from: ConnectionId) -> Vec<Dispatch> {
        let mut out = Vec::new();
        self.leave(from, &mut out);

        let room = self.registry.create();
        let role = room.assign_role(from);
        let code = room.code().clone();
        info!(room = %code, connection = %from, "room created");

        self.memberships.insert(
            from,
            Membership {
                room: code.clone(),
                role,
            },
        );
        out.push(direct(from, ServerEvent::RoomCreated(code)));
        out.push(direct(from, ServerEvent::PlayerAssigned(role)));
        out
    }

    fn join_room(&mut self, from: ConnectionId, raw: &str) -> Vec<Dispatch> {
        let mut out = Vec::new();
        let Some(code) = self.existing_room(raw) else {
            debug!(connection = %from, code = raw, "join for unknown room");
            out.push(direct(from, ServerEvent::JoinError(ROOM_NOT_FOUND.to_string())));
            return out;
        };

        if self.current_room(from) != Some(&code) {
            self.leave(from, &mut out);
        }

        let Some(room) = self.registry.get_mut(&code) else {
            return out;
        };
        let was_member = room.role_of(from).is_some();
        let role = room.assign_role(from);
        let completes_table = !was_member && role.is_player() && room.both_seats_taken();
        info!(room = %code, connection = %from, %role, "joined room");

        self.memberships.insert(
            from,
            Membership {
                room: code.clone(),
                role,
            },
        );
        out.push(direct(from, ServerEvent::RoomJoined(code)));
        out.push(direct(from, ServerEvent::PlayerAssigned(role)));

        let update = game_update(room);
        if completes_table {
            out.extend(broadcast(room, update));
        } else {
            out.push(direct(from, update));
        }
        out
    }

    fn client_ready(&mut self, from: ConnectionId, raw: &str) -> Vec<Dispatch> {
        let Some(code) = self.existing_room(raw) else {
            debug!(connection = %from, code = raw, "ready check for unknown room");
            return Vec::new();
        };
        if self.current_room(from).is_some_and(|current| *current != code) {
            debug!(connection = %from, room = %code, "ready check for another room ignored");
            return Vec::new();
        }
        let Some(room) = self.registry.get_mut(&code) else {
            return Vec::new();
        };

        let role = room.admit_spectator(from);
        if !self.memberships.contains_key(&from) {
            info!(room = %code, connection = %from, "unknown connection admitted as spectator");
            self.memberships.insert(from, Membership { room: code, role });
        }
        vec![direct(from, ServerEvent::PlayerAssigned(role))]
    }

    fn make_move(&mut self, from: ConnectionId, payload: MovePayload) -> Vec<Dispatch> {
        let Some(room) = self.member_room(from, &payload.room) else {
            debug!(connection = %from, code = %payload.room, "move outside own room ignored");
            return Vec::new();
        };

        match room.apply_move(from, payload.column) {
            Ok(placement) => {
                debug!(
                    room = %room.code(),
                    player = %placement.player,
                    row = placement.row,
                    column = placement.column,
                    "move applied"
                );
                match room.snapshot().outcome() {
                    Some(GameOutcome::Winner(player)) => {
                        info!(room = %room.code(), %player, "game won")
                    }
                    Some(GameOutcome::Draw) => info!(room = %room.code(), "game drawn"),
                    None => {}
                }
                broadcast(room, game_update(room))
            }
            Err(reason) => {
                debug!(
                    room = %room.code(),
                    connection = %from,
                    column = payload.column,
                    %reason,
                    "move rejected"
                );
                Vec::new()
            }
        }
    }

    /// Any member may reset, whatever its role and whatever the game state.
    fn reset_game(&mut self, from: ConnectionId, raw: &str) -> Vec<Dispatch> {
        let Some(room) = self.member_room(from, raw) else {
            debug!(connection = %from, code = raw, "reset outside own room ignored");
            return Vec::new();
        };
        room.reset();
        info!(room = %room.code(), connection = %from, "game reset");
        broadcast(room, game_update(room))
    }

    /// Take `from` out of whatever room it is in, notify the rest, and drop
    /// the room once empty.
    fn leave(&mut self, from: ConnectionId, out: &mut Vec<Dispatch>) {
        let Some(membership) = self.memberships.remove(&from) else {
            return;
        };
        let code = membership.room;
        let Some(room) = self.registry.get_mut(&code) else {
            return;
        };

        let now_empty = room.remove(from);
        info!(room = %code, connection = %from, role = %membership.role, "left room");
        out.extend(broadcast(
            room,
            ServerEvent::OpponentLeft(OPPONENT_LEFT.to_string()),
        ));

        if now_empty && self.registry.delete_if_empty(&code) {
            info!(room = %code, "room is empty and has been deleted");
        }
    }

    fn existing_room(&self, raw: &str) -> Option<RoomCode> {
        RoomCode::parse(raw)
            .ok()
            .filter(|code| self.registry.contains(code))
    }

    fn current_room(&self, id: ConnectionId) -> Option<&RoomCode> {
        self.memberships.get(&id).map(|membership| &membership.room)
    }

    /// The named room, provided `from` is one of its members.
    fn member_room(&mut self, from: ConnectionId, raw: &str) -> Option<&mut Room> {
        let code = RoomCode::parse(raw).ok()?;
        self.registry
            .get_mut(&code)
            .filter(|room| room.role_of(from).is_some())
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new(RoomRegistry::new())
    }
}

fn direct(to: ConnectionId, event: ServerEvent) -> Dispatch {
    Dispatch { to, event }
}

fn game_update(room: &Room) -> ServerEvent {
    ServerEvent::GameUpdate(GameSnapshot::from(&room.snapshot()))
}

fn broadcast(room: &Room, event: ServerEvent) -> Vec<Dispatch> {
    room.members()
        .map(|to| Dispatch {
            to,
            event: event.clone(),
        })
        .collect()
}
