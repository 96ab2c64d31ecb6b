//! # Connect Four Server
//!
//! Real-time multiplayer Connect Four. Two seated players and any number of
//! spectators share a room addressed by a six-character code; the server owns
//! the only authoritative copy of each game and pushes it to every member
//! after each change.
//!
//! ## Modules
//!
//! - [`game`]: Board, player seats, game state machine
//! - [`session`]: Rooms, role assignment, room registry, event gateway
//! - [`protocol`]: JSON event catalog exchanged over WebSocket
//! - [`server`]: axum router, socket tasks, single-owner event loop
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
pub mod server;
pub mod session;
