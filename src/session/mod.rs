//! Room lifecycle and routing: seat assignment, the process-wide room
//! registry, and the gateway that turns connection events into dispatches.

mod connection;
mod gateway;
mod registry;
mod role;
mod room;
mod room_code;

pub use connection::ConnectionId;
pub use gateway::{Dispatch, Gateway, Membership};
pub use registry::{CodeSource, RandomCodes, RoomRegistry};
pub use role::Role;
pub use room::Room;
pub use room_code::{RoomCode, ROOM_CODE_ALPHABET, ROOM_CODE_LEN};
