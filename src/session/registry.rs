use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::room_code::{ROOM_CODE_ALPHABET, ROOM_CODE_LEN};
use super::{Room, RoomCode};

/// Supplies candidate room codes. Candidates may collide; the registry
/// retries until it finds a free one.
pub trait CodeSource: Send {
    fn next_code(&mut self) -> RoomCode;
}

impl<F> CodeSource for F
where
    F: FnMut() -> RoomCode + Send,
{
    fn next_code(&mut self) -> RoomCode {
        self()
    }
}

/// Uniformly random codes over `A-Z0-9`.
pub struct RandomCodes {
    rng: StdRng,
}

impl RandomCodes {
    pub fn new() -> Self {
        RandomCodes {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence, for tests and reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        RandomCodes {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomCodes {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeSource for RandomCodes {
    fn next_code(&mut self) -> RoomCode {
        let alphabet = ROOM_CODE_ALPHABET.as_bytes();
        let code: String = (0..ROOM_CODE_LEN)
            .map(|_| alphabet[self.rng.random_range(0..alphabet.len())] as char)
            .collect();
        RoomCode(code)
    }
}

/// Every live room in the process, keyed by code.
///
/// Built once at startup and handed to the gateway; nothing reaches it as
/// global state.
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
    codes: Box<dyn CodeSource>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::with_code_source(RandomCodes::new())
    }

    pub fn with_code_source(codes: impl CodeSource + 'static) -> Self {
        RoomRegistry {
            rooms: HashMap::new(),
            codes: Box::new(codes),
        }
    }

    /// Open a new, empty room under a fresh unique code.
    pub fn create(&mut self) -> &mut Room {
        let mut code = self.codes.next_code();
        while self.rooms.contains_key(&code) {
            tracing::debug!(room = %code, "room code collision, drawing again");
            code = self.codes.next_code();
        }
        self.rooms
            .entry(code.clone())
            .or_insert_with(|| Room::new(code))
    }

    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Remove the room if nobody is left in it. Returns whether it was removed.
    pub fn delete_if_empty(&mut self, code: &RoomCode) -> bool {
        match self.rooms.get(code) {
            Some(room) if room.is_empty() => {
                self.rooms.remove(code);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ConnectionId;
    use std::collections::VecDeque;

    fn code(s: &str) -> RoomCode {
        RoomCode::parse(s).unwrap()
    }

    fn scripted(codes: &[&str]) -> impl FnMut() -> RoomCode + Send {
        let mut queue: VecDeque<RoomCode> = codes.iter().map(|s| code(s)).collect();
        move || queue.pop_front().expect("script exhausted")
    }

    #[test]
    fn test_random_codes_are_valid() {
        let mut codes = RandomCodes::seeded(7);
        for _ in 0..200 {
            let generated = codes.next_code();
            assert_eq!(RoomCode::parse(generated.as_str()), Ok(generated));
        }
    }

    #[test]
    fn test_create_starts_empty_with_fresh_game() {
        let mut registry = RoomRegistry::with_code_source(scripted(&["ABC123"]));
        let room = registry.create();
        assert_eq!(room.code().as_str(), "ABC123");
        assert!(room.is_empty());
        assert_eq!(room.snapshot(), crate::game::GameState::initial());
        assert!(registry.contains(&code("ABC123")));
    }

    #[test]
    fn test_create_retries_on_collision() {
        let mut registry =
            RoomRegistry::with_code_source(scripted(&["AAAAAA", "AAAAAA", "AAAAAA", "BBBBBB"]));
        registry.create();
        let second = registry.create().code().clone();
        assert_eq!(second, code("BBBBBB"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_delete_if_empty() {
        let mut registry = RoomRegistry::with_code_source(scripted(&["ROOM01"]));
        let room = registry.create();
        room.assign_role(ConnectionId::new(1));

        assert!(!registry.delete_if_empty(&code("ROOM01")));
        assert!(registry.get(&code("ROOM01")).is_some());

        let room = registry.get_mut(&code("ROOM01")).unwrap();
        assert!(room.remove(ConnectionId::new(1)));
        assert!(registry.delete_if_empty(&code("ROOM01")));
        assert!(registry.get(&code("ROOM01")).is_none());
        assert!(registry.is_empty());
        assert!(!registry.delete_if_empty(&code("ROOM01")));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut registry = RoomRegistry::with_code_source(scripted(&["QWE789"]));
        registry.create();
        assert!(registry.get(&code("qwe789")).is_some());
    }
}
