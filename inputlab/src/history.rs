use engine::RingBuffer;
use serde::{Deserialize, Serialize};

use crate::catalog::{ActionKind, ActionType};
use crate::input::ProcessedInput;
use crate::player::PlayerInput;

/// End-of-frame player input captured on the first post-think after detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalInput {
    pub input: PlayerInput,
    pub direction: f32,
}

/// One detected occurrence of an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub kind: ActionKind,
    /// Logical index of the base action in the action history. May point past the
    /// buffer's horizon once the base is evicted.
    pub base: Option<usize>,
    pub poll_index: usize,
    pub input: ProcessedInput,
    pub final_input: Option<FinalInput>,
    /// Remaining post-thinks before the entry retires. Zero while not counting down.
    pub end_timer: u32,
    pub active: bool,
    pub success_timer: u32,
    pub confirmed: bool,
    pub success: bool,
    /// Bit of the input mask that produced this entry.
    pub input_type: u8,
    pub port: u8,
}

impl ActionEntry {
    pub fn detected(
        kind: ActionKind,
        base: Option<usize>,
        poll_index: usize,
        input: ProcessedInput,
        input_type: u8,
        port: u8,
    ) -> Self {
        Self {
            kind,
            base,
            poll_index,
            input,
            final_input: None,
            end_timer: 0,
            active: !kind.action_type().must_succeed,
            success_timer: 0,
            confirmed: false,
            success: false,
            input_type,
            port,
        }
    }

    /// An entry appended because the player entered a state; already known to have happened.
    pub fn entered(kind: ActionKind, poll_index: usize, port: u8) -> Self {
        Self {
            active: true,
            confirmed: true,
            success: true,
            ..Self::detected(kind, None, poll_index, ProcessedInput::default(), 0, port)
        }
    }

    pub fn action_type(&self) -> &'static ActionType {
        self.kind.action_type()
    }

    pub fn name(&self) -> &'static str {
        self.action_type().name
    }

    pub fn is_type(&self, kinds: &[ActionKind]) -> bool {
        kinds.contains(&self.kind)
    }
}

/// Shared action history for all ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionHistory {
    entries: RingBuffer<ActionEntry>,
}

impl ActionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RingBuffer::new(capacity),
        }
    }

    pub fn entries(&self) -> &RingBuffer<ActionEntry> {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut RingBuffer<ActionEntry> {
        &mut self.entries
    }

    pub fn push(&mut self, entry: ActionEntry) -> usize {
        self.entries.add(entry)
    }

    pub fn get(&self, index: usize) -> Option<&ActionEntry> {
        self.entries.get(index)
    }

    /// Resolves an entry's base. `None` when there is none or it was evicted.
    pub fn base_of(&self, entry: &ActionEntry) -> Option<&ActionEntry> {
        self.get(entry.base?)
    }

    pub fn len(&self) -> usize {
        self.entries.stored()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resident entries from newest to oldest.
    pub fn iter_newest(&self) -> impl Iterator<Item = (usize, &ActionEntry)> + '_ {
        self.entries.iter_newest()
    }

    pub fn for_port(&self, port: u8) -> impl Iterator<Item = (usize, &ActionEntry)> + '_ {
        self.entries
            .iter_oldest()
            .filter(move |(_, entry)| entry.port == port)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
