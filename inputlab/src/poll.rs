use std::ops::RangeInclusive;

use engine::RingBuffer;
use serde::{Deserialize, Serialize};

use crate::pad::{PadStatus, RawPadStatus};

pub const PORTS: usize = 4;

/// One controller reading, tagged with the pad queue slot it was written to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollSample {
    pub qwrite: u8,
    pub status: PadStatus,
}

/// Inclusive range of logical poll indices. `start > end` means no polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollRange {
    pub start: usize,
    pub end: usize,
}

impl PollRange {
    pub const EMPTY: Self = Self { start: 1, end: 0 };

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Per-port history of raw polls.
///
/// `record` only writes into preallocated slots so it can run from the polling
/// interrupt; classification happens later on the frame loop.
#[derive(Debug, Clone)]
pub struct PollRecorder {
    ports: [RingBuffer<PollSample>; PORTS],
    queue_len: u8,
}

impl PollRecorder {
    pub fn new(capacity: usize, queue_len: u8) -> Self {
        Self {
            ports: std::array::from_fn(|_| RingBuffer::new(capacity)),
            queue_len: queue_len.max(1),
        }
    }

    pub fn queue_len(&self) -> u8 {
        self.queue_len
    }

    /// Stores one poll. Returns its logical index, or `None` when the port is unknown or
    /// the controller reported an error.
    pub fn record(&mut self, port: u8, qwrite: u8, raw: &RawPadStatus) -> Option<usize> {
        if !raw.is_connected() {
            return None;
        }
        let buffer = self.ports.get_mut(usize::from(port))?;
        Some(buffer.add(PollSample {
            qwrite,
            status: PadStatus::from_raw(raw),
        }))
    }

    pub fn polls(&self, port: u8) -> Option<&RingBuffer<PollSample>> {
        self.ports.get(usize::from(port))
    }

    pub fn get(&self, port: u8, index: usize) -> Option<&PollSample> {
        self.polls(port)?.get(index)
    }

    /// Logical index the next poll on `port` will receive.
    pub fn next_index(&self, port: u8) -> usize {
        self.polls(port).map_or(0, RingBuffer::count)
    }

    /// Finds the contiguous run of newest polls written to the slot just before `qread`,
    /// i.e. the polls the simulation consumes this frame.
    pub fn resolve_frame(&self, port: u8, qread: u8) -> PollRange {
        let Some(buffer) = self.polls(port) else {
            return PollRange::EMPTY;
        };

        let queue_len = u16::from(self.queue_len);
        let target = ((u16::from(qread) % queue_len + queue_len - 1) % queue_len) as u8;

        // Snapshot once; the interrupt may append while we scan.
        let Some(head_index) = buffer.head_index() else {
            return PollRange::EMPTY;
        };
        let stored = buffer.stored().min(head_index + 1);

        let mut start = head_index + 1 - stored;
        let mut end = None;

        for offset in 0..stored {
            let index = head_index - offset;
            let Some(poll) = buffer.get(index) else {
                continue;
            };

            match end {
                None if poll.qwrite == target => end = Some(index),
                Some(_) if poll.qwrite != target => {
                    start = index + 1;
                    break;
                }
                _ => {}
            }
        }

        match end {
            Some(end) => PollRange { start, end },
            None => PollRange::EMPTY,
        }
    }

    pub fn clear(&mut self) {
        for buffer in &mut self.ports {
            buffer.clear();
        }
    }
}
