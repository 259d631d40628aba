#![allow(dead_code)]

use inputlab::pad::{PadStatus, RawPadStatus};
use inputlab::player::{ActionState, PlayerState, character};
use inputlab::trace::{SessionTrace, StateChange, TracedFrame, TracedPlayer, TracedPoll};
use inputlab::{ActionEntry, ActionKind, ActionTracker, PollRecorder, TrackerSettings};

pub const POLLS_PER_FRAME: usize = 8;

const HOLD_THRESHOLD: f32 = 0.2875;
const HOLD_RESET: u32 = 0xFE;

pub fn neutral() -> RawPadStatus {
    RawPadStatus::default()
}

pub fn stick(x: i8, y: i8) -> RawPadStatus {
    RawPadStatus {
        stick_x: x,
        stick_y: y,
        ..RawPadStatus::default()
    }
}

pub fn buttons(bits: u32) -> RawPadStatus {
    RawPadStatus {
        buttons: bits as u16,
        ..RawPadStatus::default()
    }
}

pub fn with_buttons(pad: RawPadStatus, bits: u32) -> RawPadStatus {
    RawPadStatus {
        buttons: bits as u16,
        ..pad
    }
}

/// A single-player stand-in for the simulation: writes polls into the pad queue,
/// runs the tracker passes in frame order and records everything as a trace.
pub struct Host {
    pub tracker: ActionTracker,
    pub polls: PollRecorder,
    pub player: PlayerState,
    pub trace: SessionTrace,
    qwrite: u8,
    qread: u8,
    pending: Option<Pending>,
}

struct Pending {
    frame: TracedFrame,
    pre: PlayerState,
    state_changes: Vec<StateChange>,
}

impl Host {
    pub fn new(player: PlayerState) -> Self {
        let settings = TrackerSettings::default();
        let tracker = ActionTracker::new(settings.clone());
        Self {
            polls: tracker.poll_recorder(),
            tracker,
            player,
            trace: SessionTrace {
                settings,
                frames: Vec::new(),
            },
            qwrite: 0,
            qread: 0,
            pending: None,
        }
    }

    pub fn fox(action_state: ActionState) -> Self {
        Self::new(PlayerState::new(0, character::FOX, action_state))
    }

    /// Every poll of the frame reads `pad`.
    pub fn hold(&mut self, pad: RawPadStatus) -> usize {
        self.input(&[pad; POLLS_PER_FRAME])
    }

    /// Records the frame's polls and runs the pre-think pass. The last pad is what the
    /// simulation consumes.
    pub fn input(&mut self, pads: &[RawPadStatus]) -> usize {
        let queue_len = self.polls.queue_len();
        let mut traced = Vec::with_capacity(pads.len());
        for pad in pads {
            self.polls.record(self.player.port, self.qwrite, pad);
            traced.push(TracedPoll {
                port: self.player.port,
                qwrite: self.qwrite,
                pad: *pad,
            });
        }
        self.qwrite = (self.qwrite + 1) % queue_len;
        self.qread = self.qwrite;

        let pre = self.player.clone();
        let emitted = self.tracker.pre_think(&self.polls, &pre, self.qread);

        if let Some(last) = pads.last() {
            consume(&mut self.player, last);
        }

        self.pending = Some(Pending {
            frame: TracedFrame {
                qread: self.qread,
                polls: traced,
                players: Vec::new(),
            },
            pre,
            state_changes: Vec::new(),
        });
        emitted
    }

    pub fn enter_state(&mut self, state: ActionState, during_input: bool) -> Option<usize> {
        self.player.action_state = state;
        if let Some(pending) = &mut self.pending {
            pending.state_changes.push(StateChange {
                state,
                during_input,
            });
        }
        self.tracker
            .on_action_state_change(&self.polls, &self.player, state, self.qread, during_input)
    }

    /// Runs the post-think pass. `new_state` also becomes the player's state.
    pub fn finish(&mut self, new_state: Option<ActionState>) -> Option<usize> {
        if let Some(state) = new_state {
            self.player.action_state = state;
        }
        let performed = self.tracker.post_think(&self.player, new_state);

        if let Some(mut pending) = self.pending.take() {
            pending.frame.players.push(TracedPlayer {
                pre: pending.pre,
                post: self.player.clone(),
                new_state,
                state_changes: pending.state_changes,
            });
            self.trace.frames.push(pending.frame);
        }
        performed
    }

    pub fn frame(&mut self, pad: RawPadStatus, new_state: Option<ActionState>) -> usize {
        let emitted = self.hold(pad);
        self.finish(new_state);
        emitted
    }

    pub fn entries(&self) -> Vec<(usize, ActionEntry)> {
        self.tracker
            .history()
            .entries()
            .iter_oldest()
            .map(|(index, entry)| (index, entry.clone()))
            .collect()
    }

    pub fn kinds(&self) -> Vec<ActionKind> {
        self.entries().into_iter().map(|(_, entry)| entry.kind).collect()
    }

    pub fn find(&self, kind: ActionKind) -> Option<(usize, ActionEntry)> {
        self.entries().into_iter().find(|(_, entry)| entry.kind == kind)
    }
}

/// Updates the player's previous-frame input the way the simulation does.
fn consume(player: &mut PlayerState, pad: &RawPadStatus) {
    let status = PadStatus::from_raw(pad);
    let input = &mut player.input;
    input.stick_x_hold_time = hold_time(status.stick.x, input.stick.x, input.stick_x_hold_time);
    input.stick_y_hold_time = hold_time(status.stick.y, input.stick.y, input.stick_y_hold_time);
    input.stick = status.stick;
    input.cstick = status.cstick;
    input.held_buttons = status.buttons;
}

fn hold_time(value: f32, last: f32, last_hold: u32) -> u32 {
    let sign = 1f32.copysign(value);
    if value * sign < HOLD_THRESHOLD {
        HOLD_RESET
    } else if last * sign < HOLD_THRESHOLD {
        0
    } else {
        last_hold.saturating_add(1)
    }
}
