use std::time::Instant;

use engine::profiling::{PassTimings, Profiler};
use tracing::{debug, warn};

use crate::catalog::{ActionKind, CATALOG, Ctx};
use crate::confirm::confirm_frame;
use crate::detect::{FrameDetector, LastDetections};
use crate::display::{self, DisplayRow};
use crate::history::{ActionEntry, ActionHistory};
use crate::input::ProcessedInput;
use crate::player::{ActionState, PlayerState};
use crate::poll::{PORTS, PollRange, PollRecorder};
use crate::settings::TrackerSettings;

/// The detection engine. Owns the action history and all per-port bookkeeping.
///
/// Hosts call `pre_think` before the simulation consumes a player's input,
/// `post_think` after, and `on_action_state_change` whenever the player's state
/// changes. Poll recording lives in `PollRecorder` so it can run from the polling
/// interrupt.
#[derive(Debug, Clone)]
pub struct ActionTracker {
    settings: TrackerSettings,
    history: ActionHistory,
    last_detections: [LastDetections; PORTS],
    resolve_missed: [bool; PORTS],
}

impl Default for ActionTracker {
    fn default() -> Self {
        Self::new(TrackerSettings::default())
    }
}

impl ActionTracker {
    pub fn new(settings: TrackerSettings) -> Self {
        let settings = settings.sanitized();
        Self {
            history: ActionHistory::new(settings.history.action_capacity),
            settings,
            last_detections: [[None; ActionKind::COUNT]; PORTS],
            resolve_missed: [false; PORTS],
        }
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn polls_per_frame(&self) -> u32 {
        self.settings.polling.polls_per_frame
    }

    /// A recorder sized for these settings.
    pub fn poll_recorder(&self) -> PollRecorder {
        PollRecorder::new(self.settings.poll_capacity(), self.settings.polling.queue_len)
    }

    /// Detects actions from the polls the simulation is about to consume. Returns how
    /// many entries were appended.
    pub fn pre_think(&mut self, polls: &PollRecorder, player: &PlayerState, qread: u8) -> usize {
        if !player.is_human_controlled() {
            return 0;
        }
        let range = self.resolve(polls, player.port, qread);
        self.detect(polls, player, range)
    }

    /// `pre_think`, reporting resolve and detect timings to `profiler`.
    pub fn pre_think_profiled(
        &mut self,
        polls: &PollRecorder,
        player: &PlayerState,
        qread: u8,
        profiler: &mut dyn Profiler,
    ) -> usize {
        if !player.is_human_controlled() {
            return 0;
        }

        let start = Instant::now();
        let range = self.resolve(polls, player.port, qread);
        let resolved = Instant::now();
        let emitted = self.detect(polls, player, range);
        let done = Instant::now();

        profiler.on_pass(
            player.port,
            range.len(),
            PassTimings {
                resolve: resolved - start,
                detect: done - resolved,
                total: done - start,
            },
        );
        emitted
    }

    /// Confirms pending entries against the frame's state transition. `new_state` is
    /// `None` when the state did not change. Returns the entry confirmed successful, if any.
    pub fn post_think(&mut self, player: &PlayerState, new_state: Option<ActionState>) -> Option<usize> {
        if !player.is_human_controlled() {
            return None;
        }
        let ctx = Ctx::new(player, &self.settings.tuning, self.polls_per_frame());
        confirm_frame(&ctx, &self.settings.timing, &mut self.history, new_state)
    }

    /// Appends a state-entered action if some type is bound to `new_state`.
    ///
    /// `during_input` is true when the change happened while the simulation processed
    /// input; otherwise it is treated as happening at the end of the frame.
    pub fn on_action_state_change(
        &mut self,
        polls: &PollRecorder,
        player: &PlayerState,
        new_state: ActionState,
        qread: u8,
        during_input: bool,
    ) -> Option<usize> {
        if !player.is_human_controlled() {
            return None;
        }

        let action_type = CATALOG
            .iter()
            .find(|action_type| action_type.on_action_state == Some(new_state))?;

        let port = player.port;
        let range = polls.resolve_frame(port, qread);
        let poll_index = if range.is_empty() {
            polls.next_index(port)
        } else if during_input {
            range.start
        } else {
            range.end + 1
        };

        let index = self
            .history
            .push(ActionEntry::entered(action_type.kind, poll_index, port));
        debug!(port, action = action_type.name, poll = poll_index, "entered action state");
        Some(index)
    }

    /// Forgets all actions, e.g. when a match ends.
    pub fn clear(&mut self) {
        self.history.clear();
        self.last_detections = [[None; ActionKind::COUNT]; PORTS];
        self.resolve_missed = [false; PORTS];
    }

    /// Newest-first display rows across all ports, capped at the configured row count.
    pub fn display_rows(&self) -> Vec<DisplayRow> {
        display::rows(
            &self.history,
            self.polls_per_frame(),
            self.settings.history.display_rows,
            None,
        )
    }

    fn resolve(&mut self, polls: &PollRecorder, port: u8, qread: u8) -> PollRange {
        let range = polls.resolve_frame(port, qread);
        let Some(missed) = self.resolve_missed.get_mut(usize::from(port)) else {
            return PollRange::EMPTY;
        };

        if range.is_empty() {
            if !*missed {
                warn!(port, qread, "no polls recorded for this frame; skipping detection");
            }
            *missed = true;
        } else {
            *missed = false;
        }
        range
    }

    fn detect(&mut self, polls: &PollRecorder, player: &PlayerState, range: PollRange) -> usize {
        let (Some(buffer), Some(last_detections)) = (
            polls.polls(player.port),
            self.last_detections.get_mut(usize::from(player.port)),
        ) else {
            return 0;
        };

        let polls_per_frame = self.settings.polling.polls_per_frame;
        let ctx = Ctx::new(player, &self.settings.tuning, polls_per_frame);
        let mut detector = FrameDetector::new(&self.settings.timing, polls_per_frame);

        for poll_index in range.indices() {
            let Some(sample) = buffer.get(poll_index) else {
                continue;
            };
            let input = ProcessedInput::new(player, &sample.status, self.settings.tuning.lr_deadzone);
            detector.detect_poll(&ctx, &mut self.history, last_detections, &input, poll_index);
        }

        detector.emitted()
    }
}
