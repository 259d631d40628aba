//! Recorded play sessions: everything the tracker sees from the host, frame by frame,
//! so a session can be replayed headlessly.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use engine::profiling::Profiler;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::console::ConsoleLog;
use crate::error::TraceError;
use crate::pad::RawPadStatus;
use crate::player::{ActionState, PlayerState};
use crate::poll::PORTS;
use crate::press_log::PressLog;
use crate::settings::TrackerSettings;
use crate::tracker::ActionTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracedPoll {
    pub port: u8,
    /// Pad queue slot the poll was written to.
    pub qwrite: u8,
    pub pad: RawPadStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub state: ActionState,
    /// Whether the change happened while the simulation processed input.
    #[serde(default)]
    pub during_input: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracedPlayer {
    /// Snapshot as seen before input processing.
    pub pre: PlayerState,
    /// Snapshot at the end of the frame.
    pub post: PlayerState,
    /// Set when the action state changed this frame.
    #[serde(default)]
    pub new_state: Option<ActionState>,
    #[serde(default)]
    pub state_changes: Vec<StateChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracedFrame {
    /// Pad queue slot the simulation reads this frame.
    pub qread: u8,
    /// Polls that arrived since the previous frame, in arrival order.
    #[serde(default)]
    pub polls: Vec<TracedPoll>,
    #[serde(default)]
    pub players: Vec<TracedPlayer>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionTrace {
    #[serde(default)]
    pub settings: TrackerSettings,
    #[serde(default)]
    pub frames: Vec<TracedFrame>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReplaySummary {
    pub frames: usize,
    pub polls: usize,
    pub detected: usize,
    pub succeeded: usize,
    pub presses: usize,
}

impl SessionTrace {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let trace: Self = serde_json::from_reader(io::BufReader::new(file))?;
        trace.validate()?;
        Ok(trace)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TraceError> {
        let path = path.as_ref();
        let io_error = |source: io::Error| TraceError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_error)?;
            }
        }
        let file = fs::File::create(path).map_err(io_error)?;
        let mut writer = io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(io_error)?;
        Ok(())
    }

    /// Rejects ports and queue slots the host could never produce.
    pub fn validate(&self) -> Result<(), TraceError> {
        let queue_len = self.settings.clone().sanitized().polling.queue_len;
        let check_slot = |frame: usize, slot: u8| {
            if slot < queue_len {
                Ok(())
            } else {
                Err(TraceError::InvalidQueueSlot {
                    frame,
                    slot,
                    queue_len,
                })
            }
        };
        let check_port = |frame: usize, port: u8| {
            if usize::from(port) < PORTS {
                Ok(())
            } else {
                Err(TraceError::InvalidPort { frame, port })
            }
        };

        for (frame, traced) in self.frames.iter().enumerate() {
            check_slot(frame, traced.qread)?;
            for poll in &traced.polls {
                check_port(frame, poll.port)?;
                check_slot(frame, poll.qwrite)?;
            }
            for player in &traced.players {
                check_port(frame, player.pre.port)?;
                check_port(frame, player.post.port)?;
            }
        }
        Ok(())
    }

    /// A tracker configured the way the session was recorded.
    pub fn tracker(&self) -> ActionTracker {
        ActionTracker::new(self.settings.clone())
    }

    /// Feeds every frame through `tracker` in host order: polls, then per player
    /// pre-think, state changes, post-think. Button presses are printed to `console`.
    pub fn replay(&self, tracker: &mut ActionTracker, console: &mut ConsoleLog) -> ReplaySummary {
        self.run(tracker, console, None)
    }

    /// `replay`, timing every detection pass.
    pub fn replay_profiled(
        &self,
        tracker: &mut ActionTracker,
        console: &mut ConsoleLog,
        profiler: &mut dyn Profiler,
    ) -> ReplaySummary {
        self.run(tracker, console, Some(profiler))
    }

    fn run(
        &self,
        tracker: &mut ActionTracker,
        console: &mut ConsoleLog,
        mut profiler: Option<&mut dyn Profiler>,
    ) -> ReplaySummary {
        let mut polls = tracker.poll_recorder();
        let mut press_log = PressLog::new();
        let polls_per_frame = tracker.polls_per_frame();
        let mut summary = ReplaySummary::default();

        for frame in &self.frames {
            for poll in &frame.polls {
                if polls.record(poll.port, poll.qwrite, &poll.pad).is_some() {
                    summary.polls += 1;
                }
                if press_log
                    .on_poll(poll.port, &poll.pad, polls_per_frame, console)
                    .is_some()
                {
                    summary.presses += 1;
                }
            }

            for player in &frame.players {
                summary.detected += match profiler.as_deref_mut() {
                    Some(profiler) => tracker.pre_think_profiled(&polls, &player.pre, frame.qread, profiler),
                    None => tracker.pre_think(&polls, &player.pre, frame.qread),
                };
                for change in &player.state_changes {
                    tracker.on_action_state_change(
                        &polls,
                        &player.post,
                        change.state,
                        frame.qread,
                        change.during_input,
                    );
                }
                if tracker.post_think(&player.post, player.new_state).is_some() {
                    summary.succeeded += 1;
                }
            }
            summary.frames += 1;
        }

        debug!(
            frames = summary.frames,
            polls = summary.polls,
            detected = summary.detected,
            "replayed session"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pad::button;
    use crate::player::{character, state};

    fn jump_frame(qread: u8) -> TracedFrame {
        let player = PlayerState::new(0, character::FOX, 14);
        let mut post = player.clone();
        post.action_state = state::KNEE_BEND;
        TracedFrame {
            qread,
            polls: vec![TracedPoll {
                port: 0,
                qwrite: qread.wrapping_sub(1) % 5,
                pad: RawPadStatus {
                    buttons: button::X as u16,
                    ..RawPadStatus::default()
                },
            }],
            players: vec![TracedPlayer {
                pre: player,
                post,
                new_state: Some(state::KNEE_BEND),
                state_changes: Vec::new(),
            }],
        }
    }

    #[test]
    fn replay_detects_and_confirms() {
        let trace = SessionTrace {
            settings: TrackerSettings::default(),
            frames: vec![jump_frame(1)],
        };
        let mut tracker = trace.tracker();
        let mut console = ConsoleLog::new();
        let summary = trace.replay(&mut tracker, &mut console);

        assert_eq!(summary.frames, 1);
        assert_eq!(summary.detected, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.presses, 1);
        assert_eq!(console.last(), Some("      X 0.0f"));
    }

    #[test]
    fn profiled_replay_reports_each_pass() {
        let trace = SessionTrace {
            settings: TrackerSettings::default(),
            frames: vec![jump_frame(1), jump_frame(2)],
        };
        let mut tracker = trace.tracker();
        let mut summary = engine::profiling::PassSummary::default();
        trace.replay_profiled(&mut tracker, &mut ConsoleLog::new(), &mut summary);
        assert_eq!(summary.passes, 2);
        assert_eq!(summary.polls, 2);
    }

    #[test]
    fn validate_rejects_bad_ports_and_slots() {
        let mut trace = SessionTrace {
            settings: TrackerSettings::default(),
            frames: vec![jump_frame(1)],
        };
        assert!(trace.validate().is_ok());

        trace.frames[0].polls[0].port = 4;
        assert!(matches!(
            trace.validate(),
            Err(TraceError::InvalidPort { frame: 0, port: 4 })
        ));

        trace.frames[0].polls[0].port = 0;
        trace.frames[0].qread = 9;
        assert!(matches!(
            trace.validate(),
            Err(TraceError::InvalidQueueSlot { slot: 9, queue_len: 5, .. })
        ));
    }

    #[test]
    fn missing_sections_default() {
        let trace: SessionTrace = serde_json::from_str(r#"{"frames":[{"qread":2}]}"#)
            .expect("trace JSON should parse");
        assert_eq!(trace.settings, TrackerSettings::default());
        assert!(trace.frames[0].polls.is_empty());
        assert!(trace.frames[0].players.is_empty());
    }
}
