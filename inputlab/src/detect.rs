//! Per-poll action detection, run before the simulation consumes the frame's input.

use tracing::debug;

use crate::catalog::{ActionKind, ActionType, CATALOG, Ctx};
use crate::history::{ActionEntry, ActionHistory};
use crate::input::ProcessedInput;
use crate::settings::TimingSettings;

/// Last poll each action type was detected at, per port.
pub type LastDetections = [Option<usize>; ActionKind::COUNT];

/// Bookkeeping one action type carries across the polls of a single frame.
#[derive(Debug, Clone, Copy, Default)]
struct TypeScratch {
    /// Input methods already emitted this frame.
    detected_inputs: u32,
    /// History count at the last base search; older entries are not searched again.
    bases_checked: usize,
    base: Option<usize>,
}

/// Detection state for one player's frame. Build a new one per frame.
#[derive(Debug)]
pub struct FrameDetector {
    scratch: [TypeScratch; ActionKind::COUNT],
    plink_polls: usize,
    emitted: usize,
}

impl FrameDetector {
    pub fn new(timing: &TimingSettings, polls_per_frame: u32) -> Self {
        Self {
            scratch: [TypeScratch::default(); ActionKind::COUNT],
            plink_polls: timing.plink_window as usize * polls_per_frame.max(1) as usize,
            emitted: 0,
        }
    }

    /// Entries appended so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Runs every action type against one poll, in catalog order.
    pub fn detect_poll(
        &mut self,
        ctx: &Ctx<'_>,
        history: &mut ActionHistory,
        last_detections: &mut LastDetections,
        input: &ProcessedInput,
        poll_index: usize,
    ) {
        for action_type in &CATALOG {
            self.detect_type(ctx, history, last_detections, action_type, input, poll_index);
        }
    }

    fn detect_type(
        &mut self,
        ctx: &Ctx<'_>,
        history: &mut ActionHistory,
        last_detections: &mut LastDetections,
        action_type: &'static ActionType,
        input: &ProcessedInput,
        poll_index: usize,
    ) {
        let type_index = action_type.kind.index();
        let port = ctx.player.port;
        let scratch = &mut self.scratch[type_index];

        let plinked = action_type.plinkable
            && last_detections[type_index]
                .is_some_and(|last| poll_index.saturating_sub(last) <= self.plink_polls);

        if let Some(is_base_action) = action_type.is_base_action {
            let entries = history.entries();
            let unchecked = entries.count().saturating_sub(scratch.bases_checked);

            for (index, entry) in entries.iter_newest().take(unchecked) {
                if entry.port != port {
                    continue;
                }

                // Earlier inputs of a plink are part of the same attempt.
                if plinked && entry.kind == action_type.kind {
                    continue;
                }

                // The second input of a plink counts even if the base already ended.
                if (entry.active || plinked) && is_base_action(entry) {
                    scratch.base = Some(index);
                    break;
                }
            }

            scratch.bases_checked = entries.count();
        }

        let base = scratch.base.and_then(|index| history.get(index));

        if base.is_none() && action_type.needs_base {
            return;
        }

        if !plinked {
            if let Some(state_predicate) = action_type.state_predicate {
                let poll_delta = base.map_or(0, |base| poll_index.saturating_sub(base.poll_index));
                if !state_predicate(ctx, base, poll_delta) {
                    return;
                }
            }
        }

        let mut mask = 0;
        if let Some(input_predicate) = action_type.input_predicate {
            mask |= input_predicate(ctx, input);
        }
        if let Some(base_input_predicate) = action_type.base_input_predicate {
            mask |= base_input_predicate(ctx, input, base);
        }

        // Held inputs show up on every poll of the frame; report each method once.
        mask &= !scratch.detected_inputs;
        if mask == 0 {
            return;
        }

        let base_index = base.and(scratch.base);
        scratch.detected_inputs |= mask;
        last_detections[type_index] = Some(poll_index);

        while mask != 0 {
            let input_type = mask.trailing_zeros() as u8;
            mask &= mask - 1;

            let index = history.push(ActionEntry::detected(
                action_type.kind,
                base_index,
                poll_index,
                *input,
                input_type,
                port,
            ));
            self.emitted += 1;

            debug!(
                port,
                action = action_type.name,
                poll = poll_index,
                input_type,
                index,
                plinked,
                "detected action"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pad::{Vec2, button};
    use crate::player::{PlayerState, character, state};
    use crate::settings::Tuning;

    fn pressed(buttons: u32) -> ProcessedInput {
        ProcessedInput {
            buttons,
            pressed: buttons,
            ..ProcessedInput::default()
        }
    }

    fn kinds(history: &ActionHistory) -> Vec<ActionKind> {
        history.entries().iter_oldest().map(|(_, e)| e.kind).collect()
    }

    #[test]
    fn simultaneous_buttons_emit_one_entry_each() {
        let tuning = Tuning::default();
        let player = PlayerState::new(0, character::FOX, 14);
        let ctx = Ctx::new(&player, &tuning, 8);
        let mut history = ActionHistory::new(16);
        let mut last = [None; ActionKind::COUNT];
        let mut detector = FrameDetector::new(&TimingSettings::default(), 8);

        detector.detect_poll(&ctx, &mut history, &mut last, &pressed(button::X | button::Y), 0);

        let jumps: Vec<u8> = history
            .entries()
            .iter_oldest()
            .filter(|(_, e)| e.kind == ActionKind::Jump)
            .map(|(_, e)| e.input_type)
            .collect();
        assert_eq!(jumps, vec![0, 1]);
        assert_eq!(last[ActionKind::Jump.index()], Some(0));
    }

    #[test]
    fn repeated_polls_in_one_frame_are_deduplicated() {
        let tuning = Tuning::default();
        let player = PlayerState::new(0, character::FOX, 14);
        let ctx = Ctx::new(&player, &tuning, 8);
        let mut history = ActionHistory::new(16);
        let mut last = [None; ActionKind::COUNT];
        let mut detector = FrameDetector::new(&TimingSettings::default(), 8);

        for poll in 0..3 {
            detector.detect_poll(&ctx, &mut history, &mut last, &pressed(button::X), poll);
        }
        assert_eq!(kinds(&history), vec![ActionKind::Jump]);
        assert_eq!(detector.emitted(), 1);
        assert_eq!(last[ActionKind::Jump.index()], Some(0));
    }

    #[test]
    fn needs_base_types_stay_quiet_without_one() {
        let tuning = Tuning::default();
        let player = PlayerState::new(0, character::FOX, state::DASH);
        let ctx = Ctx::new(&player, &tuning, 8);
        let mut history = ActionHistory::new(16);
        let mut last = [None; ActionKind::COUNT];
        let mut detector = FrameDetector::new(&TimingSettings::default(), 8);

        let forward = ProcessedInput {
            stick: Vec2::new(1.0, 0.0),
            ..ProcessedInput::default()
        };
        detector.detect_poll(&ctx, &mut history, &mut last, &forward, 100);
        assert!(!kinds(&history).contains(&ActionKind::Run));
    }

    #[test]
    fn other_ports_are_never_bases() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(1, character::FOX, 14);
        player.airborne = true;
        let ctx = Ctx::new(&player, &tuning, 8);
        let mut history = ActionHistory::new(16);
        history.push(ActionEntry::detected(
            ActionKind::Jump,
            None,
            0,
            ProcessedInput::default(),
            0,
            0,
        ));
        let mut last = [None; ActionKind::COUNT];
        let mut detector = FrameDetector::new(&TimingSettings::default(), 8);

        detector.detect_poll(&ctx, &mut history, &mut last, &pressed(button::L), 20);
        let dodge = history.entries().head(0).expect("air dodge detected");
        assert_eq!(dodge.kind, ActionKind::AirDodge);
        assert_eq!(dodge.port, 1);
        assert_eq!(dodge.base, None);
    }

    #[test]
    fn plinked_air_dodge_skips_state_check() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(0, character::FOX, state::ESCAPE_AIR);
        player.airborne = true;
        let ctx = Ctx::new(&player, &tuning, 8);
        let mut history = ActionHistory::new(16);
        let mut last = [None; ActionKind::COUNT];

        let mut frame = FrameDetector::new(&TimingSettings::default(), 8);
        frame.detect_poll(&ctx, &mut history, &mut last, &pressed(button::L), 10);
        assert_eq!(kinds(&history), vec![ActionKind::AirDodge]);

        // Now on the ground, but the R press comes within the plink window.
        let mut grounded = player.clone();
        grounded.airborne = false;
        grounded.action_state = state::LANDING_FALL_SPECIAL;
        let ctx = Ctx::new(&grounded, &tuning, 8);
        let mut frame = FrameDetector::new(&TimingSettings::default(), 8);
        frame.detect_poll(&ctx, &mut history, &mut last, &pressed(button::R), 30);
        assert_eq!(kinds(&history), vec![ActionKind::AirDodge, ActionKind::AirDodge]);

        // Outside the window the state check applies again.
        let mut frame = FrameDetector::new(&TimingSettings::default(), 8);
        frame.detect_poll(&ctx, &mut history, &mut last, &pressed(button::L), 80);
        assert_eq!(history.len(), 2);
    }
}
