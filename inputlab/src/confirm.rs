//! Post-frame confirmation: did a detected attempt actually happen, and can it still be
//! used as a base.

use tracing::{debug, trace};

use crate::catalog::Ctx;
use crate::history::{ActionHistory, FinalInput};
use crate::player::ActionState;
use crate::settings::TimingSettings;

/// Walks the player's entries oldest first. At most one pending entry can be confirmed
/// successful per frame.
pub fn confirm_frame(
    ctx: &Ctx<'_>,
    timing: &TimingSettings,
    history: &mut ActionHistory,
    new_state: Option<ActionState>,
) -> Option<usize> {
    let player = ctx.player;
    let entries = history.entries_mut();
    let first = entries.tail_index()?;
    let mut performed = None;

    for index in first..entries.count() {
        let Some(entry) = entries.get_mut(index) else {
            continue;
        };
        if entry.port != player.port {
            continue;
        }

        let action_type = entry.action_type();

        if entry.final_input.is_none() {
            entry.final_input = Some(FinalInput {
                input: player.input,
                direction: player.direction,
            });
        }

        if !entry.confirmed {
            if let Some(success_predicate) = action_type.success_predicate {
                if performed.is_none() && success_predicate(ctx, new_state) {
                    // Entries that were active from the start keep whatever retirement
                    // already happened.
                    entry.active |= action_type.must_succeed;
                    entry.success = true;
                    entry.confirmed = true;
                    performed = Some(index);
                    debug!(
                        port = entry.port,
                        action = action_type.name,
                        poll = entry.poll_index,
                        "action succeeded"
                    );
                } else {
                    entry.success_timer += 1;
                    if entry.success_timer >= action_type.success_window {
                        entry.confirmed = true;
                        trace!(
                            port = entry.port,
                            action = action_type.name,
                            poll = entry.poll_index,
                            "action did not happen"
                        );
                    }
                }
            }
        }

        if entry.active {
            if let Some(end_predicate) = action_type.end_predicate {
                if entry.end_timer == 0 {
                    if end_predicate(ctx) {
                        let delay = action_type.end_delay.frames(timing);
                        if delay == 0 {
                            entry.active = false;
                        } else {
                            entry.end_timer = delay;
                        }
                    }
                } else {
                    entry.end_timer -= 1;
                    if entry.end_timer == 0 {
                        entry.active = false;
                    }
                }

                if !entry.active {
                    trace!(port = entry.port, action = action_type.name, "action ended");
                }
            }
        }
    }

    performed
}
