//! Prints the time between consecutive button presses, measured in polls.

use serde::Serialize;

use crate::console::ConsoleLog;
use crate::pad::{RawPadStatus, button};
use crate::poll::PORTS;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressEvent {
    pub port: u8,
    pub buttons: u32,
    /// Polls since the previous press on this port.
    pub interval_polls: u32,
}

impl PressEvent {
    pub fn button_names(&self) -> String {
        button::NAMED
            .iter()
            .filter(|(bit, _)| self.buttons & bit != 0)
            .map(|(_, name)| *name)
            .collect()
    }

    pub fn interval_frames(&self, polls_per_frame: u32) -> f32 {
        self.interval_polls as f32 / polls_per_frame.max(1) as f32
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PortPresses {
    poll_count: u32,
    last_press: u32,
    last_buttons: u32,
}

#[derive(Debug, Clone, Default)]
pub struct PressLog {
    ports: [PortPresses; PORTS],
}

impl PressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one poll. Prints and returns the press if any button went down.
    pub fn on_poll(
        &mut self,
        port: u8,
        raw: &RawPadStatus,
        polls_per_frame: u32,
        console: &mut ConsoleLog,
    ) -> Option<PressEvent> {
        if !raw.is_connected() {
            return None;
        }
        let presses = self.ports.get_mut(usize::from(port))?;

        let buttons = u32::from(raw.buttons);
        let pressed = (buttons ^ presses.last_buttons) & buttons;

        let event = (pressed != 0).then(|| {
            let interval_polls = presses.poll_count.wrapping_sub(presses.last_press);
            presses.last_press = presses.poll_count;
            PressEvent {
                port,
                buttons: pressed,
                interval_polls,
            }
        });

        presses.poll_count = presses.poll_count.wrapping_add(1);
        presses.last_buttons = buttons;

        if let Some(event) = &event {
            console.print_fmt(format_args!(
                "{:>7} {:.1}f",
                event.button_names(),
                event.interval_frames(polls_per_frame)
            ));
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buttons(bits: u32) -> RawPadStatus {
        RawPadStatus {
            buttons: bits as u16,
            ..RawPadStatus::default()
        }
    }

    #[test]
    fn reports_interval_between_presses() {
        let mut log = PressLog::new();
        let mut console = ConsoleLog::new();

        assert!(log.on_poll(0, &buttons(button::X), 8, &mut console).is_some());
        for _ in 0..11 {
            assert!(log.on_poll(0, &buttons(button::X), 8, &mut console).is_none());
        }
        log.on_poll(0, &buttons(0), 8, &mut console);

        let event = log
            .on_poll(0, &buttons(button::A | button::L), 8, &mut console)
            .expect("press reported");
        assert_eq!(event.interval_polls, 13);
        assert_eq!(event.button_names(), "AL");
        assert_eq!(console.last(), Some("     AL 1.6f"));
    }

    #[test]
    fn errored_polls_do_not_count() {
        let mut log = PressLog::new();
        let mut console = ConsoleLog::new();
        log.on_poll(1, &buttons(button::B), 4, &mut console);
        let errored = RawPadStatus {
            errstat: 1,
            ..buttons(0)
        };
        assert!(log.on_poll(1, &errored, 4, &mut console).is_none());
        log.on_poll(1, &buttons(0), 4, &mut console);
        let event = log.on_poll(1, &buttons(button::B), 4, &mut console);
        assert_eq!(event.map(|e| e.interval_polls), Some(2));
        assert_eq!(console.lines().count(), 2);
    }
}
