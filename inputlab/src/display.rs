//! Read-only view of the action history for overlays and the replay tool.

use std::fmt;

use serde::Serialize;

use crate::history::{ActionEntry, ActionHistory};

/// Frame deltas at or past this are shown as "...".
const MAX_SHOWN_FRAME_DELTA: f32 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaseLink {
    /// Starts a new sequence.
    None,
    Known { name: &'static str, frame_delta: f32 },
    /// The base was pushed out of the history.
    Evicted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub index: usize,
    pub port: u8,
    pub poll_index: usize,
    pub name: &'static str,
    pub base: BaseLink,
    pub success: bool,
    pub description: Option<String>,
}

impl DisplayRow {
    pub fn starts_sequence(&self) -> bool {
        self.base == BaseLink::None
    }

    fn from_entry(history: &ActionHistory, index: usize, entry: &ActionEntry, polls_per_frame: u32) -> Self {
        let base_entry = history.base_of(entry);
        let base = match (entry.base, base_entry) {
            (None, _) => BaseLink::None,
            (Some(_), Some(base)) => BaseLink::Known {
                name: base.name(),
                frame_delta: entry.poll_index.saturating_sub(base.poll_index) as f32
                    / polls_per_frame.max(1) as f32,
            },
            (Some(_), None) => BaseLink::Evicted,
        };

        let action_type = entry.action_type();
        let description = match action_type.format_description {
            Some(format) => Some(format(entry, base_entry)),
            None => action_type.input_name(entry.input_type).map(str::to_string),
        };

        Self {
            index,
            port: entry.port,
            poll_index: entry.poll_index,
            name: action_type.name,
            base,
            success: entry.success,
            description,
        }
    }
}

impl fmt::Display for DisplayRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.success { '+' } else { 'x' };
        write!(f, "{mark} ")?;

        match &self.base {
            BaseLink::Known { frame_delta, .. } if *frame_delta < MAX_SHOWN_FRAME_DELTA => {
                write!(f, "{frame_delta:5.2}f")?
            }
            BaseLink::Known { .. } | BaseLink::Evicted => f.write_str("   ...")?,
            BaseLink::None => f.write_str("      ")?,
        }

        match &self.base {
            BaseLink::Known { name, .. } => write!(f, " {name} -> {}", self.name)?,
            BaseLink::Evicted => write!(f, " ? -> {}", self.name)?,
            BaseLink::None => write!(f, " {}", self.name)?,
        }

        if let Some(description) = &self.description {
            write!(f, " ({description})")?;
        }
        Ok(())
    }
}

/// Newest-first rows. Hidden types and must-succeed entries that did not succeed are
/// skipped and do not count towards `limit`.
pub fn rows(history: &ActionHistory, polls_per_frame: u32, limit: usize, port: Option<u8>) -> Vec<DisplayRow> {
    history
        .iter_newest()
        .filter(|(_, entry)| port.is_none_or(|port| entry.port == port))
        .filter(|(_, entry)| {
            let action_type = entry.action_type();
            !action_type.hidden && (!action_type.must_succeed || entry.success)
        })
        .take(limit)
        .map(|(index, entry)| DisplayRow::from_entry(history, index, entry, polls_per_frame))
        .collect()
}

/// One line per row, with a blank spacer line under rows that start a sequence.
pub fn render_text(rows: &[DisplayRow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.to_string());
        out.push('\n');
        if row.starts_sequence() {
            out.push('\n');
        }
    }
    out
}
