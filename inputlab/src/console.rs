use std::fmt;

use engine::RingBuffer;

pub const HISTORY_LINES: usize = 16;
pub const LINE_LENGTH: usize = 80;

/// Scrollback of the in-game console. Old lines fall off the top.
#[derive(Debug, Clone)]
pub struct ConsoleLog {
    lines: RingBuffer<String>,
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self {
            lines: RingBuffer::new(HISTORY_LINES),
        }
    }

    pub fn print(&mut self, line: &str) {
        let line = match line.char_indices().nth(LINE_LENGTH) {
            Some((end, _)) => &line[..end],
            None => line,
        };
        self.lines.add(line.to_string());
    }

    pub fn print_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.print(&args.to_string());
    }

    /// Oldest first, the order they are drawn in.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter_oldest().map(|(_, line)| line.as_str())
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.head(0).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_newest_lines() {
        let mut console = ConsoleLog::new();
        for i in 0..20 {
            console.print(&format!("line {i}"));
        }
        let lines: Vec<&str> = console.lines().collect();
        assert_eq!(lines.len(), HISTORY_LINES);
        assert_eq!(lines[0], "line 4");
        assert_eq!(console.last(), Some("line 19"));
    }

    #[test]
    fn long_lines_are_truncated() {
        let mut console = ConsoleLog::new();
        console.print(&"é".repeat(100));
        assert_eq!(console.last().map(|l| l.chars().count()), Some(LINE_LENGTH));

        console.print_fmt(format_args!("{:>7} {:.1}f", "XY", 2.5));
        assert_eq!(console.last(), Some("     XY 2.5f"));
    }
}
