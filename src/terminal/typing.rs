//! Boot log typewriter
//!
//! The log is typed one character per frame after an initial delay; once the
//! last line is out the prompt appears after a short pause.

use std::time::Duration;

pub const BOOT_LOG: [&str; 13] = [
    "> Loading professional experience...",
    "> Portfolio Website (2025)",
    "  • Built using Next.js, TypeScript, and Tailwind CSS",
    "  • Implemented interactive terminal interface",
    "  • Responsive design for all devices",
    "> Symfony E-Commerce Website (2024)",
    "  • Created with Symfony and MySQL",
    "  • Features user authentication and real-time updates",
    "> Harry Potter Trading Card Website (2024)",
    "  • Built a platform for trading virtual Harry Potter cards",
    "  • Used Next.js, TypeScript and real-time Firebase database",
    "  • Implemented user authentication and card trading system",
    "> Currently perfecting my fullstack development skills...",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Waiting(Duration),
    Typing,
    Settling(Duration),
    Done,
}

#[derive(Debug, Clone)]
pub struct BootLog {
    lines: &'static [&'static str],
    line: usize,
    column: usize,
    text: String,
    phase: Phase,
}

impl Default for BootLog {
    fn default() -> Self {
        Self::new(&BOOT_LOG)
    }
}

impl BootLog {
    pub fn new(lines: &'static [&'static str]) -> Self {
        Self {
            lines,
            line: 0,
            column: 0,
            text: String::new(),
            phase: Phase::Idle,
        }
    }

    /// Clear the typed text and start over after `delay`.
    pub fn start(&mut self, delay: Duration) {
        self.reset();
        self.phase = Phase::Waiting(delay);
    }

    pub fn reset(&mut self) {
        self.line = 0;
        self.column = 0;
        self.text.clear();
        self.phase = Phase::Idle;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.phase, Phase::Waiting(_) | Phase::Typing)
    }

    pub fn prompt_ready(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Advance by one frame. Returns true if the visible state changed.
    pub fn tick(&mut self, dt: Duration, prompt_delay: Duration) -> bool {
        match self.phase {
            Phase::Idle | Phase::Done => false,
            Phase::Waiting(remaining) => {
                let remaining = remaining.saturating_sub(dt);
                self.phase = if remaining.is_zero() {
                    Phase::Typing
                } else {
                    Phase::Waiting(remaining)
                };
                false
            }
            Phase::Typing => {
                let Some(line) = self.lines.get(self.line) else {
                    self.phase = Phase::Settling(prompt_delay);
                    return false;
                };
                match line.chars().nth(self.column) {
                    Some(c) => {
                        self.text.push(c);
                        self.column += 1;
                    }
                    None => {
                        self.text.push('\n');
                        self.line += 1;
                        self.column = 0;
                    }
                }
                true
            }
            Phase::Settling(remaining) => {
                let remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    self.phase = Phase::Done;
                    true
                } else {
                    self.phase = Phase::Settling(remaining);
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);
    const PROMPT: Duration = Duration::from_millis(500);

    fn total_chars() -> usize {
        BOOT_LOG.iter().map(|l| l.chars().count() + 1).sum()
    }

    #[test]
    fn test_nothing_before_delay() {
        let mut log = BootLog::default();
        log.start(Duration::from_millis(400));
        for _ in 0..24 {
            log.tick(FRAME, PROMPT);
        }
        assert!(log.text().is_empty());
        assert!(log.is_typing());
    }

    #[test]
    fn test_one_character_per_frame() {
        let mut log = BootLog::default();
        log.start(Duration::ZERO);
        log.tick(FRAME, PROMPT);
        for _ in 0..10 {
            log.tick(FRAME, PROMPT);
        }
        assert_eq!(log.text(), "> Loading ");
    }

    #[test]
    fn test_full_log_then_prompt() {
        let mut log = BootLog::default();
        log.start(Duration::ZERO);
        log.tick(FRAME, PROMPT);
        for _ in 0..total_chars() {
            log.tick(FRAME, PROMPT);
        }
        let expected: String = BOOT_LOG.iter().map(|l| format!("{l}\n")).collect();
        assert_eq!(log.text(), expected);
        assert!(!log.prompt_ready());

        // Detect completion, then wait out the prompt delay
        log.tick(FRAME, PROMPT);
        log.tick(Duration::from_millis(400), PROMPT);
        assert!(!log.prompt_ready());
        assert!(log.tick(Duration::from_millis(100), PROMPT));
        assert!(log.prompt_ready());
    }

    #[test]
    fn test_restart_clears_text() {
        let mut log = BootLog::default();
        log.start(Duration::ZERO);
        for _ in 0..20 {
            log.tick(FRAME, PROMPT);
        }
        log.start(Duration::from_millis(1600));
        assert!(log.text().is_empty());
        assert!(!log.prompt_ready());
    }
}
