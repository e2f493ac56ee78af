// Textual progress bar for stream transfers

use std::io::Write;

/// Number of segments between the brackets
pub const BAR_SEGMENTS: usize = 25;

/// Render a bracketed bar for `progress` percent (0..=100).
///
/// `-` fills the completed part and `>` marks the boundary. At or below 0%
/// the body is blank; at 100% the bar ends with a line break so later output
/// starts on a fresh line.
pub fn progress_bar(length: usize, progress: f64) -> String {
    let mut bar = String::with_capacity(length + 3);
    bar.push('[');

    if length == 0 || progress.is_nan() || progress <= 0.0 {
        bar.push_str(&" ".repeat(length));
        bar.push(']');
        return bar;
    }

    let progress = progress.min(100.0);
    // Negative values saturate to 0 when cast
    let done = ((progress / (100.0 / length as f64)) - 1.0) as usize;
    let done = done.min(length - 1);
    let blank = length - done - 1;

    bar.push_str(&"-".repeat(done));
    bar.push('>');
    bar.push_str(&" ".repeat(blank));
    bar.push(']');

    if progress >= 100.0 {
        bar.push('\n');
    }
    bar
}

/// Completion percentage from a `(total, remaining)` progress update.
pub fn percentage(total: u64, remaining: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let remaining = remaining.min(total);
    (1.0 - remaining as f64 / total as f64) * 100.0
}

/// Console sink redrawing the bar on a single terminal line
pub struct ConsoleProgress {
    segments: usize,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            segments: BAR_SEGMENTS,
        }
    }

    pub fn report(&mut self, total: u64, remaining: u64) {
        let bar = progress_bar(self.segments, percentage(total, remaining));
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "{}\r", bar);
        let _ = out.flush();
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}
