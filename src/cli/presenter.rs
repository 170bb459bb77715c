//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::lecture::{Highlight, Lecture, TranscriptSegment};

/// Width of the live loudness meter in cells
const METER_WIDTH: usize = 10;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Print a line above the live spinner without disturbing it
    pub fn println_above_spinner(&self, line: &str) {
        match &self.spinner {
            Some(spinner) => spinner.println(line),
            None => println!("{}", line),
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Format elapsed seconds as mm:ss (or h:mm:ss past the hour)
    pub fn format_timestamp(&self, secs: u64) -> String {
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;
        if hours == 0 {
            format!("{:02}:{:02}", minutes, seconds)
        } else {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        }
    }

    /// Format the live status line: state, elapsed time, loudness meter,
    /// and the current interim text tail
    pub fn format_status(&self, state: &str, duration_secs: u64, level: u8, interim: &str) -> String {
        let meter = self.level_meter(level);
        let time = self.format_timestamp(duration_secs);
        if interim.is_empty() {
            format!("[{}] {} {}", state.to_uppercase(), time, meter)
        } else {
            format!("[{}] {} {} {}", state.to_uppercase(), time, meter, interim.dimmed())
        }
    }

    /// Render a 0-100 loudness level as a fixed-width bar
    pub fn level_meter(&self, level: u8) -> String {
        let filled = (level.min(100) as usize * METER_WIDTH) / 100;
        format!(
            "{}{}",
            "█".repeat(filled).cyan(),
            "░".repeat(METER_WIDTH - filled)
        )
    }

    /// Format one transcript segment line, marking highlights
    pub fn format_segment(&self, segment: &TranscriptSegment) -> String {
        let marker = if segment.is_highlight {
            "★".yellow().to_string()
        } else {
            " ".to_string()
        };
        format!(
            "{} [{}] {}",
            marker,
            self.format_timestamp(segment.timestamp_secs),
            segment.text
        )
    }

    /// Format one highlight with its summary and keywords
    pub fn format_highlight(&self, highlight: &Highlight) -> String {
        let mut line = format!(
            "{} [{}] {}",
            "★".yellow(),
            self.format_timestamp(highlight.timestamp_secs),
            highlight.summary
        );
        if !highlight.keywords.is_empty() {
            line.push_str(&format!("  ({})", highlight.keywords.join(", ").dimmed()));
        }
        line
    }

    /// Print a one-line summary for a stored lecture
    pub fn lecture_row(&self, lecture: &Lecture) {
        println!(
            "{}  {}  {}  {}  {} highlights",
            lecture.id().to_string().dimmed(),
            lecture.created_at().format("%Y-%m-%d %H:%M"),
            self.format_timestamp(lecture.duration_secs()),
            lecture.title().bold(),
            lecture.highlights().len()
        );
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_under_an_hour() {
        let presenter = Presenter::new();
        assert_eq!(presenter.format_timestamp(0), "00:00");
        assert_eq!(presenter.format_timestamp(62), "01:02");
        assert_eq!(presenter.format_timestamp(600), "10:00");
    }

    #[test]
    fn timestamp_past_an_hour() {
        let presenter = Presenter::new();
        assert_eq!(presenter.format_timestamp(3661), "1:01:01");
    }

    #[test]
    fn status_line_contains_time_and_state() {
        let presenter = Presenter::new();
        let status = presenter.format_status("recording", 42, 50, "");
        assert!(status.contains("RECORDING"));
        assert!(status.contains("00:42"));
    }

    #[test]
    fn status_line_appends_interim() {
        let presenter = Presenter::new();
        let status = presenter.format_status("recording", 5, 0, "물리학의");
        assert!(status.contains("물리학의"));
    }

    #[test]
    fn level_meter_is_fixed_width() {
        let presenter = Presenter::new();
        for level in [0u8, 37, 100] {
            let meter = presenter.level_meter(level);
            let cells = meter.chars().filter(|c| *c == '█' || *c == '░').count();
            assert_eq!(cells, METER_WIDTH);
        }
    }

    #[test]
    fn segment_line_marks_highlights() {
        let presenter = Presenter::new();
        let plain = TranscriptSegment::new(3, "오늘은 날씨가 좋습니다.", false);
        let flagged = TranscriptSegment::new(9, "반드시 기억하세요!", true);
        assert!(!presenter.format_segment(&plain).contains('★'));
        assert!(presenter.format_segment(&flagged).contains('★'));
        assert!(presenter.format_segment(&flagged).contains("00:09"));
    }

    #[test]
    fn highlight_line_includes_keywords() {
        let presenter = Presenter::new();
        let highlight = Highlight::new(
            12,
            "이건 정말 중요합니다!",
            "이건 정말 중요합니다",
            vec!["정말".to_string(), "중요합니다".to_string()],
            crate::domain::lecture::Importance::High,
        );
        let line = presenter.format_highlight(&highlight);
        assert!(line.contains("이건 정말 중요합니다"));
        assert!(line.contains("정말"));
    }
}
