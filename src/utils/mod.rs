//! Common utilities and helpers

pub mod logging;
pub mod path;

/// Format seconds as `MM:SS`, minutes growing past 59 for long videos
pub fn format_mm_ss(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}
