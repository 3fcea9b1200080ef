use std::fmt;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Negative durations have no `HH:MM:SS` rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeDuration(pub i64);

impl fmt::Display for NegativeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot format negative duration: {}s", self.0)
    }
}

impl std::error::Error for NegativeDuration {}

/// Formats a duration in seconds as zero-padded `HH:MM:SS`. Hours are not
/// wrapped at 24, so a day renders as `24:00:00`.
pub fn elapsed_hms(seconds: i64) -> Result<String, NegativeDuration> {
    if seconds < 0 {
        return Err(NegativeDuration(seconds));
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    Ok(format!("{hours:02}:{minutes:02}:{secs:02}"))
}

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

pub fn format_kb(kb: u64) -> String {
    const MB: u64 = 1024;
    const GB: u64 = 1024 * 1024;

    if kb >= GB {
        format!("{:.1} GB", kb as f64 / GB as f64)
    } else if kb >= MB {
        format!("{:.1} MB", kb as f64 / MB as f64)
    } else {
        format!("{kb} KB")
    }
}

/// Cmdline files separate arguments with NUL bytes and usually carry a
/// trailing one. Rendered form uses single spaces.
pub fn command_display(raw: &str) -> String {
    raw.split('\0')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
