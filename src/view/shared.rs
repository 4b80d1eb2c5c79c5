use std::io::{self, Write};
use crossterm::{
    cursor, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Truncate a string to at most `max_len` characters (not bytes), appending "..."
/// if truncated. Safe for multi-byte UTF-8.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let keep = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(keep).collect();
        format!("{}...", truncated)
    }
}

pub fn writeln(out: &mut impl Write, text: &str) -> io::Result<()> {
    write!(out, "{}\r\n", text)
}

pub fn write_section_header(out: &mut impl Write, text: &str, selected: bool) -> io::Result<()> {
    if selected {
        queue!(out, SetBackgroundColor(Color::DarkBlue), SetForegroundColor(Color::White))?;
    } else {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    write!(out, "{}\r\n", text)?;
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    Ok(())
}

pub fn write_selectable(out: &mut impl Write, text: &str, selected: bool) -> io::Result<()> {
    if selected {
        queue!(out, SetBackgroundColor(Color::DarkGrey), SetForegroundColor(Color::White))?;
    }
    write!(out, "{}\r\n", text)?;
    if selected {
        queue!(out, ResetColor)?;
    }
    Ok(())
}

pub fn write_bold(out: &mut impl Write, text: &str) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Bold))?;
    write!(out, "{}", text)?;
    queue!(out, SetAttribute(Attribute::Reset))?;
    write!(out, "\r\n")
}

/// Action feedback line, shown in yellow (red for errors).
pub fn write_status(out: &mut impl Write, status_message: &Option<String>) -> io::Result<()> {
    if let Some(msg) = status_message {
        writeln(out, "")?;
        let color = if msg.starts_with("Error") { Color::Red } else { Color::Yellow };
        queue!(out, SetForegroundColor(color))?;
        writeln(out, &format!("  {}", msg))?;
        queue!(out, ResetColor)?;
    }
    Ok(())
}

/// Key help pinned to the last terminal row.
pub fn write_footer(out: &mut impl Write, help: &str) -> io::Result<()> {
    let size = terminal::size()?;
    let help_y = size.1.saturating_sub(1);
    queue!(
        out,
        cursor::MoveTo(1, help_y),
        SetForegroundColor(Color::DarkGrey),
        Print(format!("{:<width$}", help, width = size.0 as usize)),
        ResetColor
    )
}

pub fn progress_bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// One-line chart of the last `width` values, scaled to `max` (or the series peak if larger).
pub fn sparkline(values: &[f64], width: usize, max: f64) -> String {
    let start = values.len().saturating_sub(width);
    let window = &values[start..];
    let peak = window.iter().cloned().fold(max, f64::max);
    if peak <= 0.0 {
        return SPARK_LEVELS[0].to_string().repeat(window.len());
    }
    window
        .iter()
        .map(|v| {
            let level = ((v.max(0.0) / peak) * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn truncate_str_long_string() {
        assert_eq!(truncate_str("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_str_utf8() {
        assert_eq!(truncate_str("café", 4), "café");
        assert_eq!(truncate_str("日本語", 3), "日本語");
        assert_eq!(truncate_str("hello世界", 6), "hel..."); // 7 chars, keep=3
    }

    #[test]
    fn progress_bar_bounds() {
        assert_eq!(progress_bar(0.0, 10), "[░░░░░░░░░░]");
        assert_eq!(progress_bar(100.0, 5), "[█████]");
        assert_eq!(progress_bar(250.0, 4), "[████]");
    }

    #[test]
    fn sparkline_scales_to_max() {
        assert_eq!(sparkline(&[0.0, 50.0, 100.0], 10, 100.0), "▁▅█");
    }

    #[test]
    fn sparkline_keeps_last_width_values() {
        assert_eq!(sparkline(&[100.0, 0.0, 0.0], 2, 100.0), "▁▁");
    }

    #[test]
    fn sparkline_all_zero() {
        assert_eq!(sparkline(&[0.0, 0.0], 5, 0.0), "▁▁");
        assert_eq!(sparkline(&[], 5, 100.0), "");
    }
}
