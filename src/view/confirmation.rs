use std::io::{self, Write};
use crossterm::{cursor::MoveTo, queue, style::{Attribute, Color, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor}, terminal};

pub fn confirmation_line(prompt: &str) -> String {
    format!("  {} (y to confirm, any other key to cancel)  ", prompt)
}

/// Destructive actions get a red banner just above the footer.
pub fn render_confirmation(out: &mut impl Write, prompt: &str) -> io::Result<()> {
    let size = terminal::size()?;
    let y = size.1.saturating_sub(3);
    let width = size.0 as usize;

    queue!(out, MoveTo(0, y))?;
    queue!(out, SetBackgroundColor(Color::DarkRed), SetForegroundColor(Color::White), SetAttribute(Attribute::Bold))?;
    write!(out, "{:<width$}", confirmation_line(prompt), width = width)?;
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_line_mentions_keys() {
        assert_eq!(
            confirmation_line("Remove web-1?"),
            "  Remove web-1? (y to confirm, any other key to cancel)  "
        );
    }
}
