use std::io::{self, Write};
use crossterm::{
    cursor, queue,
    style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal,
};

use crate::model::AppView;

/// Per-tab counts shown next to the tab titles.
pub struct TabCounts {
    pub running: usize,
    pub stopped: usize,
    pub images: usize,
    pub networks: usize,
    pub volumes: usize,
}

fn tab_label(view: AppView, counts: &TabCounts) -> String {
    match view {
        AppView::Containers => {
            format!(" Containers ({}/{}) ", counts.running, counts.running + counts.stopped)
        }
        AppView::Images => format!(" Images ({}) ", counts.images),
        AppView::Networks => format!(" Networks ({}) ", counts.networks),
        AppView::Volumes => format!(" Volumes ({}) ", counts.volumes),
        AppView::Metrics => " Metrics ".to_string(),
    }
}

pub fn render_tab_bar(
    out: &mut impl Write,
    current_view: AppView,
    counts: &TabCounts,
    docker_available: bool,
    time: &str,
) -> io::Result<()> {
    write!(out, "  ")?;

    for view in AppView::ALL {
        if view == current_view {
            queue!(out, SetBackgroundColor(Color::DarkBlue), SetForegroundColor(Color::White))?;
        } else {
            queue!(out, SetForegroundColor(Color::DarkGrey))?;
        }
        write!(out, "{}", tab_label(view, counts))?;
        queue!(out, ResetColor)?;
        write!(out, "  ")?;
    }

    if !docker_available {
        queue!(out, SetForegroundColor(Color::Red))?;
        write!(out, "Docker unavailable")?;
        queue!(out, ResetColor)?;
    }

    // Right-align the time
    let size = terminal::size()?;
    let time_str = format!("dockdash - {} ", time);
    let col = (size.0 as usize).saturating_sub(time_str.len());
    queue!(out, cursor::MoveTo(col as u16, 0), SetForegroundColor(Color::DarkGrey))?;
    write!(out, "{}", time_str)?;
    queue!(out, ResetColor)?;

    write!(out, "\r\n")?;
    let sep: String = "─".repeat(size.0 as usize);
    queue!(out, SetForegroundColor(Color::DarkGrey))?;
    write!(out, "{}\r\n", sep)?;
    queue!(out, ResetColor)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_include_counts() {
        let counts = TabCounts { running: 2, stopped: 3, images: 7, networks: 4, volumes: 1 };
        assert_eq!(tab_label(AppView::Containers, &counts), " Containers (2/5) ");
        assert_eq!(tab_label(AppView::Images, &counts), " Images (7) ");
        assert_eq!(tab_label(AppView::Volumes, &counts), " Volumes (1) ");
        assert_eq!(tab_label(AppView::Metrics, &counts), " Metrics ");
    }
}
