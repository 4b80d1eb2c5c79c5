use std::io::{self, Write};
use crossterm::{queue, style::{Color, ResetColor, SetForegroundColor}, terminal};

use crate::layout::{Layout, SectionId};
use crate::model::{AggregateMetrics, ContainerInfo, ListUIState, MetricsHistory};
use crate::stats::{format_bytes, format_percent};
use super::shared::{progress_bar, sparkline, truncate_str, write_footer, write_section_header, write_status, writeln};

const HELP: &str = "q: Quit | Tab: Switch | ↑/↓: Navigate | →/←/Enter: Expand/Collapse section";
const BAR_WIDTH: usize = 30;

fn usage_color(percent: f64) -> Color {
    if percent >= 90.0 {
        Color::Red
    } else if percent >= 70.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

pub fn gauge_line(label: &str, used: f64, available: f64) -> String {
    format!("  {:<8} {} {:>8} used  {:>8} available",
        label,
        progress_bar(used, BAR_WIDTH),
        format_percent(used),
        format_percent(available),
    )
}

/// The sections of the Metrics tab, one selectable header per layout entry.
pub fn render_metrics(
    out: &mut impl Write,
    aggregate: &AggregateMetrics,
    history: &MetricsHistory,
    running: &[ContainerInfo],
    layout: &Layout,
    ui_state: &ListUIState,
    status_message: &Option<String>,
) -> io::Result<()> {
    let chart_width = (terminal::size()?.0 as usize).saturating_sub(16).min(history.capacity);

    writeln(out, "")?;
    for (idx, section) in layout.sections.iter().enumerate() {
        let indicator = if section.collapsed { "▶" } else { "▼" };
        let header = format!("  {} --- {} ---", indicator, section.title);
        write_section_header(out, &header, idx == ui_state.selected_index)?;

        if section.collapsed {
            continue;
        }

        match section.id {
            SectionId::Aggregate => render_aggregate(out, aggregate)?,
            SectionId::CpuHistory => render_series(out, "CPU", &history.cpu_series(), chart_width)?,
            SectionId::MemoryHistory => render_series(out, "Memory", &history.memory_series(), chart_width)?,
            SectionId::NetBlockIo => render_io(out, aggregate)?,
            SectionId::PerContainer => render_per_container(out, running)?,
        }
        writeln(out, "")?;
    }

    write_status(out, status_message)?;
    write_footer(out, HELP)?;
    out.flush()
}

fn render_aggregate(out: &mut impl Write, aggregate: &AggregateMetrics) -> io::Result<()> {
    writeln(out, &format!("  Running containers: {}", aggregate.container_count))?;
    queue!(out, SetForegroundColor(usage_color(aggregate.cpu_percent)))?;
    writeln(out, &gauge_line("CPU", aggregate.cpu_percent, aggregate.cpu_available))?;
    queue!(out, SetForegroundColor(usage_color(aggregate.memory_percent)))?;
    writeln(out, &gauge_line("Memory", aggregate.memory_percent, aggregate.memory_available))?;
    queue!(out, ResetColor)?;
    Ok(())
}

fn render_series(out: &mut impl Write, label: &str, values: &[f64], width: usize) -> io::Result<()> {
    if values.is_empty() {
        writeln(out, "  Collecting samples...")?;
        return Ok(());
    }
    let latest = values.last().copied().unwrap_or_default();
    let peak = values.iter().cloned().fold(0.0, f64::max);
    queue!(out, SetForegroundColor(Color::Cyan))?;
    writeln(out, &format!("  {}", sparkline(values, width, 100.0)))?;
    queue!(out, ResetColor)?;
    writeln(out, &format!("  {} now {}  peak {}  ({} samples)",
        label, format_percent(latest), format_percent(peak), values.len()))
}

fn render_io(out: &mut impl Write, aggregate: &AggregateMetrics) -> io::Result<()> {
    writeln(out, &format!("  Network  rx {:>10}   tx {:>10}",
        format_bytes(aggregate.net_rx), format_bytes(aggregate.net_tx)))?;
    writeln(out, &format!("  Block    read {:>8}   write {:>8}",
        format_bytes(aggregate.block_read), format_bytes(aggregate.block_write)))
}

fn render_per_container(out: &mut impl Write, running: &[ContainerInfo]) -> io::Result<()> {
    if running.is_empty() {
        return writeln(out, "  No running containers found.");
    }
    for c in running {
        writeln(out, &format!("  {:<20} CPU {:>8} {}  MEM {:>8} {}",
            truncate_str(&c.name, 18),
            format_percent(c.stats.cpu_percent),
            progress_bar(c.stats.cpu_percent, 10),
            format_percent(c.stats.memory_percent),
            progress_bar(c.stats.memory_percent, 10),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_line_shows_used_and_available() {
        let line = gauge_line("CPU", 25.0, 75.0);
        assert!(line.contains("25.00% used"));
        assert!(line.contains("75.00% available"));
    }

    #[test]
    fn usage_color_thresholds() {
        assert_eq!(usage_color(10.0), Color::Green);
        assert_eq!(usage_color(75.0), Color::Yellow);
        assert_eq!(usage_color(95.0), Color::Red);
    }

    #[test]
    fn series_without_samples() {
        let mut buf = Vec::new();
        render_series(&mut buf, "CPU", &[], 10).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("Collecting samples"));
    }
}
