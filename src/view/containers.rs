use std::io::{self, Write};
use crossterm::{queue, style::{Color, ResetColor, SetForegroundColor}};

use crate::model::{ContainerInfo, ListUIState, StoppedContainerInfo};
use crate::stats::{format_bytes, format_percent};
use super::shared::{truncate_str, write_bold, write_footer, write_selectable, write_status, writeln};

const HELP: &str = "q: Quit | Tab: Switch | ↑/↓: Navigate | →: Details | s: Start | t: Stop | d: Remove (confirm with y)";

pub fn running_row(c: &ContainerInfo) -> String {
    let s = &c.stats;
    format!("  {:<14} {:<20} {:>8} {:>22} {:>8} {:>22} {:>22} {:>5}",
        c.id,
        truncate_str(&c.name, 18),
        format_percent(s.cpu_percent),
        format!("{} / {}", format_bytes(s.memory_usage), format_bytes(s.memory_limit)),
        format_percent(s.memory_percent),
        format!("{} / {}", format_bytes(s.net_rx), format_bytes(s.net_tx)),
        format!("{} / {}", format_bytes(s.block_read), format_bytes(s.block_write)),
        s.pids,
    )
}

pub fn stopped_row(c: &StoppedContainerInfo) -> String {
    format!("  {:<14} {:<20} {:<30} {}",
        c.id,
        truncate_str(&c.name, 18),
        truncate_str(&c.image, 28),
        c.created,
    )
}

pub fn render_containers(
    out: &mut impl Write,
    running: &[ContainerInfo],
    stopped: &[StoppedContainerInfo],
    ui_state: &ListUIState,
    status_message: &Option<String>,
) -> io::Result<()> {
    writeln(out, "")?;
    write_bold(out, &format!("  RUNNING CONTAINERS  Count: {}", running.len()))?;

    if running.is_empty() {
        writeln(out, "  No running containers found.")?;
    } else {
        write_bold(out, &format!("  {:<14} {:<20} {:>8} {:>22} {:>8} {:>22} {:>22} {:>5}",
            "CONTAINER ID", "NAME", "CPU %", "MEM USAGE / LIMIT", "MEM %", "NET I/O", "BLOCK I/O", "PIDS"))?;

        for (idx, c) in running.iter().enumerate() {
            write_selectable(out, &running_row(c), idx == ui_state.selected_index)?;

            if ui_state.expanded_ids.contains(&c.id) {
                queue!(out, SetForegroundColor(Color::DarkGrey))?;
                writeln(out, &format!("    Image:  {}", c.image))?;
                writeln(out, &format!("    State:  {}", c.state))?;
                writeln(out, &format!("    Status: {}", c.status))?;
                writeln(out, &format!("    Uptime: {}", c.uptime))?;
                queue!(out, ResetColor)?;
            }
        }
    }

    writeln(out, "")?;
    write_bold(out, &format!("  STOPPED CONTAINERS  Count: {}", stopped.len()))?;

    if stopped.is_empty() {
        writeln(out, "  No stopped containers.")?;
    } else {
        write_bold(out, &format!("  {:<14} {:<20} {:<30} {}", "CONTAINER ID", "NAME", "IMAGE", "CREATED"))?;

        let offset = running.len();
        for (idx, c) in stopped.iter().enumerate() {
            write_selectable(out, &stopped_row(c), offset + idx == ui_state.selected_index)?;

            if ui_state.expanded_ids.contains(&c.id) {
                queue!(out, SetForegroundColor(Color::DarkGrey))?;
                writeln(out, &format!("    Status: {}", c.status))?;
                queue!(out, ResetColor)?;
            }
        }
    }

    write_status(out, status_message)?;
    write_footer(out, HELP)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContainerStats;

    #[test]
    fn running_row_formats_stats_columns() {
        let c = ContainerInfo {
            id: "0123456789ab".into(),
            name: "web".into(),
            stats: ContainerStats {
                cpu_percent: 12.5,
                memory_usage: 1536,
                memory_limit: 2048,
                memory_percent: 75.0,
                pids: 4,
                ..Default::default()
            },
            ..Default::default()
        };
        let row = running_row(&c);
        assert!(row.contains("0123456789ab"));
        assert!(row.contains("12.50%"));
        assert!(row.contains("1.50KiB / 2.00KiB"));
        assert!(row.contains("75.00%"));
        assert!(row.trim_end().ends_with('4'));
    }

    #[test]
    fn stopped_row_shows_created() {
        let c = StoppedContainerInfo {
            id: "abc".into(),
            name: "job".into(),
            image: "busybox".into(),
            created: "3 days ago".into(),
            status: "Exited (0)".into(),
        };
        assert!(stopped_row(&c).ends_with("3 days ago"));
    }
}
