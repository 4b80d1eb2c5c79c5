use std::io::{self, Write};
use crossterm::{queue, style::{Color, ResetColor, SetForegroundColor}};

use crate::model::{ListUIState, VolumeContainer, VolumeInfo};
use super::shared::{truncate_str, write_bold, write_footer, write_selectable, write_status, writeln};

const HELP: &str = "q: Quit | Tab: Switch | ↑/↓: Navigate | →: Containers";

pub fn volume_row(volume: &VolumeInfo) -> String {
    format!("  {:<32} {:<10} {:<16} {}",
        truncate_str(&volume.name, 30),
        volume.driver,
        volume.created,
        volume.containers.len(),
    )
}

fn user_line(container: &VolumeContainer) -> String {
    format!("    {:<30} {:<10} {}", truncate_str(&container.name, 28), container.state, container.status)
}

/// Lines shown under an expanded volume: its mountpoint, then every container using it.
pub fn detail_lines(volume: &VolumeInfo) -> Vec<String> {
    let mut lines = vec![format!("    mountpoint: {}", volume.mountpoint)];
    if volume.containers.is_empty() {
        lines.push("    No container uses this volume.".to_string());
    }
    lines.extend(volume.containers.iter().map(user_line));
    lines
}

pub fn render_volumes(
    out: &mut impl Write,
    volumes: &[VolumeInfo],
    ui_state: &ListUIState,
    status_message: &Option<String>,
) -> io::Result<()> {
    writeln(out, "")?;

    if volumes.is_empty() {
        writeln(out, "  No volumes found.")?;
    } else {
        write_bold(out, &format!("  {:<32} {:<10} {:<16} {}",
            "VOLUME NAME", "DRIVER", "CREATED", "CONTAINERS"))?;
        for (idx, volume) in volumes.iter().enumerate() {
            write_selectable(out, &volume_row(volume), idx == ui_state.selected_index)?;

            if ui_state.expanded_ids.contains(&volume.name) {
                queue!(out, SetForegroundColor(Color::DarkGrey))?;
                for line in detail_lines(volume) {
                    writeln(out, &line)?;
                }
                queue!(out, ResetColor)?;
            }
        }
    }

    write_status(out, status_message)?;
    write_footer(out, HELP)?;
    out.flush()
}
