use std::io::{self, Write};
use crossterm::{queue, style::{Color, ResetColor, SetForegroundColor}};

use crate::model::{InputMode, ListUIState, NetworkInfo};
use super::shared::{truncate_str, write_bold, write_footer, write_selectable, write_status, writeln};

const HELP: &str = "q: Quit | Tab: Switch | ↑/↓: Navigate | →: Containers | n: New | d: Delete | c: Compose up";
const HELP_EDITING: &str = "Type to edit | Enter: Submit | Esc: Cancel";

pub fn network_row(network: &NetworkInfo) -> String {
    let marker = if network.is_predefined() { " (protected)" } else { "" };
    format!("  {:<32} {:<14} {:<10} {:<8} {}{}",
        truncate_str(&network.name, 30),
        network.id,
        network.driver,
        network.scope,
        network.containers.len(),
        marker,
    )
}

/// Alert text for a network's attached containers.
pub fn attached_summary(network: &NetworkInfo) -> String {
    if network.containers.is_empty() {
        return format!("Currently no container is attached to {} network.", network.name);
    }
    let names: Vec<String> = network.containers.iter().map(|c| format!("[{}]", c)).collect();
    format!("Currently {} attached to {} network.", names.join(" "), network.name)
}

pub fn render_networks(
    out: &mut impl Write,
    networks: &[NetworkInfo],
    ui_state: &ListUIState,
    input_mode: &InputMode,
    status_message: &Option<String>,
) -> io::Result<()> {
    writeln(out, "")?;

    if let Some((label, buffer)) = input_mode.prompt() {
        queue!(out, SetForegroundColor(Color::Cyan))?;
        writeln(out, &format!("  {}: {}_", label, buffer))?;
        queue!(out, ResetColor)?;
        writeln(out, "")?;
    }

    if networks.is_empty() {
        writeln(out, "  No networks found.")?;
    } else {
        write_bold(out, &format!("  {:<32} {:<14} {:<10} {:<8} {}",
            "NAME", "NETWORK ID", "DRIVER", "SCOPE", "CONTAINERS"))?;
        for (idx, network) in networks.iter().enumerate() {
            write_selectable(out, &network_row(network), idx == ui_state.selected_index)?;

            if ui_state.expanded_ids.contains(&network.name) {
                queue!(out, SetForegroundColor(Color::DarkGrey))?;
                writeln(out, &format!("    {}", attached_summary(network)))?;
                queue!(out, ResetColor)?;
            }
        }
    }

    write_status(out, status_message)?;
    write_footer(out, if input_mode.is_editing() { HELP_EDITING } else { HELP })?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(name: &str, containers: &[&str]) -> NetworkInfo {
        NetworkInfo {
            name: name.into(),
            id: "0123456789ab".into(),
            driver: "bridge".into(),
            scope: "local".into(),
            containers: containers.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn predefined_networks_are_marked_protected() {
        assert!(network_row(&network("bridge", &[])).ends_with("(protected)"));
        assert!(!network_row(&network("backend", &[])).contains("protected"));
    }

    #[test]
    fn attached_summary_lists_names() {
        assert_eq!(
            attached_summary(&network("backend", &["api", "db"])),
            "Currently [api] [db] attached to backend network."
        );
        assert_eq!(
            attached_summary(&network("empty", &[])),
            "Currently no container is attached to empty network."
        );
    }
}
