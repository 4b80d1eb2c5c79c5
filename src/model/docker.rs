use std::collections::HashSet;

use serde::Serialize;

/// Networks the engine creates itself; they can never be removed.
pub const PREDEFINED_NETWORKS: [&str; 3] = ["bridge", "host", "none"];

/// Live resource usage for one running container.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContainerStats {
    pub cpu_percent: f64,
    pub memory_usage: u64,    // bytes, page cache excluded
    pub memory_limit: u64,
    pub memory_percent: f64,
    pub net_rx: u64,
    pub net_tx: u64,
    pub block_read: u64,
    pub block_write: u64,
    pub pids: u64,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ContainerInfo {
    pub id: String,           // short ID (first 12 chars)
    pub name: String,
    pub image: String,
    pub state: String,        // raw state string from Docker
    pub status: String,       // e.g. "Up 2 hours"
    pub uptime: String,       // human-readable (e.g. "2h 34m")
    pub stats: ContainerStats,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct StoppedContainerInfo {
    pub id: String,
    pub name: String,
    pub image: String,
    pub created: String,      // e.g. "3 days ago"
    pub status: String,       // e.g. "Exited (0) 2 hours ago"
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ImageInfo {
    pub repository: String,
    pub tag: String,
    pub id: String,           // short ID without the sha256: prefix
    pub size: u64,
    pub created: String,
}

impl ImageInfo {
    /// `repository:tag`, the reference used to run or remove this image.
    pub fn reference(&self) -> String {
        format!("{}:{}", self.repository, self.tag)
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct NetworkInfo {
    pub name: String,
    pub id: String,
    pub driver: String,
    pub scope: String,
    pub containers: Vec<String>, // attached container names
}

impl NetworkInfo {
    pub fn is_predefined(&self) -> bool {
        is_predefined_network(&self.name)
    }
}

/// A container that mounts a volume.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VolumeContainer {
    pub name: String,
    pub state: String,
    pub status: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct VolumeInfo {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
    pub created: String,
    pub containers: Vec<VolumeContainer>,
}

pub fn is_predefined_network(name: &str) -> bool {
    PREDEFINED_NETWORKS.contains(&name)
}

/// Keep the first occurrence of every key, preserving order.
pub fn dedup_by_key<T, K>(items: Vec<T>, key: K) -> Vec<T>
where
    K: Fn(&T) -> String,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

// --- List UI state ---

/// Selection and expansion state shared by every list tab.
#[derive(Default)]
pub struct ListUIState {
    pub selected_index: usize,
    pub total_rows: usize,
    pub expanded_ids: HashSet<String>,
}

impl ListUIState {
    /// Record the new row count and keep the selection inside it.
    pub fn set_total(&mut self, total: usize) {
        self.total_rows = total;
        if self.selected_index >= total {
            self.selected_index = total.saturating_sub(1);
        }
    }

    pub fn select_prev(&mut self) -> bool {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            return true;
        }
        false
    }

    pub fn select_next(&mut self) -> bool {
        if self.selected_index + 1 < self.total_rows {
            self.selected_index += 1;
            return true;
        }
        false
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        if !self.expanded_ids.remove(id) {
            self.expanded_ids.insert(id.to_string());
        }
    }
}
