//! Resource metric math, computed the same way `docker stats` does.
//!
//! Everything here works on [`StatsSample`], a flat projection of the engine's
//! stats payload, so the math can be exercised without a daemon.

use bollard::container::{MemoryStatsStats, Stats};

use crate::model::{AggregateMetrics, ContainerInfo, ContainerStats};

/// The subset of one engine stats reading that the dashboard needs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsSample {
    pub cpu_total: u64,
    pub precpu_total: u64,
    pub system_cpu: u64,
    pub presystem_cpu: u64,
    pub online_cpus: u64,
    pub memory_usage: u64,
    pub memory_cache: u64,
    pub memory_limit: u64,
    pub networks: Vec<(u64, u64)>,  // (rx_bytes, tx_bytes) per interface
    pub blkio: Vec<(String, u64)>,  // (op, bytes)
    pub pids: u64,
}

impl From<&Stats> for StatsSample {
    fn from(stats: &Stats) -> Self {
        let cpu = &stats.cpu_stats;
        let precpu = &stats.precpu_stats;

        // Fall back to the per-CPU vector when the daemon omits online_cpus (cgroup v1).
        let online_cpus = cpu.online_cpus.unwrap_or_else(|| {
            cpu.cpu_usage
                .percpu_usage
                .as_ref()
                .map(|v| v.len() as u64)
                .unwrap_or(0)
        });

        let memory_cache = match &stats.memory_stats.stats {
            Some(MemoryStatsStats::V1(v1)) => v1.total_inactive_file,
            Some(MemoryStatsStats::V2(v2)) => v2.inactive_file,
            None => 0,
        };

        let networks = stats
            .networks
            .as_ref()
            .map(|nets| nets.values().map(|n| (n.rx_bytes, n.tx_bytes)).collect())
            .unwrap_or_default();

        let blkio = stats
            .blkio_stats
            .io_service_bytes_recursive
            .as_ref()
            .map(|entries| entries.iter().map(|e| (e.op.clone(), e.value)).collect())
            .unwrap_or_default();

        StatsSample {
            cpu_total: cpu.cpu_usage.total_usage,
            precpu_total: precpu.cpu_usage.total_usage,
            system_cpu: cpu.system_cpu_usage.unwrap_or(0),
            presystem_cpu: precpu.system_cpu_usage.unwrap_or(0),
            online_cpus,
            memory_usage: stats.memory_stats.usage.unwrap_or(0),
            memory_cache,
            memory_limit: stats.memory_stats.limit.unwrap_or(0),
            networks,
            blkio,
            pids: stats.pids_stats.current.unwrap_or(0),
        }
    }
}

pub fn cpu_percent(sample: &StatsSample) -> f64 {
    let cpu_delta = sample.cpu_total as f64 - sample.precpu_total as f64;
    let system_delta = sample.system_cpu as f64 - sample.presystem_cpu as f64;

    if system_delta > 0.0 && cpu_delta > 0.0 {
        let num_cpus = sample.online_cpus.max(1) as f64;
        (cpu_delta / system_delta) * num_cpus * 100.0
    } else {
        0.0
    }
}

/// Memory in use, excluding reclaimable page cache.
pub fn memory_usage(sample: &StatsSample) -> u64 {
    if sample.memory_cache < sample.memory_usage {
        sample.memory_usage - sample.memory_cache
    } else {
        sample.memory_usage
    }
}

pub fn memory_percent(usage: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    usage as f64 / limit as f64 * 100.0
}

/// Total (rx, tx) bytes across every interface.
pub fn network_io(sample: &StatsSample) -> (u64, u64) {
    sample
        .networks
        .iter()
        .fold((0, 0), |(rx, tx), (r, t)| (rx + r, tx + t))
}

/// Total (read, write) bytes from the block I/O service counters.
pub fn block_io(sample: &StatsSample) -> (u64, u64) {
    let mut read = 0;
    let mut write = 0;
    for (op, value) in &sample.blkio {
        if op.eq_ignore_ascii_case("read") {
            read += value;
        } else if op.eq_ignore_ascii_case("write") {
            write += value;
        }
    }
    (read, write)
}

pub fn container_stats(sample: &StatsSample) -> ContainerStats {
    let usage = memory_usage(sample);
    let (net_rx, net_tx) = network_io(sample);
    let (block_read, block_write) = block_io(sample);
    ContainerStats {
        cpu_percent: cpu_percent(sample),
        memory_usage: usage,
        memory_limit: sample.memory_limit,
        memory_percent: memory_percent(usage, sample.memory_limit),
        net_rx,
        net_tx,
        block_read,
        block_write,
        pids: sample.pids,
    }
}

pub fn aggregate(containers: &[ContainerInfo]) -> AggregateMetrics {
    let mut agg = AggregateMetrics {
        container_count: containers.len(),
        ..Default::default()
    };
    for c in containers {
        agg.cpu_percent += c.stats.cpu_percent;
        agg.memory_percent += c.stats.memory_percent;
        agg.net_rx += c.stats.net_rx;
        agg.net_tx += c.stats.net_tx;
        agg.block_read += c.stats.block_read;
        agg.block_write += c.stats.block_write;
    }
    agg.cpu_available = (100.0 - agg.cpu_percent).clamp(0.0, 100.0);
    agg.memory_available = (100.0 - agg.memory_percent).clamp(0.0, 100.0);
    agg
}

/// Binary-unit byte size with two decimals, e.g. `1.50MiB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];
    if bytes < 1024 {
        return format!("{}B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = "B";
    for u in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = u;
    }
    format!("{:.2}{}", value, unit)
}

pub fn format_percent(percent: f64) -> String {
    format!("{:.2}%", percent)
}
