use std::collections::HashMap;

use bollard::Docker;
use bollard::container::{
    Config, CreateContainerOptions, ListContainersOptions, RemoveContainerOptions,
    StartContainerOptions, StatsOptions, StopContainerOptions,
};
use bollard::image::{ListImagesOptions, RemoveImageOptions};
use bollard::models::{ContainerSummary, ImageSummary, Network, Volume};
use bollard::network::{CreateNetworkOptions, InspectNetworkOptions, ListNetworksOptions};
use bollard::volume::ListVolumesOptions;
use futures_util::StreamExt;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::error::{DockerError, Result};
use crate::model::{
    ContainerInfo, ContainerStats, ImageInfo, NetworkInfo, StoppedContainerInfo, VolumeContainer,
    VolumeInfo, dedup_by_key,
};
use crate::stats::{self, StatsSample};
use crate::validate;

/// Seconds the engine waits for a graceful stop before killing the container.
const STOP_TIMEOUT_SECS: i64 = 10;

/// Wrapper around bollard's Docker client.
#[derive(Clone)]
pub struct DockerClient {
    client: Docker,
}

impl DockerClient {
    /// Build a client from the local defaults (`DOCKER_HOST` or the platform socket).
    /// This does not touch the daemon; call [`DockerClient::ping`] for that.
    pub fn connect() -> Result<Self> {
        let client = Docker::connect_with_local_defaults().map_err(|e| {
            warn!(error = %e, "failed to configure Docker client");
            DockerError::Unavailable
        })?;
        Ok(Self { client })
    }

    /// Ping the daemon to verify it is reachable.
    pub async fn ping(&self) -> Result<()> {
        self.client.ping().await.map(|_| ()).map_err(|e| {
            debug!(error = %e, "Docker ping failed");
            DockerError::Unavailable
        })
    }

    pub async fn is_available(&self) -> bool {
        self.ping().await.is_ok()
    }

    // --- Containers ---

    /// List running containers with a stats snapshot for each.
    pub async fn list_running(&self) -> Result<Vec<ContainerInfo>> {
        let options: ListContainersOptions<String> = ListContainersOptions {
            all: false, // only running
            ..Default::default()
        };
        let summaries = self.client.list_containers(Some(options)).await?;
        let mut containers = dedup_by_key(
            summaries.iter().map(summary_to_info).collect(),
            |c: &ContainerInfo| c.id.clone(),
        );

        // Fetch stats for all containers concurrently
        let ids: Vec<String> = containers.iter().map(|c| c.id.clone()).collect();
        let all_stats = join_all(ids.iter().map(|id| self.container_stats(id))).await;
        for (c, result) in containers.iter_mut().zip(all_stats) {
            match result {
                Ok(s) => c.stats = s,
                Err(e) => debug!(container_id = %c.id, error = %e, "stats unavailable"),
            }
        }
        Ok(containers)
    }

    /// List containers that have exited.
    pub async fn list_stopped(&self) -> Result<Vec<StoppedContainerInfo>> {
        let options = ListContainersOptions {
            all: true,
            filters: HashMap::from([("status".to_string(), vec!["exited".to_string()])]),
            ..Default::default()
        };
        let summaries = self.client.list_containers(Some(options)).await?;
        Ok(dedup_by_key(
            summaries.iter().map(summary_to_stopped).collect(),
            |c: &StoppedContainerInfo| c.id.clone(),
        ))
    }

    /// Fetch a single stats reading for a container.
    pub async fn container_stats(&self, container_id: &str) -> Result<ContainerStats> {
        // one_shot would skip the precpu reading and leave CPU % at zero.
        let options = StatsOptions {
            stream: false,
            one_shot: false,
        };

        let mut stream = self.client.stats(container_id, Some(options));
        match stream.next().await {
            Some(Ok(raw)) => Ok(stats::container_stats(&StatsSample::from(&raw))),
            Some(Err(e)) => Err(e.into()),
            None => Err(DockerError::NotFound(container_id.to_string())),
        }
    }

    pub async fn start_container(&self, container_id: &str) -> Result<()> {
        self.client
            .start_container(container_id, None::<StartContainerOptions<String>>)
            .await?;
        info!(container_id, "container started");
        Ok(())
    }

    pub async fn stop_container(&self, container_id: &str) -> Result<()> {
        let options = StopContainerOptions { t: STOP_TIMEOUT_SECS };
        self.client.stop_container(container_id, Some(options)).await?;
        info!(container_id, "container stopped");
        Ok(())
    }

    /// Force-remove a container, running or not.
    pub async fn remove_container(&self, container_id: &str) -> Result<()> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        self.client.remove_container(container_id, Some(options)).await?;
        info!(container_id, "container removed");
        Ok(())
    }

    // --- Images ---

    /// One record per repository tag; dangling images are skipped.
    pub async fn list_images(&self) -> Result<Vec<ImageInfo>> {
        let options: ListImagesOptions<String> = ListImagesOptions {
            all: false,
            ..Default::default()
        };
        let summaries = self.client.list_images(Some(options)).await?;
        let images = summaries.iter().flat_map(image_to_infos).collect();
        Ok(dedup_by_key(images, ImageInfo::reference))
    }

    /// Create and start a detached container from an image. Returns the short container id.
    pub async fn run_image(&self, reference: &str) -> Result<String> {
        let config = Config {
            image: Some(reference.to_string()),
            ..Default::default()
        };
        let created = self
            .client
            .create_container(None::<CreateContainerOptions<String>>, config)
            .await?;
        for warning in &created.warnings {
            warn!(image = reference, warning = %warning, "engine warning on create");
        }
        self.client
            .start_container(&created.id, None::<StartContainerOptions<String>>)
            .await?;
        let id = short_id(&created.id);
        info!(image = reference, container_id = %id, "image started");
        Ok(id)
    }

    /// Force-remove an image by reference or id.
    pub async fn remove_image(&self, reference: &str) -> Result<()> {
        let options = RemoveImageOptions {
            force: true,
            ..Default::default()
        };
        self.client.remove_image(reference, Some(options), None).await?;
        info!(image = reference, "image removed");
        Ok(())
    }

    // --- Networks ---

    pub async fn list_networks(&self) -> Result<Vec<NetworkInfo>> {
        self.list_networks_filtered(HashMap::new()).await
    }

    /// List networks matching engine filters, inspecting each to learn its attached containers.
    pub async fn list_networks_filtered(
        &self,
        filters: HashMap<String, Vec<String>>,
    ) -> Result<Vec<NetworkInfo>> {
        let options = ListNetworksOptions { filters };
        let listed = self.client.list_networks(Some(options)).await?;
        let names: Vec<String> = listed.into_iter().filter_map(|n| n.name).collect();

        let inspected = join_all(names.iter().map(|name| self.inspect_network(name))).await;
        let mut networks = Vec::with_capacity(inspected.len());
        for (name, result) in names.iter().zip(inspected) {
            match result {
                Ok(n) => networks.push(n),
                // The network may have been removed between list and inspect.
                Err(e) => debug!(network = %name, error = %e, "skipping network"),
            }
        }
        networks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(dedup_by_key(networks, |n: &NetworkInfo| n.name.clone()))
    }

    pub async fn inspect_network(&self, name: &str) -> Result<NetworkInfo> {
        let network = self
            .client
            .inspect_network(name, None::<InspectNetworkOptions<String>>)
            .await?;
        Ok(network_to_info(&network))
    }

    /// Create a bridge network after validating the name. Returns the network id.
    pub async fn create_network(&self, name: &str) -> Result<String> {
        let existing = self.list_networks().await?;
        validate::validate_network_name(name, existing.iter().map(|n| n.name.as_str()))?;

        let options = CreateNetworkOptions {
            name: name.to_string(),
            driver: "bridge".to_string(),
            ..Default::default()
        };
        self.client.create_network(options).await?;
        let created = self.inspect_network(name).await?;
        info!(network = name, network_id = %created.id, "network created");
        Ok(created.id)
    }

    /// Remove a network; refuses predefined networks and networks with attached containers.
    pub async fn remove_network(&self, name: &str) -> Result<()> {
        validate::check_network_removable(name)?;
        let network = self.inspect_network(name).await?;
        if !network.containers.is_empty() {
            return Err(DockerError::Conflict(format!(
                "Please detach {} container(s) before deleting this network.",
                bracket_names(&network.containers)
            )));
        }
        self.client.remove_network(name).await?;
        info!(network = name, "network removed");
        Ok(())
    }

    // --- Volumes ---

    /// List volumes, each with the containers (running or not) that mount it.
    pub async fn list_volumes(&self) -> Result<Vec<VolumeInfo>> {
        let response = self
            .client
            .list_volumes(None::<ListVolumesOptions<String>>)
            .await?;
        for warning in response.warnings.iter().flatten() {
            warn!(warning = %warning, "engine warning on volume list");
        }
        let mut volumes: Vec<VolumeInfo> = response
            .volumes
            .unwrap_or_default()
            .iter()
            .map(volume_to_info)
            .collect();

        let users = join_all(volumes.iter().map(|v| self.volume_containers(&v.name))).await;
        for (volume, result) in volumes.iter_mut().zip(users) {
            match result {
                Ok(containers) => volume.containers = containers,
                Err(e) => debug!(volume = %volume.name, error = %e, "volume users unavailable"),
            }
        }
        volumes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(dedup_by_key(volumes, |v: &VolumeInfo| v.name.clone()))
    }

    async fn volume_containers(&self, volume: &str) -> Result<Vec<VolumeContainer>> {
        let options = ListContainersOptions {
            all: true,
            filters: HashMap::from([("volume".to_string(), vec![volume.to_string()])]),
            ..Default::default()
        };
        let summaries = self.client.list_containers(Some(options)).await?;
        Ok(summaries.iter().map(summary_to_volume_user).collect())
    }
}

// --- Free helper functions ---

pub fn short_id(id: &str) -> String {
    id.trim_start_matches("sha256:").chars().take(12).collect()
}

fn bracket_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("[{}]", n))
        .collect::<Vec<_>>()
        .join(" ")
}

fn container_name(s: &ContainerSummary, fallback: &str) -> String {
    s.names
        .as_ref()
        .and_then(|n| n.first())
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_else(|| fallback.to_string())
}

pub fn summary_to_info(s: &ContainerSummary) -> ContainerInfo {
    let id = short_id(s.id.as_deref().unwrap_or_default());
    ContainerInfo {
        name: container_name(s, &id),
        image: s.image.clone().unwrap_or_default(),
        state: s.state.clone().unwrap_or_default(),
        status: s.status.clone().unwrap_or_default(),
        uptime: format_uptime(elapsed_since(s.created.unwrap_or(0))),
        stats: ContainerStats::default(), // filled separately via stats
        id,
    }
}

pub fn summary_to_stopped(s: &ContainerSummary) -> StoppedContainerInfo {
    let id = short_id(s.id.as_deref().unwrap_or_default());
    StoppedContainerInfo {
        name: container_name(s, &id),
        image: s.image.clone().unwrap_or_default(),
        created: format_age(elapsed_since(s.created.unwrap_or(0))),
        status: s.status.clone().unwrap_or_default(),
        id,
    }
}

pub fn image_to_infos(s: &ImageSummary) -> Vec<ImageInfo> {
    let id = short_id(&s.id);
    let created = format_age(elapsed_since(s.created));
    let size = s.size.max(0) as u64;

    s.repo_tags
        .iter()
        .filter_map(|tag| tag.rsplit_once(':'))
        .filter(|(repo, _)| *repo != "<none>")
        .map(|(repo, tag)| ImageInfo {
            repository: repo.to_string(),
            tag: tag.to_string(),
            id: id.clone(),
            size,
            created: created.clone(),
        })
        .collect()
}

pub fn network_to_info(n: &Network) -> NetworkInfo {
    let mut containers: Vec<String> = n
        .containers
        .as_ref()
        .map(|c| c.values().filter_map(|nc| nc.name.clone()).collect())
        .unwrap_or_default();
    containers.sort();

    NetworkInfo {
        name: n.name.clone().unwrap_or_default(),
        id: short_id(n.id.as_deref().unwrap_or_default()),
        driver: n.driver.clone().unwrap_or_default(),
        scope: n.scope.clone().unwrap_or_default(),
        containers,
    }
}

pub fn volume_to_info(v: &Volume) -> VolumeInfo {
    let created = v
        .created_at
        .as_deref()
        .and_then(|ts| chrono::DateTime::parse_from_rfc3339(ts).ok())
        .and_then(|ts| elapsed_since(ts.timestamp()));
    VolumeInfo {
        name: v.name.clone(),
        driver: v.driver.clone(),
        mountpoint: v.mountpoint.clone(),
        created: format_age(created),
        containers: Vec::new(),
    }
}

fn summary_to_volume_user(s: &ContainerSummary) -> VolumeContainer {
    let id = short_id(s.id.as_deref().unwrap_or_default());
    VolumeContainer {
        name: container_name(s, &id),
        state: s.state.clone().unwrap_or_default(),
        status: s.status.clone().unwrap_or_default(),
    }
}

/// Seconds elapsed since a unix timestamp; `None` when the timestamp is unset.
fn elapsed_since(created_ts: i64) -> Option<u64> {
    if created_ts == 0 {
        return None;
    }
    let now = chrono::Utc::now().timestamp();
    Some((now - created_ts).max(0) as u64)
}

pub fn format_uptime(elapsed: Option<u64>) -> String {
    let Some(secs) = elapsed else { return "unknown".to_string() };

    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {}m", h, m)
    } else {
        let d = secs / 86400;
        let h = (secs % 86400) / 3600;
        format!("{}d {}h", d, h)
    }
}

/// Coarse relative age, e.g. "3 days ago".
pub fn format_age(elapsed: Option<u64>) -> String {
    let Some(secs) = elapsed else { return "unknown".to_string() };

    let (n, unit) = if secs < 60 {
        return "just now".to_string();
    } else if secs < 3600 {
        (secs / 60, "minute")
    } else if secs < 86400 {
        (secs / 3600, "hour")
    } else if secs < 86400 * 30 {
        (secs / 86400, "day")
    } else if secs < 86400 * 365 {
        (secs / (86400 * 30), "month")
    } else {
        (secs / (86400 * 365), "year")
    };
    let plural = if n == 1 { "" } else { "s" };
    format!("{} {}{} ago", n, unit, plural)
}
