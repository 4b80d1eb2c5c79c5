//! `docker compose up` support.
//!
//! Compose has no engine endpoint, so the command runs as a subprocess. Its
//! output is only used for error reporting; the resulting networks are read
//! back through the engine API via the compose project label.

use std::collections::HashMap;
use std::path::Path;

use tokio::process::Command;
use tracing::{info, warn};

use crate::docker::DockerClient;
use crate::error::{DockerError, Result};
use crate::model::NetworkInfo;

pub const PROJECT_LABEL: &str = "com.docker.compose.project";

/// Default compose project name for a directory: its lowercased basename,
/// restricted to `[a-z0-9_-]`.
pub fn project_name(dir: &Path) -> Option<String> {
    let base = dir.file_name()?.to_string_lossy().to_lowercase();
    let name: String = base
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect();
    let name = name.trim_start_matches(['_', '-']).to_string();
    if name.is_empty() { None } else { Some(name) }
}

/// `docker` arguments for bringing a project up. The project is named explicitly so
/// the label filter that reads its networks back matches what compose created,
/// even when the compose file sets its own `name:`.
pub fn compose_args(project: &str) -> [&str; 5] {
    ["compose", "-p", project, "up", "-d"]
}

impl DockerClient {
    /// Bring up the compose project in `dir` and return its networks with their containers.
    pub async fn compose_up(&self, dir: &Path) -> Result<Vec<NetworkInfo>> {
        if !dir.is_dir() {
            return Err(DockerError::Validation(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        let dir = dir.canonicalize()?;
        let project = project_name(&dir).ok_or_else(|| {
            DockerError::Validation(format!("cannot derive a project name from {}", dir.display()))
        })?;

        info!(dir = %dir.display(), project = %project, "running docker compose up");
        let output = Command::new("docker")
            .args(compose_args(&project))
            .current_dir(&dir)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(project = %project, stderr = %stderr, "docker compose up failed");
            return Err(DockerError::Compose(stderr));
        }

        let filters = HashMap::from([(
            "label".to_string(),
            vec![format!("{}={}", PROJECT_LABEL, project)],
        )]);
        let networks = self.list_networks_filtered(filters).await?;
        if networks.is_empty() {
            info!(project = %project, "compose project defines no networks of its own");
        }
        Ok(networks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn project_name_lowercases_and_filters() {
        assert_eq!(project_name(Path::new("/srv/My App.v2")), Some("myappv2".to_string()));
        assert_eq!(project_name(Path::new("/home/me/shop_api-1")), Some("shop_api-1".to_string()));
    }

    #[test]
    fn project_name_strips_leading_separators() {
        assert_eq!(project_name(Path::new("/tmp/__stack")), Some("stack".to_string()));
    }

    #[test]
    fn compose_runs_under_the_derived_project() {
        let project = project_name(Path::new("/srv/My App.v2")).unwrap();
        assert_eq!(compose_args(&project), ["compose", "-p", "myappv2", "up", "-d"]);
    }

    #[test]
    fn project_name_none_when_nothing_left() {
        assert_eq!(project_name(Path::new("/")), None);
        assert_eq!(project_name(&PathBuf::from("/tmp/...")), None);
    }
}
