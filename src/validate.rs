use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DockerError, Result};
use crate::model::is_predefined_network;

static NETWORK_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]{0,127}$").expect("network name pattern is valid")
});

/// Check a proposed network name against the names already present.
pub fn validate_network_name<'a, I>(name: &str, existing: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    if name.is_empty() {
        return Err(DockerError::Validation("Please enter a network name.".to_string()));
    }
    if existing.into_iter().any(|n| n == name) {
        return Err(DockerError::Conflict(format!(
            "network {} already exists in the network list",
            name
        )));
    }
    if !NETWORK_NAME.is_match(name) {
        return Err(DockerError::InvalidName(format!(
            "{}: the network name must start with an alphanumerical character and can contain alphanumerical characters, hyphens, periods or underscores",
            name
        )));
    }
    Ok(())
}

/// Refuse to delete networks the engine owns.
pub fn check_network_removable(name: &str) -> Result<()> {
    if is_predefined_network(name) {
        return Err(DockerError::Validation(format!(
            "{} is a predefined network and cannot be removed",
            name
        )));
    }
    Ok(())
}
