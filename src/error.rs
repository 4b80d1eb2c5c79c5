use thiserror::Error;

/// Errors surfaced by the engine layer.
#[derive(Debug, Error)]
pub enum DockerError {
    #[error("Docker daemon is not reachable")]
    Unavailable,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("{0}")]
    Validation(String),
    #[error("docker compose failed: {0}")]
    Compose(String),
    #[error("engine error: {0}")]
    Engine(bollard::errors::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bollard::errors::Error> for DockerError {
    /// Engine 404/409 responses become typed variants; everything else stays opaque.
    fn from(err: bollard::errors::Error) -> Self {
        match err {
            bollard::errors::Error::DockerResponseServerError { status_code: 404, message } => {
                DockerError::NotFound(message)
            }
            bollard::errors::Error::DockerResponseServerError { status_code: 409, message } => {
                DockerError::Conflict(message)
            }
            other => DockerError::Engine(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DockerError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error(status_code: u16, message: &str) -> bollard::errors::Error {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message: message.to_string(),
        }
    }

    #[test]
    fn engine_404_becomes_not_found() {
        let err: DockerError = server_error(404, "No such container: abc").into();
        assert!(matches!(err, DockerError::NotFound(ref m) if m == "No such container: abc"));
    }

    #[test]
    fn engine_409_becomes_conflict() {
        let err: DockerError = server_error(409, "network web has active endpoints").into();
        assert!(matches!(err, DockerError::Conflict(_)));
    }

    #[test]
    fn other_engine_errors_stay_opaque() {
        let err: DockerError = server_error(500, "boom").into();
        assert!(matches!(err, DockerError::Engine(_)));
    }

    #[test]
    fn display_messages() {
        assert_eq!(DockerError::Unavailable.to_string(), "Docker daemon is not reachable");
        assert_eq!(
            DockerError::InvalidName("-bad".into()).to_string(),
            "invalid name: -bad"
        );
        assert_eq!(
            DockerError::Validation("Please enter a network name.".into()).to_string(),
            "Please enter a network name."
        );
    }
}
