use crate::config::{ConfigStore, ProjectConfig};
use crate::error::{ReceiverError, Result};

/// Resolve the project and check the token the sender presented.
///
/// Returns the project's configuration only when the presented token matches
/// the configured one byte for byte. A request without a token never matches.
pub fn validate<'a>(
    project_url: &str,
    presented_token: Option<&[u8]>,
    store: &'a ConfigStore,
) -> Result<&'a ProjectConfig> {
    let project = store
        .get(project_url)
        .ok_or_else(|| ReceiverError::UnknownProject {
            project: project_url.to_string(),
        })?;

    let expected = project
        .token()
        .ok_or_else(|| ReceiverError::MissingTokenConfig {
            project: project_url.to_string(),
        })?;

    match presented_token {
        Some(token) if token == expected.as_bytes() => Ok(project),
        _ => Err(ReceiverError::InvalidToken {
            project: project_url.to_string(),
        }),
    }
}
