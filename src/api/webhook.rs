//! Webhook handler for GitLab events

use axum::{
    body::Bytes,
    extract::State as AxumState,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::SharedState;
use crate::dispatch::Launched;
use crate::error::{ReceiverError, Result};
use crate::template::expand;
use crate::validate::validate;
use crate::webhook::{EVENT_HEADER, TOKEN_HEADER, WebhookPayload, parse_body, project_url};

/// Handles a GitLab webhook POST on any path.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let delivery_id = Uuid::now_v7();
    let span = info_span!("hook", %delivery_id, project = tracing::field::Empty);

    async move {
        info!("Hook received");
        if let Some(event) = headers.get(EVENT_HEADER).and_then(|v| v.to_str().ok()) {
            debug!("Event header: {}", event);
        }

        match run_pipeline(&state, &headers, &body) {
            Ok(launched) => {
                info!("Hook command called (pid {:?})", launched.pid);
                (StatusCode::OK, "Hook command called\n").into_response()
            }
            Err(e) => {
                match &e {
                    ReceiverError::UnknownProject { .. } | ReceiverError::InvalidToken { .. } => {
                        warn!("Rejected hook: {}", e)
                    }
                    _ => error!("Hook failed: {}", e),
                }
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

/// One pass over parse, authenticate, substitute and dispatch.
/// The first failing stage ends the request.
fn run_pipeline(state: &SharedState, headers: &HeaderMap, body: &[u8]) -> Result<Launched> {
    let document = parse_body(body)?;

    let project = project_url(&document)
        .ok_or_else(|| ReceiverError::UnknownProject {
            project: "<none>".to_string(),
        })?
        .to_string();
    tracing::Span::current().record("project", project.as_str());

    let presented = headers.get(TOKEN_HEADER).map(HeaderValue::as_bytes);
    let config = validate(&project, presented, &state.config)?;

    let payload = WebhookPayload::from_document(document)?;
    let substitutions = payload.substitutions();
    debug!("Available variable substitutions: {:?}", substitutions);

    let argv = expand(&config.command, &substitutions)?;
    if argv.is_empty() {
        return Err(ReceiverError::EmptyCommand { project });
    }

    info!("Calling {}", argv.join(" "));
    state.dispatcher.dispatch(&argv)
}
