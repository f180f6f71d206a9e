//! GitLab webhook payload and the substitution variables derived from it

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ReceiverError, Result};
use crate::template::SubstitutionContext;

/// Header carrying the shared secret configured in GitLab.
pub const TOKEN_HEADER: &str = "X-Gitlab-Token";
/// Header naming the event kind, e.g. "Push Hook".
pub const EVENT_HEADER: &str = "X-Gitlab-Event";

/// Fields of a GitLab event payload used by the receiver.
/// Everything else in the body is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub object_kind: Option<String>,
    pub checkout_sha: Option<String>,
    pub user_username: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub project: PayloadProject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadProject {
    pub name: String,
    pub namespace: String,
    pub homepage: Option<String>,
    pub web_url: Option<String>,
}

/// Parse a request body into a JSON document.
/// An empty body is read as an empty object.
pub fn parse_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body)
        .map_err(|e| ReceiverError::PayloadShape(format!("body is not valid JSON: {}", e)))
}

/// The URL identifying the project: `project.homepage`, or `project.web_url`
/// for payloads that no longer send the homepage.
pub fn project_url(document: &Value) -> Option<&str> {
    let project = document.get("project")?;
    ["homepage", "web_url"]
        .iter()
        .find_map(|key| project.get(key).and_then(Value::as_str))
}

impl WebhookPayload {
    /// Decode the typed payload; a missing required field is a shape error.
    pub fn from_document(document: Value) -> Result<Self> {
        serde_json::from_value(document).map_err(|e| ReceiverError::PayloadShape(e.to_string()))
    }

    /// Build the fixed set of variables available to command templates.
    pub fn substitutions(&self) -> SubstitutionContext {
        let mut ctx = SubstitutionContext::new();
        ctx.insert("event", self.object_kind.clone());
        ctx.insert("sha", self.checkout_sha.clone());
        ctx.insert("user", self.user_username.clone());
        ctx.insert("ref", self.git_ref.clone());
        ctx.insert("project_name", Some(self.project.name.clone()));
        ctx.insert("project_owner", Some(self.project.namespace.clone()));
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn push_event() -> Value {
        json!({
            "object_kind": "push",
            "ref": "refs/heads/master",
            "checkout_sha": "da1560886d4f094c3e6c9ef40349f7d38b5d27d7",
            "user_username": "jsmith",
            "total_commits_count": 4,
            "project": {
                "id": 15,
                "name": "Diaspora",
                "namespace": "Mike",
                "homepage": "http://example.com/mike/diaspora",
                "web_url": "http://example.com/mike/diaspora-web"
            }
        })
    }

    #[test]
    fn extracts_the_fixed_variable_set() {
        let payload = WebhookPayload::from_document(push_event()).unwrap();
        let ctx = payload.substitutions();

        assert_eq!(ctx.resolve("event"), Some("push"));
        assert_eq!(
            ctx.resolve("sha"),
            Some("da1560886d4f094c3e6c9ef40349f7d38b5d27d7")
        );
        assert_eq!(ctx.resolve("user"), Some("jsmith"));
        assert_eq!(ctx.resolve("ref"), Some("refs/heads/master"));
        assert_eq!(ctx.resolve("project_name"), Some("Diaspora"));
        assert_eq!(ctx.resolve("project_owner"), Some("Mike"));
        assert_eq!(
            ctx.names().collect::<Vec<_>>(),
            ["event", "sha", "user", "ref", "project_name", "project_owner"]
        );
    }

    #[test]
    fn missing_and_null_optionals_stay_known() {
        let mut doc = push_event();
        let obj = doc.as_object_mut().unwrap();
        obj.remove("checkout_sha");
        obj.insert("user_username".into(), Value::Null);

        let ctx = WebhookPayload::from_document(doc).unwrap().substitutions();
        assert_eq!(ctx.resolve("sha"), Some(""));
        assert_eq!(ctx.resolve("user"), Some(""));
    }

    #[test]
    fn missing_project_name_is_a_shape_error() {
        let mut doc = push_event();
        doc["project"].as_object_mut().unwrap().remove("name");
        let err = WebhookPayload::from_document(doc).unwrap_err();
        assert!(matches!(err, ReceiverError::PayloadShape(ref msg) if msg.contains("name")));
    }

    #[test]
    fn project_url_prefers_homepage() {
        assert_eq!(
            project_url(&push_event()),
            Some("http://example.com/mike/diaspora")
        );

        let mut doc = push_event();
        doc["project"].as_object_mut().unwrap().remove("homepage");
        assert_eq!(
            project_url(&doc),
            Some("http://example.com/mike/diaspora-web")
        );

        assert_eq!(project_url(&json!({"object_kind": "push"})), None);
    }

    #[test]
    fn empty_body_is_an_empty_object() {
        assert_eq!(parse_body(b"").unwrap(), json!({}));
        assert_eq!(parse_body(b" \n").unwrap(), json!({}));
    }

    #[test]
    fn garbage_body_is_a_shape_error() {
        let err = parse_body(b"{not json").unwrap_err();
        assert!(matches!(err, ReceiverError::PayloadShape(_)));
    }
}
