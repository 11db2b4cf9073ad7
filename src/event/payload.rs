//! event::payload
//!
//! Wire format for push events.
//!
//! # Format
//!
//! Receivers expect a form-encoded body with a single `payload` field whose
//! value is the JSON document below. Field order follows the struct order.
//!
//! ```json
//! {
//!   "before": "<old>", "after": "<new>", "ref": "refs/heads/main",
//!   "commits": [{
//!     "id": "...", "message": "...", "timestamp": "YYYY-MM-DDTHH:MM:SS+00:00",
//!     "author": {"name": "...", "email": "..."}, "url": "...",
//!     "added": [], "modified": [], "removed": []
//!   }],
//!   "repository": {"name": "...", "url": "...", "description": "...", "owner": {"name": "..."}}
//! }
//! ```
//!
//! All escaping is done by `serde_json` and `serde_urlencoded`; no string
//! is ever spliced into the document by hand.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::event::{ChangeKind, CommitEvent, PushEvent};

/// Name of the form field carrying the JSON document.
pub const PAYLOAD_FIELD: &str = "payload";

/// Errors from encoding or decoding payloads.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("failed to serialize payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to form-encode payload: {0}")]
    FormEncode(#[from] serde_urlencoded::ser::Error),

    #[error("failed to decode form body: {0}")]
    FormDecode(#[from] serde_urlencoded::de::Error),

    #[error("form body has no 'payload' field")]
    MissingPayload,
}

/// Root JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    pub before: String,
    pub after: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub commits: Vec<CommitPayload>,
    pub repository: RepositoryPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitPayload {
    pub id: String,
    pub message: String,
    pub timestamp: String,
    pub author: AuthorPayload,
    pub url: String,
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub removed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorPayload {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner: OwnerPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerPayload {
    pub name: String,
}

impl From<&PushEvent> for PushPayload {
    fn from(event: &PushEvent) -> Self {
        let repository = &event.repository;
        PushPayload {
            before: event.before.to_string(),
            after: event.after.to_string(),
            ref_name: event.ref_name.clone(),
            commits: event
                .commits
                .iter()
                .map(|c| CommitPayload::new(c, repository.commit_url(&c.commit.id)))
                .collect(),
            repository: RepositoryPayload {
                name: repository.name.clone(),
                url: repository.url.clone(),
                description: repository.description.clone(),
                owner: OwnerPayload {
                    name: repository.owner.clone(),
                },
            },
        }
    }
}

impl CommitPayload {
    fn new(event: &CommitEvent, url: String) -> Self {
        let paths = |kind| -> Vec<String> {
            event.paths(kind).into_iter().map(str::to_string).collect()
        };
        let commit = &event.commit;

        CommitPayload {
            id: commit.id.to_string(),
            message: commit.message.clone(),
            timestamp: commit.committed_at.to_payload_string(),
            author: AuthorPayload {
                name: commit.author_name.clone(),
                email: commit.author_email.clone(),
            },
            url,
            added: paths(ChangeKind::Added),
            modified: paths(ChangeKind::Modified),
            removed: paths(ChangeKind::Removed),
        }
    }
}

/// A serialized, form-encoded request body.
///
/// Produced once per push event and shared by every delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBody {
    json: String,
    encoded: String,
}

impl FormBody {
    /// MIME type of the encoded body.
    pub const CONTENT_TYPE: &'static str = "application/x-www-form-urlencoded";

    /// Serialize a push event into a form body.
    ///
    /// # Example
    ///
    /// ```
    /// use pushrelay::event::payload::{decode_form, FormBody, PushPayload};
    /// # use pushrelay::core::event::{PushEvent, RepositoryDescriptor};
    /// # use pushrelay::core::types::Oid;
    /// # let event = PushEvent {
    /// #     before: Oid::zero(),
    /// #     after: Oid::new("a".repeat(40)).unwrap(),
    /// #     ref_name: "refs/heads/main".into(),
    /// #     commits: vec![],
    /// #     repository: RepositoryDescriptor {
    /// #         name: "demo".into(),
    /// #         url: "/srv/demo.git".into(),
    /// #         description: None,
    /// #         owner: "demo".into(),
    /// #         commit_url_template: RepositoryDescriptor::DEFAULT_COMMIT_URL.into(),
    /// #     },
    /// # };
    /// let body = FormBody::encode(&event).unwrap();
    /// assert!(body.as_str().starts_with("payload="));
    ///
    /// let decoded = decode_form(body.as_str()).unwrap();
    /// assert_eq!(decoded, PushPayload::from(&event));
    /// ```
    pub fn encode(event: &PushEvent) -> Result<Self, PayloadError> {
        let json = serde_json::to_string(&PushPayload::from(event))?;
        let encoded = serde_urlencoded::to_string([(PAYLOAD_FIELD, json.as_str())])?;
        Ok(Self { json, encoded })
    }

    /// The form-encoded body.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// The JSON document before form encoding.
    pub fn json(&self) -> &str {
        &self.json
    }

    pub fn len(&self) -> usize {
        self.encoded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoded.is_empty()
    }
}

/// Decode a form body back into the JSON document it carries.
///
/// This is what a receiver does; tests and debugging tools use it to check
/// that encoding is lossless.
pub fn decode_form(body: &str) -> Result<PushPayload, PayloadError> {
    let fields: Vec<(String, String)> = serde_urlencoded::from_str(body)?;
    let json = fields
        .into_iter()
        .find(|(key, _)| key == PAYLOAD_FIELD)
        .map(|(_, value)| value)
        .ok_or(PayloadError::MissingPayload)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{Commit, FileChange, RepositoryDescriptor};
    use crate::core::types::{Oid, UtcTimestamp};

    fn event(description: Option<&str>) -> PushEvent {
        let commit = Commit {
            id: Oid::new("c".repeat(40)).unwrap(),
            parent_id: Some(Oid::new("b".repeat(40)).unwrap()),
            author_name: "Zoë \"Z\" O'Brien".into(),
            author_email: "zoe@example.com".into(),
            message: "Fix & escape {braces}\n\tand \\backslashes\\".into(),
            committed_at: UtcTimestamp::from_epoch_seconds(1_344_830_706).unwrap(),
        };
        PushEvent {
            before: Oid::new("b".repeat(40)).unwrap(),
            after: Oid::new("c".repeat(40)).unwrap(),
            ref_name: "refs/heads/main".into(),
            commits: vec![CommitEvent {
                commit,
                changes: vec![
                    FileChange::new("docs/read me.md", ChangeKind::Added),
                    FileChange::new("src/\"quoted\".rs", ChangeKind::Modified),
                    FileChange::new("ünïcödé/файл.txt", ChangeKind::Removed),
                ],
            }],
            repository: RepositoryDescriptor {
                name: "widgets".into(),
                url: "https://git.example.com/widgets".into(),
                description: description.map(str::to_string),
                owner: "Example Corp".into(),
                commit_url_template: RepositoryDescriptor::DEFAULT_COMMIT_URL.into(),
            },
        }
    }

    #[test]
    fn json_field_order_matches_receivers() {
        let body = FormBody::encode(&event(Some("Widgets"))).unwrap();
        let json = body.json();

        let order = [
            "\"before\"",
            "\"after\"",
            "\"ref\"",
            "\"commits\"",
            "\"id\"",
            "\"message\"",
            "\"timestamp\"",
            "\"author\"",
            "\"url\"",
            "\"added\"",
            "\"modified\"",
            "\"removed\"",
            "\"repository\"",
            "\"description\"",
            "\"owner\"",
        ];
        let positions: Vec<usize> = order.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);
    }

    #[test]
    fn commit_fields_mapped() {
        let payload = PushPayload::from(&event(None));
        let commit = &payload.commits[0];

        assert_eq!(commit.timestamp, "2012-08-13T04:05:06+00:00");
        assert_eq!(commit.added, vec!["docs/read me.md"]);
        assert_eq!(commit.modified, vec!["src/\"quoted\".rs"]);
        assert_eq!(commit.removed, vec!["ünïcödé/файл.txt"]);
        assert_eq!(
            commit.url,
            format!("https://git.example.com/widgets/commit/{}", "c".repeat(40))
        );
        assert_eq!(payload.repository.owner.name, "Example Corp");
    }

    #[test]
    fn absent_description_omitted() {
        let body = FormBody::encode(&event(None)).unwrap();
        assert!(!body.json().contains("description"));
    }

    #[test]
    fn form_body_is_fully_percent_encoded() {
        let body = FormBody::encode(&event(Some("a & b = c"))).unwrap();
        let encoded = body.as_str();

        assert!(encoded.starts_with("payload="));
        // Only the field separator may appear unescaped.
        assert_eq!(encoded.matches('=').count(), 1);
        assert!(!encoded.contains('&'));
        assert!(!encoded.contains('"'));
        assert!(!encoded.contains(' '));
    }

    #[test]
    fn decode_reverses_encode() {
        let original = event(Some("Widgets \"deluxe\""));
        let body = FormBody::encode(&original).unwrap();
        assert_eq!(decode_form(body.as_str()).unwrap(), PushPayload::from(&original));
    }

    #[test]
    fn decode_without_payload_field() {
        assert!(matches!(
            decode_form("other=1"),
            Err(PayloadError::MissingPayload)
        ));
    }
}
