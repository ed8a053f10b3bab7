//! Server (node and proxy) topology model.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::namespace::DEFAULT_NAMESPACE;

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// A dynamic label whose value is refreshed by periodically running a
/// command on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLabel {
    /// How often the command output is refreshed.
    pub period: Duration,
    /// Command argv to execute.
    pub command: Vec<String>,
    /// Most recent command output.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub result: String,
}

impl CommandLabel {
    /// Creates a command label with no recorded result yet.
    #[must_use]
    pub fn new(period: Duration, command: Vec<String>) -> Self {
        Self {
            period,
            command,
            result: String::new(),
        }
    }
}

/// A server registered in the cluster, either a node or a proxy.
///
/// Servers are heartbeat-driven: the upstream stamps each record with an
/// expiry derived from the last heartbeat, after which the server is
/// considered gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Identifier, unique within the namespace.
    pub id: String,

    /// Network address the server accepts connections on.
    pub addr: String,

    /// Advertised hostname.
    pub hostname: String,

    /// Static labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    /// Dynamic command labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub cmd_labels: HashMap<String, CommandLabel>,

    /// Namespace partitioning the node population.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Heartbeat-derived expiry.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<OffsetDateTime>,
}

impl Server {
    /// Creates a server in the default namespace with no labels.
    #[must_use]
    pub fn new(id: impl Into<String>, addr: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            addr: addr.into(),
            hostname: hostname.into(),
            labels: HashMap::new(),
            cmd_labels: HashMap::new(),
            namespace: default_namespace(),
            expires: None,
        }
    }

    /// Moves the server into the given namespace.
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Adds a static label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Adds a command label.
    #[must_use]
    pub fn with_cmd_label(mut self, name: impl Into<String>, label: CommandLabel) -> Self {
        self.cmd_labels.insert(name.into(), label);
        self
    }

    /// Sets the heartbeat-derived expiry.
    #[must_use]
    pub fn with_expiry(mut self, expires: OffsetDateTime) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Returns `true` if the server's heartbeat window has elapsed.
    ///
    /// A server with no recorded expiry is never considered expired.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    /// Merged view of static labels and command-label results.
    ///
    /// A command label shadows a static label of the same name, since its
    /// result reflects the server's current state.
    #[must_use]
    pub fn all_labels(&self) -> HashMap<String, String> {
        let mut labels = self.labels.clone();
        for (name, label) in &self.cmd_labels {
            labels.insert(name.clone(), label.result.clone());
        }
        labels
    }

    /// Sorted `key=value` rendering of all labels.
    #[must_use]
    pub fn labels_string(&self) -> String {
        let mut pairs: Vec<String> = self
            .all_labels()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        pairs.sort();
        pairs.join(",")
    }
}
