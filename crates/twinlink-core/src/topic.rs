//! Protocol topic paths.
//!
//! A topic path addresses a signal on the wire:
//!
//! ```text
//! <namespace>/<entityName>/<group>/<channel>/<criterion>/<action>[/<subject>]
//! ```
//!
//! The `policies` group has no channel. For the `messages` and
//! `acknowledgements` criteria the segment after the criterion is the
//! subject; there is no action.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const POLICIES_GROUP: &str = "policies";

/// Channel a signal travels on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicChannel {
    Twin,
    Live,
}

impl TopicChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicChannel::Twin => "twin",
            TopicChannel::Live => "live",
        }
    }
}

/// A parsed topic path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPath {
    pub namespace: String,
    pub entity_name: String,
    pub group: String,
    pub channel: Option<TopicChannel>,
    pub criterion: String,
    pub action: Option<String>,
    pub subject: Option<String>,
}

impl TopicPath {
    /// Parse a `/` separated topic path.
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::TopicPath(format!("'{}': {}", path, reason));
        let mut parts = path.split('/');

        let mut next = |what: &str| -> Result<String> {
            match parts.next() {
                Some(part) if !part.is_empty() => Ok(part.to_string()),
                _ => Err(invalid(&format!("missing {}", what))),
            }
        };

        let namespace = next("namespace")?;
        let entity_name = next("entity name")?;
        let group = next("group")?;
        let channel = if group == POLICIES_GROUP {
            None
        } else {
            Some(match next("channel")?.as_str() {
                "twin" => TopicChannel::Twin,
                "live" => TopicChannel::Live,
                other => return Err(invalid(&format!("unknown channel '{}'", other))),
            })
        };
        let criterion = next("criterion")?;

        let rest: Vec<&str> = parts.collect();
        let (action, subject) = match criterion.as_str() {
            "messages" | "acknowledgements" => (None, join_non_empty(&rest)),
            _ => match rest.split_first() {
                Some((action, subject)) if !action.is_empty() => {
                    (Some(action.to_string()), join_non_empty(subject))
                }
                _ => return Err(invalid("missing action")),
            },
        };

        Ok(Self {
            namespace,
            entity_name,
            group,
            channel,
            criterion,
            action,
            subject,
        })
    }
}

fn join_non_empty(parts: &[&str]) -> Option<String> {
    let joined = parts.join("/");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

impl fmt::Display for TopicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.entity_name, self.group)?;
        if let Some(channel) = self.channel {
            write!(f, "/{}", channel.as_str())?;
        }
        write!(f, "/{}", self.criterion)?;
        if let Some(action) = &self.action {
            write!(f, "/{}", action)?;
        }
        if let Some(subject) = &self.subject {
            write!(f, "/{}", subject)?;
        }
        Ok(())
    }
}

impl FromStr for TopicPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
