//! `topic:` placeholder.

use super::Placeholder;
use crate::error::Result;
use twinlink_core::TopicPath;

/// Resolves parts of the topic path a signal was sent on.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicPathPlaceholder;

pub static TOPIC_PLACEHOLDER: TopicPathPlaceholder = TopicPathPlaceholder;

const TOPIC_NAMES: &[&str] = &[
    "full",
    "namespace",
    "entityName",
    "group",
    "channel",
    "criterion",
    "action",
    "subject",
    "action-subject",
];

impl Placeholder for TopicPathPlaceholder {
    type Source = TopicPath;

    fn prefix(&self) -> &'static str {
        "topic"
    }

    fn supported_names(&self) -> &'static [&'static str] {
        TOPIC_NAMES
    }

    fn resolve(&self, topic: &TopicPath, name: &str) -> Result<Option<String>> {
        let value = match name {
            "full" => Some(topic.to_string()),
            "namespace" => Some(topic.namespace.clone()),
            "entityName" => Some(topic.entity_name.clone()),
            "group" => Some(topic.group.clone()),
            "channel" => topic.channel.map(|c| c.as_str().to_string()),
            "criterion" => Some(topic.criterion.clone()),
            "action" => topic.action.clone(),
            "subject" => topic.subject.clone(),
            "action-subject" => topic.subject.clone().or_else(|| topic.action.clone()),
            _ => None,
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(path: &str, name: &str) -> Option<String> {
        let topic = TopicPath::parse(path).unwrap();
        TOPIC_PLACEHOLDER.resolve(&topic, name).unwrap()
    }

    #[test]
    fn test_resolve_command_topic() {
        let path = "org.acme/lamp/things/twin/commands/modify";
        assert_eq!(resolve(path, "full").as_deref(), Some(path));
        assert_eq!(resolve(path, "namespace").as_deref(), Some("org.acme"));
        assert_eq!(resolve(path, "entityName").as_deref(), Some("lamp"));
        assert_eq!(resolve(path, "group").as_deref(), Some("things"));
        assert_eq!(resolve(path, "channel").as_deref(), Some("twin"));
        assert_eq!(resolve(path, "criterion").as_deref(), Some("commands"));
        assert_eq!(resolve(path, "action").as_deref(), Some("modify"));
        assert_eq!(resolve(path, "subject"), None);
        assert_eq!(resolve(path, "action-subject").as_deref(), Some("modify"));
        assert_eq!(resolve(path, "unknown"), None);
    }

    #[test]
    fn test_resolve_message_subject() {
        let path = "org.acme/lamp/things/live/messages/switch-on";
        assert_eq!(resolve(path, "action"), None);
        assert_eq!(resolve(path, "subject").as_deref(), Some("switch-on"));
        assert_eq!(resolve(path, "action-subject").as_deref(), Some("switch-on"));
    }

    #[test]
    fn test_policy_topic_has_no_channel() {
        assert_eq!(resolve("ns/p/policies/commands/create", "channel"), None);
    }
}
