use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: MessageRole,
    /// The content of the message
    pub content: String,
}

impl Message {
    /// Creates a new message with the given role.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a new system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Creates a new user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates a new assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Returns true if this message carries system instructions.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.role == MessageRole::System
    }
}

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions
    System,
    /// User input
    User,
    /// Assistant response
    Assistant,
}

impl MessageRole {
    /// Returns the wire name shared by both vendor families.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown message role '{}'; expected one of: system, user, assistant",
            self.0
        )
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for MessageRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_role() {
        assert_eq!(Message::system("s").role, MessageRole::System);
        assert_eq!(Message::user("u").role, MessageRole::User);
        assert_eq!(Message::assistant("a").role, MessageRole::Assistant);
    }

    #[test]
    fn is_system_only_for_system_role() {
        assert!(Message::system("Be terse.").is_system());
        assert!(!Message::user("Hi").is_system());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::user("Hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"Hi"}"#);
    }

    #[test]
    fn message_deserializes_from_wire_shape() {
        let msg: Message =
            serde_json::from_str(r#"{"role":"system","content":"Only this."}"#).unwrap();
        assert_eq!(msg, Message::system("Only this."));
    }

    #[test]
    fn role_from_str_is_case_insensitive() {
        assert_eq!("User".parse::<MessageRole>().unwrap(), MessageRole::User);
        assert_eq!(
            " ASSISTANT ".parse::<MessageRole>().unwrap(),
            MessageRole::Assistant
        );
    }

    #[test]
    fn role_from_str_rejects_tool() {
        let err = "tool".parse::<MessageRole>().unwrap_err();
        assert!(err.to_string().contains("tool"));
    }

    #[test]
    fn role_display_matches_wire_name() {
        assert_eq!(MessageRole::System.to_string(), "system");
    }
}
