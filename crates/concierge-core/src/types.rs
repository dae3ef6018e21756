use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Author of a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// Visibility of the chat widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Hidden; the launcher button is all that shows.
    #[default]
    Closed,
    /// Fully expanded and accepting input.
    Open,
    /// Collapsed to the header bar; state is kept.
    Minimized,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Closed => write!(f, "Closed"),
            Visibility::Open => write!(f, "Open"),
            Visibility::Minimized => write!(f, "Minimized"),
        }
    }
}

impl Visibility {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &Visibility) -> bool {
        matches!(
            (self, target),
            (Visibility::Closed, Visibility::Open)
                | (Visibility::Open, Visibility::Minimized)
                | (Visibility::Minimized, Visibility::Open)
                | (Visibility::Open, Visibility::Closed)
                | (Visibility::Minimized, Visibility::Closed)
        )
    }
}

/// Verification state read from a profile record.
///
/// The stored `isVerified` field is tri-state: `true`, `false`, or anything
/// else (missing, `null`, or a non-boolean value), which all map to `Unset`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerificationFlag {
    Verified,
    Pending,
    #[default]
    Unset,
}

impl VerificationFlag {
    /// Map a raw JSON field value onto the tri-state flag.
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::Bool(true)) => VerificationFlag::Verified,
            Some(serde_json::Value::Bool(false)) => VerificationFlag::Pending,
            _ => VerificationFlag::Unset,
        }
    }
}

impl Serialize for VerificationFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VerificationFlag::Verified => serializer.serialize_bool(true),
            VerificationFlag::Pending => serializer.serialize_bool(false),
            VerificationFlag::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for VerificationFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(VerificationFlag::from_json(value.as_ref()))
    }
}

// =============================================================================
// Structs
// =============================================================================

/// One transcript entry. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Time-ordered identifier (UUID v7).
    pub id: Uuid,
    pub sender: Sender,
    /// Display text; embedded newlines render as separate lines.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Quick-reply suggestions shown under the message.
    #[serde(default)]
    pub options: Vec<String>,
}

impl Message {
    /// Create a user message with no options.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text.into(), Vec::new())
    }

    /// Create a bot message with the given quick-reply options.
    pub fn bot(text: impl Into<String>, options: Vec<String>) -> Self {
        Self::new(Sender::Bot, text.into(), options)
    }

    fn new(sender: Sender, text: String, options: Vec<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender,
            text,
            timestamp: Utc::now(),
            options,
        }
    }

    /// The display lines of the message text.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// A one-click intent trigger shown above the input field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub id: String,
    pub label: String,
}

impl QuickAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// The account fields the chat reads from a user's profile document.
///
/// Unknown document fields are ignored; missing numbers default to zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default)]
    pub is_verified: VerificationFlag,
    #[serde(default)]
    pub credit_limit: f64,
    #[serde(default)]
    pub credited_amount: f64,
}

/// Opaque handle for an authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

impl Identity {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_display() {
        assert_eq!(Visibility::Closed.to_string(), "Closed");
        assert_eq!(Visibility::Open.to_string(), "Open");
        assert_eq!(Visibility::Minimized.to_string(), "Minimized");
    }

    #[test]
    fn test_visibility_valid_transitions() {
        assert!(Visibility::Closed.can_transition_to(&Visibility::Open));
        assert!(Visibility::Open.can_transition_to(&Visibility::Minimized));
        assert!(Visibility::Minimized.can_transition_to(&Visibility::Open));
        assert!(Visibility::Open.can_transition_to(&Visibility::Closed));
        assert!(Visibility::Minimized.can_transition_to(&Visibility::Closed));
    }

    #[test]
    fn test_visibility_invalid_transitions() {
        assert!(!Visibility::Closed.can_transition_to(&Visibility::Minimized));
        assert!(!Visibility::Closed.can_transition_to(&Visibility::Closed));
        assert!(!Visibility::Open.can_transition_to(&Visibility::Open));
        assert!(!Visibility::Minimized.can_transition_to(&Visibility::Minimized));
    }

    #[test]
    fn test_visibility_default_is_closed() {
        assert_eq!(Visibility::default(), Visibility::Closed);
    }

    #[test]
    fn test_message_constructors() {
        let user = Message::user("hello");
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.text, "hello");
        assert!(user.options.is_empty());

        let bot = Message::bot("hi", vec!["A".to_string(), "B".to_string()]);
        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.options, vec!["A", "B"]);
    }

    #[test]
    fn test_message_ids_are_time_ordered() {
        let first = Message::user("one");
        let second = Message::user("two");
        assert_ne!(first.id, second.id);
        assert!(first.timestamp <= second.timestamp);
    }

    #[test]
    fn test_message_lines_split_on_newlines() {
        let msg = Message::bot("Email: a@b.c\nPhone: 123", vec![]);
        let lines: Vec<&str> = msg.lines().collect();
        assert_eq!(lines, vec!["Email: a@b.c", "Phone: 123"]);
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn test_verification_flag_from_json() {
        use serde_json::json;
        assert_eq!(
            VerificationFlag::from_json(Some(&json!(true))),
            VerificationFlag::Verified
        );
        assert_eq!(
            VerificationFlag::from_json(Some(&json!(false))),
            VerificationFlag::Pending
        );
        assert_eq!(
            VerificationFlag::from_json(Some(&json!(null))),
            VerificationFlag::Unset
        );
        assert_eq!(
            VerificationFlag::from_json(Some(&json!("yes"))),
            VerificationFlag::Unset
        );
        assert_eq!(VerificationFlag::from_json(None), VerificationFlag::Unset);
    }

    #[test]
    fn test_profile_record_deserialize_full() {
        let record: ProfileRecord = serde_json::from_str(
            r#"{"isVerified": true, "creditLimit": 5000, "creditedAmount": 1250.5, "companyName": "Acme"}"#,
        )
        .unwrap();
        assert_eq!(record.is_verified, VerificationFlag::Verified);
        assert_eq!(record.credit_limit, 5000.0);
        assert_eq!(record.credited_amount, 1250.5);
    }

    #[test]
    fn test_profile_record_missing_flag_is_unset() {
        let record: ProfileRecord = serde_json::from_str(r#"{"creditLimit": 100}"#).unwrap();
        assert_eq!(record.is_verified, VerificationFlag::Unset);
        assert_eq!(record.credited_amount, 0.0);
    }

    #[test]
    fn test_profile_record_null_flag_is_unset() {
        let record: ProfileRecord = serde_json::from_str(r#"{"isVerified": null}"#).unwrap();
        assert_eq!(record.is_verified, VerificationFlag::Unset);
    }

    #[test]
    fn test_profile_record_serializes_flag_as_bool_or_null() {
        let record = ProfileRecord {
            is_verified: VerificationFlag::Pending,
            credit_limit: 10.0,
            credited_amount: 2.0,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["isVerified"], serde_json::json!(false));

        let unset = ProfileRecord::default();
        let value = serde_json::to_value(&unset).unwrap();
        assert!(value["isVerified"].is_null());
    }

    #[test]
    fn test_identity_is_transparent() {
        let id = Identity::new("uid-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"uid-42\"");
        assert_eq!(id.as_str(), "uid-42");
        assert_eq!(id.to_string(), "uid-42");
    }
}
