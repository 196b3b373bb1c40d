//! Wire types for the replication protocol

use serde::{Deserialize, Serialize};

/// Mutation kind carried by a replication command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "SET")]
    Set,
    #[serde(rename = "DELETE")]
    Delete,
}

/// One mutation to apply on a remote node.
///
/// Constructed by the primary after its local commit succeeds, serialized,
/// sent once to each replica, and discarded. Commands carry no sequence
/// number and are never persisted or retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub operation: Operation,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Command {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            operation: Operation::Set,
            key: key.into(),
            value: Some(value.into()),
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Self {
            operation: Operation::Delete,
            key: key.into(),
            value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_command_wire_shape() {
        let cmd = Command::set("foo", "bar");
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"operation":"SET","key":"foo","value":"bar"}"#);
    }

    #[test]
    fn test_delete_command_omits_value() {
        let cmd = Command::delete("foo");
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"operation":"DELETE","key":"foo"}"#);
    }

    #[test]
    fn test_decode_round_trip() {
        let cmd: Command =
            serde_json::from_str(r#"{"operation":"SET","key":"k","value":"v"}"#).unwrap();
        assert_eq!(cmd, Command::set("k", "v"));
    }

    #[test]
    fn test_unknown_operation_rejected() {
        let result: Result<Command, _> =
            serde_json::from_str(r#"{"operation":"UPSERT","key":"k"}"#);
        assert!(result.is_err());
    }
}
