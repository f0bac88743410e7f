//! The `Action` query parameter that every route dispatches on, matching
//! the original Echo-based handler-map routing.

use crate::error::Error;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateTopic,
    CreateQueue,
    DeleteTopic,
    DeleteQueue,
    ListTopics,
    ListQueues,
    Publish,
    SendMessage,
    CheckAckStatus,
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createTopic" => Ok(Action::CreateTopic),
            "createQueue" => Ok(Action::CreateQueue),
            "deleteTopic" => Ok(Action::DeleteTopic),
            "deleteQueue" => Ok(Action::DeleteQueue),
            "listTopics" => Ok(Action::ListTopics),
            "listQueues" => Ok(Action::ListQueues),
            "publish" => Ok(Action::Publish),
            "sendMessage" => Ok(Action::SendMessage),
            "publishCheck" | "messageCheck" => Ok(Action::CheckAckStatus),
            other => Err(Error::InvalidAction(other.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionQuery {
    #[serde(rename = "Action")]
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_action() {
        for (raw, expected) in [
            ("createTopic", Action::CreateTopic),
            ("listQueues", Action::ListQueues),
            ("publishCheck", Action::CheckAckStatus),
            ("messageCheck", Action::CheckAckStatus),
            ("sendMessage", Action::SendMessage),
        ] {
            assert_eq!(Action::from_str(raw).unwrap(), expected);
        }
    }

    #[test]
    fn unknown_action_is_invalid() {
        assert!(matches!(
            Action::from_str("Frobnicate"),
            Err(Error::InvalidAction(ref s)) if s == "Frobnicate"
        ));
    }
}
