//! Requests sent to the game server.
//!
//! One JSON document per request, tagged by `"command"`:
//!
//! ```text
//! {"command": "new_game"}
//! {"command": "take_action", "action": {"action_type": "PlayRoad", "action_metadata": [..10 ints..]}}
//! ```
//!
//! Every request is answered by exactly one snapshot document.

use catan_core::Command;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    NewGame,
    TakeAction { action: Command },
}

impl Request {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catan_core::{ActionKind, ActionVector};
    use serde_json::json;

    #[test]
    fn test_new_game_shape() {
        let value = serde_json::to_value(Request::NewGame).unwrap();
        assert_eq!(value, json!({"command": "new_game"}));
    }

    #[test]
    fn test_take_action_shape() {
        let command = catan_core::decode(&ActionVector([2, 17, 0, 0, 0, 0, 0, 0, 0, 0, 1])).unwrap();
        assert_eq!(command.kind, ActionKind::PlaySettlement);
        let value = serde_json::to_value(Request::TakeAction { action: command }).unwrap();
        assert_eq!(
            value,
            json!({
                "command": "take_action",
                "action": {
                    "action_type": "PlaySettlement",
                    "action_metadata": [17, 0, 0, 0, 0, 0, 0, 0, 0, 1]
                }
            })
        );
    }
}
