//! Action vectors and the commands they decode to.
//!
//! Slot 0 selects an [`ActionKind`]; slots 1–2 are board indices and slots
//! 3–10 trade quantities. Only slot 0 is checked here. Everything else goes to
//! the server untouched and the server's verdict comes back as
//! `last_action_successful`.

use crate::error::InvalidAction;
use crate::kinds::ActionKind;
use crate::space::MultiDiscrete;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ACTION_SLOTS: usize = 11;
pub const METADATA_SLOTS: usize = ACTION_SLOTS - 1;

/// Cardinality of every action slot.
pub const ACTION_NVEC: [u32; ACTION_SLOTS] = [
    ActionKind::COUNT as u32,
    72,
    72,
    11,
    11,
    11,
    11,
    11,
    11,
    11,
    11,
];

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("action vector needs 11 slots, got {0}")]
pub struct WrongSlotCount(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionVector(pub [u32; ACTION_SLOTS]);

impl ActionVector {
    /// Convert continuous policy output: round to nearest, floor negatives at 0.
    pub fn from_rounded(values: &[f64]) -> Result<Self, WrongSlotCount> {
        let slots: [f64; ACTION_SLOTS] = values
            .try_into()
            .map_err(|_| WrongSlotCount(values.len()))?;
        Ok(Self(slots.map(|v| {
            let rounded = v.round();
            if rounded.is_nan() || rounded <= 0.0 {
                0
            } else {
                rounded.min(u32::MAX as f64) as u32
            }
        })))
    }

    pub fn kind_index(&self) -> u32 {
        self.0[0]
    }

    pub fn metadata(&self) -> [u32; METADATA_SLOTS] {
        let mut out = [0; METADATA_SLOTS];
        out.copy_from_slice(&self.0[1..]);
        out
    }
}

impl From<[u32; ACTION_SLOTS]> for ActionVector {
    fn from(slots: [u32; ACTION_SLOTS]) -> Self {
        Self(slots)
    }
}

impl TryFrom<&[u32]> for ActionVector {
    type Error = WrongSlotCount;

    fn try_from(values: &[u32]) -> Result<Self, Self::Error> {
        values
            .try_into()
            .map(Self)
            .map_err(|_| WrongSlotCount(values.len()))
    }
}

/// A decoded action, shaped for the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    #[serde(rename = "action_type")]
    pub kind: ActionKind,
    #[serde(rename = "action_metadata")]
    pub metadata: [u32; METADATA_SLOTS],
}

/// Action space declaration.
pub fn action_space() -> MultiDiscrete {
    MultiDiscrete::new(ACTION_NVEC.to_vec())
}

/// Decode an action vector. An out-of-range kind is reported, not panicked on.
pub fn decode(action: &ActionVector) -> Result<Command, InvalidAction> {
    let index = action.kind_index();
    let kind = ActionKind::from_code(index).ok_or(InvalidAction {
        index,
        kinds: ActionKind::COUNT,
    })?;
    Ok(Command {
        kind,
        metadata: action.metadata(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_every_kind() {
        for kind in ActionKind::ALL {
            let mut slots = [0; ACTION_SLOTS];
            slots[0] = kind.code();
            assert_eq!(decode(&slots.into()).unwrap().kind, *kind);
        }
    }

    #[test]
    fn test_metadata_passes_through_unvalidated() {
        let action = ActionVector([3, 71, 500, 1, 2, 3, 4, 5, 6, 7, 99]);
        let command = decode(&action).unwrap();
        assert_eq!(command.kind, ActionKind::PlayRoad);
        assert_eq!(command.metadata, [71, 500, 1, 2, 3, 4, 5, 6, 7, 99]);
    }

    #[test]
    fn test_kind_twelve_is_invalid_action() {
        let action = ActionVector([12, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            decode(&action).unwrap_err(),
            InvalidAction {
                index: 12,
                kinds: 12
            }
        );
    }

    #[test]
    fn test_command_wire_shape() {
        let command = decode(&ActionVector([11, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])).unwrap();
        let json = serde_json::to_value(command).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "action_type": "EndTurn",
                "action_metadata": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
            })
        );
    }

    #[test]
    fn test_from_rounded() {
        let action = ActionVector::from_rounded(&[
            2.6, -3.0, 71.4, 0.5, 0.49, 10.0, f64::NAN, 1.0, 2.0, 3.0, 4.0,
        ])
        .unwrap();
        assert_eq!(action.0, [3, 0, 71, 1, 0, 10, 0, 1, 2, 3, 4]);
        assert_eq!(
            ActionVector::from_rounded(&[1.0, 2.0]).unwrap_err(),
            WrongSlotCount(2)
        );
    }

    #[test]
    fn test_action_space_bounds() {
        assert_eq!(
            action_space().nvec,
            vec![12, 72, 72, 11, 11, 11, 11, 11, 11, 11, 11]
        );
    }
}
