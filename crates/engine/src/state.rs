//! Wizard states for the two flows.

use serde::{Deserialize, Serialize};

/// Create-flow states, in strict wizard order.
///
/// The end hour/minute pair is only visited when the user picks "close now";
/// "close later" jumps straight to the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreateState {
    ChoosingManager,
    ChoosingRestaurant,
    ChoosingDay,
    ChoosingStartHour,
    ChoosingStartMinute,
    ChoosingCloseMode,
    ChoosingEndHour,
    ChoosingEndMinute,
    ChoosingReason,
    EnteringComment,
    ChoosingAmount,
    Confirming,
}

/// Close-flow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseState {
    PickingOpenIncident,
    ChoosingEndDay,
    ChoosingEndHour,
    ChoosingEndMinute,
    Confirming,
}
