//! State machine definition
//!
//! Entry states (`VolUp`, `VolDown`, `SetVol`) perform their entry action
//! on the next tick and move on to the matching active state. Active
//! states run until the run-timer expires, a limit or the target is
//! reached, or a new command interrupts them.

use super::events::MotionRequest;

/// Control loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlState {
    /// Idle, executing commands as they arrive
    #[default]
    Init,
    /// Start or retrigger a clockwise run
    VolUp,
    /// Start or retrigger a counter-clockwise run
    VolDown,
    /// Clockwise run in progress
    VolUpActive,
    /// Counter-clockwise run in progress
    VolDownActive,
    /// Start a search for the target position
    SetVol,
    /// Search for the target position in progress
    SetVolActive,
    /// Learning a key binding, waiting for a key press
    AwaitingKeyPress,
}

/// What a running motion does with a pending input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reaction {
    /// Consume the input and re-enter the given entry state
    Retrigger(ControlState),
    /// Consume and ignore the input, keep running
    Dismiss,
    /// Consume the input and execute it now
    Execute,
    /// Stop the motor and leave the input for `Init` to execute
    Stop,
}

impl ControlState {
    /// Check if this state executes commands directly
    pub fn is_idle(&self) -> bool {
        matches!(self, ControlState::Init)
    }

    /// Decide how this state handles a pending input
    ///
    /// Timed runs retrigger on volup/voldown and stop on anything else.
    /// A volume search ignores volup/voldown, accepts a new target and
    /// stops on anything else. Other states never see pending inputs.
    pub fn react(self, request: MotionRequest) -> Reaction {
        use ControlState::*;

        match (self, request) {
            (VolUpActive | VolDownActive, MotionRequest::VolUp) => Reaction::Retrigger(VolUp),
            (VolUpActive | VolDownActive, MotionRequest::VolDown) => Reaction::Retrigger(VolDown),
            (VolUpActive | VolDownActive, _) => Reaction::Stop,

            (SetVolActive, MotionRequest::VolUp | MotionRequest::VolDown) => Reaction::Dismiss,
            (SetVolActive, MotionRequest::SetVol) => Reaction::Execute,
            (SetVolActive, MotionRequest::Other) => Reaction::Stop,

            (Init, _) => Reaction::Execute,
            _ => Reaction::Stop,
        }
    }
}
