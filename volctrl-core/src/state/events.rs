//! Pending input classification
//!
//! While the motor runs, a newly arrived line or key is classified
//! without being executed. The running state decides what to do with it.

use crate::command::{CommandId, Motion};

/// Meaning of a pending input to a running motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionRequest {
    /// A `volup` invocation
    VolUp,
    /// A `voldown` invocation
    VolDown,
    /// A well-formed `setvol` invocation
    SetVol,
    /// Anything else, including unbound keys and malformed lines
    Other,
}

impl From<Option<Motion>> for MotionRequest {
    fn from(motion: Option<Motion>) -> Self {
        match motion {
            Some(Motion::VolUp) => MotionRequest::VolUp,
            Some(Motion::VolDown) => MotionRequest::VolDown,
            Some(Motion::SetVol) => MotionRequest::SetVol,
            None => MotionRequest::Other,
        }
    }
}

impl From<Option<CommandId>> for MotionRequest {
    fn from(command: Option<CommandId>) -> Self {
        match command {
            Some(CommandId::VolUp) => MotionRequest::VolUp,
            Some(CommandId::VolDown) => MotionRequest::VolDown,
            Some(CommandId::SetVol) => MotionRequest::SetVol,
            _ => MotionRequest::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_motion() {
        assert_eq!(MotionRequest::from(Some(Motion::SetVol)), MotionRequest::SetVol);
        assert_eq!(MotionRequest::from(None::<Motion>), MotionRequest::Other);
    }

    #[test]
    fn test_from_bound_command() {
        assert_eq!(
            MotionRequest::from(Some(CommandId::VolDown)),
            MotionRequest::VolDown
        );
        assert_eq!(
            MotionRequest::from(Some(CommandId::ShowRem)),
            MotionRequest::Other
        );
        assert_eq!(MotionRequest::from(None::<CommandId>), MotionRequest::Other);
    }
}
