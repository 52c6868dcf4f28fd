//! Discrete action decoding and per-model drive gains.
//!
//! Each drive model maps the same four-action vocabulary onto different
//! turn and speed behaviour. Differential drive rotates in place, while
//! ackermann and rover keep rolling through turns at reduced speed.

use profile::DriveModel;

/// Discrete control vocabulary shared by every drive model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscreteAction {
    Forward,
    TurnLeft,
    TurnRight,
    Reverse,
}

impl DiscreteAction {
    /// All actions in policy-head index order.
    pub const ALL: [Self; 4] = [Self::Forward, Self::TurnLeft, Self::TurnRight, Self::Reverse];

    /// Decode a flat action index as emitted by a policy head.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::TurnLeft => 1,
            Self::TurnRight => 2,
            Self::Reverse => 3,
        }
    }

    /// True for the two rotation actions.
    #[must_use]
    pub fn is_turn(self) -> bool {
        matches!(self, Self::TurnLeft | Self::TurnRight)
    }
}

/// What a decoded action does to the robot's velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VelocityCmd {
    /// Leave the current velocity untouched.
    Keep,
    /// Stop translating entirely.
    Halt,
    /// Drive along the heading at this multiple of base speed.
    Drive(f32),
}

/// Decoded discrete action. The turn is applied first, then the velocity
/// command reads the updated heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveCommand {
    /// Multiple of the robot's turn rate added to the heading. Negative
    /// turns left.
    pub turn_factor: f32,
    pub velocity: VelocityCmd,
}

/// Map a discrete action onto turn and drive amounts for the given model.
///
/// The reverse action only exists for differential drive and only when the
/// profile enables it; everywhere else it leaves the robot coasting.
#[must_use]
pub fn discrete_command(
    model: DriveModel,
    action: DiscreteAction,
    reverse_enabled: bool,
) -> DriveCommand {
    use DiscreteAction::{Forward, Reverse, TurnLeft, TurnRight};

    let (turn_factor, velocity) = match model {
        DriveModel::Differential => match action {
            Forward => (0.0, VelocityCmd::Drive(1.0)),
            TurnLeft => (-1.0, VelocityCmd::Halt),
            TurnRight => (1.0, VelocityCmd::Halt),
            Reverse if reverse_enabled => (0.0, VelocityCmd::Drive(-0.6)),
            Reverse => (0.0, VelocityCmd::Keep),
        },
        DriveModel::Ackermann => match action {
            Forward => (0.0, VelocityCmd::Drive(1.0)),
            TurnLeft => (-0.7, VelocityCmd::Drive(0.9)),
            TurnRight => (0.7, VelocityCmd::Drive(0.9)),
            Reverse => (0.0, VelocityCmd::Keep),
        },
        DriveModel::Rover => match action {
            Forward => (0.0, VelocityCmd::Drive(1.0)),
            TurnLeft => (-0.85, VelocityCmd::Drive(0.75)),
            TurnRight => (0.85, VelocityCmd::Drive(0.75)),
            Reverse => (0.0, VelocityCmd::Keep),
        },
    };
    DriveCommand {
        turn_factor,
        velocity,
    }
}

/// Turn and speed gains applied to continuous throttle/steer commands.
///
/// The rover sheds speed while steering hard; ackermann steers slower but
/// keeps most of its pace.
#[must_use]
pub fn continuous_gains(model: DriveModel, turn: f32) -> (f32, f32) {
    match model {
        DriveModel::Differential => (1.0, 1.0),
        DriveModel::Ackermann => (0.75, 0.95),
        DriveModel::Rover => (0.9, 0.85 * (1.0 - 0.25 * turn.abs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_indices_round_trip() {
        for action in DiscreteAction::ALL {
            assert_eq!(DiscreteAction::from_index(action.index()), Some(action));
        }
        assert_eq!(DiscreteAction::from_index(4), None);
    }

    #[test]
    fn differential_turns_in_place() {
        let cmd = discrete_command(DriveModel::Differential, DiscreteAction::TurnLeft, false);
        assert!((cmd.turn_factor + 1.0).abs() < 1e-6);
        assert_eq!(cmd.velocity, VelocityCmd::Halt);
    }

    #[test]
    fn ackermann_keeps_rolling_through_turns() {
        let cmd = discrete_command(DriveModel::Ackermann, DiscreteAction::TurnRight, false);
        assert!((cmd.turn_factor - 0.7).abs() < 1e-6);
        assert_eq!(cmd.velocity, VelocityCmd::Drive(0.9));
    }

    #[test]
    fn reverse_requires_the_profile_flag() {
        let blocked = discrete_command(DriveModel::Differential, DiscreteAction::Reverse, false);
        assert_eq!(blocked.velocity, VelocityCmd::Keep);

        let allowed = discrete_command(DriveModel::Differential, DiscreteAction::Reverse, true);
        assert_eq!(allowed.velocity, VelocityCmd::Drive(-0.6));
    }

    #[test]
    fn reverse_is_inert_for_rolling_models() {
        for model in [DriveModel::Ackermann, DriveModel::Rover] {
            let cmd = discrete_command(model, DiscreteAction::Reverse, true);
            assert_eq!(cmd.velocity, VelocityCmd::Keep);
            assert!(cmd.turn_factor.abs() < 1e-6);
        }
    }

    #[test]
    fn rover_speed_gain_drops_with_steering() {
        let (_, straight) = continuous_gains(DriveModel::Rover, 0.0);
        let (_, hard) = continuous_gains(DriveModel::Rover, 1.0);
        assert!((straight - 0.85).abs() < 1e-6);
        assert!((hard - 0.6375).abs() < 1e-6);
    }
}
