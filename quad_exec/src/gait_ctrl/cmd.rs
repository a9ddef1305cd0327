//! Commands passed into GaitCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::leg_ctrl::LegId;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A command to GaitCtrl.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GaitCmd {
    /// Stop walking and move every leg to the home position.
    Home,

    /// Start walking with the given pattern, from the start of a cycle.
    Walk(GaitPattern),

    /// Stop walking, every leg holds its last angles.
    Stop,
}

/// Possible gait patterns.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum GaitPattern {
    /// Only the given leg sweeps, the others hold. Used for bench testing a
    /// single leg.
    SingleLeg(LegId),

    /// All four legs sweep in phase. The body is not statically stable so
    /// this is for testing only.
    Unison,

    /// Diagonal pairs alternate between swing and stance.
    Trot,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GaitPattern {
    /// Returns whether the given leg is driven by this pattern and if so
    /// whether it is in phase with the leading legs.
    ///
    /// Leading legs swing in the first half of each cycle, trailing legs in
    /// the second.
    pub fn leg_role(&self, leg: LegId) -> Option<LegRole> {
        match self {
            GaitPattern::SingleLeg(id) if *id == leg => Some(LegRole::Leading),
            GaitPattern::SingleLeg(_) => None,
            GaitPattern::Unison => Some(LegRole::Leading),
            GaitPattern::Trot => match leg.diagonal_pair() {
                crate::leg_ctrl::DiagonalPair::A => Some(LegRole::Leading),
                crate::leg_ctrl::DiagonalPair::B => Some(LegRole::Trailing),
            },
        }
    }
}

/// Phase relationship of a leg to the gait cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegRole {
    Leading,
    Trailing,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_leg_roles() {
        let single = GaitPattern::SingleLeg(LegId::BackLeft);
        assert_eq!(single.leg_role(LegId::BackLeft), Some(LegRole::Leading));
        assert_eq!(single.leg_role(LegId::FrontLeft), None);

        for id in LegId::ALL.iter() {
            assert_eq!(GaitPattern::Unison.leg_role(*id), Some(LegRole::Leading));
        }

        assert_eq!(GaitPattern::Trot.leg_role(LegId::FrontLeft), Some(LegRole::Leading));
        assert_eq!(GaitPattern::Trot.leg_role(LegId::BackRight), Some(LegRole::Leading));
        assert_eq!(GaitPattern::Trot.leg_role(LegId::FrontRight), Some(LegRole::Trailing));
        assert_eq!(GaitPattern::Trot.leg_role(LegId::BackLeft), Some(LegRole::Trailing));
    }
}
