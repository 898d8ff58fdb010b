//! Lives counter
//!
//! Running out of lives is never observable between ticks: the hit that takes
//! the last life restores the full count within the same notification.

use serde::{Deserialize, Serialize};

use crate::consts::LOST_LIFE_ALPHA;

/// Result of a registered hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOutcome {
    /// A life was lost, `remaining` are left
    LifeLost { remaining: u8 },
    /// The last life was lost and the counter was refilled
    Depleted { restored: u8 },
}

impl HitOutcome {
    /// User-facing message for this hit
    pub fn message(&self) -> String {
        match self {
            HitOutcome::LifeLost { remaining } => format!("Ouch! Lives left: {remaining}"),
            HitOutcome::Depleted { .. } => "All lives lost! Restarting...".to_string(),
        }
    }

    /// Lives left after the hit resolved
    pub fn lives_after(&self) -> u8 {
        match *self {
            HitOutcome::LifeLost { remaining } => remaining,
            HitOutcome::Depleted { restored } => restored,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lives {
    remaining: u8,
    max: u8,
}

impl Lives {
    pub fn new(max: u8) -> Self {
        debug_assert!(max > 0);
        Self {
            remaining: max,
            max,
        }
    }

    #[inline]
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    #[inline]
    pub fn max(&self) -> u8 {
        self.max
    }

    /// Consume one life, refilling when the last one goes
    pub fn register_hit(&mut self) -> HitOutcome {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.reset();
            HitOutcome::Depleted {
                restored: self.remaining,
            }
        } else {
            HitOutcome::LifeLost {
                remaining: self.remaining,
            }
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.max;
    }

    /// Alphas for every icon, left to right
    pub fn icon_alphas(&self) -> Vec<f32> {
        icon_alphas(self.remaining, self.max)
    }
}

/// Lives indicator: icon `i` is fully visible iff `i < lives`
pub fn icon_alphas(lives: u8, max: u8) -> Vec<f32> {
    (0..max)
        .map(|i| if i < lives { 1.0 } else { LOST_LIFE_ALPHA })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_three_hits_sequence() {
        let mut lives = Lives::new(3);
        let seen: Vec<u8> = (0..3).map(|_| lives.register_hit().lives_after()).collect();
        assert_eq!(seen, vec![2, 1, 3]);
    }

    #[test]
    fn test_messages() {
        let mut lives = Lives::new(3);
        assert_eq!(lives.register_hit().message(), "Ouch! Lives left: 2");
        lives.register_hit();
        assert_eq!(lives.register_hit().message(), "All lives lost! Restarting...");
    }

    #[test]
    fn test_icon_alphas() {
        let mut lives = Lives::new(3);
        lives.register_hit();
        assert_eq!(lives.icon_alphas(), vec![1.0, 1.0, LOST_LIFE_ALPHA]);
    }

    #[test]
    fn test_single_life_always_refills() {
        let mut lives = Lives::new(1);
        assert_eq!(lives.register_hit(), HitOutcome::Depleted { restored: 1 });
        assert_eq!(lives.remaining(), 1);
    }

    proptest! {
        #[test]
        fn prop_lives_never_observably_zero(max in 1u8..8, hits in 0usize..64) {
            let mut lives = Lives::new(max);
            for _ in 0..hits {
                lives.register_hit();
                prop_assert!(lives.remaining() >= 1);
                prop_assert!(lives.remaining() <= max);
            }
            let expected = max as usize - hits % max as usize;
            prop_assert_eq!(lives.remaining() as usize, expected);
        }
    }
}
