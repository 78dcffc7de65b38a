//! Stat budget normalization.
//!
//! A character has four integer attributes. Each must lie within
//! `[min, max]` and together they must sum to `total`. Provider output is
//! free to ignore both rules, so every attribute quadruple passes through
//! [`StatBudget::normalize`] before it reaches a [`Character`].
//!
//! The algorithm is part of the observable contract: clamp each value, then
//! repeatedly walk strength, dexterity, intelligence, charisma in that order,
//! moving one point at a time toward the target sum until it is reached.
//!
//! [`Character`]: crate::domain::character::Character

use serde::{Deserialize, Serialize};
use storyloom_core::error::DomainError;

/// Lowest value any attribute may take.
pub const MIN_STAT: i32 = 1;
/// Highest value any attribute may take.
pub const MAX_STAT: i32 = 5;
/// Required sum of the four attributes.
pub const STAT_TOTAL: i32 = 10;

/// The four character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Physical power.
    pub strength: i32,
    /// Agility and reflexes.
    pub dexterity: i32,
    /// Reasoning and knowledge.
    pub intelligence: i32,
    /// Presence and persuasion.
    pub charisma: i32,
}

impl Attributes {
    /// Builds attributes from `[strength, dexterity, intelligence, charisma]`.
    #[must_use]
    pub fn from_array(values: [i32; 4]) -> Self {
        let [strength, dexterity, intelligence, charisma] = values;
        Self {
            strength,
            dexterity,
            intelligence,
            charisma,
        }
    }

    /// Returns `[strength, dexterity, intelligence, charisma]`.
    #[must_use]
    pub fn to_array(self) -> [i32; 4] {
        [self.strength, self.dexterity, self.intelligence, self.charisma]
    }

    /// Sum of all four attributes.
    #[must_use]
    pub fn sum(self) -> i32 {
        self.to_array().iter().sum()
    }
}

/// Result of a normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    /// The normalized attributes; always within bounds.
    pub attributes: Attributes,
    /// Points that could not be distributed (positive) or removed
    /// (negative). Zero when the target sum was met.
    pub unresolved: i64,
}

impl Normalized {
    /// Returns `true` if the target sum was reached.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.unresolved == 0
    }
}

/// Bounds and target sum for the attribute quadruple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatBudget {
    min: i32,
    max: i32,
    total: i32,
}

impl StatBudget {
    /// The budget every character uses: `[1, 5]`, summing to 10.
    pub const STANDARD: Self = Self {
        min: MIN_STAT,
        max: MAX_STAT,
        total: STAT_TOTAL,
    };

    /// Creates a custom budget.
    ///
    /// An unreachable `total` is accepted; normalization then degrades to
    /// the closest achievable in-bounds values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `min > max`.
    pub fn new(min: i32, max: i32, total: i32) -> Result<Self, DomainError> {
        if min > max {
            return Err(DomainError::Validation(format!(
                "stat budget minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max, total })
    }

    /// Returns `true` if the sum can be reached within the bounds.
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        let total = i64::from(self.total);
        (i64::from(self.min) * 4..=i64::from(self.max) * 4).contains(&total)
    }

    /// Returns `true` if `attributes` already satisfy this budget.
    #[must_use]
    pub fn accepts(&self, attributes: Attributes) -> bool {
        attributes
            .to_array()
            .iter()
            .all(|v| (self.min..=self.max).contains(v))
            && attributes.sum() == self.total
    }

    /// Normalizes raw `[strength, dexterity, intelligence, charisma]`.
    ///
    /// Values are clamped first. While the sum misses the target, each pass
    /// walks the attributes in fixed order and moves every eligible one a
    /// single unit toward the target, stopping as soon as it is met. A pass
    /// that changes nothing, or running out of `4 × (max - min + 1)` passes,
    /// ends the loop with the best effort reached so far.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn normalize(&self, raw: [i64; 4]) -> Normalized {
        let min = i64::from(self.min);
        let max = i64::from(self.max);
        let mut values = raw.map(|v| v.clamp(min, max));
        let mut remaining = i64::from(self.total) - values.iter().sum::<i64>();

        let max_passes = 4 * (max - min + 1);
        let mut passes = 0;
        while remaining != 0 && passes < max_passes {
            passes += 1;
            let mut changed = false;
            for value in &mut values {
                if remaining > 0 && *value < max {
                    *value += 1;
                    remaining -= 1;
                    changed = true;
                } else if remaining < 0 && *value > min {
                    *value -= 1;
                    remaining += 1;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        // Every value is clamped into [self.min, self.max], both i32.
        Normalized {
            attributes: Attributes::from_array(values.map(|v| v as i32)),
            unresolved: remaining,
        }
    }
}

impl Default for StatBudget {
    fn default() -> Self {
        Self::STANDARD
    }
}
