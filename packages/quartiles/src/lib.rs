#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Quartile-tier ranking for neighbourhood metrics.
//!
//! Pure functions: given a numeric series, compute the 25/50/75th
//! percentile thresholds and assign each data point a tier from 1
//! (best) to 4 (worst), with the value orientation configurable per
//! metric (crime is lower-is-better, school and park access are
//! higher-is-better). The per-metric builders produce canonical-name
//! keyed ranking maps consumed by presentation layers; rankings are
//! derived data, recomputed on demand and never persisted.

pub mod builders;
pub mod descriptors;

use serde::{Deserialize, Serialize};

pub use builders::{QuartileMap, crime_quartiles, parks_quartiles, schools_quartiles};
pub use descriptors::{Metric, TierDescriptor, descriptor};

/// Quartile thresholds for a numeric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    /// Value at the 25th-percentile index.
    pub q1: f64,
    /// Value at the 50th-percentile index.
    pub q2: f64,
    /// Value at the 75th-percentile index.
    pub q3: f64,
}

/// Whether lower or higher values represent the "good" end of a
/// metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Lower values are better (crime).
    LowerIsBetter,
    /// Higher values are better (school/park access).
    HigherIsBetter,
}

/// A quartile tier, 1 (best) through 4 (worst).
///
/// Tier 1 always represents the "best" end regardless of the metric's
/// value orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    /// Top quartile.
    Top = 1,
    /// Second quartile.
    Second = 2,
    /// Third quartile.
    Third = 3,
    /// Bottom quartile.
    Bottom = 4,
}

impl Tier {
    /// All tiers, best first.
    pub const ALL: [Self; 4] = [Self::Top, Self::Second, Self::Third, Self::Bottom];

    /// Returns the numeric tier value (1-4).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.value()
    }
}

impl TryFrom<u8> for Tier {
    type Error = InvalidTierError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Top),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            4 => Ok(Self::Bottom),
            _ => Err(InvalidTierError { value }),
        }
    }
}

/// Error returned when attempting to create a [`Tier`] from an invalid
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTierError {
    /// The invalid tier value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidTierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid tier value {}: expected 1-4", self.value)
    }
}

impl std::error::Error for InvalidTierError {}

/// Computes quartile thresholds for a series.
///
/// Sorts ascending and takes the values at ranks `floor(n * p)` for
/// p in {0.25, 0.50, 0.75} (0-indexed), so each threshold is an actual
/// series element rather than an interpolated statistic. An empty
/// series yields all-zero thresholds rather than failing.
#[must_use]
pub fn quartile_thresholds(values: &[f64]) -> Quartiles {
    if values.is_empty() {
        return Quartiles {
            q1: 0.0,
            q2: 0.0,
            q3: 0.0,
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();

    Quartiles {
        q1: sorted[n / 4],
        q2: sorted[n / 2],
        q3: sorted[n * 3 / 4],
    }
}

/// Assigns a tier to a value against the given thresholds.
///
/// Comparisons are inclusive on the "good" side, so a value exactly
/// equal to a threshold lands in the better tier.
#[must_use]
pub fn assign_tier(value: f64, quartiles: &Quartiles, orientation: Orientation) -> Tier {
    match orientation {
        Orientation::LowerIsBetter => {
            if value <= quartiles.q1 {
                Tier::Top
            } else if value <= quartiles.q2 {
                Tier::Second
            } else if value <= quartiles.q3 {
                Tier::Third
            } else {
                Tier::Bottom
            }
        }
        Orientation::HigherIsBetter => {
            if value >= quartiles.q3 {
                Tier::Top
            } else if value >= quartiles.q2 {
                Tier::Second
            } else if value >= quartiles.q1 {
                Tier::Third
            } else {
                Tier::Bottom
            }
        }
    }
}

/// A neighbourhood's ranking for one metric: the tier, its descriptive
/// bundle, and the underlying value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuartileRanking {
    /// Tier 1 (best) through 4 (worst).
    pub tier: Tier,
    /// Tier emoji for map legends.
    pub emoji: &'static str,
    /// Short tier label.
    pub label: &'static str,
    /// One-line tier description.
    pub description: &'static str,
    /// The metric value the tier was assigned from.
    pub value: f64,
}

impl QuartileRanking {
    /// Builds a ranking from a metric, tier, and value, pulling the
    /// descriptive bundle from the static descriptor table.
    #[must_use]
    pub const fn new(metric: Metric, tier: Tier, value: f64) -> Self {
        let descriptor = descriptor(metric, tier);
        Self {
            tier,
            emoji: descriptor.emoji,
            label: descriptor.label,
            description: descriptor.description,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_yields_zero_thresholds() {
        let quartiles = quartile_thresholds(&[]);
        assert_eq!(
            quartiles,
            Quartiles {
                q1: 0.0,
                q2: 0.0,
                q3: 0.0
            }
        );
    }

    #[test]
    fn thresholds_use_floor_rank_indices() {
        // n = 4: ranks floor(1.0) = 1, floor(2.0) = 2, floor(3.0) = 3.
        let quartiles = quartile_thresholds(&[40.0, 10.0, 30.0, 20.0]);
        assert_eq!(quartiles.q1, 20.0);
        assert_eq!(quartiles.q2, 30.0);
        assert_eq!(quartiles.q3, 40.0);
    }

    #[test]
    fn tie_boundary_favors_better_tier_lower_is_better() {
        let quartiles = quartile_thresholds(&[10.0, 20.0, 30.0, 40.0]);

        assert_eq!(
            assign_tier(10.0, &quartiles, Orientation::LowerIsBetter),
            Tier::Top
        );
        // Exactly q1 is still tier 1 (inclusive on the good side).
        assert_eq!(
            assign_tier(20.0, &quartiles, Orientation::LowerIsBetter),
            Tier::Top
        );
        assert_eq!(
            assign_tier(30.0, &quartiles, Orientation::LowerIsBetter),
            Tier::Second
        );
        // 40 == q3, so it lands in tier 3; nothing in this series can
        // land in tier 4.
        assert_eq!(
            assign_tier(40.0, &quartiles, Orientation::LowerIsBetter),
            Tier::Third
        );
        assert_eq!(
            assign_tier(41.0, &quartiles, Orientation::LowerIsBetter),
            Tier::Bottom
        );
    }

    #[test]
    fn tie_boundary_favors_better_tier_higher_is_better() {
        let quartiles = quartile_thresholds(&[10.0, 20.0, 30.0, 40.0]);

        assert_eq!(
            assign_tier(40.0, &quartiles, Orientation::HigherIsBetter),
            Tier::Top
        );
        assert_eq!(
            assign_tier(30.0, &quartiles, Orientation::HigherIsBetter),
            Tier::Second
        );
        assert_eq!(
            assign_tier(20.0, &quartiles, Orientation::HigherIsBetter),
            Tier::Third
        );
        assert_eq!(
            assign_tier(10.0, &quartiles, Orientation::HigherIsBetter),
            Tier::Bottom
        );
    }

    #[test]
    fn every_value_lands_in_exactly_one_tier() {
        let values: Vec<f64> = (0..37).map(f64::from).collect();
        let quartiles = quartile_thresholds(&values);

        for orientation in [Orientation::LowerIsBetter, Orientation::HigherIsBetter] {
            let mut previous: Option<(f64, Tier)> = None;
            for &value in &values {
                let tier = assign_tier(value, &quartiles, orientation);
                assert!(Tier::ALL.contains(&tier));

                // Monotonic with value ordering, direction set by the
                // orientation.
                if let Some((prev_value, prev_tier)) = previous {
                    assert!(prev_value <= value);
                    match orientation {
                        Orientation::LowerIsBetter => assert!(prev_tier <= tier),
                        Orientation::HigherIsBetter => assert!(prev_tier >= tier),
                    }
                }
                previous = Some((value, tier));
            }
        }
    }

    #[test]
    fn tier_serializes_as_number() {
        let ranking = QuartileRanking::new(Metric::Crime, Tier::Second, 12.0);
        let json = serde_json::to_value(&ranking).unwrap();
        assert_eq!(json["tier"], 2);
        assert_eq!(json["value"], 12.0);
        assert_eq!(json["label"], "Safe");
    }

    #[test]
    fn invalid_tier_value_is_rejected() {
        assert_eq!(Tier::try_from(3).unwrap(), Tier::Third);
        assert!(Tier::try_from(0).is_err());
        assert!(Tier::try_from(5).is_err());
    }
}
