//! Static descriptor table for (metric, tier) pairs.
//!
//! The 3x4 table of emoji/label/description bundles shown in legends
//! and detail panels. Fixed data; the tier itself is computed, the
//! wording is not.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::{Orientation, Tier};

/// The three ranked neighbourhood metrics.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// Violent/weapons crime totals.
    Crime,
    /// School access (attribute-matched feature counts).
    Schools,
    /// Park access (attribute-matched feature counts).
    Parks,
}

impl Metric {
    /// All metrics.
    pub const ALL: [Self; 3] = [Self::Crime, Self::Schools, Self::Parks];

    /// Value orientation for this metric.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Crime => Orientation::LowerIsBetter,
            Self::Schools | Self::Parks => Orientation::HigherIsBetter,
        }
    }
}

/// Descriptive bundle for one (metric, tier) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierDescriptor {
    /// Legend emoji.
    pub emoji: &'static str,
    /// Short label.
    pub label: &'static str,
    /// One-line description.
    pub description: &'static str,
}

const fn cell(
    emoji: &'static str,
    label: &'static str,
    description: &'static str,
) -> TierDescriptor {
    TierDescriptor {
        emoji,
        label,
        description,
    }
}

/// Returns the descriptor for a (metric, tier) pair.
#[must_use]
pub const fn descriptor(metric: Metric, tier: Tier) -> TierDescriptor {
    match (metric, tier) {
        (Metric::Crime, Tier::Top) => cell("🟢", "Very Safe", "Top 25% safest neighbourhoods"),
        (Metric::Crime, Tier::Second) => cell("🟡", "Safe", "Above average safety"),
        (Metric::Crime, Tier::Third) => cell("🟠", "Moderate", "Average safety levels"),
        (Metric::Crime, Tier::Bottom) => cell("🔴", "Higher Crime", "Bottom 25% for safety"),
        (Metric::Schools, Tier::Top) => {
            cell("🟢", "Excellent Schools", "Top 25% for school access")
        }
        (Metric::Schools, Tier::Second) => {
            cell("🟡", "Good Schools", "Above average school access")
        }
        (Metric::Schools, Tier::Third) => cell("🟠", "Moderate Schools", "Average school access"),
        (Metric::Schools, Tier::Bottom) => {
            cell("🔴", "Limited Schools", "Bottom 25% for school access")
        }
        (Metric::Parks, Tier::Top) => cell("🟢", "Excellent Parks", "Top 25% for park access"),
        (Metric::Parks, Tier::Second) => cell("🟡", "Good Parks", "Above average park access"),
        (Metric::Parks, Tier::Third) => cell("🟠", "Moderate Parks", "Average park access"),
        (Metric::Parks, Tier::Bottom) => cell("🔴", "Limited Parks", "Bottom 25% for park access"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_metric_tier_pair() {
        for metric in Metric::ALL {
            for tier in Tier::ALL {
                let cell = descriptor(metric, tier);
                assert!(!cell.emoji.is_empty());
                assert!(!cell.label.is_empty());
                assert!(!cell.description.is_empty());
            }
        }
    }

    #[test]
    fn metric_orientations() {
        assert_eq!(Metric::Crime.orientation(), Orientation::LowerIsBetter);
        assert_eq!(Metric::Schools.orientation(), Orientation::HigherIsBetter);
        assert_eq!(Metric::Parks.orientation(), Orientation::HigherIsBetter);
    }

    #[test]
    fn metric_parses_from_wire_name() {
        assert_eq!("parks".parse::<Metric>().unwrap(), Metric::Parks);
        assert!("rent".parse::<Metric>().is_err());
    }
}
