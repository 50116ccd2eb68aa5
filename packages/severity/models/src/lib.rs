#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Severity bands for Rescue Radar predictions.
//!
//! Each prediction variant maps its raw model output onto a small ordered
//! set of labels using half-open threshold bands. The bands partition the
//! real line, so every score lands in exactly one label.
//!
//! - [`FloodSeverity`]: disaster score from the flood model, five bands.
//! - [`TsunamiSeverity`]: tsunami probability, three bands.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Colour of the map marker drawn for a prediction.
///
/// Values match the Leaflet awesome-markers palette names.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerColor {
    /// Lowest tier.
    Green,
    /// Middle tiers.
    Orange,
    /// Highest tiers.
    Red,
}

/// Severity of a flood/disaster score.
///
/// Bands (closed-open):
///
/// | Score       | Label      |
/// |-------------|------------|
/// | `< 4`       | `No`       |
/// | `[4, 6)`    | `Low`      |
/// | `[6, 8)`    | `Moderate` |
/// | `[8, 9)`    | `High`     |
/// | `>= 9`      | `Very High`|
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum FloodSeverity {
    /// No severity.
    No,
    /// Low severity.
    Low,
    /// Moderate severity.
    Moderate,
    /// High severity.
    High,
    /// Very high severity.
    #[serde(rename = "Very High")]
    #[strum(serialize = "Very High")]
    VeryHigh,
}

impl FloodSeverity {
    /// Classifies a raw flood score.
    ///
    /// Boundary values (4, 6, 8, 9) belong to the upper band. `NaN` fails
    /// every comparison and falls through to [`Self::VeryHigh`].
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 4.0 {
            Self::No
        } else if score < 6.0 {
            Self::Low
        } else if score < 8.0 {
            Self::Moderate
        } else if score < 9.0 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    /// Returns the marker colour advertised for this band by the legend.
    #[must_use]
    pub const fn marker_color(self) -> MarkerColor {
        match self {
            Self::No => MarkerColor::Green,
            Self::Low | Self::Moderate => MarkerColor::Orange,
            Self::High | Self::VeryHigh => MarkerColor::Red,
        }
    }

    /// Human-readable score range of this band, as shown in the legend.
    #[must_use]
    pub const fn range_label(self) -> &'static str {
        match self {
            Self::No => "0-4",
            Self::Low => "4-6",
            Self::Moderate => "6-8",
            Self::High => "8-9",
            Self::VeryHigh => "9+",
        }
    }

    /// Returns all variants in ascending order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::No,
            Self::Low,
            Self::Moderate,
            Self::High,
            Self::VeryHigh,
        ]
    }

    /// Legend rows for the flood map, lowest band first.
    #[must_use]
    pub fn legend() -> Vec<LegendEntry> {
        Self::all()
            .iter()
            .map(|severity| LegendEntry {
                label: format!("{severity} Severity ({})", severity.range_label()),
                color: severity.marker_color(),
            })
            .collect()
    }
}

/// Severity of a tsunami probability.
///
/// `p > 0.9` is `High`, `0.7 < p <= 0.9` is `Moderate`, anything else is
/// `Low`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum TsunamiSeverity {
    /// Probability at or below 0.7.
    Low,
    /// Probability in `(0.7, 0.9]`.
    Moderate,
    /// Probability above 0.9.
    High,
}

impl TsunamiSeverity {
    /// Classifies a tsunami probability.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.9 {
            Self::High
        } else if probability > 0.7 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Returns the marker colour for this severity.
    #[must_use]
    pub const fn marker_color(self) -> MarkerColor {
        match self {
            Self::Low => MarkerColor::Green,
            Self::Moderate => MarkerColor::Orange,
            Self::High => MarkerColor::Red,
        }
    }

    /// Whether this severity should raise an alert.
    #[must_use]
    pub const fn is_alert(self) -> bool {
        matches!(self, Self::High)
    }
}

/// One row of a map legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Text shown next to the marker icon.
    pub label: String,
    /// Marker colour for the row.
    pub color: MarkerColor,
}
