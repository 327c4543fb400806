//! Located accessibility issues.

use geo::Coord;
use serde::{Deserialize, Serialize};

/// Kinds of condition the rule engine can detect.
///
/// Variants are ordered by the sequence in which rules run for a point.
///
/// # Examples
/// ```
/// use kerbside_core::IssueKind;
///
/// assert_eq!(IssueKind::NarrowSidewalk.as_str(), "narrow-sidewalk");
/// assert!(IssueKind::GoodShade.is_positive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// Sidewalk narrower than the configured minimum.
    NarrowSidewalk,
    /// Sidewalk steeper than the configured maximum.
    SteepSlope,
    /// Damaged share of the sidewalk above the configured maximum.
    PoorCondition,
    /// No sidewalk near the point.
    NoSidewalkCoverage,
    /// No street lamp near the point.
    PoorLighting,
    /// Enough trees near the point to shade it.
    GoodShade,
    /// A curb ramp near the point.
    NearbyRamp,
    /// A crosswalk near the point.
    NearbyCrosswalk,
    /// Posted speed above the configured maximum.
    HighSpeedLimit,
}

impl IssueKind {
    /// Every kind in rule order.
    pub const ALL: [Self; 9] = [
        Self::NarrowSidewalk,
        Self::SteepSlope,
        Self::PoorCondition,
        Self::NoSidewalkCoverage,
        Self::PoorLighting,
        Self::GoodShade,
        Self::NearbyRamp,
        Self::NearbyCrosswalk,
        Self::HighSpeedLimit,
    ];

    /// Return the kind as a kebab-case `&str`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NarrowSidewalk => "narrow-sidewalk",
            Self::SteepSlope => "steep-slope",
            Self::PoorCondition => "poor-condition",
            Self::NoSidewalkCoverage => "no-sidewalk-coverage",
            Self::PoorLighting => "poor-lighting",
            Self::GoodShade => "good-shade",
            Self::NearbyRamp => "nearby-ramp",
            Self::NearbyCrosswalk => "nearby-crosswalk",
            Self::HighSpeedLimit => "high-speed-limit",
        }
    }

    /// Report whether the kind is a positive signal rather than a hazard.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        matches!(self, Self::GoodShade | Self::NearbyRamp)
    }

    const fn title(self) -> &'static str {
        match self {
            Self::NarrowSidewalk => "Narrow sidewalk",
            Self::SteepSlope => "Steep slope",
            Self::PoorCondition => "Poor sidewalk condition",
            Self::NoSidewalkCoverage => "No sidewalk coverage",
            Self::PoorLighting => "Poor lighting",
            Self::GoodShade => "Good shade",
            Self::NearbyRamp => "Curb ramp nearby",
            Self::NearbyCrosswalk => "Crosswalk nearby",
            Self::HighSpeedLimit => "High speed limit",
        }
    }

    const fn unit(self) -> &'static str {
        match self {
            Self::NarrowSidewalk => " ft",
            Self::SteepSlope | Self::PoorCondition => "%",
            Self::HighSpeedLimit => " mph",
            Self::GoodShade => " trees",
            Self::NearbyRamp => " ramps",
            Self::NearbyCrosswalk => " crosswalks",
            Self::NoSidewalkCoverage | Self::PoorLighting => "",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IssueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("unknown issue kind '{s}'"))
    }
}

/// One detected condition anchored to a route point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Index of the route point the issue belongs to.
    pub index: usize,
    /// Coordinate of that route point.
    pub coord: Coord<f64>,
    /// Detected condition.
    pub kind: IssueKind,
    /// Raw value that triggered the rule, when there is one.
    pub value: Option<f64>,
}

impl Issue {
    /// Construct an issue.
    #[must_use]
    pub const fn new(index: usize, coord: Coord<f64>, kind: IssueKind, value: Option<f64>) -> Self {
        Self {
            index,
            coord,
            kind,
            value,
        }
    }

    /// Human-readable description including the triggering value.
    ///
    /// Ratios are rendered as percentages.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use kerbside_core::{Issue, IssueKind};
    ///
    /// let origin = Coord { x: 0.0, y: 0.0 };
    /// let narrow = Issue::new(0, origin, IssueKind::NarrowSidewalk, Some(4.0));
    /// assert_eq!(narrow.label(), "Narrow sidewalk (4 ft)");
    /// let dark = Issue::new(0, origin, IssueKind::PoorLighting, Some(0.0));
    /// assert_eq!(dark.label(), "Poor lighting");
    /// ```
    #[must_use]
    pub fn label(&self) -> String {
        let title = self.kind.title();
        match (self.kind, self.value) {
            (IssueKind::NoSidewalkCoverage | IssueKind::PoorLighting, _) | (_, None) => {
                title.to_owned()
            }
            (IssueKind::PoorCondition, Some(ratio)) => {
                format!("{title} ({}{})", display_number(percent(ratio)), self.kind.unit())
            }
            (_, Some(value)) => format!("{title} ({}{})", display_number(value), self.kind.unit()),
        }
    }
}

#[expect(clippy::float_arithmetic, reason = "ratio to percentage")]
fn percent(ratio: f64) -> f64 {
    ratio * 100.0
}

/// Render whole numbers without a fractional part and others to one place.
fn display_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
