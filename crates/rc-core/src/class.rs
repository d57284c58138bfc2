//! Road classification tiers.
//!
//! Edges carry the raw `highway` string they were loaded with (OSM
//! convention).  Traffic generation only cares about the coarse tier, so the
//! string is folded into a [`RoadClass`] at assignment time.  The raw string
//! is kept on the edge for display.

/// Coarse road tier used to scale generated traffic.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RoadClass {
    /// Motorway, trunk, primary and their `_link` ramps.
    Arterial,
    /// Secondary and tertiary roads.
    Collector,
    /// Residential, unclassified and untagged `road`.
    Local,
    /// Service roads, tracks, and anything unknown or untagged.
    #[default]
    Minor,
}

impl RoadClass {
    /// Classify a `highway` tag value.  `None` (no tag) is [`RoadClass::Minor`].
    pub fn from_highway(highway: Option<&str>) -> Self {
        match highway {
            Some(
                "motorway" | "motorway_link"
                | "trunk" | "trunk_link"
                | "primary" | "primary_link",
            ) => RoadClass::Arterial,
            Some(
                "secondary" | "secondary_link"
                | "tertiary" | "tertiary_link",
            ) => RoadClass::Collector,
            Some("residential" | "unclassified" | "road") => RoadClass::Local,
            _ => RoadClass::Minor,
        }
    }

    /// Traffic multiplier for this tier.
    pub fn traffic_factor(self) -> f64 {
        match self {
            RoadClass::Arterial  => 3.0,
            RoadClass::Collector => 2.0,
            RoadClass::Local     => 1.0,
            RoadClass::Minor     => 0.5,
        }
    }
}
