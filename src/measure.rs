//! Physiological measures and summary statistics.
//!
//! Dataset columns are named `<measure>_<statistic>` (e.g. `HR_avg`,
//! `EDA_period2`). Selectors arrive as free-form strings; anything outside
//! the enumerations below simply fails to parse and is treated as invalid
//! downstream rather than raised.

use std::fmt;

/// A physiological signal recorded by the wearable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Measure {
    /// Heart rate.
    HeartRate,
    /// Electrodermal activity (skin conductance).
    SkinConductance,
    /// Skin temperature.
    Temperature,
    /// Blood-volume pulse.
    BloodVolumePulse,
}

impl Measure {
    /// All measures in selector order.
    pub const ALL: [Self; 4] = [
        Self::HeartRate,
        Self::SkinConductance,
        Self::Temperature,
        Self::BloodVolumePulse,
    ];

    /// Column prefix used in the dataset.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::HeartRate => "HR",
            Self::SkinConductance => "EDA",
            Self::Temperature => "TEMP",
            Self::BloodVolumePulse => "BVP",
        }
    }

    /// Display unit.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::HeartRate => "BPM",
            Self::SkinConductance => "μS",
            Self::Temperature => "°C",
            Self::BloodVolumePulse => "a.u.",
        }
    }

    /// Parse a selector value (`"HR"`, `"EDA"`, `"TEMP"`, `"BVP"`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == s)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A summary statistic over a measure's raw sub-measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Statistic {
    /// Precomputed average (never derived).
    Avg,
    /// Median.
    Median,
    /// Maximum.
    Max,
    /// Minimum.
    Min,
    /// First quartile.
    Q1,
    /// Third quartile.
    Q3,
    /// Max minus min.
    Range,
    /// Q3 minus Q1.
    Iqr,
}

impl Statistic {
    /// All statistics in selector order.
    pub const ALL: [Self; 8] = [
        Self::Avg,
        Self::Median,
        Self::Max,
        Self::Min,
        Self::Q1,
        Self::Q3,
        Self::Range,
        Self::Iqr,
    ];

    /// Column suffix used in the dataset.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Avg => "avg",
            Self::Median => "median",
            Self::Max => "max",
            Self::Min => "min",
            Self::Q1 => "q1",
            Self::Q3 => "q3",
            Self::Range => "range",
            Self::Iqr => "iqr",
        }
    }

    /// Axis and tooltip label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Avg => "Average",
            Self::Median => "Median",
            Self::Max => "Maximum",
            Self::Min => "Minimum",
            Self::Q1 => "1st Quartile",
            Self::Q3 => "3rd Quartile",
            Self::Range => "Range",
            Self::Iqr => "IQR",
        }
    }

    /// Parse a selector value (`"avg"`, `"median"`, ...).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.key() == s)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Dataset column name for a measure/statistic pair.
#[must_use]
pub fn column_key(measure: &str, statistic: &str) -> String {
    format!("{measure}_{statistic}")
}

/// Unit for a free-form measure selector, empty when unrecognized.
#[must_use]
pub fn unit_for(measure: &str) -> &'static str {
    Measure::parse(measure).map_or("", Measure::unit)
}

/// Label for a free-form statistic selector, falling back to the raw name.
#[must_use]
pub fn label_for(statistic: &str) -> &str {
    Statistic::parse(statistic).map_or(statistic, |s| s.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_parse_roundtrip_keys() {
        for m in Measure::ALL {
            assert_eq!(Measure::parse(m.key()), Some(m));
        }
        assert_eq!(Measure::parse("hr"), None);
        assert_eq!(Measure::parse(""), None);
    }

    #[test]
    fn test_statistic_parse() {
        assert_eq!(Statistic::parse("iqr"), Some(Statistic::Iqr));
        assert_eq!(Statistic::parse("mean"), None);
        assert_eq!(Statistic::ALL.len(), 8);
    }

    #[test]
    fn test_column_key() {
        assert_eq!(column_key("HR", "avg"), "HR_avg");
        assert_eq!(column_key(Measure::BloodVolumePulse.key(), "q3"), "BVP_q3");
    }

    #[test]
    fn test_unknown_selectors_degrade() {
        assert_eq!(unit_for("XYZ"), "");
        assert_eq!(unit_for("EDA"), "μS");
        assert_eq!(label_for("period1"), "period1");
        assert_eq!(label_for("q1"), "1st Quartile");
    }

    #[test]
    fn test_label_for_borrowed_selector() {
        // Selector values arrive as owned strings, not literals.
        let unknown = String::from("HR_period2");
        let known = String::from("iqr");
        assert_eq!(label_for(&unknown), "HR_period2");
        assert_eq!(label_for(&known), "IQR");
    }
}
