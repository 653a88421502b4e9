//! Event categories as the single source of truth for category table names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categories an event label can decode into.
///
/// Each category owns exactly one output table, named by [`Category::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    SleepStart,
    SleepEnd,
    Height,
    Weight,
    HeadCircumference,
    Temperature,
    ExpressedMilk,
    FormulaMilk,
    Breastfeeding,
    Diaper,
    ClinicVisit,
    Vaccination,
}

impl Category {
    /// Every category, in table order.
    pub const ALL: [Self; 12] = [
        Self::SleepStart,
        Self::SleepEnd,
        Self::Height,
        Self::Weight,
        Self::HeadCircumference,
        Self::Temperature,
        Self::ExpressedMilk,
        Self::FormulaMilk,
        Self::Breastfeeding,
        Self::Diaper,
        Self::ClinicVisit,
        Self::Vaccination,
    ];

    /// Table name for this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SleepStart => "sleep_start",
            Self::SleepEnd => "sleep_end",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::HeadCircumference => "head_circumference",
            Self::Temperature => "temperature",
            Self::ExpressedMilk => "expressed_milk",
            Self::FormulaMilk => "formula_milk",
            Self::Breastfeeding => "breastfeeding",
            Self::Diaper => "diaper",
            Self::ClinicVisit => "clinic_visit",
            Self::Vaccination => "vaccination",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown category strings.
#[derive(Debug, Clone)]
pub struct UnknownCategory(String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}
