//! Day blocks, events and the typed records decoded from event values.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Position of an event in the run-wide sequence.
pub type EventIndex = i64;

/// Age of the subject on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

/// One calendar day of an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBlock {
    pub date: NaiveDate,
    pub name: String,
    pub age: Age,
    /// Free text after the summary section, one `\n` per line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One timestamped line of a day's event list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub index: EventIndex,
    pub timestamp: DateTime<FixedOffset>,
    /// The label as written in the export.
    pub label: String,
    /// The category the label decodes into, if it is a known label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Which breast was offered first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingOrder {
    LeftToRight,
    RightToLeft,
}

impl FeedingOrder {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LeftToRight => "left_to_right",
            Self::RightToLeft => "right_to_left",
        }
    }
}

/// Diaper amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiaperVolume {
    #[default]
    Normal,
    Tiny,
    Less,
    More,
}

impl DiaperVolume {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Tiny => "tiny",
            Self::Less => "less",
            Self::More => "more",
        }
    }
}

/// Diaper consistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiaperConsistency {
    #[default]
    Normal,
    Diarrhea,
    Soft,
    Hard,
}

impl DiaperConsistency {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Diarrhea => "diarrhea",
            Self::Soft => "soft",
            Self::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepStart {
    pub index: EventIndex,
    /// Set when the label carried a value it never should.
    pub error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepEnd {
    pub index: EventIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleeping_minutes: Option<i64>,
    pub wake_up_time: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedtime: Option<DateTime<FixedOffset>>,
    /// Set when the export flagged the sleep as inconsistent.
    pub error: bool,
}

/// A single measured value (height, weight, head circumference, temperature).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub index: EventIndex,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressedMilk {
    pub index: EventIndex,
    pub volume_ml: u32,
    /// Recorded from a bare `<N>ml` label rather than the expressed milk label.
    pub in_progress: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaMilk {
    pub index: EventIndex,
    pub volume_ml: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Breastfeeding {
    pub index: EventIndex,
    pub volume_ml: Option<u32>,
    pub left_minutes: Option<u32>,
    pub right_minutes: Option<u32>,
    pub order: Option<FeedingOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diaper {
    pub index: EventIndex,
    pub volume: DiaperVolume,
    pub consistency: DiaperConsistency,
}

/// Free text attached to a clinic visit or vaccination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub index: EventIndex,
    pub text: Option<String>,
}

/// The decoded payload of one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum CategoryRecord {
    SleepStart(SleepStart),
    SleepEnd(SleepEnd),
    Height(Measurement),
    Weight(Measurement),
    HeadCircumference(Measurement),
    Temperature(Measurement),
    ExpressedMilk(ExpressedMilk),
    FormulaMilk(FormulaMilk),
    Breastfeeding(Breastfeeding),
    Diaper(Diaper),
    ClinicVisit(Note),
    Vaccination(Note),
}

impl CategoryRecord {
    /// The category whose table this record belongs to.
    pub const fn category(&self) -> Category {
        match self {
            Self::SleepStart(_) => Category::SleepStart,
            Self::SleepEnd(_) => Category::SleepEnd,
            Self::Height(_) => Category::Height,
            Self::Weight(_) => Category::Weight,
            Self::HeadCircumference(_) => Category::HeadCircumference,
            Self::Temperature(_) => Category::Temperature,
            Self::ExpressedMilk(_) => Category::ExpressedMilk,
            Self::FormulaMilk(_) => Category::FormulaMilk,
            Self::Breastfeeding(_) => Category::Breastfeeding,
            Self::Diaper(_) => Category::Diaper,
            Self::ClinicVisit(_) => Category::ClinicVisit,
            Self::Vaccination(_) => Category::Vaccination,
        }
    }

    /// Index of the parent event.
    pub const fn index(&self) -> EventIndex {
        match self {
            Self::SleepStart(r) => r.index,
            Self::SleepEnd(r) => r.index,
            Self::Height(r) | Self::Weight(r) | Self::HeadCircumference(r) | Self::Temperature(r) => {
                r.index
            }
            Self::ExpressedMilk(r) => r.index,
            Self::FormulaMilk(r) => r.index,
            Self::Breastfeeding(r) => r.index,
            Self::Diaper(r) => r.index,
            Self::ClinicVisit(r) | Self::Vaccination(r) => r.index,
        }
    }
}
