//! Dialect vocabulary for exported day logs.
//!
//! Every literal token the parser matches on lives in a [`Locale`], so a new
//! export dialect is a new value rather than a new parser. Two dialects ship
//! built in (see [`BuiltinLocale`]); others can be layered from TOML with
//! [`Locale::load`].

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::FixedOffset;
use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::Category;

/// Locale loading and validation errors.
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("unknown locale: {0}")]
    Unknown(String),
    #[error("failed to read locale file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid locale file {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },
    #[error("UTC offset of {0} minutes is out of range")]
    InvalidOffset(i32),
    #[error("label for {0} cannot be empty")]
    EmptyLabel(Category),
    #[error("label {label:?} is assigned to both {first} and {second}")]
    DuplicateLabel {
        label: String,
        first: Category,
        second: Category,
    },
}

/// Dialects that ship with the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinLocale {
    /// Japanese export (`ぴよログ`).
    #[default]
    Ja,
    /// Chinese export.
    Zh,
}

impl BuiltinLocale {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ja => "ja",
            Self::Zh => "zh",
        }
    }

    /// Returns the full vocabulary for this dialect.
    #[must_use]
    pub fn locale(self) -> Locale {
        match self {
            Self::Ja => Locale::japanese(),
            Self::Zh => Locale::chinese(),
        }
    }
}

impl fmt::Display for BuiltinLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuiltinLocale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ja" => Ok(Self::Ja),
            "zh" => Ok(Self::Zh),
            _ => Err(LocaleError::Unknown(s.to_string())),
        }
    }
}

/// Markers inside the `(0歳1か月3日)` age annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeMarkers {
    pub year: String,
    pub month: String,
    pub day: String,
}

/// Event labels, one per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub sleep_start: String,
    pub sleep_end: String,
    pub height: String,
    pub weight: String,
    pub head_circumference: String,
    pub temperature: String,
    pub expressed_milk: String,
    pub formula_milk: String,
    pub breastfeeding: String,
    pub diaper: String,
    pub clinic_visit: String,
    pub vaccination: String,
}

impl Labels {
    /// Pairs every category with its label.
    pub fn entries(&self) -> [(Category, &str); 12] {
        [
            (Category::SleepStart, self.sleep_start.as_str()),
            (Category::SleepEnd, self.sleep_end.as_str()),
            (Category::Height, self.height.as_str()),
            (Category::Weight, self.weight.as_str()),
            (Category::HeadCircumference, self.head_circumference.as_str()),
            (Category::Temperature, self.temperature.as_str()),
            (Category::ExpressedMilk, self.expressed_milk.as_str()),
            (Category::FormulaMilk, self.formula_milk.as_str()),
            (Category::Breastfeeding, self.breastfeeding.as_str()),
            (Category::Diaper, self.diaper.as_str()),
            (Category::ClinicVisit, self.clinic_visit.as_str()),
            (Category::Vaccination, self.vaccination.as_str()),
        ]
    }
}

/// Unit suffixes on measured values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Units {
    pub length: String,
    pub weight: String,
    pub temperature: String,
    pub volume: String,
}

/// Tokens of a sleep duration such as `(1時間30分)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationTokens {
    pub hours: String,
    pub minutes: String,
}

/// Side markers and order glyphs of a breastfeeding value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreastfeedingTokens {
    pub left: String,
    pub right: String,
    pub minutes: String,
    pub simultaneous: String,
    pub left_to_right: String,
    pub right_to_left: String,
}

/// Diaper keywords, listed in match priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaperKeywords {
    pub tiny: String,
    pub less: String,
    pub more: String,
    pub diarrhea: String,
    pub soft: String,
    pub hard: String,
}

/// The literal tokens of one export dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Dialect identifier recorded on every table set decoded with this locale.
    pub dialect: String,
    /// Substring identifying the banner line at the top of an export.
    pub banner: String,
    pub day_separator: String,
    /// `chrono` format of the date line, without the weekday suffix.
    pub date_format: String,
    pub utc_offset_minutes: i32,
    pub age: AgeMarkers,
    pub labels: Labels,
    pub units: Units,
    pub duration: DurationTokens,
    pub sleep_error_marker: String,
    pub breastfeeding: BreastfeedingTokens,
    pub diaper: DiaperKeywords,
    /// When set, a bare `<N>ml` label is read as expressed milk in progress
    /// and recorded under this label.
    #[serde(default)]
    pub in_progress_label: Option<String>,
}

impl Locale {
    /// Japanese export vocabulary.
    #[must_use]
    pub fn japanese() -> Self {
        Self {
            dialect: "ja".into(),
            banner: "ぴよログ".into(),
            day_separator: "----------".into(),
            date_format: "%Y/%m/%d".into(),
            utc_offset_minutes: 9 * 60,
            age: AgeMarkers {
                year: "歳".into(),
                month: "か月".into(),
                day: "日".into(),
            },
            labels: Labels {
                sleep_start: "寝る".into(),
                sleep_end: "起きる".into(),
                height: "身長".into(),
                weight: "体重".into(),
                head_circumference: "頭囲".into(),
                temperature: "体温".into(),
                expressed_milk: "搾母乳".into(),
                formula_milk: "ミルク".into(),
                breastfeeding: "母乳".into(),
                diaper: "うんち".into(),
                clinic_visit: "病院".into(),
                vaccination: "予防接種".into(),
            },
            units: Units {
                length: "cm".into(),
                weight: "kg".into(),
                temperature: "°C".into(),
                volume: "ml".into(),
            },
            duration: DurationTokens {
                hours: "時間".into(),
                minutes: "分".into(),
            },
            sleep_error_marker: "!".into(),
            breastfeeding: BreastfeedingTokens {
                left: "左".into(),
                right: "右".into(),
                minutes: "分".into(),
                simultaneous: "/".into(),
                left_to_right: "▶".into(),
                right_to_left: "◀".into(),
            },
            diaper: DiaperKeywords {
                tiny: "ちょこっと".into(),
                less: "少なめ".into(),
                more: "多め".into(),
                diarrhea: "下痢".into(),
                soft: "やわらかめ".into(),
                hard: "かため".into(),
            },
            in_progress_label: None,
        }
    }

    /// Chinese export vocabulary.
    #[must_use]
    pub fn chinese() -> Self {
        Self {
            dialect: "zh".into(),
            banner: "宝宝日志".into(),
            day_separator: "----------".into(),
            date_format: "%Y/%m/%d".into(),
            utc_offset_minutes: 8 * 60,
            age: AgeMarkers {
                year: "岁".into(),
                month: "月".into(),
                day: "日".into(),
            },
            labels: Labels {
                sleep_start: "睡觉".into(),
                sleep_end: "起床".into(),
                height: "身高".into(),
                weight: "体重".into(),
                head_circumference: "头围".into(),
                temperature: "体温".into(),
                expressed_milk: "挤出的母乳".into(),
                formula_milk: "配方奶".into(),
                breastfeeding: "母乳".into(),
                diaper: "便便".into(),
                clinic_visit: "就医".into(),
                vaccination: "疫苗".into(),
            },
            units: Units {
                length: "cm".into(),
                weight: "kg".into(),
                temperature: "°C".into(),
                volume: "ml".into(),
            },
            duration: DurationTokens {
                hours: "小时".into(),
                minutes: "分钟".into(),
            },
            sleep_error_marker: "!".into(),
            breastfeeding: BreastfeedingTokens {
                left: "左".into(),
                right: "右".into(),
                minutes: "分钟".into(),
                simultaneous: "/".into(),
                left_to_right: "▶".into(),
                right_to_left: "◀".into(),
            },
            diaper: DiaperKeywords {
                tiny: "一点点".into(),
                less: "少量".into(),
                more: "多量".into(),
                diarrhea: "腹泻".into(),
                soft: "偏软".into(),
                hard: "偏硬".into(),
            },
            in_progress_label: Some("挤奶中".into()),
        }
    }

    /// Loads a dialect from a TOML file layered over `base`.
    ///
    /// Keys missing from the file keep the value from `base`, so a file only
    /// needs the tokens that differ.
    pub fn load(path: &Path, base: &Self) -> Result<Self, LocaleError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LocaleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Figment::from(Serialized::defaults(base))
            .merge(Toml::string(&contents))
            .extract()
            .map_err(|source| LocaleError::Load {
                path: path.to_path_buf(),
                source: Box::new(source),
            })
    }

    /// Prepares the label lookup table and UTC offset for parsing.
    pub fn vocabulary(&self) -> Result<Vocabulary<'_>, LocaleError> {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .ok_or(LocaleError::InvalidOffset(self.utc_offset_minutes))?;

        let mut categories: HashMap<&str, Category> = HashMap::new();
        let in_progress = self
            .in_progress_label
            .as_deref()
            .map(|label| (Category::ExpressedMilk, label));
        for (category, label) in self.labels.entries().into_iter().chain(in_progress) {
            if label.is_empty() {
                return Err(LocaleError::EmptyLabel(category));
            }
            if let Some(first) = categories.insert(label, category) {
                return Err(LocaleError::DuplicateLabel {
                    label: label.to_string(),
                    first,
                    second: category,
                });
            }
        }

        Ok(Vocabulary {
            locale: self,
            categories,
            offset,
        })
    }
}

impl Default for Locale {
    fn default() -> Self {
        BuiltinLocale::default().locale()
    }
}

/// A [`Locale`] prepared for parsing: label lookup table plus UTC offset.
#[derive(Debug, Clone)]
pub struct Vocabulary<'a> {
    locale: &'a Locale,
    categories: HashMap<&'a str, Category>,
    offset: FixedOffset,
}

impl<'a> Vocabulary<'a> {
    pub const fn locale(&self) -> &'a Locale {
        self.locale
    }

    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Looks up the category an event label decodes into.
    pub fn category(&self, label: &str) -> Option<Category> {
        self.categories.get(label).copied()
    }

    /// Returns the in-progress label if `label` is a bare `<N>ml` volume and
    /// the dialect reads those as expressed milk.
    pub fn in_progress_label(&self, label: &str) -> Option<&'a str> {
        let in_progress = self.locale.in_progress_label.as_deref()?;
        let digits = label.strip_suffix(self.locale.units.volume.as_str())?;
        (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(in_progress)
    }
}
