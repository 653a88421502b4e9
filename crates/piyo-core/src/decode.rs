//! Value decoders, one per category.
//!
//! A decoder receives the parent [`Event`] and the text after the label (if
//! any) and returns the typed record for the category's table. Decoders
//! never guess: text that does not fit the category's grammar is a
//! [`DecodeError`].

use std::str::FromStr;

use chrono::Duration;
use thiserror::Error;

use crate::category::Category;
use crate::locale::Locale;
use crate::record::{
    Breastfeeding, CategoryRecord, Diaper, DiaperConsistency, DiaperVolume, Event, ExpressedMilk,
    FeedingOrder, FormulaMilk, Measurement, Note, SleepEnd, SleepStart,
};

/// Errors raised when a value does not fit its category's grammar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{category} requires a value")]
    MissingValue { category: Category },

    #[error("{category} value {value:?} has no {token:?}")]
    MissingToken {
        category: Category,
        value: String,
        token: String,
    },

    #[error("{category} value {value:?} has an invalid number {number:?}")]
    InvalidNumber {
        category: Category,
        value: String,
        number: String,
    },

    #[error("unrecognized breastfeeding value {value:?}")]
    UnknownBreastfeedingFormat { value: String },

    #[error("sleep duration {value:?} is out of range")]
    DurationOutOfRange { value: String },
}

/// Signature shared by every category decoder.
pub type Decoder =
    fn(&Locale, &Event, Option<&str>) -> Result<Option<CategoryRecord>, DecodeError>;

/// Returns the decoder for a category.
pub const fn decoder(category: Category) -> Decoder {
    match category {
        Category::SleepStart => sleep_start,
        Category::SleepEnd => sleep_end,
        Category::Height => height,
        Category::Weight => weight,
        Category::HeadCircumference => head_circumference,
        Category::Temperature => temperature,
        Category::ExpressedMilk => expressed_milk,
        Category::FormulaMilk => formula_milk,
        Category::Breastfeeding => breastfeeding,
        Category::Diaper => diaper,
        Category::ClinicVisit => clinic_visit,
        Category::Vaccination => vaccination,
    }
}

/// Decodes `value` as a record of `category`.
pub fn decode(
    category: Category,
    locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    decoder(category)(locale, event, value)
}

fn sleep_start(
    _locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    Ok(Some(CategoryRecord::SleepStart(SleepStart {
        index: event.index,
        error: value.is_some(),
    })))
}

fn sleep_end(
    locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    let value = require(Category::SleepEnd, value)?;
    let wake_up_time = event.timestamp;

    if value.contains(locale.sleep_error_marker.as_str()) {
        return Ok(Some(CategoryRecord::SleepEnd(SleepEnd {
            index: event.index,
            sleeping_minutes: None,
            wake_up_time,
            bedtime: None,
            error: true,
        })));
    }

    let minutes = sleep_minutes(locale, value)?;
    let bedtime = Duration::try_minutes(minutes)
        .and_then(|sleeping| wake_up_time.checked_sub_signed(sleeping))
        .ok_or_else(|| DecodeError::DurationOutOfRange {
            value: value.to_string(),
        })?;
    Ok(Some(CategoryRecord::SleepEnd(SleepEnd {
        index: event.index,
        sleeping_minutes: Some(minutes),
        wake_up_time,
        bedtime: Some(bedtime),
        error: false,
    })))
}

/// Parses `(1時間30分)` into total minutes. The hours part may be absent.
fn sleep_minutes(locale: &Locale, value: &str) -> Result<i64, DecodeError> {
    let category = Category::SleepEnd;
    let tokens = &locale.duration;
    let inner = value
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim();

    let (hours, rest) = match inner.split_once(tokens.hours.as_str()) {
        Some((hours, rest)) => (parse_number::<u32>(category, value, hours)?, rest),
        None => (0, inner),
    };
    let minutes = if rest.trim().is_empty() {
        0
    } else {
        let end = rest
            .find(tokens.minutes.as_str())
            .ok_or_else(|| missing_token(category, value, &tokens.minutes))?;
        parse_number::<u32>(category, value, &rest[..end])?
    };

    Ok(i64::from(hours) * 60 + i64::from(minutes))
}

fn height(
    locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    let m = measurement(Category::Height, &locale.units.length, event, value)?;
    Ok(Some(CategoryRecord::Height(m)))
}

fn weight(
    locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    let m = measurement(Category::Weight, &locale.units.weight, event, value)?;
    Ok(Some(CategoryRecord::Weight(m)))
}

fn head_circumference(
    locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    let m = measurement(Category::HeadCircumference, &locale.units.length, event, value)?;
    Ok(Some(CategoryRecord::HeadCircumference(m)))
}

fn temperature(
    locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    let m = measurement(Category::Temperature, &locale.units.temperature, event, value)?;
    Ok(Some(CategoryRecord::Temperature(m)))
}

fn measurement(
    category: Category,
    unit: &str,
    event: &Event,
    value: Option<&str>,
) -> Result<Measurement, DecodeError> {
    let value = require(category, value)?;
    Ok(Measurement {
        index: event.index,
        value: finite_before(category, value, unit)?,
    })
}

fn expressed_milk(
    locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    let category = Category::ExpressedMilk;
    let value = require(category, value)?;
    let in_progress = locale.in_progress_label.as_deref() == Some(event.label.as_str());
    Ok(Some(CategoryRecord::ExpressedMilk(ExpressedMilk {
        index: event.index,
        volume_ml: number_before(category, value, &locale.units.volume)?,
        in_progress,
    })))
}

fn formula_milk(
    locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    let volume_ml = value
        .map(|value| number_before(Category::FormulaMilk, value, &locale.units.volume))
        .transpose()?;
    Ok(Some(CategoryRecord::FormulaMilk(FormulaMilk {
        index: event.index,
        volume_ml,
    })))
}

fn breastfeeding(
    locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    let category = Category::Breastfeeding;
    let mut record = Breastfeeding {
        index: event.index,
        ..Breastfeeding::default()
    };
    let Some(value) = value else {
        return Ok(Some(CategoryRecord::Breastfeeding(record)));
    };

    let tokens = &locale.breastfeeding;
    let volume_unit = locale.units.volume.as_str();
    let has_left = value.contains(tokens.left.as_str());
    let has_right = value.contains(tokens.right.as_str());

    if let Some(end) = value.find(volume_unit) {
        let start = value.find('(').map_or(0, |open| open + 1);
        let number = value.get(start..end).unwrap_or_default();
        record.volume_ml = Some(parse_number(category, value, number)?);
    } else if value == locale.labels.breastfeeding {
        // Label repeated as its own value: a feed with no quantity.
    } else if has_left || has_right {
        if has_left {
            record.left_minutes = Some(minutes_after(value, &tokens.left, &tokens.minutes)?);
        }
        if has_right {
            record.right_minutes = Some(minutes_after(value, &tokens.right, &tokens.minutes)?);
        }
        if has_left && has_right {
            record.order = if value.contains(tokens.simultaneous.as_str()) {
                None
            } else if value.contains(tokens.left_to_right.as_str()) {
                Some(FeedingOrder::LeftToRight)
            } else if value.contains(tokens.right_to_left.as_str()) {
                Some(FeedingOrder::RightToLeft)
            } else {
                return Err(unknown_breastfeeding(value));
            };
        }
    } else {
        return Err(unknown_breastfeeding(value));
    }

    Ok(Some(CategoryRecord::Breastfeeding(record)))
}

/// Parses the minutes following a side marker, e.g. `10` in `左10分`.
fn minutes_after(value: &str, marker: &str, unit: &str) -> Result<u32, DecodeError> {
    let category = Category::Breastfeeding;
    let start = value
        .find(marker)
        .ok_or_else(|| missing_token(category, value, marker))?
        + marker.len();
    let rest = &value[start..];
    let end = rest
        .find(unit)
        .ok_or_else(|| missing_token(category, value, unit))?;
    parse_number(category, value, &rest[..end])
}

fn diaper(
    locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    let mut record = Diaper {
        index: event.index,
        volume: DiaperVolume::Normal,
        consistency: DiaperConsistency::Normal,
    };

    if let Some(value) = value {
        let keywords = &locale.diaper;
        let matches = |keyword: &String| !keyword.is_empty() && value.contains(keyword.as_str());

        // Amount keywords take priority over consistency keywords.
        if matches(&keywords.tiny) {
            record.volume = DiaperVolume::Tiny;
        } else if matches(&keywords.less) {
            record.volume = DiaperVolume::Less;
        } else if matches(&keywords.more) {
            record.volume = DiaperVolume::More;
        } else if matches(&keywords.diarrhea) {
            record.consistency = DiaperConsistency::Diarrhea;
        } else if matches(&keywords.soft) {
            record.consistency = DiaperConsistency::Soft;
        } else if matches(&keywords.hard) {
            record.consistency = DiaperConsistency::Hard;
        }
    }

    Ok(Some(CategoryRecord::Diaper(record)))
}

fn clinic_visit(
    _locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    Ok(Some(CategoryRecord::ClinicVisit(Note {
        index: event.index,
        text: value.map(str::to_string),
    })))
}

fn vaccination(
    _locale: &Locale,
    event: &Event,
    value: Option<&str>,
) -> Result<Option<CategoryRecord>, DecodeError> {
    Ok(value.map(|value| {
        CategoryRecord::Vaccination(Note {
            index: event.index,
            text: Some(value.to_string()),
        })
    }))
}

fn require(category: Category, value: Option<&str>) -> Result<&str, DecodeError> {
    value.ok_or(DecodeError::MissingValue { category })
}

/// Parses the number that ends right before the first `unit` in `value`.
fn number_before<T: FromStr>(category: Category, value: &str, unit: &str) -> Result<T, DecodeError> {
    let end = value
        .find(unit)
        .ok_or_else(|| missing_token(category, value, unit))?;
    parse_number(category, value, &value[..end])
}

/// Like [`number_before`], but rejects `NaN` and infinities.
fn finite_before(category: Category, value: &str, unit: &str) -> Result<f64, DecodeError> {
    let end = value
        .find(unit)
        .ok_or_else(|| missing_token(category, value, unit))?;
    let number: f64 = parse_number(category, value, &value[..end])?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(DecodeError::InvalidNumber {
            category,
            value: value.to_string(),
            number: value[..end].trim().to_string(),
        })
    }
}

fn parse_number<T: FromStr>(category: Category, value: &str, number: &str) -> Result<T, DecodeError> {
    let number = number.trim();
    number.parse().map_err(|_| DecodeError::InvalidNumber {
        category,
        value: value.to_string(),
        number: number.to_string(),
    })
}

fn missing_token(category: Category, value: &str, token: &str) -> DecodeError {
    DecodeError::MissingToken {
        category,
        value: value.to_string(),
        token: token.to_string(),
    }
}

fn unknown_breastfeeding(value: &str) -> DecodeError {
    DecodeError::UnknownBreastfeedingFormat {
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, FixedOffset};

    fn timestamp(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn event(label: &str) -> Event {
        Event {
            index: 7,
            timestamp: timestamp("2024-01-15T06:30:00+09:00"),
            label: label.to_string(),
            category: None,
        }
    }

    fn decode_ja(category: Category, value: Option<&str>) -> Result<Option<CategoryRecord>, DecodeError> {
        let locale = Locale::japanese();
        decode(category, &locale, &event("label"), value)
    }

    fn decode_zh(category: Category, value: Option<&str>) -> Result<Option<CategoryRecord>, DecodeError> {
        let locale = Locale::chinese();
        decode(category, &locale, &event("label"), value)
    }

    fn breastfeeding_ja(value: &str) -> Breastfeeding {
        match decode_ja(Category::Breastfeeding, Some(value)).unwrap() {
            Some(CategoryRecord::Breastfeeding(record)) => record,
            other => panic!("expected breastfeeding record, got {other:?}"),
        }
    }

    fn diaper_ja(value: Option<&str>) -> Diaper {
        match decode_ja(Category::Diaper, value).unwrap() {
            Some(CategoryRecord::Diaper(record)) => record,
            other => panic!("expected diaper record, got {other:?}"),
        }
    }

    fn sleep_end_record(record: Option<CategoryRecord>) -> SleepEnd {
        match record {
            Some(CategoryRecord::SleepEnd(record)) => record,
            other => panic!("expected sleep end record, got {other:?}"),
        }
    }

    #[test]
    fn sleep_start_flags_unexpected_value() {
        let plain = decode_ja(Category::SleepStart, None).unwrap();
        assert_eq!(
            plain,
            Some(CategoryRecord::SleepStart(SleepStart { index: 7, error: false }))
        );
        let flagged = decode_ja(Category::SleepStart, Some("(!)")).unwrap();
        assert_eq!(
            flagged,
            Some(CategoryRecord::SleepStart(SleepStart { index: 7, error: true }))
        );
    }

    #[test]
    fn sleep_end_computes_duration_and_bedtime() {
        let record = sleep_end_record(decode_ja(Category::SleepEnd, Some("(1時間30分)")).unwrap());
        assert_eq!(record.sleeping_minutes, Some(90));
        assert_eq!(record.wake_up_time, timestamp("2024-01-15T06:30:00+09:00"));
        assert_eq!(record.bedtime, Some(timestamp("2024-01-15T05:00:00+09:00")));
        assert!(!record.error);
    }

    #[test]
    fn sleep_end_without_parentheses() {
        let record = sleep_end_record(decode_ja(Category::SleepEnd, Some("1時間30分")).unwrap());
        assert_eq!(record.sleeping_minutes, Some(90));
    }

    #[test]
    fn sleep_end_chinese_duration() {
        let record = sleep_end_record(decode_zh(Category::SleepEnd, Some("(1小时30分钟)")).unwrap());
        assert_eq!(record.sleeping_minutes, Some(90));
    }

    #[test]
    fn sleep_end_minutes_only() {
        let record = sleep_end_record(decode_ja(Category::SleepEnd, Some("(45分)")).unwrap());
        assert_eq!(record.sleeping_minutes, Some(45));
        assert_eq!(record.bedtime, Some(timestamp("2024-01-15T05:45:00+09:00")));
    }

    #[test]
    fn sleep_end_crossing_midnight() {
        let record = sleep_end_record(decode_ja(Category::SleepEnd, Some("(8時間0分)")).unwrap());
        assert_eq!(record.bedtime, Some(timestamp("2024-01-14T22:30:00+09:00")));
    }

    #[test]
    fn sleep_end_error_marker_yields_error_record() {
        let record = sleep_end_record(decode_ja(Category::SleepEnd, Some("(!)")).unwrap());
        assert!(record.error);
        assert_eq!(record.sleeping_minutes, None);
        assert_eq!(record.bedtime, None);
        assert_eq!(record.wake_up_time, timestamp("2024-01-15T06:30:00+09:00"));
    }

    #[test]
    fn sleep_end_requires_value() {
        let err = decode_ja(Category::SleepEnd, None).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingValue {
                category: Category::SleepEnd
            }
        );
    }

    #[test]
    fn sleep_end_rejects_garbage() {
        let err = decode_ja(Category::SleepEnd, Some("(ぐっすり)")).unwrap_err();
        assert!(matches!(err, DecodeError::MissingToken { .. }));
        let err = decode_ja(Category::SleepEnd, Some("(x時間5分)")).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { .. }));
    }

    #[test]
    fn sleep_end_duration_beyond_calendar_fails() {
        let err = decode_ja(Category::SleepEnd, Some("(4294967295時間0分)")).unwrap_err();
        assert_eq!(
            err,
            DecodeError::DurationOutOfRange {
                value: "(4294967295時間0分)".to_string()
            }
        );
    }

    #[test]
    fn measurements_reject_non_finite_numbers() {
        for value in ["NaN°C", "inf°C", "-infinity°C"] {
            let err = decode_ja(Category::Temperature, Some(value)).unwrap_err();
            assert!(
                matches!(err, DecodeError::InvalidNumber { ref number, .. } if value.starts_with(number.as_str())),
                "{value}: {err:?}"
            );
        }
    }

    #[test]
    fn measurements_parse_leading_decimal() {
        assert_eq!(
            decode_ja(Category::Height, Some("61.5cm")).unwrap(),
            Some(CategoryRecord::Height(Measurement { index: 7, value: 61.5 }))
        );
        assert_eq!(
            decode_ja(Category::Weight, Some("6.02kg")).unwrap(),
            Some(CategoryRecord::Weight(Measurement { index: 7, value: 6.02 }))
        );
        assert_eq!(
            decode_ja(Category::HeadCircumference, Some("40.1cm")).unwrap(),
            Some(CategoryRecord::HeadCircumference(Measurement { index: 7, value: 40.1 }))
        );
        assert_eq!(
            decode_zh(Category::Temperature, Some("36.8°C")).unwrap(),
            Some(CategoryRecord::Temperature(Measurement { index: 7, value: 36.8 }))
        );
    }

    #[test]
    fn measurement_without_unit_fails() {
        let err = decode_ja(Category::Weight, Some("6.02")).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingToken {
                category: Category::Weight,
                value: "6.02".to_string(),
                token: "kg".to_string(),
            }
        );
        let err = decode_ja(Category::Height, Some("abcm")).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { .. }));
    }

    #[test]
    fn expressed_milk_volume() {
        assert_eq!(
            decode_ja(Category::ExpressedMilk, Some("80ml")).unwrap(),
            Some(CategoryRecord::ExpressedMilk(ExpressedMilk {
                index: 7,
                volume_ml: 80,
                in_progress: false,
            }))
        );
        assert!(decode_ja(Category::ExpressedMilk, None).is_err());
    }

    #[test]
    fn expressed_milk_in_progress_label() {
        let locale = Locale::chinese();
        let record = decode(
            Category::ExpressedMilk,
            &locale,
            &event("挤奶中"),
            Some("120ml"),
        )
        .unwrap();
        assert_eq!(
            record,
            Some(CategoryRecord::ExpressedMilk(ExpressedMilk {
                index: 7,
                volume_ml: 120,
                in_progress: true,
            }))
        );
    }

    #[test]
    fn formula_milk_volume_is_optional() {
        assert_eq!(
            decode_ja(Category::FormulaMilk, Some("120ml")).unwrap(),
            Some(CategoryRecord::FormulaMilk(FormulaMilk {
                index: 7,
                volume_ml: Some(120),
            }))
        );
        assert_eq!(
            decode_ja(Category::FormulaMilk, None).unwrap(),
            Some(CategoryRecord::FormulaMilk(FormulaMilk {
                index: 7,
                volume_ml: None,
            }))
        );
    }

    #[test]
    fn breastfeeding_volume_in_parentheses() {
        let record = breastfeeding_ja("(120ml)");
        assert_eq!(record.volume_ml, Some(120));
        assert_eq!(record.left_minutes, None);
        assert_eq!(record.right_minutes, None);
        assert_eq!(record.order, None);
    }

    #[test]
    fn breastfeeding_order_glyphs() {
        let record = breastfeeding_ja("左10分 ▶ 右5分");
        assert_eq!(record.left_minutes, Some(10));
        assert_eq!(record.right_minutes, Some(5));
        assert_eq!(record.order, Some(FeedingOrder::LeftToRight));

        let record = breastfeeding_ja("左10分 ◀ 右5分");
        assert_eq!(record.order, Some(FeedingOrder::RightToLeft));

        let record = breastfeeding_ja("左10分 / 右5分");
        assert_eq!(record.left_minutes, Some(10));
        assert_eq!(record.right_minutes, Some(5));
        assert_eq!(record.order, None);
    }

    #[test]
    fn breastfeeding_chinese_minutes() {
        let record = match decode_zh(Category::Breastfeeding, Some("左10分钟 ▶ 右5分钟")).unwrap() {
            Some(CategoryRecord::Breastfeeding(record)) => record,
            other => panic!("expected breastfeeding record, got {other:?}"),
        };
        assert_eq!(record.left_minutes, Some(10));
        assert_eq!(record.right_minutes, Some(5));
        assert_eq!(record.order, Some(FeedingOrder::LeftToRight));
    }

    #[test]
    fn breastfeeding_single_side() {
        let record = breastfeeding_ja("左 7分");
        assert_eq!(record.left_minutes, Some(7));
        assert_eq!(record.right_minutes, None);
        assert_eq!(record.order, None);

        let record = breastfeeding_ja("右12分");
        assert_eq!(record.left_minutes, None);
        assert_eq!(record.right_minutes, Some(12));
    }

    #[test]
    fn breastfeeding_without_quantity() {
        let record = breastfeeding_ja("母乳");
        assert_eq!(record, Breastfeeding { index: 7, ..Breastfeeding::default() });

        let record = match decode_ja(Category::Breastfeeding, None).unwrap() {
            Some(CategoryRecord::Breastfeeding(record)) => record,
            other => panic!("expected breastfeeding record, got {other:?}"),
        };
        assert_eq!(record, Breastfeeding { index: 7, ..Breastfeeding::default() });
    }

    #[test]
    fn breastfeeding_unknown_formats_fail() {
        let err = decode_ja(Category::Breastfeeding, Some("左10分 右5分")).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownBreastfeedingFormat {
                value: "左10分 右5分".to_string()
            }
        );
        let err = decode_ja(Category::Breastfeeding, Some("たくさん")).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownBreastfeedingFormat { .. }));
    }

    #[test]
    fn diaper_defaults_to_normal() {
        let record = diaper_ja(None);
        assert_eq!(record.volume, DiaperVolume::Normal);
        assert_eq!(record.consistency, DiaperConsistency::Normal);

        let record = diaper_ja(Some("(ふつう)"));
        assert_eq!(record.volume, DiaperVolume::Normal);
        assert_eq!(record.consistency, DiaperConsistency::Normal);
    }

    #[test]
    fn diaper_keywords_set_one_field() {
        let record = diaper_ja(Some("少なめ"));
        assert_eq!(record.volume, DiaperVolume::Less);
        assert_eq!(record.consistency, DiaperConsistency::Normal);

        let record = diaper_ja(Some("やわらかめ"));
        assert_eq!(record.volume, DiaperVolume::Normal);
        assert_eq!(record.consistency, DiaperConsistency::Soft);

        let record = diaper_ja(Some("かため"));
        assert_eq!(record.consistency, DiaperConsistency::Hard);
    }

    #[test]
    fn diaper_amount_wins_over_consistency() {
        let record = diaper_ja(Some("多め 下痢"));
        assert_eq!(record.volume, DiaperVolume::More);
        assert_eq!(record.consistency, DiaperConsistency::Normal);
    }

    #[test]
    fn diaper_chinese_keywords() {
        let record = match decode_zh(Category::Diaper, Some("腹泻")).unwrap() {
            Some(CategoryRecord::Diaper(record)) => record,
            other => panic!("expected diaper record, got {other:?}"),
        };
        assert_eq!(record.consistency, DiaperConsistency::Diarrhea);
    }

    #[test]
    fn notes_pass_text_through() {
        assert_eq!(
            decode_ja(Category::ClinicVisit, Some("小児科 定期健診")).unwrap(),
            Some(CategoryRecord::ClinicVisit(Note {
                index: 7,
                text: Some("小児科 定期健診".to_string()),
            }))
        );
        assert_eq!(
            decode_ja(Category::ClinicVisit, None).unwrap(),
            Some(CategoryRecord::ClinicVisit(Note { index: 7, text: None }))
        );
        assert_eq!(
            decode_ja(Category::Vaccination, Some("ヒブ")).unwrap(),
            Some(CategoryRecord::Vaccination(Note {
                index: 7,
                text: Some("ヒブ".to_string()),
            }))
        );
        assert_eq!(decode_ja(Category::Vaccination, None).unwrap(), None);
    }
}
