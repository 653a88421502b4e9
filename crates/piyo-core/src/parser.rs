//! The day/event state machine.
//!
//! An export is a sequence of day blocks separated by a dashed line:
//!
//! ```text
//! ----------
//! 2024/01/15(月)
//! たろう (0歳1か月3日)
//!
//! 06:30   起きる (1時間30分)
//! 07:00   母乳 左10分 ▶ 右5分
//!
//! 母乳合計　　 左 10分 / 右 5分
//!
//! free text comment
//! ----------
//! ```
//!
//! [`DayParser`] is fed one line at a time. Events are numbered from the
//! caller-supplied first index so that several files can share one index
//! sequence.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::Category;
use crate::decode::{DecodeError, decode};
use crate::line::{Line, classify};
use crate::locale::{AgeMarkers, Vocabulary};
use crate::record::{Age, DayBlock, Event, EventIndex};
use crate::table::{TableBuilder, TableSet};

const BOM: char = '\u{feff}';

/// Where the parser is within a day block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Before the first day separator. Everything is ignored.
    Start,
    Date,
    Name,
    BlankAfterName,
    Event,
    /// Summary lines after the event list. Ignored.
    Stats,
    Comment,
}

impl State {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Date => "date",
            Self::Name => "name",
            Self::BlankAfterName => "blank_after_name",
            Self::Event => "event",
            Self::Stats => "stats",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a day block still open when the input ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingBlock {
    /// Keep the block as if a separator had followed it.
    #[default]
    Finalize,
    /// Discard the block. Its events are still recorded.
    Drop,
}

impl TrailingBlock {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Finalize => "finalize",
            Self::Drop => "drop",
        }
    }
}

impl fmt::Display for TrailingBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrailingBlock {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "finalize" => Ok(Self::Finalize),
            "drop" => Ok(Self::Drop),
            other => Err(format!("unknown trailing block policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    #[serde(default)]
    pub trailing_block: TrailingBlock,
}

/// A parse fault with the 1-based line it occurred on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected line in {state} state: {text:?}")]
    Unexpected { state: State, text: String },

    #[error("invalid date line: {text:?}")]
    InvalidDate { text: String },

    #[error("invalid name/age line: {text:?}")]
    InvalidName { text: String },

    #[error("invalid event time: {text:?}")]
    InvalidTime { text: String },

    #[error("unknown event {label:?} has a value {value:?}")]
    UnknownEvent { label: String, value: String },

    #[error("cannot decode {label:?}: {source}")]
    Decode {
        label: String,
        value: Option<String>,
        source: DecodeError,
    },
}

/// Tables of one parse plus the first index the next file should use.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub tables: TableSet,
    pub next_index: EventIndex,
}

#[derive(Debug, Default)]
struct DayContext {
    date: Option<NaiveDate>,
    pending: Option<DayBlock>,
    comment: Option<String>,
}

/// Line-driven parser for one export.
#[derive(Debug)]
pub struct DayParser<'a> {
    vocabulary: &'a Vocabulary<'a>,
    options: ParseOptions,
    state: State,
    line: usize,
    context: DayContext,
    next_index: EventIndex,
    builder: TableBuilder,
}

impl<'a> DayParser<'a> {
    pub fn new(vocabulary: &'a Vocabulary<'a>, options: ParseOptions, first_index: EventIndex) -> Self {
        Self {
            vocabulary,
            options,
            state: State::Start,
            line: 0,
            context: DayContext::default(),
            next_index: first_index,
            builder: TableBuilder::new(vocabulary.locale().dialect.as_str()),
        }
    }

    pub const fn state(&self) -> State {
        self.state
    }

    pub const fn next_index(&self) -> EventIndex {
        self.next_index
    }

    /// Advances the state machine by one line.
    pub fn feed_line(&mut self, raw: &str) -> Result<(), ParseError> {
        self.line += 1;
        let raw = if self.line == 1 {
            raw.strip_prefix(BOM).unwrap_or(raw)
        } else {
            raw
        };

        let result = match classify(raw, &self.vocabulary.locale().day_separator) {
            Line::DayBoundary => {
                self.finalize_day();
                self.state = State::Date;
                Ok(())
            }
            Line::Blank => self.blank(),
            Line::Content(text) => self.content(text),
        };
        result.map_err(|kind| ParseError {
            line: self.line,
            kind,
        })
    }

    /// Ends the input, applying the trailing-block policy.
    pub fn finish(mut self) -> ParseOutput {
        if let Some(date) = self.context.pending.as_ref().map(|day| day.date) {
            match self.options.trailing_block {
                TrailingBlock::Finalize => self.finalize_day(),
                TrailingBlock::Drop => {
                    tracing::warn!(
                        %date,
                        "dropping day block not closed by a separator"
                    );
                }
            }
        }

        tracing::debug!(
            lines = self.line,
            days = self.builder.day_count(),
            events = self.builder.event_count(),
            next_index = self.next_index,
            "parsed export"
        );
        ParseOutput {
            tables: self.builder.finish(),
            next_index: self.next_index,
        }
    }

    fn unexpected(&self, text: &str) -> ParseErrorKind {
        ParseErrorKind::Unexpected {
            state: self.state,
            text: text.to_string(),
        }
    }

    fn blank(&mut self) -> Result<(), ParseErrorKind> {
        match self.state {
            State::Start | State::Date => {}
            State::Name => return Err(self.unexpected("")),
            State::BlankAfterName => self.state = State::Event,
            State::Event => self.state = State::Stats,
            State::Stats => self.state = State::Comment,
            State::Comment => self
                .context
                .comment
                .get_or_insert_with(String::new)
                .push('\n'),
        }
        Ok(())
    }

    fn content(&mut self, text: &str) -> Result<(), ParseErrorKind> {
        let locale = self.vocabulary.locale();
        match self.state {
            State::Start | State::Stats => {}
            State::Date => {
                if !text.contains(locale.banner.as_str()) {
                    let date = parse_date(text, &locale.date_format)?;
                    tracing::trace!(%date, "day block");
                    self.context.date = Some(date);
                    self.state = State::Name;
                }
            }
            State::Name => {
                let date = self.context.date.ok_or_else(|| self.unexpected(text))?;
                let (name, age) = parse_name(text, &locale.age)?;
                self.context.pending = Some(DayBlock {
                    date,
                    name,
                    age,
                    comment: None,
                });
                self.state = State::BlankAfterName;
            }
            State::BlankAfterName => return Err(self.unexpected(text)),
            State::Event => self.event(text)?,
            State::Comment => {
                let comment = self.context.comment.get_or_insert_with(String::new);
                comment.push_str(text);
                comment.push('\n');
            }
        }
        Ok(())
    }

    fn event(&mut self, text: &str) -> Result<(), ParseErrorKind> {
        let vocabulary = self.vocabulary;
        let locale = vocabulary.locale();
        let date = self.context.date.ok_or_else(|| self.unexpected(text))?;

        let text = text.trim_start();
        let (timestamp, rest) = parse_time(text, date, vocabulary.offset())?;
        if rest.is_empty() {
            return Err(self.unexpected(text));
        }
        let (label, value) = match rest.split_once(' ') {
            Some((label, value)) => {
                let value = value.trim_start();
                (label, (!value.is_empty()).then_some(value))
            }
            None => (rest, None),
        };

        let (label, value, category) = match vocabulary.in_progress_label(label) {
            Some(in_progress) => (in_progress, Some(label), Some(Category::ExpressedMilk)),
            None => (label, value, vocabulary.category(label)),
        };

        let event = Event {
            index: self.next_index,
            timestamp,
            label: label.to_string(),
            category,
        };
        let record = match (category, value) {
            (Some(category), value) => {
                decode(category, locale, &event, value).map_err(|source| {
                    ParseErrorKind::Decode {
                        label: label.to_string(),
                        value: value.map(str::to_string),
                        source,
                    }
                })?
            }
            (None, Some(value)) => {
                return Err(ParseErrorKind::UnknownEvent {
                    label: label.to_string(),
                    value: value.to_string(),
                });
            }
            (None, None) => None,
        };

        self.builder.push_event(&event);
        if let Some(record) = record {
            self.builder.push_record(record);
        }
        self.next_index += 1;
        Ok(())
    }

    fn finalize_day(&mut self) {
        let comment = self.context.comment.take();
        if let Some(mut day) = self.context.pending.take() {
            day.comment = comment;
            self.builder.push_day(day);
        }
        self.context.date = None;
    }
}

/// Parses every line of `text` as one export.
pub fn parse_str(
    text: &str,
    vocabulary: &Vocabulary<'_>,
    options: ParseOptions,
    first_index: EventIndex,
) -> Result<ParseOutput, ParseError> {
    let mut parser = DayParser::new(vocabulary, options, first_index);
    for line in text.lines() {
        parser.feed_line(line)?;
    }
    Ok(parser.finish())
}

/// Parses `2024/01/15(月)`, ignoring the weekday.
fn parse_date(text: &str, format: &str) -> Result<NaiveDate, ParseErrorKind> {
    let date = text.split_once('(').map_or(text, |(date, _)| date).trim();
    NaiveDate::parse_from_str(date, format).map_err(|_| ParseErrorKind::InvalidDate {
        text: text.to_string(),
    })
}

/// Parses `たろう (0歳1か月3日)` into the name and age.
fn parse_name(text: &str, markers: &AgeMarkers) -> Result<(String, Age), ParseErrorKind> {
    let invalid = || ParseErrorKind::InvalidName {
        text: text.to_string(),
    };
    let text = text.trim();
    let name_end = text
        .find(' ')
        .or_else(|| text.find('('))
        .ok_or_else(invalid)?;
    let name = text[..name_end].trim();
    if name.is_empty() {
        return Err(invalid());
    }

    let (_, age) = text[name_end..].split_once('(').ok_or_else(invalid)?;
    let (years, age) = age.split_once(markers.year.as_str()).ok_or_else(invalid)?;
    let (months, age) = age.split_once(markers.month.as_str()).ok_or_else(invalid)?;
    let (days, _) = age.split_once(markers.day.as_str()).ok_or_else(invalid)?;
    let number = |s: &str| s.trim().parse::<u32>().map_err(|_| invalid());

    Ok((
        name.to_string(),
        Age {
            years: number(years)?,
            months: number(months)?,
            days: number(days)?,
        },
    ))
}

/// Splits the leading `HH:MM` off an event line and anchors it to `date`.
fn parse_time<'t>(
    text: &'t str,
    date: NaiveDate,
    offset: FixedOffset,
) -> Result<(DateTime<FixedOffset>, &'t str), ParseErrorKind> {
    let invalid = || ParseErrorKind::InvalidTime {
        text: text.to_string(),
    };
    let (time, rest) = (text.get(..5).ok_or_else(invalid)?, text.get(5..).unwrap_or_default());
    let time = NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| invalid())?;
    let timestamp = offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(invalid)?;
    Ok((timestamp, rest.trim_start()))
}
