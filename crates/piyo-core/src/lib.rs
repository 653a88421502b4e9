//! Parser for ぴよログ (PiyoLog) daily text exports.
//!
//! An export is read line by line by a [`DayParser`], which recognizes day
//! blocks and their event lines, decodes each event's value with the decoder
//! for its category, and collects the results into a [`TableSet`]: one table
//! of day metadata, one table of events and one table per event category,
//! all keyed by a run-wide event index.
//!
//! The literal tokens of an export (labels, units, glyphs, date format and
//! UTC offset) live in a [`Locale`]. Japanese and Chinese exports are
//! built in; other dialects can be loaded from TOML.

pub mod category;
pub mod decode;
pub mod line;
pub mod locale;
pub mod parser;
pub mod reader;
pub mod record;
pub mod table;

pub use category::{Category, UnknownCategory};
pub use decode::DecodeError;
pub use locale::{BuiltinLocale, Locale, LocaleError, Vocabulary};
pub use parser::{
    DayParser, ParseError, ParseErrorKind, ParseOptions, ParseOutput, State, TrailingBlock,
    parse_str,
};
pub use reader::{ReadError, read_text, read_texts};
pub use record::{CategoryRecord, DayBlock, Event, EventIndex};
pub use table::{SchemaMismatch, Table, TableBuilder, TableSet, Value};
