//! HFST optimized-lookup transducer runtime.
//!
//! This crate loads compiled finite state transducers in the HFST
//! optimized-lookup binary format and runs morphological lookups against
//! them: input text is tokenized into the transducer's alphabet, the
//! automaton is walked (epsilons and flag diacritics included), and every
//! accepting output symbol sequence is returned.
//!
//! # Architecture
//!
//! - [`reader`] -- Little-endian byte decoder over any `io::Read`
//! - [`format`] -- Header parsing, including the optional `HFST\0` preamble
//! - [`flags`] -- Flag diacritic operations (P, N, R, D, C, U)
//! - [`symbols`] -- Alphabet decoding and flag diacritic interning
//! - [`trie`] -- Letter trie tokenizer for multi-character symbols
//! - [`tables`] -- Index and transition tables, target addressing
//! - [`config`] -- Lookup limits and per-call lookup state
//! - [`transducer`] -- Loading and the traversal engine
//! - [`analysis`] -- Lookup result type
//!
//! # Example
//!
//! ```no_run
//! let file = std::fs::File::open("analyser.hfstol")?;
//! let transducer = hfst_lookup::load(std::io::BufReader::new(file))?;
//! for analysis in transducer.analyze("cats") {
//!     println!("{analysis}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analysis;
pub mod config;
pub mod flags;
pub mod format;
pub mod reader;
pub mod symbols;
pub mod tables;
pub mod transducer;
pub mod trie;

pub use analysis::Analysis;
pub use config::{LookupLimits, LookupState};
pub use format::TransducerHeader;
pub use symbols::Alphabet;
pub use transducer::Transducer;

/// Error type for transducer loading.
#[derive(Debug, thiserror::Error)]
pub enum HfstError {
    #[error("unexpected end of data while reading {section}")]
    Truncated { section: &'static str },
    #[error("symbol {index} is not valid UTF-8")]
    InvalidSymbol { index: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Symbol id used for "no symbol": end of input, empty table cells and
/// final-state markers.
pub const NO_SYMBOL: u16 = 0xFFFF;

/// Target value meaning "no table index".
pub const NO_TABLE_INDEX: u32 = 0xFFFF_FFFF;

/// Target values at or above this address the transition table; values below
/// it address the index table.
pub const TRANSITION_TARGET_TABLE_START: u32 = 0x8000_0000;

/// Load a transducer from a byte stream positioned at the start of the file.
///
/// Equivalent to [`Transducer::load`].
pub fn load<R: std::io::Read>(input: R) -> Result<Transducer, HfstError> {
    Transducer::load(input)
}
