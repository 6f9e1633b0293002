// Alphabet: symbol id to string mapping plus flag diacritic operations.

use std::io::Read;

use hashbrown::HashMap;

use crate::HfstError;
use crate::flags::{FlagDiacriticParser, FlagOperation, is_flag_shaped};
use crate::reader::ByteReader;

const SECTION: &str = "alphabet";

/// Decoded alphabet of a transducer.
///
/// Symbol id 0 is epsilon and always maps to the empty string. Flag
/// diacritics also map to the empty string; their operation is kept in a
/// separate sparse map keyed by symbol id.
#[derive(Debug, Clone, Default)]
pub struct Alphabet {
    key_table: Vec<String>,
    operations: HashMap<u16, FlagOperation>,
    feature_names: Vec<String>,
    value_names: Vec<String>,
}

impl Alphabet {
    /// All symbols, indexed by symbol id.
    pub fn symbols(&self) -> &[String] {
        &self.key_table
    }

    pub fn len(&self) -> usize {
        self.key_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_table.is_empty()
    }

    /// Text of a symbol, `None` for ids outside the alphabet.
    pub fn symbol(&self, id: u16) -> Option<&str> {
        self.key_table.get(id as usize).map(String::as_str)
    }

    /// The flag diacritic carried by a symbol, if any.
    #[inline]
    pub fn flag_operation(&self, id: u16) -> Option<&FlagOperation> {
        self.operations.get(&id)
    }

    /// Number of distinct flag diacritic features (length of a feature vector).
    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    pub fn feature_name(&self, feature: u16) -> Option<&str> {
        self.feature_names.get(feature as usize).map(String::as_str)
    }

    pub fn value_name(&self, value: i32) -> Option<&str> {
        usize::try_from(value)
            .ok()
            .and_then(|v| self.value_names.get(v))
            .map(String::as_str)
    }
}

/// Read `symbol_count` NUL-terminated UTF-8 symbols from the stream.
///
/// Flag-shaped symbols with a recognized operator become flag operations;
/// malformed ones are kept as empty, flagless placeholders.
pub fn parse_alphabet<R: Read>(
    reader: &mut ByteReader<R>,
    symbol_count: u16,
) -> Result<Alphabet, HfstError> {
    let mut key_table = Vec::with_capacity(symbol_count as usize);
    let mut operations = HashMap::new();
    let mut parser = FlagDiacriticParser::new();

    for id in 0..symbol_count {
        let bytes = reader.read_until_nul(SECTION)?;
        let symbol = String::from_utf8(bytes).map_err(|_| HfstError::InvalidSymbol {
            index: id as usize,
        })?;

        if is_flag_shaped(&symbol) {
            match parser.parse(&symbol) {
                Some(op) => {
                    operations.insert(id, op);
                }
                None => tracing::trace!(id, symbol = %symbol, "ignoring malformed flag diacritic"),
            }
            key_table.push(String::new());
        } else {
            key_table.push(symbol);
        }
    }

    // Epsilon is always the empty, flagless symbol 0.
    if let Some(epsilon) = key_table.first_mut() {
        epsilon.clear();
    }
    operations.remove(&0);

    let (feature_names, value_names) = parser.into_names();
    Ok(Alphabet {
        key_table,
        operations,
        feature_names,
        value_names,
    })
}
