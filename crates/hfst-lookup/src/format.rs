// Transducer header: optional HFST3 preamble followed by the fixed 56-byte
// optimized-lookup header.

use std::io::Read;

use crate::HfstError;
use crate::reader::ByteReader;

/// Magic bytes opening a versioned (HFST3) preamble.
pub const PREAMBLE_MAGIC: [u8; 5] = *b"HFST\0";

/// Size of the legacy optimized-lookup header in bytes.
pub const HEADER_SIZE: usize = 56;

const SECTION: &str = "header";

/// Parsed transducer header.
///
/// Layout of the 56-byte legacy header (all little-endian):
/// - `u16` input symbol count, `u16` total symbol count
/// - `u32` index table size, `u32` transition table size
/// - `u32` state count, `u32` transition count
/// - nine booleans stored as `u32` words (nonzero = true), in field order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransducerHeader {
    pub input_symbol_count: u16,
    pub symbol_count: u16,
    pub index_table_size: u32,
    pub transition_table_size: u32,
    pub state_count: u32,
    pub transition_count: u32,
    pub weighted: bool,
    pub deterministic: bool,
    pub input_deterministic: bool,
    pub minimized: bool,
    pub cyclic: bool,
    pub has_epsilon_epsilon_transitions: bool,
    pub has_input_epsilon_transitions: bool,
    pub has_input_epsilon_cycles: bool,
    pub has_unweighted_input_epsilon_cycles: bool,
    /// Key/value pairs from the versioned preamble, in file order.
    properties: Vec<(String, String)>,
    has_preamble: bool,
}

impl TransducerHeader {
    /// Whether the file started with an `HFST\0` preamble.
    pub fn has_preamble(&self) -> bool {
        self.has_preamble
    }

    /// Preamble properties such as `version` or `type`, in file order.
    /// Empty when there was no preamble.
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    /// Look up a single preamble property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Read the header from a stream positioned at the start of a transducer file.
///
/// If the first five bytes are `HFST\0`, a `u16` length `L` follows; the next
/// `L + 1` bytes are the preamble body, after which the legacy header starts.
pub fn parse_header<R: Read>(reader: &mut ByteReader<R>) -> Result<TransducerHeader, HfstError> {
    let mut head = [0u8; HEADER_SIZE];
    reader.read_exact(&mut head[..5], SECTION)?;

    let mut has_preamble = false;
    let mut properties = Vec::new();
    if head[..5] == PREAMBLE_MAGIC {
        let len = reader.read_u16("preamble")? as usize;
        let body = reader.read_bytes(len + 1, "preamble")?;
        properties = parse_properties(&body[1..]);
        has_preamble = true;
        reader.read_exact(&mut head[..5], SECTION)?;
    }
    reader.read_exact(&mut head[5..], SECTION)?;

    let u16_at = |pos: usize| u16::from_le_bytes([head[pos], head[pos + 1]]);
    let u32_at =
        |pos: usize| u32::from_le_bytes([head[pos], head[pos + 1], head[pos + 2], head[pos + 3]]);
    let flag_at = |n: usize| u32_at(20 + 4 * n) != 0;

    Ok(TransducerHeader {
        input_symbol_count: u16_at(0),
        symbol_count: u16_at(2),
        index_table_size: u32_at(4),
        transition_table_size: u32_at(8),
        state_count: u32_at(12),
        transition_count: u32_at(16),
        weighted: flag_at(0),
        deterministic: flag_at(1),
        input_deterministic: flag_at(2),
        minimized: flag_at(3),
        cyclic: flag_at(4),
        has_epsilon_epsilon_transitions: flag_at(5),
        has_input_epsilon_transitions: flag_at(6),
        has_input_epsilon_cycles: flag_at(7),
        has_unweighted_input_epsilon_cycles: flag_at(8),
        properties,
        has_preamble,
    })
}

/// Split a preamble body into NUL-terminated key/value pairs.
///
/// Decoding is lossy; a trailing key without a value is dropped.
fn parse_properties(body: &[u8]) -> Vec<(String, String)> {
    let mut fields = body
        .split(|&b| b == 0)
        .map(|field| String::from_utf8_lossy(field).into_owned());
    let mut properties = Vec::new();
    while let (Some(key), Some(value)) = (fields.next(), fields.next()) {
        if key.is_empty() {
            break;
        }
        properties.push((key, value));
    }
    properties
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_header(weighted: bool) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_SIZE);
        buf.extend_from_slice(&3u16.to_le_bytes()); // input symbols
        buf.extend_from_slice(&5u16.to_le_bytes()); // all symbols
        buf.extend_from_slice(&10u32.to_le_bytes()); // index table
        buf.extend_from_slice(&20u32.to_le_bytes()); // transition table
        buf.extend_from_slice(&4u32.to_le_bytes()); // states
        buf.extend_from_slice(&6u32.to_le_bytes()); // transitions
        for n in 0..9u32 {
            let on = match n {
                0 => weighted,
                4 => true, // cyclic
                _ => false,
            };
            buf.extend_from_slice(&(on as u32).to_le_bytes());
        }
        assert_eq!(buf.len(), HEADER_SIZE);
        buf
    }

    fn with_preamble(pairs: &[(&str, &str)], header: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        for (k, v) in pairs {
            body.extend_from_slice(k.as_bytes());
            body.push(0);
            body.extend_from_slice(v.as_bytes());
            body.push(0);
        }
        let mut buf = PREAMBLE_MAGIC.to_vec();
        buf.extend_from_slice(&(body.len() as u16).to_le_bytes());
        buf.push(0);
        buf.extend_from_slice(&body);
        buf.extend_from_slice(header);
        buf
    }

    #[test]
    fn parse_legacy_header() {
        let data = make_header(false);
        let header = parse_header(&mut ByteReader::new(&data[..])).unwrap();
        assert!(!header.has_preamble());
        assert_eq!(header.input_symbol_count, 3);
        assert_eq!(header.symbol_count, 5);
        assert_eq!(header.index_table_size, 10);
        assert_eq!(header.transition_table_size, 20);
        assert_eq!(header.state_count, 4);
        assert_eq!(header.transition_count, 6);
        assert!(!header.weighted);
        assert!(header.cyclic);
        assert!(!header.has_input_epsilon_cycles);
        assert!(header.properties().is_empty());
    }

    #[test]
    fn parse_weighted_header() {
        let data = make_header(true);
        let header = parse_header(&mut ByteReader::new(&data[..])).unwrap();
        assert!(header.weighted);
    }

    #[test]
    fn skip_versioned_preamble() {
        let data = with_preamble(
            &[("version", "3.3"), ("type", "HFST_OL")],
            &make_header(false),
        );
        let header = parse_header(&mut ByteReader::new(&data[..])).unwrap();
        assert!(header.has_preamble());
        assert_eq!(header.symbol_count, 5);
        assert_eq!(header.property("type"), Some("HFST_OL"));
        assert_eq!(header.property("version"), Some("3.3"));
        assert_eq!(header.property("name"), None);
        assert_eq!(header.properties().len(), 2);
    }

    #[test]
    fn header_leaves_stream_after_header() {
        let mut data = make_header(false);
        data.extend_from_slice(b"rest");
        let mut reader = ByteReader::new(&data[..]);
        parse_header(&mut reader).unwrap();
        assert_eq!(reader.read_bytes(4, "tail").unwrap(), b"rest");
    }

    #[test]
    fn reject_too_short() {
        let data = make_header(false);
        let err = parse_header(&mut ByteReader::new(&data[..40])).unwrap_err();
        assert!(matches!(err, HfstError::Truncated { section: "header" }));
    }

    #[test]
    fn reject_truncated_preamble() {
        let mut data = PREAMBLE_MAGIC.to_vec();
        data.extend_from_slice(&100u16.to_le_bytes());
        data.extend_from_slice(b"\0version\0");
        let err = parse_header(&mut ByteReader::new(&data[..])).unwrap_err();
        assert!(matches!(err, HfstError::Truncated { section: "preamble" }));
    }

    #[test]
    fn dangling_property_key_is_dropped() {
        assert_eq!(
            parse_properties(b"version\03.3\0name"),
            vec![("version".to_string(), "3.3".to_string())]
        );
    }
}
