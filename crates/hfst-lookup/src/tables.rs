// Index and transition tables.
//
// Both tables are flat arrays of fixed-width little-endian records read
// straight after the alphabet. A target value either addresses the index
// table or, at or above TRANSITION_TARGET_TABLE_START, the transition table.

use std::io::Read;

use bytemuck::{Pod, Zeroable};

use crate::reader::ByteReader;
use crate::{HfstError, NO_SYMBOL, NO_TABLE_INDEX, TRANSITION_TARGET_TABLE_START};

/// Target value of a final transition-table cell.
const FINAL_TRANSITION_TARGET: u32 = 1;

/// A resolved target: which table it points into, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    Index(usize),
    Transition(usize),
}

impl Address {
    #[inline]
    pub fn from_target(target: u32) -> Self {
        if target >= TRANSITION_TARGET_TABLE_START {
            Self::Transition((target - TRANSITION_TARGET_TABLE_START) as usize)
        } else {
            Self::Index(target as usize)
        }
    }

    /// The table offset, whichever table it is in.
    #[inline]
    pub fn offset(self) -> usize {
        match self {
            Self::Index(i) | Self::Transition(i) => i,
        }
    }
}

/// Index table record (6 bytes): `u16` input symbol, `u32` target.
///
/// In weighted transducers a final cell stores its weight as the bit pattern
/// of an `f32` in `target`.
#[repr(C, packed)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct IndexRecord {
    pub input: u16,
    pub target: u32,
}

/// Transition table record (8 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TransitionRecord {
    pub input: u16,
    pub output: u16,
    pub target: u32,
}

/// Weighted transition table record (12 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct WeightedTransitionRecord {
    pub input: u16,
    pub output: u16,
    pub target: u32,
    pub weight: f32,
}

const _: () = assert!(size_of::<IndexRecord>() == 6);
const _: () = assert!(size_of::<TransitionRecord>() == 8);
const _: () = assert!(size_of::<WeightedTransitionRecord>() == 12);

/// Read `count` records of type `T` as one block.
///
/// The records are copied into an owned, properly aligned `Vec<T>`.
fn read_records<T: Pod, R: Read>(
    reader: &mut ByteReader<R>,
    count: u32,
    section: &'static str,
) -> Result<Vec<T>, HfstError> {
    let len = (count as usize)
        .checked_mul(size_of::<T>())
        .ok_or(HfstError::Truncated { section })?;
    let bytes = reader.read_bytes(len, section)?;
    let mut records = vec![T::zeroed(); count as usize];
    bytemuck::cast_slice_mut::<T, u8>(&mut records).copy_from_slice(&bytes);
    Ok(records)
}

/// The index table: direct-addressed cells, one per (state, input symbol).
pub struct IndexTable {
    records: Vec<IndexRecord>,
}

impl std::fmt::Debug for IndexTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexTable")
            .field("len", &self.records.len())
            .finish()
    }
}

impl IndexTable {
    pub fn read<R: Read>(reader: &mut ByteReader<R>, count: u32) -> Result<Self, HfstError> {
        Ok(Self {
            records: read_records(reader, count, "index table")?,
        })
    }

    pub fn from_records(records: Vec<IndexRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Input symbol of a cell; [`NO_SYMBOL`] past the end of the table.
    #[inline]
    pub fn input(&self, pos: usize) -> u16 {
        self.records
            .get(pos)
            .map_or(NO_SYMBOL, |r| u16::from_le(r.input))
    }

    /// Target of a cell; [`NO_TABLE_INDEX`] past the end of the table.
    #[inline]
    pub fn target(&self, pos: usize) -> u32 {
        self.records
            .get(pos)
            .map_or(NO_TABLE_INDEX, |r| u32::from_le(r.target))
    }

    /// A cell is final when it has no input symbol but does have a target.
    #[inline]
    pub fn is_final(&self, pos: usize) -> bool {
        self.input(pos) == NO_SYMBOL && self.target(pos) != NO_TABLE_INDEX
    }

    /// Final weight stored in a final cell of a weighted transducer.
    #[inline]
    pub fn final_weight(&self, pos: usize) -> f32 {
        f32::from_bits(self.target(pos))
    }
}

/// The transition table: runs of cells scanned linearly per state.
pub struct TransitionTable {
    records: Vec<TransitionRecord>,
    /// One weight per record for weighted transducers, empty otherwise.
    weights: Vec<f32>,
}

impl std::fmt::Debug for TransitionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionTable")
            .field("len", &self.records.len())
            .field("weighted", &!self.weights.is_empty())
            .finish()
    }
}

impl TransitionTable {
    pub fn read<R: Read>(
        reader: &mut ByteReader<R>,
        count: u32,
        weighted: bool,
    ) -> Result<Self, HfstError> {
        const SECTION: &str = "transition table";
        if !weighted {
            return Ok(Self {
                records: read_records(reader, count, SECTION)?,
                weights: Vec::new(),
            });
        }
        let weighted: Vec<WeightedTransitionRecord> = read_records(reader, count, SECTION)?;
        let records = weighted
            .iter()
            .map(|w| TransitionRecord {
                input: w.input,
                output: w.output,
                target: w.target,
            })
            .collect();
        let weights = weighted
            .iter()
            .map(|w| f32::from_bits(u32::from_le(w.weight.to_bits())))
            .collect();
        Ok(Self { records, weights })
    }

    pub fn from_records(records: Vec<TransitionRecord>) -> Self {
        Self {
            records,
            weights: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Input symbol of a cell; [`NO_SYMBOL`] past the end of the table.
    #[inline]
    pub fn input(&self, pos: usize) -> u16 {
        self.records
            .get(pos)
            .map_or(NO_SYMBOL, |r| u16::from_le(r.input))
    }

    /// Output symbol of a cell; [`NO_SYMBOL`] past the end of the table.
    #[inline]
    pub fn output(&self, pos: usize) -> u16 {
        self.records
            .get(pos)
            .map_or(NO_SYMBOL, |r| u16::from_le(r.output))
    }

    /// Target of a cell; [`NO_TABLE_INDEX`] past the end of the table.
    #[inline]
    pub fn target(&self, pos: usize) -> u32 {
        self.records
            .get(pos)
            .map_or(NO_TABLE_INDEX, |r| u32::from_le(r.target))
    }

    /// Weight of a cell; 0.0 for unweighted transducers.
    #[inline]
    pub fn weight(&self, pos: usize) -> f32 {
        self.weights.get(pos).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn is_final(&self, pos: usize) -> bool {
        self.input(pos) == NO_SYMBOL
            && self.output(pos) == NO_SYMBOL
            && self.target(pos) == FINAL_TRANSITION_TARGET
    }

    /// Whether the cell at `pos` can be taken on `symbol`.
    ///
    /// Empty cells never match; [`NO_SYMBOL`] as the probe matches any
    /// non-empty cell.
    #[inline]
    pub fn matches(&self, pos: usize, symbol: u16) -> bool {
        let input = self.input(pos);
        if input == NO_SYMBOL {
            return false;
        }
        symbol == NO_SYMBOL || input == symbol
    }
}
