// Lookup configuration: traversal limits and the per-call lookup state.
//
// The tables of a loaded transducer are shared and read-only; everything a
// single lookup mutates lives in a LookupState owned by that lookup.

use crate::NO_SYMBOL;
use crate::analysis::Analysis;
use crate::flags::{self, FlagCheckResult, FlagOperation};
use crate::tables::Address;

/// Default bound on consecutive epsilon/flag transitions on one path.
pub const DEFAULT_MAX_EPSILON_DEPTH: usize = 1024;

/// Default bound on traversal steps for a single lookup.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

/// Limits guarding a lookup against cyclic epsilon paths and runaway
/// traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupLimits {
    /// Maximum number of epsilon or flag transitions taken in a row without
    /// consuming input. Deeper candidates are skipped.
    pub max_epsilon_depth: usize,
    /// Maximum number of traversal steps. The lookup stops when it is reached
    /// and returns the analyses found so far.
    pub max_steps: u64,
}

impl Default for LookupLimits {
    fn default() -> Self {
        Self {
            max_epsilon_depth: DEFAULT_MAX_EPSILON_DEPTH,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Where a frame is in exploring its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Scanning epsilon/flag cells; the value is the next transition cell.
    Epsilon(usize),
    /// Epsilons exhausted: check finality or start consuming input.
    Arrive,
    /// Scanning cells that match the current input symbol.
    Consume(usize),
    /// Nothing left; pop the frame.
    Done,
}

/// How the transition into a frame changed the lookup state, so that popping
/// the frame can undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Edge {
    pub flag: bool,
    pub consumed: bool,
}

/// One entry of the explicit DFS stack.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub address: Address,
    pub phase: Phase,
    /// `None` for the root frame.
    pub edge: Option<Edge>,
    /// Epsilon/flag transitions taken since input was last consumed.
    pub epsilon_depth: usize,
}

/// Mutable state of one lookup.
///
/// A state can be reused for many lookups on the same or different
/// transducers; each lookup resets it first.
#[derive(Debug, Default)]
pub struct LookupState {
    /// Number of flag diacritic features; the length of one flag row.
    feature_count: usize,
    /// Flattened stack of feature vectors, one row per depth. The bottom row
    /// is the neutral vector and is never popped.
    flag_stack: Vec<i32>,
    /// Tokenized input, terminated by `NO_SYMBOL`.
    pub(crate) input: Vec<u16>,
    pub(crate) input_pos: usize,
    /// Output symbols and transition weights along the current path.
    pub(crate) output: Vec<(u16, f32)>,
    pub(crate) frames: Vec<Frame>,
    pub(crate) results: Vec<Analysis>,
}

impl LookupState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new lookup over `symbols` with `feature_count` features.
    pub(crate) fn reset(&mut self, feature_count: usize, symbols: &[u16]) {
        self.feature_count = feature_count;
        self.flag_stack.clear();
        self.flag_stack.resize(feature_count, flags::FLAG_VALUE_NEUTRAL);
        self.input.clear();
        self.input.extend_from_slice(symbols);
        self.input.push(NO_SYMBOL);
        self.input_pos = 0;
        self.output.clear();
        self.frames.clear();
        self.results.clear();
    }

    /// The feature vector on top of the stack.
    pub fn current_flags(&self) -> &[i32] {
        &self.flag_stack[self.flag_stack.len() - self.feature_count..]
    }

    /// Number of feature vectors on the stack, the neutral one included.
    pub fn flag_depth(&self) -> usize {
        if self.feature_count == 0 {
            1
        } else {
            self.flag_stack.len() / self.feature_count
        }
    }

    /// Input symbol under the read cursor; `NO_SYMBOL` at end of input.
    #[inline]
    pub(crate) fn current_input(&self) -> u16 {
        self.input[self.input_pos]
    }

    /// Try a flag diacritic against the top feature vector.
    ///
    /// On acceptance a full copy of the top vector, with the operation
    /// applied, is pushed and `true` is returned. On rejection nothing changes.
    pub fn push_flag(&mut self, flag: &FlagOperation) -> bool {
        let fc = self.feature_count;
        let feature = flag.feature as usize;
        if feature >= fc {
            return false;
        }
        let top = self.flag_stack.len() - fc;
        let update = match flags::check_flag(flag, self.flag_stack[top + feature]) {
            FlagCheckResult::Reject => return false,
            FlagCheckResult::AcceptAndUpdate { value, .. } => Some(value),
            FlagCheckResult::AcceptNoUpdate => None,
        };
        self.flag_stack.extend_from_within(top..);
        if let Some(value) = update {
            self.flag_stack[top + fc + feature] = value;
        }
        true
    }

    /// Pop the vector pushed by the matching successful [`push_flag`](Self::push_flag).
    pub fn pop_flag(&mut self) {
        if self.flag_depth() > 1 {
            self.flag_stack.truncate(self.flag_stack.len() - self.feature_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::FlagOp;

    fn op(op: FlagOp, feature: u16, value: i32) -> FlagOperation {
        FlagOperation { op, feature, value }
    }

    #[test]
    fn default_limits() {
        let limits = LookupLimits::default();
        assert_eq!(limits.max_epsilon_depth, DEFAULT_MAX_EPSILON_DEPTH);
        assert_eq!(limits.max_steps, DEFAULT_MAX_STEPS);
    }

    #[test]
    fn reset_terminates_input_and_clears_flags() {
        let mut state = LookupState::new();
        state.reset(2, &[4, 5]);
        assert_eq!(state.input, [4, 5, NO_SYMBOL]);
        assert_eq!(state.current_flags(), [0, 0]);
        assert_eq!(state.flag_depth(), 1);

        assert!(state.push_flag(&op(FlagOp::P, 1, 3)));
        state.output.push((1, 0.0));
        state.input_pos = 1;
        state.reset(1, &[]);
        assert_eq!(state.input, [NO_SYMBOL]);
        assert_eq!(state.current_input(), NO_SYMBOL);
        assert_eq!(state.current_flags(), [0]);
        assert!(state.output.is_empty());
    }

    #[test]
    fn push_copies_row_and_pop_restores() {
        let mut state = LookupState::new();
        state.reset(3, &[]);

        assert!(state.push_flag(&op(FlagOp::P, 0, 5)));
        assert_eq!(state.current_flags(), [5, 0, 0]);
        assert!(state.push_flag(&op(FlagOp::N, 2, 1)));
        assert_eq!(state.current_flags(), [5, 0, -1]);
        assert_eq!(state.flag_depth(), 3);

        state.pop_flag();
        assert_eq!(state.current_flags(), [5, 0, 0]);
        state.pop_flag();
        assert_eq!(state.current_flags(), [0, 0, 0]);
    }

    #[test]
    fn no_update_still_pushes_a_row() {
        let mut state = LookupState::new();
        state.reset(1, &[]);
        assert!(state.push_flag(&op(FlagOp::P, 0, 2)));
        assert!(state.push_flag(&op(FlagOp::R, 0, 2)));
        assert_eq!(state.flag_depth(), 3);
        state.pop_flag();
        assert_eq!(state.current_flags(), [2]);
    }

    #[test]
    fn rejection_leaves_stack_untouched() {
        let mut state = LookupState::new();
        state.reset(1, &[]);
        assert!(!state.push_flag(&op(FlagOp::R, 0, 0)));
        assert_eq!(state.flag_depth(), 1);
        assert!(state.push_flag(&op(FlagOp::P, 0, 1)));
        assert!(!state.push_flag(&op(FlagOp::D, 0, 1)));
        assert!(!state.push_flag(&op(FlagOp::U, 0, 2)));
        assert_eq!(state.flag_depth(), 2);
        assert_eq!(state.current_flags(), [1]);
    }

    #[test]
    fn neutral_row_is_never_popped() {
        let mut state = LookupState::new();
        state.reset(2, &[]);
        state.pop_flag();
        assert_eq!(state.flag_depth(), 1);
        assert_eq!(state.current_flags(), [0, 0]);
    }

    #[test]
    fn unknown_feature_is_rejected() {
        let mut state = LookupState::new();
        state.reset(1, &[]);
        assert!(!state.push_flag(&op(FlagOp::P, 4, 1)));
    }
}
