// Transducer loading and traversal.

use std::io::Read;

use crate::analysis::Analysis;
use crate::config::{Edge, Frame, LookupLimits, LookupState, Phase};
use crate::format::{self, TransducerHeader};
use crate::reader::ByteReader;
use crate::symbols::{self, Alphabet};
use crate::tables::{Address, IndexTable, TransitionTable};
use crate::trie::LetterTrie;
use crate::{HfstError, NO_SYMBOL};

/// Weight of every analysis from an unweighted transducer.
const UNIT_WEIGHT: f32 = 1.0;

/// A loaded optimized-lookup transducer.
///
/// All parts are read-only after loading, so one transducer can serve
/// concurrent lookups as long as each lookup has its own [`LookupState`].
pub struct Transducer {
    header: TransducerHeader,
    alphabet: Alphabet,
    letter_trie: LetterTrie,
    index_table: IndexTable,
    transition_table: TransitionTable,
    limits: LookupLimits,
}

impl std::fmt::Debug for Transducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transducer")
            .field("symbol_count", &self.alphabet.len())
            .field("feature_count", &self.alphabet.feature_count())
            .field("index_table", &self.index_table)
            .field("transition_table", &self.transition_table)
            .field("weighted", &self.header.weighted)
            .finish()
    }
}

/// What the current frame asks the driver loop to do next.
enum Step {
    /// Take transition cell `pos`, possibly through a flag diacritic.
    Descend { pos: usize, consumed: bool },
    /// Reached a final state with all input consumed.
    Emit { final_weight: f32 },
    /// A candidate was skipped because of the epsilon depth limit.
    DepthLimited,
    Pop,
    Continue,
}

impl Transducer {
    /// Load a transducer from a stream positioned at the start of the file.
    ///
    /// Reads the header, alphabet, index table and transition table in
    /// order. Nothing is returned unless every section decodes.
    pub fn load<R: Read>(input: R) -> Result<Self, HfstError> {
        let mut reader = ByteReader::new(input);
        let header = format::parse_header(&mut reader)?;
        let alphabet = symbols::parse_alphabet(&mut reader, header.symbol_count)?;

        let mut letter_trie = LetterTrie::new();
        for (id, symbol) in alphabet
            .symbols()
            .iter()
            .enumerate()
            .take(header.input_symbol_count as usize)
        {
            letter_trie.add_string(symbol, id as u16);
        }

        let index_table = IndexTable::read(&mut reader, header.index_table_size)?;
        let transition_table =
            TransitionTable::read(&mut reader, header.transition_table_size, header.weighted)?;

        tracing::debug!(
            symbols = alphabet.len(),
            input_symbols = header.input_symbol_count,
            features = alphabet.feature_count(),
            index_table = index_table.len(),
            transition_table = transition_table.len(),
            weighted = header.weighted,
            preamble = header.has_preamble(),
            "loaded transducer"
        );

        Ok(Self {
            header,
            alphabet,
            letter_trie,
            index_table,
            transition_table,
            limits: LookupLimits::default(),
        })
    }

    /// Load a transducer from an in-memory file image.
    pub fn from_bytes(data: &[u8]) -> Result<Self, HfstError> {
        Self::load(data)
    }

    /// Replace the traversal limits.
    pub fn with_limits(mut self, limits: LookupLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn set_limits(&mut self, limits: LookupLimits) {
        self.limits = limits;
    }

    pub fn limits(&self) -> LookupLimits {
        self.limits
    }

    pub fn header(&self) -> &TransducerHeader {
        &self.header
    }

    /// The symbol table, indexed by symbol id.
    pub fn alphabet(&self) -> &[String] {
        self.alphabet.symbols()
    }

    /// The full alphabet, including flag diacritic operations.
    pub fn symbol_table(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Split text into input symbol ids, or `None` if it cannot be tokenized.
    pub fn tokenize(&self, text: &str) -> Option<Vec<u16>> {
        self.letter_trie.tokenize(text)
    }

    /// All analyses of `text`, in depth-first path order.
    ///
    /// Returns an empty vector when the text cannot be tokenized or has no
    /// accepting path.
    pub fn analyze(&self, text: &str) -> Vec<Analysis> {
        let mut state = LookupState::new();
        self.analyze_with(&mut state, text)
    }

    /// Like [`analyze`](Self::analyze), reusing the buffers of `state`.
    pub fn analyze_with(&self, state: &mut LookupState, text: &str) -> Vec<Analysis> {
        let Some(symbols) = self.tokenize(text) else {
            return Vec::new();
        };
        state.reset(self.alphabet.feature_count(), &symbols);
        self.traverse(state);
        std::mem::take(&mut state.results)
    }

    /// Depth-first walk from the root with an explicit frame stack.
    ///
    /// Each frame explores one state: first its epsilon and flag transitions,
    /// then either the finality check (at end of input) or the transitions on
    /// the next input symbol. Popping a frame undoes exactly what entering it
    /// did, so the output, flag and input cursors always describe the path
    /// to the top frame.
    fn traverse(&self, state: &mut LookupState) {
        let transitions = &self.transition_table;
        let max_depth = self.limits.max_epsilon_depth;
        let mut steps: u64 = 0;
        let mut depth_limited = false;

        state.frames.push(self.frame(Address::Index(0), None, 0));

        while let Some(frame) = state.frames.last_mut() {
            steps += 1;
            if steps > self.limits.max_steps {
                tracing::warn!(
                    max_steps = self.limits.max_steps,
                    analyses = state.results.len(),
                    "lookup step limit reached, results are incomplete"
                );
                break;
            }

            let step = match frame.phase {
                Phase::Epsilon(pos) => {
                    let input = transitions.input(pos);
                    if input == 0 || self.alphabet.flag_operation(input).is_some() {
                        frame.phase = Phase::Epsilon(pos + 1);
                        if frame.epsilon_depth >= max_depth {
                            Step::DepthLimited
                        } else {
                            Step::Descend {
                                pos,
                                consumed: false,
                            }
                        }
                    } else {
                        frame.phase = Phase::Arrive;
                        Step::Continue
                    }
                }
                Phase::Arrive => {
                    let symbol = state.input[state.input_pos];
                    if symbol == NO_SYMBOL {
                        frame.phase = Phase::Done;
                        match self.final_weight(frame.address) {
                            Some(final_weight) => Step::Emit { final_weight },
                            None => Step::Continue,
                        }
                    } else {
                        frame.phase = match frame.address {
                            Address::Transition(i) => Phase::Consume(i + 1),
                            Address::Index(i) => {
                                let cell = i + 1 + symbol as usize;
                                if self.index_table.input(cell) == symbol {
                                    let target = self.index_table.target(cell);
                                    Phase::Consume(Address::from_target(target).offset())
                                } else {
                                    Phase::Done
                                }
                            }
                        };
                        Step::Continue
                    }
                }
                Phase::Consume(pos) => {
                    if transitions.matches(pos, state.input[state.input_pos]) {
                        frame.phase = Phase::Consume(pos + 1);
                        Step::Descend {
                            pos,
                            consumed: true,
                        }
                    } else {
                        frame.phase = Phase::Done;
                        Step::Continue
                    }
                }
                Phase::Done => Step::Pop,
            };

            match step {
                Step::Continue => {}
                Step::DepthLimited => depth_limited = true,
                Step::Emit { final_weight } => self.note_analysis(state, final_weight),
                Step::Descend { pos, consumed } => self.descend(state, pos, consumed),
                Step::Pop => {
                    if let Some(Frame {
                        edge: Some(edge), ..
                    }) = state.frames.pop()
                    {
                        state.output.pop();
                        if edge.flag {
                            state.pop_flag();
                        }
                        if edge.consumed {
                            state.input_pos -= 1;
                        }
                    }
                }
            }
        }

        if depth_limited {
            tracing::warn!(
                max_epsilon_depth = max_depth,
                "epsilon depth limit reached, some paths were not explored"
            );
        }
        state.frames.clear();
    }

    /// Take transition cell `pos` from the top frame.
    ///
    /// Flag diacritics are checked first; a rejected flag leaves the state
    /// untouched and the caller moves on to the next cell.
    fn descend(&self, state: &mut LookupState, pos: usize, consumed: bool) {
        let transitions = &self.transition_table;
        let input = transitions.input(pos);
        let flag = match self.alphabet.flag_operation(input) {
            Some(op) if !consumed => {
                if !state.push_flag(op) {
                    return;
                }
                true
            }
            _ => false,
        };

        let epsilon_depth = match state.frames.last() {
            Some(parent) if !consumed => parent.epsilon_depth + 1,
            _ => 0,
        };
        state
            .output
            .push((transitions.output(pos), transitions.weight(pos)));
        if consumed {
            state.input_pos += 1;
        }
        let address = Address::from_target(transitions.target(pos));
        let frame = self.frame(address, Some(Edge { flag, consumed }), epsilon_depth);
        state.frames.push(frame);
    }

    /// A fresh frame for `address`, positioned at its epsilon transitions.
    fn frame(&self, address: Address, edge: Option<Edge>, epsilon_depth: usize) -> Frame {
        let epsilons = match address {
            Address::Transition(i) => Some(i + 1),
            Address::Index(i) => {
                // Epsilons of an index-table state live behind its symbol-0 cell.
                (self.index_table.input(i + 1) == 0)
                    .then(|| Address::from_target(self.index_table.target(i + 1)).offset())
            }
        };
        Frame {
            address,
            phase: epsilons.map_or(Phase::Arrive, Phase::Epsilon),
            edge,
            epsilon_depth,
        }
    }

    /// Final weight of the state at `address`, or `None` if it is not final.
    fn final_weight(&self, address: Address) -> Option<f32> {
        match address {
            Address::Transition(i) => self
                .transition_table
                .is_final(i)
                .then(|| self.transition_table.weight(i)),
            Address::Index(i) => self.index_table.is_final(i).then(|| {
                if self.header.weighted {
                    self.index_table.final_weight(i)
                } else {
                    0.0
                }
            }),
        }
    }

    fn note_analysis(&self, state: &mut LookupState, final_weight: f32) {
        let symbols = state
            .output
            .iter()
            .filter_map(|&(id, _)| self.alphabet.symbol(id))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let weight = if self.header.weighted {
            state.output.iter().map(|&(_, w)| w).sum::<f32>() + final_weight
        } else {
            UNIT_WEIGHT
        };
        state.results.push(Analysis::new(symbols, weight));
    }
}
