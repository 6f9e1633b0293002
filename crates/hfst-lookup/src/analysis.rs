// Lookup result type.

use std::fmt;

/// One accepting path through the transducer: its output symbols and weight.
///
/// Unweighted transducers give every analysis the weight 1.0. Weighted ones
/// give the sum of the transition weights along the path plus the final
/// weight of the accepting state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Analysis {
    symbols: Vec<String>,
    weight: f32,
}

impl Analysis {
    pub fn new(symbols: Vec<String>, weight: f32) -> Self {
        Self { symbols, weight }
    }

    /// Output symbols in path order. Epsilons and flag diacritics are not
    /// included.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// The output symbols concatenated, e.g. `cat+N+Pl`.
    pub fn output(&self) -> String {
        self.symbols.concat()
    }
}

/// Formats as the concatenated output, a tab, and the weight.
impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            f.write_str(symbol)?;
        }
        write!(f, "\t{}", self.weight)
    }
}
