// Flag diacritic operations: P, N, R, D, C, U
//
// Flag diacritics are zero-width symbols of the shape `@OP.FEATURE[.VALUE]@`.
// Features and values are interned to small integers; the lookup keeps a
// vector of current values (one slot per feature) and consults it here.

use hashbrown::HashMap;

/// The six flag diacritic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOp {
    /// Positive set: feature := value.
    P,
    /// Negative set: feature := -value.
    N,
    /// Require: fail unless the feature holds the value (any value if empty).
    R,
    /// Disallow: fail if the feature holds the value (any value if empty).
    D,
    /// Clear: reset feature to neutral.
    C,
    /// Unification: set if neutral or negatively set, pass if equal.
    U,
}

impl FlagOp {
    fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "P" => Self::P,
            "N" => Self::N,
            "R" => Self::R,
            "D" => Self::D,
            "C" => Self::C,
            "U" => Self::U,
            _ => return None,
        })
    }
}

/// Neutral value: the feature has not been set. Also the id of the empty value.
pub const FLAG_VALUE_NEUTRAL: i32 = 0;

/// A parsed flag diacritic with its interned feature and value ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagOperation {
    pub op: FlagOp,
    pub feature: u16,
    pub value: i32,
}

/// Outcome of testing a flag diacritic against the current feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagCheckResult {
    /// Constraint violated; the transition must not be taken.
    Reject,
    /// Allowed; the feature takes the given value on this path.
    AcceptAndUpdate { feature: u16, value: i32 },
    /// Allowed; the feature vector is unchanged.
    AcceptNoUpdate,
}

/// Check a flag diacritic against the current value of its feature.
///
/// The caller owns the feature vector and applies the returned update.
pub fn check_flag(flag: &FlagOperation, current: i32) -> FlagCheckResult {
    let feature = flag.feature;
    match flag.op {
        FlagOp::P => FlagCheckResult::AcceptAndUpdate {
            feature,
            value: flag.value,
        },
        FlagOp::N => FlagCheckResult::AcceptAndUpdate {
            feature,
            value: -flag.value,
        },
        FlagOp::C => FlagCheckResult::AcceptAndUpdate {
            feature,
            value: FLAG_VALUE_NEUTRAL,
        },
        FlagOp::R => {
            let pass = if flag.value == FLAG_VALUE_NEUTRAL {
                current != FLAG_VALUE_NEUTRAL
            } else {
                current == flag.value
            };
            if pass {
                FlagCheckResult::AcceptNoUpdate
            } else {
                FlagCheckResult::Reject
            }
        }
        FlagOp::D => {
            let fail = if flag.value == FLAG_VALUE_NEUTRAL {
                current != FLAG_VALUE_NEUTRAL
            } else {
                current == flag.value
            };
            if fail {
                FlagCheckResult::Reject
            } else {
                FlagCheckResult::AcceptNoUpdate
            }
        }
        FlagOp::U => {
            // A negative value (N) only records what the feature is not.
            if current == FLAG_VALUE_NEUTRAL || current == flag.value || current < 0 {
                FlagCheckResult::AcceptAndUpdate {
                    feature,
                    value: flag.value,
                }
            } else {
                FlagCheckResult::Reject
            }
        }
    }
}

/// Whether a symbol has the outer shape of a flag diacritic: more than five
/// characters, `@` at both ends and `.` as the third character.
pub fn is_flag_shaped(symbol: &str) -> bool {
    symbol.chars().count() > 5
        && symbol.starts_with('@')
        && symbol.ends_with('@')
        && symbol.chars().nth(2) == Some('.')
}

/// Interns flag diacritic features and values across a whole alphabet.
///
/// Ids are handed out in first-seen order, so they depend only on the order
/// of symbols in the file. Value id 0 is the empty (neutral) value.
pub struct FlagDiacriticParser {
    features: HashMap<String, u16>,
    feature_names: Vec<String>,
    values: HashMap<String, i32>,
    value_names: Vec<String>,
}

impl Default for FlagDiacriticParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagDiacriticParser {
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert(String::new(), FLAG_VALUE_NEUTRAL);
        Self {
            features: HashMap::new(),
            feature_names: Vec::new(),
            values,
            value_names: vec![String::new()],
        }
    }

    /// Number of distinct features seen so far.
    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    /// Consume the parser, returning feature and value names indexed by id.
    pub fn into_names(self) -> (Vec<String>, Vec<String>) {
        (self.feature_names, self.value_names)
    }

    /// Parse a flag-shaped symbol such as `@P.CASE.NOM@` or `@C.CASE@`.
    ///
    /// Returns `None` when the symbol only looks like a flag diacritic: fewer
    /// than two dot-separated parts or an unknown operator. Such symbols are
    /// kept in the alphabet as textless placeholders, not rejected.
    pub fn parse(&mut self, symbol: &str) -> Option<FlagOperation> {
        if !is_flag_shaped(symbol) {
            return None;
        }
        let inner = &symbol[1..symbol.len() - 1];
        let mut parts: Vec<&str> = inner.split('.').collect();
        while parts.last().is_some_and(|p| p.is_empty()) {
            parts.pop();
        }
        if parts.len() < 2 {
            return None;
        }
        let op = FlagOp::from_code(parts[0])?;
        // Only the exact three-part form carries a value.
        let value_str = if parts.len() == 3 { parts[2] } else { "" };

        let value = match self.values.get(value_str) {
            Some(&id) => id,
            None => {
                let id = self.value_names.len() as i32;
                self.values.insert(value_str.to_string(), id);
                self.value_names.push(value_str.to_string());
                id
            }
        };
        let feature = match self.features.get(parts[1]) {
            Some(&id) => id,
            None => {
                let id = self.feature_names.len() as u16;
                self.features.insert(parts[1].to_string(), id);
                self.feature_names.push(parts[1].to_string());
                id
            }
        };

        Some(FlagOperation { op, feature, value })
    }
}
