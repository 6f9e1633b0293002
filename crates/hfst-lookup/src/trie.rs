// Letter trie: splits input text into alphabet symbols, preferring the
// longest multi-character symbol at each position.

use hashbrown::HashMap;

#[derive(Debug, Clone, Default)]
struct LetterTrieNode {
    /// Symbols that end at this node, keyed by their last character.
    symbols: HashMap<char, u16>,
    children: HashMap<char, LetterTrieNode>,
}

impl LetterTrieNode {
    fn add(&mut self, text: &[char], symbol: u16) {
        match text {
            [] => {}
            [last] => {
                self.symbols.insert(*last, symbol);
            }
            [first, rest @ ..] => self.children.entry(*first).or_default().add(rest, symbol),
        }
    }

    /// Match the longest symbol starting at `*cursor`.
    ///
    /// On success the cursor is left just past the match. On failure it is
    /// restored to where it was.
    fn find_key(&self, text: &[char], cursor: &mut usize) -> Option<u16> {
        let &ch = text.get(*cursor)?;
        *cursor += 1;
        if let Some(child) = self.children.get(&ch) {
            if let Some(symbol) = child.find_key(text, cursor) {
                return Some(symbol);
            }
        }
        match self.symbols.get(&ch) {
            Some(&symbol) => Some(symbol),
            None => {
                *cursor -= 1;
                None
            }
        }
    }
}

/// Prefix trie over the input symbols of a transducer.
#[derive(Debug, Clone, Default)]
pub struct LetterTrie {
    root: LetterTrieNode,
}

impl LetterTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `text` as symbol `symbol`. Empty strings are ignored.
    pub fn add_string(&mut self, text: &str, symbol: u16) {
        let chars: Vec<char> = text.chars().collect();
        self.root.add(&chars, symbol);
    }

    /// Match one symbol at `*cursor`, advancing the cursor past it.
    ///
    /// Returns `None` without moving the cursor when nothing matches.
    pub fn tokenize_next(&self, text: &[char], cursor: &mut usize) -> Option<u16> {
        self.root.find_key(text, cursor)
    }

    /// Split the whole text into symbols, or `None` if any position cannot
    /// be matched.
    pub fn tokenize(&self, text: &str) -> Option<Vec<u16>> {
        let chars: Vec<char> = text.chars().collect();
        let mut symbols = Vec::with_capacity(chars.len());
        let mut cursor = 0;
        while cursor < chars.len() {
            symbols.push(self.tokenize_next(&chars, &mut cursor)?);
        }
        Some(symbols)
    }
}
