use serde::{Deserialize, Serialize};

/// Separator reinserted between consecutive units when they are joined back together
pub const UNIT_SEPARATOR: char = ' ';

/// A sentence-sized span of transcript text, the atomic unit for pattern matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextUnit {
    /// Position of this unit in the unit sequence
    pub ordinal: usize,
    /// Unit text, trimmed and whitespace-normalized (never empty)
    pub text: String,
}

impl TextUnit {
    pub fn new(ordinal: usize, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            text: text.into(),
        }
    }

    /// Length in chars, the unit used for boundary offsets
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Join units back into a single string using the splitter's separator convention
pub fn join_units(units: &[TextUnit]) -> String {
    let mut joined = String::new();
    for unit in units {
        if !joined.is_empty() {
            joined.push(UNIT_SEPARATOR);
        }
        joined.push_str(&unit.text);
    }
    joined
}
