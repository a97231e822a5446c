/// Formatting context handed to [`Gate::diagram_info`](super::Gate::diagram_info).
///
/// Gates never look inside it; only the circuit renderer interprets the
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramArgs {
    /// Draw wires with box-drawing characters instead of plain ASCII.
    pub use_unicode_characters: bool,
}

impl Default for DiagramArgs {
    fn default() -> Self {
        Self {
            use_unicode_characters: true,
        }
    }
}

impl DiagramArgs {
    pub fn ascii() -> Self {
        Self {
            use_unicode_characters: false,
        }
    }

    pub(crate) fn wire_char(&self) -> char {
        if self.use_unicode_characters {
            '─'
        } else {
            '-'
        }
    }

    pub(crate) fn barrier_char(&self) -> char {
        if self.use_unicode_characters {
            '│'
        } else {
            '|'
        }
    }
}

/// Per-wire display labels for one gate, in operand order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramInfo {
    pub wire_symbols: Vec<String>,
}

impl DiagramInfo {
    pub fn new(wire_symbols: Vec<String>) -> Self {
        Self { wire_symbols }
    }
}
