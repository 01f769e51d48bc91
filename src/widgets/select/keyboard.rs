//! Keyboard cursor over the dropdown entries.

/// Index of the keyboard-focused entry among the currently navigable ones.
///
/// The candidate list can shrink between moves (filtering), so a stale
/// index is tolerated and simply wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionCursor {
    index: Option<usize>,
}

impl OptionCursor {
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Forget the position; the next move starts from an end.
    pub fn reset(&mut self) {
        self.index = None;
    }

    /// Step forward through `len` candidates, wrapping to the first.
    pub fn next(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let next = match self.index {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.index = Some(next);
        self.index
    }

    /// Step backward through `len` candidates, wrapping to the last.
    pub fn previous(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let previous = match self.index {
            Some(i) if i >= 1 && i - 1 < len => i - 1,
            _ => len - 1,
        };
        self.index = Some(previous);
        self.index
    }
}
