//! Code fence detection for figure blocks.
//!
//! A figure block opens with three or more backticks or tildes at the start of
//! a line. It closes on a line holding exactly the same fence, optionally
//! followed by whitespace.

/// An opening fence: the fence character and how many times it repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
    ch: char,
    len: usize,
}

impl Fence {
    /// Detect a fence at the very start of a line.
    ///
    /// Indented fences are not recognised, so tab-indented copies of a block
    /// never reopen it.
    pub(crate) fn detect(line: &str) -> Option<Self> {
        let first = line.chars().next()?;
        if first != '`' && first != '~' {
            return None;
        }

        let len = line.chars().take_while(|&c| c == first).count();
        if len >= 3 {
            Some(Self { ch: first, len })
        } else {
            None
        }
    }

    /// Byte length of the fence (fence characters are ASCII).
    pub(crate) fn len(self) -> usize {
        self.len
    }

    /// Check if a line closes this fence.
    ///
    /// The closing line must:
    /// - Start with the same character, repeated exactly as many times
    /// - Contain only whitespace after the fence
    pub(crate) fn closes(self, line: &str) -> bool {
        let count = line.chars().take_while(|&c| c == self.ch).count();
        if count != self.len {
            return false;
        }
        line[count..].chars().all(char::is_whitespace)
    }
}
