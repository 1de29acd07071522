//! Positional exclusion rules.
//!
//! [`PositionIndex`] records the structural bytes of a document (newlines,
//! code fences, brackets, parentheses) in a single pass, so every later
//! query is a binary search instead of a rescan of the text before the match.
//! [`is_inside_code_block`] and [`is_inside_existing_link`] are the one-shot
//! forms of the same queries.

/// Fence delimiter that opens and closes a code block.
pub const CODE_FENCE: &str = "```";

/// Returns whether `offset` lies inside a fenced code block.
///
/// The text before `offset` is inside a block when it contains an odd number
/// of fence delimiters. An unclosed fence therefore puts every later
/// position of the document inside a code block.
pub fn is_inside_code_block(text: &str, offset: usize) -> bool {
    PositionIndex::new(text).is_inside_code_block(offset)
}

/// Returns whether the match `start..end` lies inside an existing markdown link.
///
/// A match is inside a link when an unmatched `[` precedes it and the first
/// `]` after it is immediately followed by `(`. A match that sits in the
/// destination part of `[label](destination)` is inside a link as well.
pub fn is_inside_existing_link(text: &str, start: usize, end: usize) -> bool {
    PositionIndex::new(text).is_inside_existing_link(start, end)
}

/// A bracket or parenthesis event and the nearest unmatched opener after it.
#[derive(Debug, Clone, Copy)]
struct OpenerState {
    pos: usize,
    open: Option<usize>,
}

/// Byte positions of the structural characters of one document.
#[derive(Debug)]
pub struct PositionIndex<'a> {
    text: &'a str,
    /// Offsets of every `\n`.
    newlines: Vec<usize>,
    /// End offsets of the non-overlapping fence delimiters.
    fence_ends: Vec<usize>,
    /// Offsets of every `]`.
    close_brackets: Vec<usize>,
    /// Offsets of every `)`.
    close_parens: Vec<usize>,
    /// Unmatched `[` after each `[` or `]`.
    brackets: Vec<OpenerState>,
    /// Unmatched `(` on the current line after each `(`, `)` or newline.
    parens: Vec<OpenerState>,
}

impl<'a> PositionIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let fence_ends = text
            .match_indices(CODE_FENCE)
            .map(|(idx, fence)| idx + fence.len())
            .collect();

        let mut index = Self {
            text,
            newlines: Vec::new(),
            fence_ends,
            close_brackets: Vec::new(),
            close_parens: Vec::new(),
            brackets: Vec::new(),
            parens: Vec::new(),
        };

        let mut open_brackets: Vec<usize> = Vec::new();
        let mut open_parens: Vec<usize> = Vec::new();

        for (pos, b) in text.bytes().enumerate() {
            match b {
                b'\n' => {
                    index.newlines.push(pos);
                    open_parens.clear();
                    index.parens.push(OpenerState { pos, open: None });
                }
                b'[' | b']' => {
                    if b == b'[' {
                        open_brackets.push(pos);
                    } else {
                        index.close_brackets.push(pos);
                        open_brackets.pop();
                    }
                    index.brackets.push(OpenerState {
                        pos,
                        open: open_brackets.last().copied(),
                    });
                }
                b'(' | b')' => {
                    if b == b'(' {
                        open_parens.push(pos);
                    } else {
                        index.close_parens.push(pos);
                        open_parens.pop();
                    }
                    index.parens.push(OpenerState {
                        pos,
                        open: open_parens.last().copied(),
                    });
                }
                _ => {}
            }
        }

        index
    }

    /// Returns the indexed text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the 1-based line number of `offset`.
    pub fn line_number(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&n| n < offset) + 1
    }

    /// Returns the byte range of the line (or lines) spanned by `start..end`,
    /// without the line terminators.
    pub fn line_span(&self, start: usize, end: usize) -> (usize, usize) {
        let start = start.min(self.text.len());
        let end = end.clamp(start, self.text.len());

        let before = self.newlines.partition_point(|&n| n < start);
        let line_start = before.checked_sub(1).map_or(0, |i| self.newlines[i] + 1);

        let after = self.newlines.partition_point(|&n| n < end);
        let line_end = self.newlines.get(after).copied().unwrap_or(self.text.len());

        (line_start, line_end)
    }

    /// See [`is_inside_code_block`].
    pub fn is_inside_code_block(&self, offset: usize) -> bool {
        let offset = offset.min(self.text.len());
        self.fence_ends.partition_point(|&end| end <= offset) % 2 == 1
    }

    /// See [`is_inside_existing_link`].
    pub fn is_inside_existing_link(&self, start: usize, end: usize) -> bool {
        let start = start.min(self.text.len());
        let end = end.clamp(start, self.text.len());

        self.is_inside_link_label(start, end) || self.is_inside_link_destination(start)
    }

    fn is_inside_link_label(&self, start: usize, end: usize) -> bool {
        if open_before(&self.brackets, start).is_none() {
            return false;
        }

        let Some(&close) = first_at_or_after(&self.close_brackets, end) else {
            return false;
        };

        self.text.as_bytes().get(close + 1) == Some(&b'(')
    }

    fn is_inside_link_destination(&self, start: usize) -> bool {
        let Some(open) = open_before(&self.parens, start) else {
            return false;
        };

        if open == 0 || self.text.as_bytes()[open - 1] != b']' {
            return false;
        }

        let Some(&close) = first_at_or_after(&self.close_parens, start) else {
            return false;
        };

        first_at_or_after(&self.newlines, start).is_none_or(|&newline| close < newline)
    }
}

/// Nearest unmatched opener strictly before `offset`.
fn open_before(states: &[OpenerState], offset: usize) -> Option<usize> {
    let idx = states.partition_point(|state| state.pos < offset);
    idx.checked_sub(1).and_then(|i| states[i].open)
}

fn first_at_or_after(positions: &[usize], offset: usize) -> Option<&usize> {
    positions.get(positions.partition_point(|&p| p < offset))
}
