//! Comment states.
//!
//! A single eye opens a line comment that runs up to (not including) the
//! newline. Three eyes open a block comment that runs until the next
//! three-eye sequence; a block comment that never closes silently consumes
//! the rest of the source.

use crate::lexer::core::LexerState;
use crate::Lexer;

const BLOCK_COMMENT: &str = "👀👀👀";

impl<'a> Lexer<'a> {
    /// Discards characters until the end of the line.
    ///
    /// The newline itself is left for the initial state, so it still
    /// produces its `Newline` token.
    pub(crate) fn line_comment_state(&mut self) {
        if self.cursor.current_char() == '\n' {
            self.state = LexerState::Initial;
        } else {
            self.cursor.advance();
        }
    }

    /// Discards characters until the closing three-eye sequence.
    pub(crate) fn block_comment_state(&mut self) {
        if self.cursor.starts_with(BLOCK_COMMENT) {
            self.cursor.advance_n(3);
            self.state = LexerState::Initial;
        } else {
            self.cursor.advance();
        }
    }
}
