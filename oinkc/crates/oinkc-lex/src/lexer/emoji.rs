//! Emoji token resolution.
//!
//! Emoji resolution is entered whenever the current code point is
//! non-ASCII. The eye sequences are checked first (they switch the lexer
//! into a comment state instead of producing a token); the remaining
//! emoji are resolved against a fixed table, longest entry first, so that
//! 🐖🐖🐖 wins over 🐖 and 💩🌸 wins over 💩.

use crate::lexer::core::LexerState;
use crate::token::TokenKind;
use crate::Lexer;

/// Opens a line comment; everything up to the newline is discarded.
const LINE_COMMENT: &str = "👀";

/// Delimits a block comment on both ends.
const BLOCK_COMMENT: &str = "👀👀👀";

/// Fixed emoji vocabulary. Entries are grouped by length in code points;
/// resolution probes lengths 3, 2, 1 in that order.
const EMOJI_TOKENS: &[(&str, TokenKind)] = &[
    ("🐖🐖🐖", TokenKind::BlockBorder),
    ("🌸🌸", TokenKind::Equals),
    ("💩🌸", TokenKind::NotEquals),
    ("🌸>", TokenKind::GreaterEqual),
    ("🌸<", TokenKind::LessEqual),
    ("❤\u{fe0f}", TokenKind::Plus),
    ("🐖", TokenKind::VariableBorder),
    ("🐽", TokenKind::I16Type),
    ("🐷", TokenKind::I32Type),
    ("🐗", TokenKind::I64Type),
    ("😀", TokenKind::Mut),
    ("😭", TokenKind::Const),
    ("💔", TokenKind::Minus),
    ("💞", TokenKind::Multiply),
    ("💕", TokenKind::Divide),
    ("💩", TokenKind::Not),
];

impl<'a> Lexer<'a> {
    /// Tries to resolve an emoji token or comment opener.
    ///
    /// Returns false when the current code point is ASCII or matches
    /// nothing; the caller then falls through to the remaining initial
    /// state rules (which end in the unexpected-character error).
    pub(crate) fn try_emoji_token(&mut self) -> bool {
        if self.cursor.current_char().is_ascii() {
            return false;
        }

        if self.cursor.starts_with(BLOCK_COMMENT) {
            self.state = LexerState::BlockComment;
            self.cursor.advance_n(3);
            return true;
        }

        if self.cursor.starts_with(LINE_COMMENT) {
            self.state = LexerState::LineComment;
            self.cursor.advance();
            return true;
        }

        for len in [3, 2, 1] {
            let sequence = self.cursor.peek_slice(len);
            if sequence.is_empty() {
                continue;
            }
            if let Some(&(text, kind)) = EMOJI_TOKENS.iter().find(|(s, _)| *s == sequence) {
                self.push_token(kind, text);
                self.cursor.advance_n(len);
                return true;
            }
        }

        false
    }
}
