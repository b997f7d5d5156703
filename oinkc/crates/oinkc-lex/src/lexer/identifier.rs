//! Identifier and keyword state.

use crate::lexer::core::LexerState;
use crate::token::{keyword_from_ident, TokenKind};
use crate::Lexer;

/// The single sigil permitted inside identifiers.
const IDENT_SIGIL: char = '&';

impl<'a> Lexer<'a> {
    /// Absorbs one character into the identifier in progress.
    ///
    /// Any character that is neither a letter nor `&` ends the lexeme;
    /// it is left for the initial state to resolve.
    pub(crate) fn identifier_state(&mut self) {
        let c = self.cursor.current_char();
        if c.is_alphabetic() || c == IDENT_SIGIL {
            self.cursor.advance();
        } else {
            self.build_identifier();
            self.state = LexerState::Initial;
        }
    }

    /// Emits the finished identifier, as a keyword when the lexeme is one.
    pub(crate) fn build_identifier(&mut self) {
        let text = self.cursor.slice_from(self.token_start).to_string();
        let kind = keyword_from_ident(&text).unwrap_or(TokenKind::Variable);
        self.push_started_token(kind, text);
    }
}
