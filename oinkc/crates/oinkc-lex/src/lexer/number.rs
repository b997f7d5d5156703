//! Number state and validation.

use oinkc_util::{CompileError, Result};

use crate::lexer::core::LexerState;
use crate::token::TokenKind;
use crate::Lexer;

/// Validates a finished number lexeme: an optional leading `-` followed by
/// a non-empty digit run.
pub(crate) fn is_valid_number(lexeme: &str) -> bool {
    let digits = lexeme.strip_prefix('-').unwrap_or(lexeme);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl<'a> Lexer<'a> {
    /// Absorbs one character into the number in progress.
    ///
    /// The leading `-`, if any, was consumed when the state was entered;
    /// only digits extend the lexeme.
    pub(crate) fn number_state(&mut self) -> Result<()> {
        let c = self.cursor.current_char();
        if c.is_ascii_digit() {
            self.cursor.advance();
            Ok(())
        } else {
            self.build_number()?;
            self.state = LexerState::Initial;
            Ok(())
        }
    }

    /// Validates and emits the finished number lexeme.
    pub(crate) fn build_number(&mut self) -> Result<()> {
        let text = self.cursor.slice_from(self.token_start).to_string();
        if !is_valid_number(&text) {
            return Err(CompileError::malformed_number(
                &text,
                self.token_start_line,
                self.token_start_column,
            ));
        }
        self.push_started_token(TokenKind::Number, text);
        Ok(())
    }
}
