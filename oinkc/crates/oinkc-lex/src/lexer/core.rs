//! Core lexer implementation.
//!
//! The lexer walks the source one code point at a time through a small
//! state machine. The initial state resolves complete tokens in a fixed
//! order (newline, whitespace, multi-character ASCII punctuation longest
//! first, emoji, single-character punctuation, number/identifier starts);
//! the remaining states absorb multi-character lexemes and comments.

use oinkc_util::{CompileError, Result};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Multi-character ASCII punctuation, probed longest first.
const MULTI_CHAR_TOKENS: &[(&str, TokenKind)] = &[
    ("...", TokenKind::Return),
    ("#~", TokenKind::MoodLineBorderStart),
    ("~#", TokenKind::MoodLineBorderEnd),
    ("**", TokenKind::Bracket),
    ("#", TokenKind::SimpleLineBorder),
];

/// States of the lexer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LexerState {
    Initial,
    Identifier,
    Number,
    LineComment,
    BlockComment,
}

/// Lexer for Oink source code.
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) tokens: Vec<Token>,
    pub(crate) state: LexerState,

    /// Byte offset where the in-progress identifier/number started.
    pub(crate) token_start: usize,

    /// Line where the in-progress token started (1-based).
    pub(crate) token_start_line: u32,

    /// Column where the in-progress token started (1-based).
    pub(crate) token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            tokens: Vec::new(),
            state: LexerState::Initial,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Tokenizes the whole source.
    ///
    /// Consumes the lexer and returns the complete token stream, always
    /// terminated by a single `TheEnd` token, or the first lexical error.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        while !self.cursor.is_at_end() {
            match self.state {
                LexerState::Initial => self.initial_state()?,
                LexerState::Identifier => self.identifier_state(),
                LexerState::Number => self.number_state()?,
                LexerState::LineComment => self.line_comment_state(),
                LexerState::BlockComment => self.block_comment_state(),
            }
        }

        self.flush_current_token()?;
        self.push_token(TokenKind::TheEnd, "");
        Ok(self.tokens)
    }

    /// Resolves the next token from the initial state.
    fn initial_state(&mut self) -> Result<()> {
        let c = self.cursor.current_char();

        if c == '\n' {
            self.push_token(TokenKind::Newline, "\n");
            self.cursor.advance();
            return Ok(());
        }

        if c == ' ' || c == '\t' || c == '\r' {
            self.cursor.advance();
            return Ok(());
        }

        if self.try_multi_char_token() {
            return Ok(());
        }

        if self.try_emoji_token() {
            return Ok(());
        }

        match c {
            '@' => {
                self.push_token(TokenKind::Assignment, "@");
                self.cursor.advance();
                Ok(())
            },
            '>' => {
                self.push_token(TokenKind::Greater, ">");
                self.cursor.advance();
                Ok(())
            },
            '<' => {
                self.push_token(TokenKind::Less, "<");
                self.cursor.advance();
                Ok(())
            },
            '-' if self.cursor.peek_char(1).is_ascii_digit() => {
                self.start_token(LexerState::Number);
                Ok(())
            },
            c if c.is_ascii_alphabetic() => {
                self.start_token(LexerState::Identifier);
                Ok(())
            },
            c if c.is_ascii_digit() => {
                self.start_token(LexerState::Number);
                Ok(())
            },
            c => Err(CompileError::unexpected_character(
                c,
                self.cursor.line(),
                self.cursor.column(),
            )),
        }
    }

    /// Tries to resolve multi-character ASCII punctuation, longest first.
    fn try_multi_char_token(&mut self) -> bool {
        for len in [3, 2, 1] {
            let sequence = self.cursor.peek_slice(len);
            if sequence.is_empty() {
                continue;
            }
            if let Some(&(text, kind)) = MULTI_CHAR_TOKENS.iter().find(|(s, _)| *s == sequence) {
                self.push_token(kind, text);
                self.cursor.advance_n(len);
                return true;
            }
        }
        false
    }

    /// Begins a new identifier or number token at the current position.
    fn start_token(&mut self, state: LexerState) {
        self.state = state;
        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();
        self.cursor.advance();
    }

    /// Finishes any identifier or number still in progress at end of input.
    fn flush_current_token(&mut self) -> Result<()> {
        match self.state {
            LexerState::Identifier => self.build_identifier(),
            LexerState::Number => self.build_number()?,
            _ => {},
        }
        Ok(())
    }

    /// Appends a token starting at the current cursor position.
    pub(crate) fn push_token(&mut self, kind: TokenKind, lexeme: impl Into<String>) {
        self.tokens.push(Token::new(
            kind,
            lexeme,
            self.cursor.line(),
            self.cursor.column(),
        ));
    }

    /// Appends a token starting where the in-progress lexeme began.
    pub(crate) fn push_started_token(&mut self, kind: TokenKind, lexeme: impl Into<String>) {
        self.tokens.push(Token::new(
            kind,
            lexeme,
            self.token_start_line,
            self.token_start_column,
        ));
    }
}

#[cfg(test)]
mod tests {
    use crate::token::TokenKind::*;
    use crate::{Lexer, Token, TokenKind};
    use oinkc_util::ErrorKind;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize().expect("source should lex")
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|t| t.kind).collect()
    }

    fn lex_err(source: &str) -> oinkc_util::CompileError {
        Lexer::new(source).tokenize().expect_err("source should fail")
    }

    #[test]
    fn test_simple_declaration() {
        let tokens = lex("# 😀 🐷 🐖x🐖 @ 42 #\n");
        let expected = [
            SimpleLineBorder,
            Mut,
            I32Type,
            VariableBorder,
            Variable,
            VariableBorder,
            Assignment,
            Number,
            SimpleLineBorder,
            Newline,
            TheEnd,
        ];
        let actual: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(actual, expected);
        assert_eq!(tokens[1].lexeme, "😀");
        assert_eq!(tokens[2].lexeme, "🐷");
        assert_eq!(tokens[4].lexeme, "x");
        assert_eq!(tokens[7].lexeme, "42");
    }

    #[test]
    fn test_declaration_without_assignment() {
        assert_eq!(
            kinds("# 😀 🐷 🐖x🐖#\n"),
            [
                SimpleLineBorder,
                Mut,
                I32Type,
                VariableBorder,
                Variable,
                VariableBorder,
                SimpleLineBorder,
                Newline,
                TheEnd,
            ]
        );
    }

    #[test]
    fn test_negative_number() {
        let tokens = lex("# 😀 🐷 🐖x🐖 @ -100 #\n");
        let number = tokens.iter().find(|t| t.kind == Number).unwrap();
        assert_eq!(number.lexeme, "-100");
    }

    #[test]
    fn test_variable_with_ampersand() {
        let tokens = lex("# 😀 🐷 🐖my&var🐖 @ 10 #\n");
        let var = tokens.iter().find(|t| t.kind == Variable).unwrap();
        assert_eq!(var.lexeme, "my&var");
    }

    #[test]
    fn test_arithmetic_operators() {
        let tokens = lex("# 🐖a🐖 ❤️ 🐖b🐖 💔 🐖c🐖 💞 🐖d🐖 💕 🐖e🐖 #\n");
        let ops: Vec<_> = tokens
            .iter()
            .filter(|t| matches!(t.kind, Plus | Minus | Multiply | Divide))
            .map(|t| t.kind)
            .collect();
        assert_eq!(ops, [Plus, Minus, Multiply, Divide]);
    }

    #[test]
    fn test_comparison_operators() {
        let tokens =
            lex("# 🐖a🐖 🌸🌸 🐖b🐖 💩🌸 🐖c🐖 > 🐖d🐖 < 🐖e🐖 🌸> 🐖f🐖 🌸< 🐖g🐖 #\n");
        let ops: Vec<_> = tokens
            .iter()
            .filter(|t| {
                matches!(
                    t.kind,
                    Equals | NotEquals | Greater | Less | GreaterEqual | LessEqual
                )
            })
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            ops,
            [Equals, NotEquals, Greater, Less, GreaterEqual, LessEqual]
        );
    }

    #[test]
    fn test_logical_operators() {
        let tokens = lex("# 🐖a🐖 hru 🐖b🐖 bruh 💩 🐖c🐖 #\n");
        let and = tokens.iter().find(|t| t.kind == And).unwrap();
        let or = tokens.iter().find(|t| t.kind == Or).unwrap();
        assert_eq!(and.lexeme, "hru");
        assert_eq!(or.lexeme, "bruh");
        assert!(tokens.iter().any(|t| t.kind == Not));
    }

    #[test]
    fn test_boolean_literals() {
        let tokens = lex("# 😀 wow 🐖flag🐖 @ LOVE #\n# 😀 wow 🐖other🐖 @ HATE #\n");
        let bools: Vec<_> = tokens
            .iter()
            .filter(|t| matches!(t.kind, True | False))
            .collect();
        assert_eq!(bools.len(), 2);
        assert_eq!(bools[0].lexeme, "LOVE");
        assert_eq!(bools[1].lexeme, "HATE");
    }

    #[test]
    fn test_control_flow_keywords() {
        let tokens = lex("# SAVE 🐖x🐖 > 5 #\n# HURT 🐖x🐖 🌸🌸 0 #\n# KILL #\n# OINK 🐖x🐖 < 10 #\n");
        assert_eq!(tokens.iter().find(|t| t.kind == If).unwrap().lexeme, "SAVE");
        assert_eq!(tokens.iter().find(|t| t.kind == Elif).unwrap().lexeme, "HURT");
        assert_eq!(tokens.iter().find(|t| t.kind == Else).unwrap().lexeme, "KILL");
        assert_eq!(tokens.iter().find(|t| t.kind == While).unwrap().lexeme, "OINK");
    }

    #[test]
    fn test_block_borders() {
        let tokens = lex("# 🐖🐖🐖 #\n# 🐖🐖🐖 #\n");
        let borders = tokens.iter().filter(|t| t.kind == BlockBorder).count();
        assert_eq!(borders, 2);
    }

    #[test]
    fn test_mood_line_borders() {
        let tokens = lex("#~ 🐖x🐖 @ 🐖x🐖 ❤️ 5 ~#\n");
        let start = tokens.iter().find(|t| t.kind == MoodLineBorderStart).unwrap();
        let end = tokens.iter().find(|t| t.kind == MoodLineBorderEnd).unwrap();
        assert_eq!(start.lexeme, "#~");
        assert_eq!(end.lexeme, "~#");
    }

    #[test]
    fn test_return_markers() {
        let tokens = lex("# ... 🐖x🐖 ... #\n");
        assert_eq!(tokens.iter().filter(|t| t.kind == Return).count(), 2);
    }

    #[test]
    fn test_all_data_types() {
        let tokens = lex("# 😀 🐽 🐖a🐖 @ 1 #\n# 😀 🐷 🐖b🐖 @ 2 #\n# 😀 🐗 🐖c🐖 @ 3 #\n# 😀 wow 🐖d🐖 @ LOVE #\n");
        assert_eq!(tokens.iter().find(|t| t.kind == I16Type).unwrap().lexeme, "🐽");
        assert_eq!(tokens.iter().find(|t| t.kind == I32Type).unwrap().lexeme, "🐷");
        assert_eq!(tokens.iter().find(|t| t.kind == I64Type).unwrap().lexeme, "🐗");
        assert_eq!(tokens.iter().find(|t| t.kind == Bool).unwrap().lexeme, "wow");
    }

    #[test]
    fn test_brackets() {
        let tokens = lex("# 🐖x🐖 @ ** 🐖a🐖 ❤️ 🐖b🐖 ** #\n");
        assert_eq!(tokens.iter().filter(|t| t.kind == Bracket).count(), 2);
    }

    #[test]
    fn test_positions_count_code_points() {
        let tokens = lex("# ❤️ #");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        // The heart is two code points (heart + variation selector).
        assert_eq!((tokens[1].line, tokens[1].column), (1, 3));
        assert_eq!((tokens[2].line, tokens[2].column), (1, 6));
    }

    #[test]
    fn test_newline_resets_column() {
        let tokens = lex("#\n#\n");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 1));
    }

    #[test]
    fn test_the_end_is_always_last() {
        let tokens = lex("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TheEnd);
    }

    #[test]
    fn test_rejects_stray_dollar() {
        let err = lex_err("# 😀 🐷 🐖x🐖 @ 10 $ #\n");
        assert_eq!(err.kind, ErrorKind::UnexpectedCharacter);
        assert!(err.message.contains('$'));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_rejects_unknown_emoji() {
        let err = lex_err("# 😀 🐷 🐖x🐖 @ 10 🎉 #\n");
        assert_eq!(err.kind, ErrorKind::UnexpectedCharacter);
    }

    #[test]
    fn test_rejects_standalone_ampersand() {
        let err = lex_err("# 😀 🐷 🐖x🐖 @ 10 & 5 #\n");
        assert_eq!(err.kind, ErrorKind::UnexpectedCharacter);
    }

    #[test]
    fn test_rejects_ascii_operator_spellings() {
        assert_eq!(
            lex_err("# 🐖x🐖 @ 🐖a🐖 + 🐖b🐖 #\n").kind,
            ErrorKind::UnexpectedCharacter
        );
        assert_eq!(lex_err("# 🐖x🐖 = 10 #\n").kind, ErrorKind::UnexpectedCharacter);
        assert_eq!(
            lex_err("# 🐖x🐖 @ ( 🐖a🐖 ❤️ 🐖b🐖 ) #\n").kind,
            ErrorKind::UnexpectedCharacter
        );
    }

    #[test]
    fn test_rejects_decimal_point() {
        let err = lex_err("# 😀 🐷 🐖x🐖 @ 12.5 #\n");
        assert_eq!(err.kind, ErrorKind::UnexpectedCharacter);
        assert!(err.message.contains('.'));
    }

    #[test]
    fn test_rejects_double_minus() {
        let err = lex_err("# 😀 🐷 🐖x🐖 @ --10 #\n");
        assert_eq!(err.kind, ErrorKind::UnexpectedCharacter);
    }

    #[test]
    fn test_relexing_is_deterministic() {
        let source = "# 😀 🐷 🐖x🐖 @ 2 ❤️ 3 #\n# ... 🐖x🐖 ... #";
        assert_eq!(lex(source), lex(source));
    }
}
