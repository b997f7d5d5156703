//! Edge case tests for oinkc-lex
