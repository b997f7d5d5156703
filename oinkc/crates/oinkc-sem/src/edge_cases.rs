//! Edge case tests for oinkc-sem
