//! Edge case tests for oinkc-par
