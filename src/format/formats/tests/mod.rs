//! Unit tests for annotation format implementations.
//!
//! These tests verify the line and JSON payloads, lenient import of malformed
//! rows, and round-trips through the coordinate codec.

mod json_tests;
mod polygon_txt_tests;
