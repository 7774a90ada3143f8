//! Integration tests for photo-studio
//!
//! These tests verify the interaction between multiple components. The
//! generation API is replaced by a local wiremock server.

pub mod normalizer_tests;
pub mod studio_tests;
