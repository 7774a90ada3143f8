//! Core functionality for the studio
//!
//! This module contains the image pipeline, prompt synthesis and the request
//! flow against the generation backend.

pub mod assets;
pub mod normalizer;
pub mod options;
pub mod orchestrator;
pub mod presentation;
pub mod prompt;
pub mod providers;
