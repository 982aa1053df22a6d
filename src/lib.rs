//! i18ngen - XHTML template message extractor
//!
//! i18ngen finds hardcoded text in XHTML templates, replaces it with
//! `#{messages.<label>}` expressions and merges the labels into every
//! `messages_<locale>.properties` bundle, sorting entries into old-but-used,
//! new and old-and-unused sections.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, console output, exit status)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction and reconciliation engine

pub mod cli;
pub mod config;
pub mod core;
