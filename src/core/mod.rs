//! Extraction and reconciliation engine.
//!
//! ## Pipeline
//!
//! 1. `parsers::properties` loads one [`ResourceBundle`] per `messages_<locale>.properties`
//! 2. Each template is parsed into a [`document::Document`], rewritten by
//!    [`walker::walk_document`] and serialized back
//! 3. Every extracted label is fed to all bundles through [`LabelSink`]
//! 4. Bundles are finalized and written by `properties_writer`
//!
//! [`generator::Generator`] drives the whole run.

pub mod bundle;
pub mod document;
pub mod entities;
pub mod error;
pub mod generator;
pub mod label;
pub mod parsers;
pub mod properties_writer;
pub mod text;
pub mod utils;
pub mod walker;

pub use bundle::{Entries, LabelSink, PendingLabels, ResourceBundle};
pub use error::{Error, Result};
pub use generator::{GenerateOptions, GenerateSummary, Generator, Progress};
