//! File parsers.
//!
//! - `properties`: `messages_<locale>.properties` reader and resource directory scan

pub mod properties;
