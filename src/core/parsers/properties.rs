use std::{fs, path::Path};

use encoding_rs::mem::decode_latin1;
use thiserror::Error;
use tracing::debug;

use crate::core::{
    bundle::{Entries, ResourceBundle},
    error::{Error, Result},
    utils::walk_tree,
};

pub const MESSAGES_PREFIX: &str = "messages_";
pub const PROPERTIES_SUFFIX: &str = ".properties";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct PropertyError {
    pub line: usize,
    pub message: String,
}

/// Loads one `messages_<locale>.properties` file as the baseline of a new bundle.
///
/// The file is read as ISO-8859-1; anything outside that range must use `\uXXXX`.
pub fn parse_properties_file(path: &Path, locale: &str) -> Result<ResourceBundle> {
    let bytes = fs::read(path).map_err(|err| Error::io(path, err))?;
    let content = decode_latin1(&bytes);

    let baseline = parse_properties(&content).map_err(|err| Error::PropertyFormat {
        path: path.to_path_buf(),
        line: err.line,
        message: err.message,
    })?;

    debug!(locale, entries = baseline.len(), path = %path.display(), "loaded bundle");
    Ok(ResourceBundle::new(locale, path, baseline))
}

/// Parses property-file text into sorted entries. Later duplicates win.
pub fn parse_properties(content: &str) -> Result<Entries, PropertyError> {
    let mut entries = Entries::new();

    for (line, logical) in logical_lines(content) {
        let (raw_key, raw_value) = split_key_value(&logical);
        let key = unescape(raw_key).map_err(|message| PropertyError { line, message })?;
        let value = unescape(raw_value).map_err(|message| PropertyError { line, message })?;
        entries.insert(key, value);
    }

    Ok(entries)
}

/// Extracts the locale from a resource file name.
///
/// Examples:
/// - "messages_en.properties" -> Some("en")
/// - "/path/to/messages_pt_BR.properties" -> Some("pt_BR")
/// - "labels_en.properties" -> None
pub fn extract_locale(path: impl AsRef<Path>) -> Option<String> {
    let name = path.as_ref().file_name()?.to_str()?;
    let locale = name
        .strip_prefix(MESSAGES_PREFIX)?
        .strip_suffix(PROPERTIES_SUFFIX)?;

    (!locale.is_empty()).then(|| locale.to_string())
}

/// Loads every resource bundle in `resource_dir`, sorted by file name.
///
/// Only entries named like a resource file are visited, so plain subdirectories are
/// not searched. Any unreadable or malformed bundle fails the whole scan.
pub fn scan_message_files(resource_dir: impl AsRef<Path>) -> Result<Vec<ResourceBundle>> {
    let resource_dir = resource_dir.as_ref();
    let mut bundles = Vec::new();

    walk_tree(
        resource_dir,
        |path| extract_locale(path).is_some(),
        |path| {
            if let Some(locale) = extract_locale(path) {
                bundles.push(parse_properties_file(path, &locale)?);
            }
            Ok(())
        },
    )?;

    Ok(bundles)
}

fn is_property_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

/// Joins continued lines and drops blank and comment lines. Each logical line is
/// returned with the 1-based number of the line it starts on.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut natural = normalized.split('\n').enumerate();
    let mut lines = Vec::new();

    while let Some((index, raw)) = natural.next() {
        let first = raw.trim_start_matches(is_property_whitespace);
        if first.is_empty() || first.starts_with(['#', '!']) {
            continue;
        }

        let mut logical = String::new();
        let mut current = first;
        while has_continuation(current) {
            logical.push_str(&current[..current.len() - 1]);
            match natural.next() {
                Some((_, next)) => current = next.trim_start_matches(is_property_whitespace),
                None => {
                    current = "";
                    break;
                }
            }
        }
        logical.push_str(current);

        lines.push((index + 1, logical));
    }

    lines
}

/// True when the line ends with an odd number of backslashes.
fn has_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Splits at the first unescaped `=`, `:` or whitespace. Whitespace around the
/// separator and a single `=`/`:` after whitespace belong to neither part.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = index;
                value_start = index + 1;
                has_separator = true;
                break;
            }
            c if is_property_whitespace(c) => {
                key_end = index;
                value_start = index + c.len_utf8();
                break;
            }
            _ => {}
        }
    }

    let mut value = line[value_start..].trim_start_matches(is_property_whitespace);
    if !has_separator && let Some(rest) = value.strip_prefix(['=', ':']) {
        value = rest.trim_start_matches(is_property_whitespace);
    }

    (&line[..key_end], value)
}

/// Resolves `\t \n \r \f \uXXXX`; any other escaped character stands for itself.
fn unescape(raw: &str) -> Result<String, String> {
    let mut units: Vec<u16> = Vec::with_capacity(raw.len());
    let mut buf = [0u16; 2];
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            units.extend_from_slice(c.encode_utf16(&mut buf));
            continue;
        }

        let escaped = match chars.next() {
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    return Err(format!("Malformed \\uxxxx encoding: \\u{}", hex));
                }
                let unit = u16::from_str_radix(&hex, 16)
                    .map_err(|_| format!("Malformed \\uxxxx encoding: \\u{}", hex))?;
                units.push(unit);
                continue;
            }
            Some('t') => '\t',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('f') => '\u{c}',
            Some(other) => other,
            None => break,
        };
        units.extend_from_slice(escaped.encode_utf16(&mut buf));
    }

    Ok(String::from_utf16_lossy(&units))
}
