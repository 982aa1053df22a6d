//! Serialization of a finalized [`ResourceBundle`] back to its `.properties` file.
//!
//! Layout:
//!
//! ```text
//! #########################################################################
//! # Generated on <timestamp>
//! #########################################################################
//! # Comments:                      (only when there are conflicts)
//! # <conflict>
//!
//! <OLD but USED section>
//! <NEW section>
//! <OLD and UNUSED section>
//! ```
//!
//! Entries inside a section are sorted by their rendered line and grouped under a
//! `# <lead>` heading. Lines end with CRLF and the file is ISO-8859-1.

use std::fmt::Write as _;

use chrono::Local;
use encoding_rs::mem::encode_latin1_lossy;

use super::bundle::{Entries, ResourceBundle};

pub const BANNER: &str =
    "#########################################################################";
pub const CRLF: &str = "\r\n";

pub const OLD_BUT_USED_TITLE: &str = "OLD but USED properties";
pub const NEW_TITLE: &str = "NEW properties";
pub const OLD_AND_UNUSED_TITLE: &str =
    "OLD and UNUSED properties (some entries may be removable, except JSF and seam properties)";

pub const NO_OLD_BUT_USED: &str = "There are no old but used properties";
pub const NO_NEW: &str = "There are no new properties";
pub const NO_OLD_AND_UNUSED: &str = "There are no old and not used properties";

const GENERATED_ON: &str = "Generated on";
const COMMENTS: &str = "# Comments: ";

/// What a piece of text is escaped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// Property key: spaces and separators are escaped.
    Key,
    /// Property value: only a leading space is escaped.
    Value,
    /// Comment text: kept readable, Latin-1 characters are written as is.
    Comment,
}

/// Escapes `text` for a property file written in ISO-8859-1.
///
/// Keys and values escape backslashes and write everything outside printable ASCII
/// as `\uXXXX`. Comments only do so for control characters and characters beyond
/// Latin-1.
pub fn escape(text: &str, mode: Escape) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut buf = [0u16; 2];

    for (index, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            ' ' if mode == Escape::Key || (mode == Escape::Value && index == 0) => {
                out.push_str("\\ ")
            }
            '=' | ':' | '#' | '!' if mode == Escape::Key => {
                out.push('\\');
                out.push(c);
            }
            c if needs_unicode_escape(c, mode) => {
                for unit in c.encode_utf16(&mut buf) {
                    let _ = write!(out, "\\u{:04X}", unit);
                }
            }
            c => out.push(c),
        }
    }

    out
}

fn needs_unicode_escape(c: char, mode: Escape) -> bool {
    match mode {
        Escape::Key | Escape::Value => !(' '..='~').contains(&c),
        Escape::Comment => c < ' ' || c > '\u{ff}',
    }
}

/// Grouping prefix of a rendered line: the text before its first `_`, else its
/// first `.`, else its first `=`; the whole line if it has none of them.
pub fn lead(line: &str) -> &str {
    let index = line
        .find('_')
        .or_else(|| line.find('.'))
        .or_else(|| line.find('='));

    match index {
        Some(index) => &line[..index],
        None => line,
    }
}

/// Timestamp written into the header, in local time.
pub fn generated_on() -> String {
    Local::now().format("%a %b %d %H:%M:%S %Z %Y").to_string()
}

/// Renders a finalized bundle. Deterministic for a given bundle and timestamp.
pub fn render(bundle: &ResourceBundle, generated_on: &str) -> String {
    let mut out = String::new();

    push_line(&mut out, BANNER);
    push_line(&mut out, &format!("# {} {}", GENERATED_ON, generated_on));
    push_line(&mut out, BANNER);

    if !bundle.conflicts().is_empty() {
        push_line(&mut out, COMMENTS);
        for conflict in bundle.conflicts() {
            push_comment(&mut out, conflict);
        }
        out.push_str(CRLF);
    }

    push_section(&mut out, OLD_BUT_USED_TITLE, NO_OLD_BUT_USED, bundle.reused_entries());
    push_section(&mut out, NEW_TITLE, NO_NEW, bundle.new_entries());
    push_section(
        &mut out,
        OLD_AND_UNUSED_TITLE,
        NO_OLD_AND_UNUSED,
        bundle.stale_entries(),
    );

    out
}

/// Encodes rendered text as ISO-8859-1. Rendering never emits characters outside
/// that range.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    encode_latin1_lossy(text).into_owned()
}

fn push_section(out: &mut String, title: &str, empty_line: &str, entries: &Entries) {
    if entries.is_empty() {
        push_comment(out, empty_line);
        return;
    }

    push_line(out, BANNER);
    push_comment(out, title);
    push_line(out, BANNER);

    let mut lines: Vec<String> = entries
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                escape(key, Escape::Key),
                escape(value, Escape::Value)
            )
        })
        .collect();
    lines.sort();

    let mut previous = "";
    for line in &lines {
        let current = lead(line);
        if current != previous {
            out.push_str(CRLF);
            push_line(out, &format!("# {}", current));
        }
        previous = current;
        push_line(out, line);
    }
}

fn push_comment(out: &mut String, text: &str) {
    push_line(out, &format!("# {}", escape(text, Escape::Comment)));
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str(CRLF);
}
