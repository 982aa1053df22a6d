//! Text classification: deciding what counts as translatable text and reducing
//! text to the letter-only fragment used inside labels.

use unicode_normalization::char::is_combining_mark;

/// Opening marker of an embedded expression (`#{...}`).
pub const EXPRESSION_OPEN: &str = "#{";

/// Closing marker of an embedded expression.
pub const EXPRESSION_CLOSE: char = '}';

/// Fragment used when a text contains no letters at all.
pub const NO_LETTERS: &str = "no_letters";

/// True for characters of Unicode general category Letter.
///
/// `char::is_alphabetic` also accepts letter numbers (`Ⅻ`), combining vowel signs
/// and the enclosed letters `Ⓐ`/`🄰`, none of which are letters.
pub fn is_letter(c: char) -> bool {
    c.is_alphabetic() && !c.is_numeric() && !is_combining_mark(c) && !is_enclosed_letter(c)
}

fn is_enclosed_letter(c: char) -> bool {
    matches!(
        c,
        '\u{24b6}'..='\u{24e9}'
            | '\u{1f130}'..='\u{1f149}'
            | '\u{1f150}'..='\u{1f169}'
            | '\u{1f170}'..='\u{1f189}'
    )
}

/// Whitespace removed around extracted text. Non-breaking spaces are content, not
/// layout, and survive trimming.
pub fn is_layout_whitespace(c: char) -> bool {
    match c {
        '\u{a0}' | '\u{2007}' | '\u{202f}' | '\u{85}' => false,
        '\u{1c}'..='\u{1f}' => true,
        _ => c.is_whitespace(),
    }
}

/// Strips leading and trailing layout whitespace.
pub fn trim_text(text: &str) -> &str {
    text.trim_matches(is_layout_whitespace)
}

/// Returns true if `text` holds at least one letter outside of `#{...}` spans.
///
/// The contents of a terminated span are never inspected. An unterminated `#{`
/// counts as translatable, so text is extracted rather than silently skipped.
pub fn is_translatable(text: &str) -> bool {
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix(EXPRESSION_OPEN) {
            match inner.find(EXPRESSION_CLOSE) {
                Some(end) => {
                    rest = &inner[end + EXPRESSION_CLOSE.len_utf8()..];
                    continue;
                }
                None => return true,
            }
        }

        let mut chars = rest.chars();
        match chars.next() {
            Some(c) if is_letter(c) => return true,
            _ => rest = chars.as_str(),
        }
    }

    false
}

/// Reduces `text` to its letter runs joined by single underscores.
///
/// Letters keep their case; every run of non-letters becomes one separator, with
/// no separator at either end. Text without letters maps to [`NO_LETTERS`].
///
/// ```
/// use i18ngen::core::text::canonicalize;
///
/// assert_eq!(canonicalize("Hello, World!"), "Hello_World");
/// assert_eq!(canonicalize("123"), "no_letters");
/// ```
pub fn canonicalize(text: &str) -> String {
    let mut fragment = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        if is_letter(c) {
            if pending_separator && !fragment.is_empty() {
                fragment.push('_');
            }
            pending_separator = false;
            fragment.push(c);
        } else {
            pending_separator = true;
        }
    }

    if fragment.is_empty() {
        NO_LETTERS.to_string()
    } else {
        fragment
    }
}
