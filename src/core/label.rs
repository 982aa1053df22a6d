use std::path::Path;

use super::text::canonicalize;

/// Role tag used for labels taken from element text content.
pub const TEXT_ROLE: &str = "TEXT";

/// Namespace holding every generated label inside a reference expression.
pub const MESSAGES_NAMESPACE: &str = "messages";

/// Key of the date/time pattern every bundle carries.
pub const DATE_TIME_FORMAT_KEY: &str = "date_time_format";

/// Builds the property key for `text` found in `template` under `role`.
///
/// `<base>_<role>_<fragment>`, or `<base>_<fragment>` when `role` is empty.
/// `base` is the template's file name without its final extension.
pub fn make_label(template: &Path, role: &str, text: &str) -> String {
    let base = template_base_name(template);
    let fragment = canonicalize(text);

    if role.is_empty() {
        format!("{}_{}", base, fragment)
    } else {
        format!("{}_{}_{}", base, role, fragment)
    }
}

/// File name with the final extension removed: `pages/login.xhtml` -> `login`.
pub fn template_base_name(template: &Path) -> String {
    let name = template
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    match name.rfind('.') {
        Some(dot) => name[..dot].to_string(),
        None => name.into_owned(),
    }
}

/// Strips a namespace prefix: `h:outputText` -> `outputText`.
pub fn local_name(tag: &str) -> &str {
    match tag.find(':') {
        Some(index) => &tag[index + 1..],
        None => tag,
    }
}

/// Reference expression written in place of extracted text: `#{messages.<label>}`.
pub fn reference_expression(label: &str) -> String {
    format!("#{{{}.{}}}", MESSAGES_NAMESPACE, label)
}
