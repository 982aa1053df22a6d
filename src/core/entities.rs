//! Entity definitions resolved while parsing templates.
//!
//! Templates usually declare the XHTML 1.0 Transitional DTD and use named entities
//! such as `&nbsp;`. Instead of fetching the DTD, the definitions ship with the binary
//! and are looked up by public identifier.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use tracing::debug;

pub const XHTML_TRANSITIONAL_DTD: &str = "-//W3C//DTD XHTML 1.0 Transitional//EN";
pub const XHTML_LATIN1_ENTITIES: &str = "-//W3C//ENTITIES Latin 1 for XHTML//EN";
pub const XHTML_SPECIAL_ENTITIES: &str = "-//W3C//ENTITIES Special for XHTML//EN";
pub const XHTML_SYMBOL_ENTITIES: &str = "-//W3C//ENTITIES Symbols for XHTML//EN";

const XHTML_LAT1_ENT: &str = include_str!("../../res/xhtml-lat1.ent");
const XHTML_SPECIAL_ENT: &str = include_str!("../../res/xhtml-special.ent");
const XHTML_SYMBOL_ENT: &str = include_str!("../../res/xhtml-symbol.ent");

static ENTITY_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<!ENTITY\s+([^\s%"']+)\s+(?:"([^"]*)"|'([^']*)')\s*>"#)
        .expect("entity declaration pattern is valid")
});

static PUBLIC_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bPUBLIC\s+(?:"([^"]*)"|'([^']*)')"#).expect("public id pattern is valid")
});

static ENTITY_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&([A-Za-z_:][A-Za-z0-9_:.-]*);").expect("entity reference pattern is valid")
});

/// Upper bound on one expanded replacement text, in bytes.
const MAX_EXPANSION_LEN: usize = 64 * 1024;

static CHAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(?:x([0-9a-fA-F]+)|([0-9]+));").expect("character reference pattern is valid")
});

/// Name -> replacement text.
pub type EntityTable = HashMap<String, String>;

/// Entity sets keyed by public identifier.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    by_public_id: HashMap<String, EntityTable>,
}

impl EntityCatalog {
    /// Catalog with the three XHTML entity sets and the transitional DTD.
    pub fn xhtml() -> Self {
        let latin1 = parse_declarations(XHTML_LAT1_ENT);
        let special = parse_declarations(XHTML_SPECIAL_ENT);
        let symbol = parse_declarations(XHTML_SYMBOL_ENT);

        let mut dtd = EntityTable::new();
        dtd.extend(latin1.clone());
        dtd.extend(special.clone());
        dtd.extend(symbol.clone());

        let mut catalog = Self::default();
        catalog.insert(XHTML_TRANSITIONAL_DTD, dtd);
        catalog.insert(XHTML_LATIN1_ENTITIES, latin1);
        catalog.insert(XHTML_SPECIAL_ENTITIES, special);
        catalog.insert(XHTML_SYMBOL_ENTITIES, symbol);
        catalog
    }

    pub fn insert(&mut self, public_id: impl Into<String>, entities: EntityTable) {
        self.by_public_id.insert(public_id.into(), entities);
    }

    pub fn get(&self, public_id: &str) -> Option<&EntityTable> {
        self.by_public_id.get(public_id)
    }

    /// Entities visible to a document with the given DOCTYPE content (the text
    /// between `<!DOCTYPE` and `>`), or `None` for no DOCTYPE at all.
    ///
    /// Returns the offending identifier when the DOCTYPE names an external subset
    /// the catalog cannot provide.
    pub fn for_doctype(&self, doctype: Option<&str>) -> Result<DocumentEntities<'_>, String> {
        let Some(doctype) = doctype else {
            return Ok(DocumentEntities::default());
        };

        let (external_part, internal_subset) = match (doctype.find('['), doctype.rfind(']')) {
            (Some(open), Some(close)) if open < close => {
                (&doctype[..open], Some(&doctype[open + 1..close]))
            }
            _ => (doctype, None),
        };

        let external = if let Some(caps) = PUBLIC_ID.captures(external_part) {
            let public_id = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match self.get(public_id) {
                Some(table) => Some(table),
                None => return Err(public_id.to_string()),
            }
        } else if external_part.contains("SYSTEM") {
            return Err(external_part.trim().to_string());
        } else {
            None
        };

        let declared = internal_subset.map(parse_declarations).unwrap_or_default();

        Ok(DocumentEntities {
            internal: expand_internal(&declared, external),
            external,
        })
    }
}

/// Entities in scope while parsing one document.
#[derive(Debug, Default)]
pub struct DocumentEntities<'c> {
    internal: EntityTable,
    external: Option<&'c EntityTable>,
}

impl DocumentEntities<'_> {
    /// Replacement text for `&name;`. Predefined XML entities always resolve;
    /// internal declarations shadow the external set.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        predefined(name)
            .or_else(|| self.internal.get(name).map(String::as_str))
            .or_else(|| {
                self.external
                    .and_then(|table| table.get(name))
                    .map(String::as_str)
            })
    }
}

fn predefined(name: &str) -> Option<&'static str> {
    match name {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        _ => None,
    }
}

/// Expands references to other entities inside internal declarations.
///
/// A declaration that refers to an unknown entity, takes part in a reference cycle
/// or grows beyond [`MAX_EXPANSION_LEN`] is left out, so a reference to it is
/// reported as unresolvable.
fn expand_internal(declared: &EntityTable, external: Option<&EntityTable>) -> EntityTable {
    let mut expander = Expander {
        declared,
        external,
        done: HashMap::new(),
        in_progress: Vec::new(),
    };

    declared
        .iter()
        .filter_map(|(name, value)| match expander.entity(name, value) {
            Ok(expanded) => Some((name.clone(), expanded)),
            Err(reference) => {
                debug!(entity = %name, reference = %reference, "entity cannot be expanded");
                None
            }
        })
        .collect()
}

/// Expands each internal entity once. Errors carry the reference that failed.
struct Expander<'a> {
    declared: &'a EntityTable,
    external: Option<&'a EntityTable>,
    done: HashMap<&'a str, Result<String, String>>,
    in_progress: Vec<&'a str>,
}

impl<'a> Expander<'a> {
    fn entity(&mut self, name: &'a str, value: &'a str) -> Result<String, String> {
        if let Some(result) = self.done.get(name) {
            return result.clone();
        }
        if self.in_progress.contains(&name) {
            return Err(name.to_string());
        }

        self.in_progress.push(name);
        let result = self.expand(value);
        self.in_progress.pop();

        self.done.insert(name, result.clone());
        result
    }

    fn expand(&mut self, value: &'a str) -> Result<String, String> {
        let (declared, external) = (self.declared, self.external);
        let mut out = String::with_capacity(value.len());
        let mut last = 0;

        for caps in ENTITY_REF.captures_iter(value) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let name = name.as_str();
            out.push_str(&value[last..whole.start()]);
            last = whole.end();

            if let Some(text) = predefined(name) {
                out.push_str(text);
            } else if let Some((key, text)) = declared.get_key_value(name) {
                out.push_str(&self.entity(key, text)?);
            } else if let Some(text) = external.and_then(|table| table.get(name)) {
                out.push_str(text);
            } else {
                return Err(name.to_string());
            }

            if out.len() > MAX_EXPANSION_LEN {
                return Err(name.to_string());
            }
        }
        out.push_str(&value[last..]);

        Ok(out)
    }
}

/// Parses `<!ENTITY name "value">` declarations. Parameter entities are skipped.
pub fn parse_declarations(source: &str) -> EntityTable {
    ENTITY_DECL
        .captures_iter(source)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_string();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((name, expand_char_refs(value)))
        })
        .collect()
}

/// Expands numeric character references until none are left, so that the
/// double-escaped `&#38;#60;` form becomes `<`.
fn expand_char_refs(value: &str) -> String {
    let mut current = value.to_string();

    while CHAR_REF.is_match(&current) {
        current = CHAR_REF
            .replace_all(&current, |caps: &regex::Captures| {
                let code = match (caps.get(1), caps.get(2)) {
                    (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                    (_, Some(dec)) => dec.as_str().parse::<u32>().ok(),
                    _ => None,
                };
                code.and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_else(|| caps[0].replace('&', "\u{FFFD}"))
            })
            .into_owned();
    }

    current
}
