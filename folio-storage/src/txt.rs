//! The `txt` content file format.
//!
//! A content file is a list of `Key: value` blocks separated by lines that
//! consist of four dashes:
//!
//! ```text
//! Title: Hello
//!
//! ----
//!
//! Text:
//!
//! First line
//! Second line
//! ```
//!
//! Multi-line values start on the line after the key. Value lines that begin
//! with `----`, optionally after backslashes, get one more leading backslash
//! so they cannot be mistaken for a block separator. Keys are written with an
//! upper-case first letter and read back lower-cased. Values are trimmed.
//! Keys must satisfy [`Fields::is_valid_key`]; callers reject the rest before
//! encoding.

use folio_types::Fields;

const SEPARATOR: &str = "----";

/// Encodes a field map as a content file.
#[must_use]
pub fn encode(fields: &Fields) -> String {
    fields
        .iter()
        .map(|(key, value)| encode_field(key, value))
        .collect::<Vec<_>>()
        .join("\n\n----\n\n")
}

/// Decodes a content file into a field map.
///
/// Blocks without a `key:` prefix are skipped.
#[must_use]
pub fn decode(input: &str) -> Fields {
    let input = input.trim_start_matches('\u{feff}').replace("\r\n", "\n");
    let mut fields = Fields::new();
    let mut block: Vec<&str> = Vec::new();

    for line in input.split('\n') {
        if line.trim_end() == SEPARATOR {
            decode_block(&block, &mut fields);
            block.clear();
        } else {
            block.push(line);
        }
    }
    decode_block(&block, &mut fields);

    fields
}

fn encode_field(key: &str, value: &str) -> String {
    let value = escape(value.trim());
    let key = upper_first(key);

    if value.contains('\n') {
        format!("{key}:\n\n{value}")
    } else {
        format!("{key}: {value}")
    }
}

fn decode_block(block: &[&str], fields: &mut Fields) {
    let text = block.join("\n");
    let Some((key, value)) = text.split_once(':') else {
        return;
    };

    let key = key.trim();
    if key.is_empty() {
        return;
    }

    fields.insert(key, unescape(value.trim()));
}

fn escape(value: &str) -> String {
    value
        .split('\n')
        .map(|line| {
            if line.trim_start_matches('\\').starts_with(SEPARATOR) {
                format!("\\{line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn unescape(value: &str) -> String {
    value
        .split('\n')
        .map(|line| {
            if line.starts_with('\\') && line.trim_start_matches('\\').starts_with(SEPARATOR) {
                &line[1..]
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Upper-cases the first letter unless lower-casing would not restore it.
fn upper_first(key: &str) -> String {
    let mut chars = key.chars();
    let upper: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => return String::new(),
    };

    if upper.to_lowercase() == key {
        upper
    } else {
        key.to_string()
    }
}
