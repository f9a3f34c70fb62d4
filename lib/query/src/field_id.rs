//! A reversible encoding of predicate IRIs into search field identifiers.
//!
//! ASCII letters and digits are kept, every other byte of the UTF-8 encoding becomes `__` followed
//! by its two hex digits. Well-known namespaces are abbreviated to `_` and a single character.

use crate::{QueryError, QueryResult};

/// Abbreviated namespaces, the abbreviation must not be `_`.
const KNOWN_NAMESPACES: &[(&str, char)] = &[("http://purl.org/dc/elements/1.1/", '1')];

/// Encodes `url` into a field identifier, e.g. `http://purl.org/dc/elements/1.1/title` to
/// `_1title`.
pub fn url2id(url: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut id = String::with_capacity(url.len());
    let mut rest = url;
    for (namespace, abbreviation) in KNOWN_NAMESPACES {
        if let Some(local) = url.strip_prefix(namespace) {
            id.push('_');
            id.push(*abbreviation);
            rest = local;
            break;
        }
    }
    for byte in rest.bytes() {
        if byte.is_ascii_alphanumeric() {
            id.push(char::from(byte));
        } else {
            id.push_str("__");
            id.push(char::from(HEX[usize::from(byte >> 4)]));
            id.push(char::from(HEX[usize::from(byte & 0x0f)]));
        }
    }
    id
}

/// Decodes a field identifier produced by [`url2id`].
pub fn id2url(id: &str) -> QueryResult<String> {
    let invalid = |position: usize| QueryError::InvalidFieldId {
        id: id.to_owned(),
        position,
    };

    let mut bytes = Vec::with_capacity(id.len());
    let mut chars = id.char_indices();
    while let Some((position, c)) = chars.next() {
        if c != '_' {
            if !c.is_ascii_alphanumeric() {
                return Err(invalid(position));
            }
            bytes.push(u8::try_from(c).map_err(|_| invalid(position))?);
            continue;
        }
        match chars.next() {
            Some((_, '_')) => {
                let hex: String = chars.by_ref().take(2).map(|(_, c)| c).collect();
                let byte = (hex.len() == 2)
                    .then(|| u8::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .ok_or_else(|| invalid(position))?;
                bytes.push(byte);
            }
            Some((_, abbreviation)) => {
                let (namespace, _) = KNOWN_NAMESPACES
                    .iter()
                    .find(|(_, known)| *known == abbreviation)
                    .ok_or_else(|| invalid(position))?;
                bytes.extend_from_slice(namespace.as_bytes());
            }
            None => return Err(invalid(position)),
        }
    }
    String::from_utf8(bytes).map_err(|error| invalid(error.utf8_error().valid_up_to()))
}
