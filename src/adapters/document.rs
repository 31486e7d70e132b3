use crate::domain::{Document, FillError, FillResult, Location};
use tracing::debug;

/// Give every definition without a location the document's location.
///
/// Loaders that precompile documents often only record where the whole
/// document came from. One operation per document is the common case, so
/// the document span stands in for each definition. Applying this twice
/// changes nothing.
pub fn normalize_document(document: &Document) -> Document {
    let mut normalized = document.clone();
    let Some(document_loc) = &document.loc else {
        return normalized;
    };
    for definition in normalized.definitions.iter_mut() {
        if definition.loc.is_none() {
            definition.loc = Some(document_loc.clone());
        }
    }
    normalized
}

/// Source text to hand to the compiler: each distinct definition span once,
/// in document order, or the whole document when it lists no definitions.
pub fn document_source(document: &Document) -> FillResult<String> {
    let document = normalize_document(document);

    if document.definitions.is_empty() {
        return match &document.loc {
            Some(loc) => slice(loc, None).ok_or(FillError::NoOperation),
            None => Err(FillError::NoOperation),
        };
    }

    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut parts: Vec<String> = Vec::new();
    for definition in &document.definitions {
        let loc = definition
            .loc
            .as_ref()
            .ok_or_else(|| FillError::MissingLocation {
                definition: definition.display_name(),
            })?;
        if spans.contains(&(loc.start, loc.end)) {
            continue;
        }
        let text = slice(loc, document.loc.as_ref()).ok_or_else(|| FillError::MissingLocation {
            definition: definition.display_name(),
        })?;
        spans.push((loc.start, loc.end));
        parts.push(text);
    }

    debug!(definitions = document.definitions.len(), spans = spans.len(), "assembled document source");
    Ok(parts.join("\n"))
}

/// Text covered by `loc`, reading from its own source or the fallback's
fn slice(loc: &Location, fallback: Option<&Location>) -> Option<String> {
    let source = loc
        .source
        .as_ref()
        .or_else(|| fallback.and_then(|fallback| fallback.source.as_ref()))?;
    source.body.get(loc.start..loc.end).map(str::to_string)
}
