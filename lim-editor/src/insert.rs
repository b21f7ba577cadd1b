use crate::document::Document;
use lim_wiki::{ExtractionResult, LookupError, SummaryExtractor};

/// Look `query` up and append the rendered result to `doc`.
///
/// On any error the document is left exactly as it was. A page with no
/// usable text still counts as success and appends the placeholder.
pub async fn insert_lookup(
    doc: &mut Document,
    extractor: &SummaryExtractor,
    query: &str,
) -> Result<ExtractionResult, LookupError> {
    let clean = query.trim();
    if clean.is_empty() {
        tracing::warn!("editor.lookup.empty_selection");
        return Err(LookupError::InvalidQuery);
    }

    tracing::info!(query = %clean, document = %doc.display_name(), "editor.lookup.start");
    let result = extractor.extract(clean).await?;
    doc.append_block(&result.render());
    tracing::info!(query = %clean, found = result.is_found(), "editor.lookup.inserted");
    Ok(result)
}
