use snipshelf_core::models::snippet::Snippet;

use crate::error::LibraryError;

/// Validate import file contents: a JSON array of snippet records.
///
/// Every record must carry `id`, `title`, `code` and `createdAt`; the other
/// fields default. The first bad record rejects the whole file.
pub fn parse_import(text: &str) -> Result<Vec<Snippet>, LibraryError> {
    let json: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| LibraryError::InvalidFormat(format!("not valid JSON: {e}")))?;

    let serde_json::Value::Array(records) = json else {
        return Err(LibraryError::InvalidFormat(
            "expected a JSON array of snippets".to_string(),
        ));
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value::<Snippet>(record)
                .map_err(|e| LibraryError::InvalidFormat(format!("record {index}: {e}")))
        })
        .collect()
}

/// Render the collection as the pretty-printed JSON export document.
pub fn export_document(snippets: &[Snippet]) -> Result<String, LibraryError> {
    Ok(serde_json::to_string_pretty(snippets)?)
}
