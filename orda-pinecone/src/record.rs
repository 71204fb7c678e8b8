use orda_core::Document;
use serde_json::{Map, Value};

use crate::wire::Match;
use crate::PineconeStoreError;

/// Metadata written for a document: its own metadata plus the text.
pub(crate) fn metadata_for(doc: &Document, text_key: &str) -> Map<String, Value> {
    let mut metadata: Map<String, Value> = doc
        .metadata
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    metadata.insert(text_key.to_string(), Value::String(doc.content.clone()));
    metadata
}

/// Turns a query match back into a document.
///
/// Reference records loaded without a text field keep their content empty
/// unless `require_text` is set.
pub(crate) fn document_from(
    hit: Match,
    text_key: &str,
    require_text: bool,
) -> Result<(Document, f32), PineconeStoreError> {
    let Match { id, score, metadata } = hit;
    let mut metadata = metadata.unwrap_or_default();
    let content = match metadata.remove(text_key) {
        Some(Value::String(text)) => text,
        Some(_) | None if require_text => {
            return Err(PineconeStoreError::MissingTextKey(text_key.to_string()))
        }
        Some(other) => {
            metadata.insert(text_key.to_string(), other);
            String::new()
        }
        None => String::new(),
    };

    let document = Document {
        id,
        content,
        metadata: metadata.into_iter().collect(),
        embedding: None,
    };
    Ok((document, score))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn hit(metadata: Value) -> Match {
        serde_json::from_value(json!({"id": "industry-1", "score": 0.7, "metadata": metadata}))
            .unwrap()
    }

    #[test]
    fn text_moves_between_content_and_metadata() {
        let doc = Document::new("industry-1", "KRX 업종명: 반도체").with_metadata("name", "반도체");
        let metadata = metadata_for(&doc, "text");
        assert_eq!(metadata["text"], json!("KRX 업종명: 반도체"));

        let (back, score) = document_from(hit(Value::Object(metadata)), "text", true).unwrap();
        assert_eq!(back.content, "KRX 업종명: 반도체");
        assert!(!back.metadata.contains_key("text"));
        assert_eq!(back.metadata["name"], json!("반도체"));
        assert!((score - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_text_depends_on_requirement() {
        assert!(matches!(
            document_from(hit(json!({"name": "은행"})), "text", true),
            Err(PineconeStoreError::MissingTextKey(key)) if key == "text"
        ));
        let (doc, _) = document_from(hit(json!({"text": 3})), "text", false).unwrap();
        assert_eq!(doc.content, "");
        assert_eq!(doc.metadata["text"], json!(3));
    }
}
