//! Decoding of fetched Leaflet documents.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{Block, Document, DOCUMENT_TYPE};

/// The `$type` discriminator of a record, read ahead of the full decode.
#[derive(Deserialize)]
struct RecordType {
    #[serde(rename = "$type")]
    type_name: Option<String>,
}

/// Decode a Leaflet document record from JSON.
///
/// Blocks of types this crate does not model decode as [`Block::Unknown`];
/// they only fail later, if they are rendered to markdown. The record's
/// `$type` must be `pub.leaflet.document`.
pub fn from_json(json: &str) -> Result<Document> {
    let record: RecordType = serde_json::from_str(json)?;
    if record.type_name.as_deref() != Some(DOCUMENT_TYPE) {
        return Err(Error::UnexpectedRecordType(record.type_name));
    }

    let document: Document = serde_json::from_str(json)?;
    log::debug!(
        "Decoded document {:?} with {} pages",
        document.title,
        document.page_count()
    );
    Ok(document)
}

/// Decode a bare JSON array of blocks.
pub fn blocks_from_json(json: &str) -> Result<Vec<Block>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_from_json_minimal() {
        let doc = from_json(
            r#"{"$type":"pub.leaflet.document","author":"did:plc:x","title":"T","pages":[]}"#,
        )
        .unwrap();
        assert_eq!(doc.title, "T");
        assert!(doc.is_empty());
        assert!(doc.is_draft());
    }

    #[test]
    fn test_from_json_invalid() {
        let err = from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_from_json_wrong_record_type() {
        let err = from_json(r#"{"$type":"something.else","author":"a","title":"t"}"#).unwrap_err();
        assert!(matches!(err, Error::UnexpectedRecordType(Some(ref t)) if t == "something.else"));

        let err = from_json(r#"{"author":"a","title":"t"}"#).unwrap_err();
        assert!(matches!(err, Error::UnexpectedRecordType(None)));
    }

    #[test]
    fn test_blocks_from_json() {
        let blocks = blocks_from_json(
            r#"[{"$type":"pub.leaflet.blocks.header","level":2,"plaintext":"Hi"},
                {"$type":"pub.leaflet.blocks.text","plaintext":"there"}]"#,
        )
        .unwrap();
        assert_eq!(blocks, vec![Block::header(2, "Hi"), Block::text("there")]);
    }
}
