#![allow(dead_code)]

use serde_json::{json, Value};
use shared_types::StoreDocument;

/// Portable Text block with one unmarked span
pub fn block(key: &str, text: &str) -> Value {
    json!({
        "_type": "block",
        "_key": key,
        "style": "normal",
        "markDefs": [],
        "children": [
            { "_type": "span", "_key": format!("{}-0", key), "text": text, "marks": [] }
        ]
    })
}

pub fn image(key: &str) -> Value {
    json!({
        "_type": "image",
        "_key": key,
        "asset": { "_ref": "image-abc-800x600-jpg", "_type": "reference" }
    })
}

pub fn document(id: &str, slug: &str, body: Vec<Value>) -> StoreDocument {
    StoreDocument {
        id: id.to_string(),
        title: Some(format!("Post {}", id)),
        slug: Some(slug.to_string()),
        body: Value::Array(body),
    }
}
