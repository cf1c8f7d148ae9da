//! Response schemas for structured generation output

use serde::Serialize;
use std::collections::BTreeMap;

/// Schema constraining a structured response, serialized in the
/// `{"type": "OBJECT", "properties": {...}}` form the generation API expects
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ResponseSchema {
    Object {
        properties: BTreeMap<String, ResponseSchema>,
    },
    Array {
        items: Box<ResponseSchema>,
    },
    String,
}

impl ResponseSchema {
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, ResponseSchema)>,
        K: Into<String>,
    {
        Self::Object {
            properties: properties.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn array_of(items: ResponseSchema) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }
}
