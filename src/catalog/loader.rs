use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

use super::TestCaseDescriptor;
use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<TestCaseDescriptor>),
    Document { test_cases: Vec<TestCaseDescriptor> },
}

impl CatalogFile {
    fn into_descriptors(self) -> Vec<TestCaseDescriptor> {
        match self {
            Self::List(descriptors) | Self::Document { test_cases: descriptors } => descriptors,
        }
    }
}

/// Load a catalog from a JSON or YAML file, keeping file order.
///
/// Accepts either a bare sequence of descriptors or a document with a
/// `test_cases` sequence.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<TestCaseDescriptor>, CatalogError> {
    let path = path.as_ref();
    trace!(path = %path.display(), "loading catalog");

    let content =
        fs::read_to_string(path).map_err(|e| CatalogError::read_error(path, e.to_string()))?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let file: CatalogFile = match extension {
        "json" => serde_json::from_str(&content)
            .map_err(|e| CatalogError::parse_error(path, e.to_string()))?,
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .map_err(|e| CatalogError::parse_error(path, e.to_string()))?,
        _ => return Err(CatalogError::unsupported_format(extension)),
    };

    let descriptors = file.into_descriptors();
    debug!(count = descriptors.len(), "loaded catalog");
    Ok(descriptors)
}
