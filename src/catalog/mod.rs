//! Test-case catalog supplied by test discovery.

mod loader;

pub use loader::load_catalog;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::ResolutionError;
use crate::resolver::{self, ModuleName};

/// Test-case identifier as spelled by test discovery.
///
/// The original spelling is what gets serialized back to the runner.
/// Equality, ordering and hashing go through the canonical form, which
/// always starts with exactly one namespace separator, so
/// `Vendor\Module\Test\X` and `\Vendor\Module\Test\X` compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TestCaseId {
    spelling: String,
    canonical: String,
}

impl TestCaseId {
    pub fn new(identifier: impl Into<String>) -> Self {
        let spelling = identifier.into();
        let canonical = resolver::canonical_identifier(&spelling);
        Self {
            spelling,
            canonical,
        }
    }

    /// The identifier exactly as it was supplied.
    pub fn as_str(&self) -> &str {
        &self.spelling
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn module(&self) -> Result<ModuleName, ResolutionError> {
        resolver::resolve(&self.canonical)
    }
}

impl PartialEq for TestCaseId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for TestCaseId {}

impl PartialOrd for TestCaseId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TestCaseId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl Hash for TestCaseId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for TestCaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling)
    }
}

impl From<String> for TestCaseId {
    fn from(identifier: String) -> Self {
        Self::new(identifier)
    }
}

impl From<&str> for TestCaseId {
    fn from(identifier: &str) -> Self {
        Self::new(identifier)
    }
}

impl From<TestCaseId> for String {
    fn from(id: TestCaseId) -> Self {
        id.spelling
    }
}

/// One entry of the catalog. Fields other than the identifier are carried
/// through untouched for the downstream runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseDescriptor {
    #[serde(rename = "class")]
    pub id: TestCaseId,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl TestCaseDescriptor {
    pub fn new(id: impl Into<TestCaseId>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Owning module, recomputed from the identifier on every call.
    pub fn module(&self) -> Result<ModuleName, ResolutionError> {
        self.id.module()
    }
}
