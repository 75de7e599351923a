//! Cross-module reference checkers.
//!
//! Each checker scans one category of reusable artifact (constraints, test
//! steps, pages) and answers which test cases would be affected if a given
//! module changed. Checkers build their index once, at construction.

mod constraint;
mod page;
mod source;
mod test_step;

pub use constraint::ConstraintChecker;
pub use page::PageChecker;
pub use source::{load_manifest, ArtifactSource, InMemorySource, ManifestDirectory};
pub use test_step::TestStepChecker;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::catalog::TestCaseId;
use crate::error::ReferenceScanError;
use crate::resolver::{self, ModuleName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArtifactKind {
    Constraint,
    TestStep,
    Page,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [Self::Constraint, Self::TestStep, Self::Page];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constraint => "constraint",
            Self::TestStep => "test step",
            Self::Page => "page",
        }
    }

    /// Sub-directory holding manifests of this kind.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Constraint => "constraints",
            Self::TestStep => "test_steps",
            Self::Page => "pages",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical artifact identifier, normalized like [`TestCaseId`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn new(identifier: impl AsRef<str>) -> Self {
        Self(resolver::canonical_identifier(identifier.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ArtifactId {
    fn from(identifier: String) -> Self {
        Self::new(identifier)
    }
}

impl From<&str> for ArtifactId {
    fn from(identifier: &str) -> Self {
        Self::new(identifier)
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.0
    }
}

/// A reusable artifact and the test cases that use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    #[serde(default)]
    pub used_by: Vec<TestCaseId>,
    /// Constraints backing a page. Ignored for other kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ArtifactId>,
}

impl Artifact {
    pub fn new(id: impl Into<ArtifactId>) -> Self {
        Self {
            id: id.into(),
            used_by: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn used_by<I, T>(mut self, test_cases: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TestCaseId>,
    {
        self.used_by.extend(test_cases.into_iter().map(Into::into));
        self
    }

    pub fn backed_by<I, T>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ArtifactId>,
    {
        self.constraints
            .extend(constraints.into_iter().map(Into::into));
        self
    }

    /// Owning module; an artifact outside the naming convention is a scan error.
    pub fn module(&self, kind: ArtifactKind) -> Result<ModuleName, ReferenceScanError> {
        resolver::resolve(self.id.as_str()).map_err(|e| {
            ReferenceScanError::unresolvable_artifact(kind.as_str(), self.id.as_str(), e)
        })
    }
}

/// Capability shared by the three checker variants.
pub trait ReferenceChecker: Send + Sync {
    fn kind(&self) -> ArtifactKind;

    /// Every test case affected if `module` changed, per this checker's artifacts.
    fn references_for_module(&self, module: &ModuleName) -> BTreeSet<TestCaseId>;
}

/// module -> test cases using an artifact of that module.
#[derive(Debug, Default)]
pub(crate) struct ModuleIndex {
    entries: BTreeMap<ModuleName, BTreeSet<TestCaseId>>,
}

impl ModuleIndex {
    pub(crate) fn insert<'a, I>(&mut self, module: ModuleName, test_cases: I)
    where
        I: IntoIterator<Item = &'a TestCaseId>,
    {
        self.entries
            .entry(module)
            .or_default()
            .extend(test_cases.into_iter().cloned());
    }

    pub(crate) fn get(&self, module: &ModuleName) -> BTreeSet<TestCaseId> {
        self.entries.get(module).cloned().unwrap_or_default()
    }

    pub(crate) fn module_count(&self) -> usize {
        self.entries.len()
    }
}
