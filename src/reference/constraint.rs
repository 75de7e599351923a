use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::{ArtifactId, ArtifactKind, ArtifactSource, ModuleIndex, ReferenceChecker};
use crate::catalog::TestCaseId;
use crate::error::ReferenceScanError;
use crate::resolver::ModuleName;

/// Test cases affected through assertion/verification constraints.
#[derive(Debug, Default)]
pub struct ConstraintChecker {
    index: ModuleIndex,
    owners: BTreeMap<ArtifactId, ModuleName>,
}

impl ConstraintChecker {
    pub fn scan<S: ArtifactSource>(source: &S) -> Result<Self, ReferenceScanError> {
        let mut checker = Self::default();

        for constraint in source.artifacts(ArtifactKind::Constraint)? {
            let module = constraint.module(ArtifactKind::Constraint)?;
            checker.index.insert(module.clone(), &constraint.used_by);
            checker.owners.insert(constraint.id, module);
        }

        debug!(
            constraints = checker.owners.len(),
            modules = checker.index.module_count(),
            "indexed constraints"
        );
        Ok(checker)
    }

    /// Owning module of a constraint, used to couple pages to the modules of
    /// the constraints backing them.
    pub fn owner_of(&self, constraint: &ArtifactId) -> Option<&ModuleName> {
        self.owners.get(constraint)
    }
}

impl ReferenceChecker for ConstraintChecker {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Constraint
    }

    fn references_for_module(&self, module: &ModuleName) -> BTreeSet<TestCaseId> {
        self.index.get(module)
    }
}
