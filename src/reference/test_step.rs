use std::collections::BTreeSet;
use tracing::debug;

use super::{ArtifactKind, ArtifactSource, ModuleIndex, ReferenceChecker};
use crate::catalog::TestCaseId;
use crate::error::ReferenceScanError;
use crate::resolver::ModuleName;

/// Test cases affected through reusable multi-action test steps.
#[derive(Debug, Default)]
pub struct TestStepChecker {
    index: ModuleIndex,
}

impl TestStepChecker {
    pub fn scan<S: ArtifactSource>(source: &S) -> Result<Self, ReferenceScanError> {
        let mut index = ModuleIndex::default();
        let steps = source.artifacts(ArtifactKind::TestStep)?;
        for step in &steps {
            index.insert(step.module(ArtifactKind::TestStep)?, &step.used_by);
        }
        debug!(
            steps = steps.len(),
            modules = index.module_count(),
            "indexed test steps"
        );
        Ok(Self { index })
    }
}

impl ReferenceChecker for TestStepChecker {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::TestStep
    }

    fn references_for_module(&self, module: &ModuleName) -> BTreeSet<TestCaseId> {
        self.index.get(module)
    }
}
