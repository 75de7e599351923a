use std::collections::BTreeSet;
use tracing::{debug, trace};

use super::{ArtifactKind, ArtifactSource, ConstraintChecker, ModuleIndex, ReferenceChecker};
use crate::catalog::TestCaseId;
use crate::error::ReferenceScanError;
use crate::resolver::ModuleName;

/// Test cases affected through page abstractions.
///
/// A page's users are affected by changes to the page's own module and by
/// changes to the module of any constraint backing the page. The second
/// relation is skipped for pages owned by a target module, since their users
/// are already reached through the page's own module.
#[derive(Debug, Default)]
pub struct PageChecker {
    direct: ModuleIndex,
    coupled: ModuleIndex,
}

impl PageChecker {
    pub fn scan<S: ArtifactSource>(
        source: &S,
        constraints: &ConstraintChecker,
        modules: &[ModuleName],
    ) -> Result<Self, ReferenceScanError> {
        let mut direct = ModuleIndex::default();
        let mut coupled = ModuleIndex::default();

        let pages = source.artifacts(ArtifactKind::Page)?;
        for page in &pages {
            let owner = page.module(ArtifactKind::Page)?;

            let mut backing_modules = BTreeSet::new();
            for constraint in &page.constraints {
                let module = constraints.owner_of(constraint).ok_or_else(|| {
                    ReferenceScanError::unknown_constraint(page.id.as_str(), constraint.as_str())
                })?;
                backing_modules.insert(module.clone());
            }

            if !modules.contains(&owner) {
                for module in backing_modules {
                    if module != owner {
                        trace!(page = %page.id, %module, "page coupled to constraint module");
                        coupled.insert(module, &page.used_by);
                    }
                }
            }
            direct.insert(owner, &page.used_by);
        }

        debug!(
            pages = pages.len(),
            modules = direct.module_count(),
            coupled_modules = coupled.module_count(),
            "indexed pages"
        );
        Ok(Self { direct, coupled })
    }
}

impl ReferenceChecker for PageChecker {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Page
    }

    fn references_for_module(&self, module: &ModuleName) -> BTreeSet<TestCaseId> {
        let mut affected = self.direct.get(module);
        affected.extend(self.coupled.get(module));
        affected
    }
}
