//! Module Filter Index.
//!
//! Runs the three reference checkers over the configured target modules and
//! unions their answers into the affected set, once per session.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tracing::{debug, trace};

use crate::catalog::TestCaseId;
use crate::config::ModuleFilterConfig;
use crate::error::ReferenceScanError;
use crate::reference::{
    ArtifactSource, ConstraintChecker, PageChecker, ReferenceChecker, TestStepChecker,
};

/// Test cases implicated by the target modules through cross-module references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AffectedSet(BTreeSet<TestCaseId>);

impl AffectedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &TestCaseId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestCaseId> {
        self.0.iter()
    }

    pub fn merge(&mut self, test_cases: BTreeSet<TestCaseId>) {
        self.0.extend(test_cases);
    }

    pub fn is_subset(&self, other: &AffectedSet) -> bool {
        self.0.is_subset(&other.0)
    }
}

impl FromIterator<TestCaseId> for AffectedSet {
    fn from_iter<I: IntoIterator<Item = TestCaseId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Compute the affected set for `config`.
///
/// Strict mode and an empty target set short-circuit to the empty set without
/// touching `source`. Any scan failure aborts the whole computation.
pub fn compute_affected_test_cases<S: ArtifactSource + ?Sized>(
    config: &ModuleFilterConfig,
    source: &S,
) -> Result<AffectedSet, ReferenceScanError> {
    if config.is_strict() || config.is_empty() {
        debug!(
            strict = config.is_strict(),
            "skipping cross-module reference scan"
        );
        return Ok(AffectedSet::new());
    }

    let constraint = ConstraintChecker::scan(&source)?;
    let test_step = TestStepChecker::scan(&source)?;
    let page = PageChecker::scan(&source, &constraint, config.target_modules())?;

    let checkers: [&dyn ReferenceChecker; 3] = [&constraint, &test_step, &page];
    let mut affected = AffectedSet::new();
    for checker in checkers {
        for module in config.target_modules() {
            let references = checker.references_for_module(module);
            trace!(
                checker = checker.kind().as_str(),
                %module,
                count = references.len(),
                "cross-module references"
            );
            affected.merge(references);
        }
    }

    debug!(count = affected.len(), "computed affected test cases");
    Ok(affected)
}

/// Memoizing wrapper around [`compute_affected_test_cases`].
///
/// Queries take `&self`, so one index can serve concurrent readers. A failed
/// scan is not cached; the next query scans again.
pub struct ModuleFilterIndex<'a> {
    config: &'a ModuleFilterConfig,
    source: &'a dyn ArtifactSource,
    affected: OnceLock<AffectedSet>,
}

impl<'a> ModuleFilterIndex<'a> {
    pub fn new(config: &'a ModuleFilterConfig, source: &'a dyn ArtifactSource) -> Self {
        Self {
            config,
            source,
            affected: OnceLock::new(),
        }
    }

    /// The affected set, computed on first use.
    pub fn affected_test_cases(&self) -> Result<&AffectedSet, ReferenceScanError> {
        if let Some(affected) = self.affected.get() {
            return Ok(affected);
        }
        let computed = compute_affected_test_cases(self.config, self.source)?;
        Ok(self.affected.get_or_init(|| computed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{Artifact, ArtifactKind, InMemorySource};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        inner: InMemorySource,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ArtifactSource for CountingSource {
        fn artifacts(&self, kind: ArtifactKind) -> Result<Vec<Artifact>, ReferenceScanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.artifacts(kind)
        }
    }

    fn counting(inner: InMemorySource) -> CountingSource {
        CountingSource {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn sample() -> InMemorySource {
        InMemorySource::new()
            .with(
                ArtifactKind::Constraint,
                Artifact::new("Acme\\Catalog\\Test\\Constraint\\AssertPrice")
                    .used_by(["Acme\\Sales\\Test\\TestCase\\OrderTest"]),
            )
            .with(
                ArtifactKind::TestStep,
                Artifact::new("Acme\\Catalog\\Test\\TestStep\\CreateProductStep")
                    .used_by(["Acme\\Cart\\Test\\TestCase\\CartTest"]),
            )
    }

    #[test]
    fn test_strict_skips_scan() {
        let source = counting(sample());
        let config = ModuleFilterConfig::new(["Acme_Catalog"], true);

        let affected = compute_affected_test_cases(&config, &source).unwrap();
        assert!(affected.is_empty());
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn test_empty_targets_skip_scan() {
        let source = counting(sample());
        let config = ModuleFilterConfig::default();

        assert!(compute_affected_test_cases(&config, &source)
            .unwrap()
            .is_empty());
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn test_unions_checkers() {
        let config = ModuleFilterConfig::new(["Acme_Catalog"], false);
        let affected = compute_affected_test_cases(&config, &sample()).unwrap();

        assert_eq!(affected.len(), 2);
        assert!(affected.contains(&TestCaseId::new("Acme\\Sales\\Test\\TestCase\\OrderTest")));
        assert!(affected.contains(&TestCaseId::new("Acme\\Cart\\Test\\TestCase\\CartTest")));
    }

    #[test]
    fn test_module_without_references_contributes_nothing() {
        let config = ModuleFilterConfig::new(["Acme_Cms"], false);
        assert!(compute_affected_test_cases(&config, &sample())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_index_memoizes() {
        let source = counting(sample());
        let config = ModuleFilterConfig::new(["Acme_Catalog"], false);
        let index = ModuleFilterIndex::new(&config, &source);

        let first = index.affected_test_cases().unwrap().clone();
        let calls = source.calls();
        let second = index.affected_test_cases().unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(calls, ArtifactKind::ALL.len());
        assert_eq!(source.calls(), calls);
    }

    #[test]
    fn test_index_shared_across_threads() {
        let source = counting(sample());
        let config = ModuleFilterConfig::new(["Acme_Catalog"], false);
        let index = ModuleFilterIndex::new(&config, &source);
        let expected = index.affected_test_cases().unwrap().clone();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| index.affected_test_cases().unwrap().len()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected.len());
            }
        });
        assert_eq!(source.calls(), ArtifactKind::ALL.len());
    }

    #[test]
    fn test_affected_set_matches_either_spelling() {
        let affected: AffectedSet = [TestCaseId::new("Acme\\Sales\\Test\\TestCase\\OrderTest")]
            .into_iter()
            .collect();
        assert!(affected.contains(&TestCaseId::new("\\Acme\\Sales\\Test\\TestCase\\OrderTest")));
    }

    #[test]
    fn test_scan_error_is_fatal() {
        let source = InMemorySource::new().with(ArtifactKind::TestStep, Artifact::new("LooseStep"));
        let config = ModuleFilterConfig::new(["Acme_Catalog"], false);
        let index = ModuleFilterIndex::new(&config, &source);

        assert!(index.affected_test_cases().is_err());
    }
}
