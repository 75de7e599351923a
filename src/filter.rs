//! Test Selection Filter: the public entry point of the engine.

use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::catalog::{load_catalog, TestCaseDescriptor, TestCaseId};
use crate::config::ModuleFilterConfig;
use crate::error::{self, ReferenceScanError};
use crate::index::ModuleFilterIndex;
use crate::reference::ArtifactSource;

/// Counts describing one selection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionReport {
    pub total: usize,
    pub kept_by_module: usize,
    pub kept_by_reference: usize,
    pub dropped: usize,
    /// Identifiers that could not be attributed to any module.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<TestCaseId>,
}

impl SelectionReport {
    pub fn selected(&self) -> usize {
        self.kept_by_module + self.kept_by_reference
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub test_cases: Vec<TestCaseDescriptor>,
    pub report: SelectionReport,
}

impl Selection {
    pub fn ids(&self) -> impl Iterator<Item = &TestCaseId> {
        self.test_cases.iter().map(|t| &t.id)
    }
}

/// Why a test case survived the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Module,
    Reference,
    Drop,
}

pub struct TestSelectionFilter<'a> {
    config: &'a ModuleFilterConfig,
    index: ModuleFilterIndex<'a>,
}

impl<'a> TestSelectionFilter<'a> {
    pub fn new(config: &'a ModuleFilterConfig, source: &'a dyn ArtifactSource) -> Self {
        Self {
            config,
            index: ModuleFilterIndex::new(config, source),
        }
    }

    /// Keep the test cases owned by a target module or, outside strict mode,
    /// referenced from one. Catalog order is preserved.
    ///
    /// A test case whose identifier does not resolve to a module never matches
    /// a target module; it is kept only when it is in the affected set.
    /// Descriptors are returned as supplied, identifier spelling included.
    pub fn apply_filter<I>(&self, catalog: I) -> Result<Selection, ReferenceScanError>
    where
        I: IntoIterator<Item = TestCaseDescriptor>,
    {
        let config = self.config;
        let mut report = SelectionReport::default();

        if config.is_empty() {
            let test_cases: Vec<TestCaseDescriptor> = catalog.into_iter().collect();
            report.total = test_cases.len();
            report.kept_by_module = test_cases.len();
            return Ok(Selection { test_cases, report });
        }

        let strict = config.is_strict();
        let affected = self.index.affected_test_cases()?;

        let mut test_cases = Vec::new();
        for test_case in catalog {
            report.total += 1;

            let verdict = match test_case.module() {
                Ok(module) if config.contains(&module) => Verdict::Module,
                Ok(_) => Verdict::Drop,
                Err(e) => {
                    warn!(
                        test_case = %test_case.id,
                        error = %e,
                        "test case not attributable to a module"
                    );
                    report.unresolved.push(test_case.id.clone());
                    Verdict::Drop
                }
            };
            let verdict = match verdict {
                Verdict::Drop if !strict && affected.contains(&test_case.id) => Verdict::Reference,
                other => other,
            };

            match verdict {
                Verdict::Module => report.kept_by_module += 1,
                Verdict::Reference => report.kept_by_reference += 1,
                Verdict::Drop => {
                    report.dropped += 1;
                    continue;
                }
            }
            test_cases.push(test_case);
        }

        info!(
            total = report.total,
            selected = report.selected(),
            by_reference = report.kept_by_reference,
            dropped = report.dropped,
            "applied module filter"
        );
        Ok(Selection { test_cases, report })
    }
}

/// Load the catalog at `path` and select from it.
pub fn select_catalog_file<P: AsRef<Path>>(
    path: P,
    config: &ModuleFilterConfig,
    source: &dyn ArtifactSource,
) -> error::Result<Selection> {
    let catalog = load_catalog(path)?;
    let filter = TestSelectionFilter::new(config, source);
    Ok(filter.apply_filter(catalog)?)
}
