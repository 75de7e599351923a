use anyhow::Result;
use serde::Serialize;

use crate::catalog::{TestCaseDescriptor, TestCaseId};
use crate::cli::OutputFormat;
use crate::config::ModuleFilterConfig;
use crate::filter::Selection;
use crate::resolver::ModuleName;

#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    pub total: usize,
    pub selected: usize,
    pub kept_by_module: usize,
    pub kept_by_reference: usize,
    pub dropped: usize,
    pub strict: bool,
    pub target_modules: &'a [ModuleName],
    #[serde(skip_serializing_if = "is_empty")]
    pub unresolved: &'a [TestCaseId],
    pub test_cases: &'a [TestCaseDescriptor],
}

fn is_empty(ids: &&[TestCaseId]) -> bool {
    ids.is_empty()
}

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format(
        selection: &Selection,
        config: &ModuleFilterConfig,
        format: OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Json => {
                let output = Self::build_output(selection, config);
                Ok(serde_json::to_string_pretty(&output)?)
            }
            OutputFormat::List => Ok(Self::build_list(selection)),
        }
    }

    pub fn build_output<'a>(
        selection: &'a Selection,
        config: &'a ModuleFilterConfig,
    ) -> JsonOutput<'a> {
        let report = &selection.report;
        JsonOutput {
            total: report.total,
            selected: report.selected(),
            kept_by_module: report.kept_by_module,
            kept_by_reference: report.kept_by_reference,
            dropped: report.dropped,
            strict: config.is_strict(),
            target_modules: config.target_modules(),
            unresolved: &report.unresolved,
            test_cases: &selection.test_cases,
        }
    }

    /// One identifier per line, in selection order.
    pub fn build_list(selection: &Selection) -> String {
        let mut out = String::new();
        for id in selection.ids() {
            out.push_str(id.as_str());
            out.push('\n');
        }
        out
    }
}
