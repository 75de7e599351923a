//! Shared fixtures for selection tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use testscope_core::reference::{Artifact, ArtifactKind, InMemorySource};
use testscope_core::{Selection, TestCaseDescriptor};

pub const T1: &str = "Acme\\ModuleA\\Test\\TestCase\\T1";
pub const T2: &str = "Acme\\ModuleB\\Test\\TestCase\\T2";
pub const T3: &str = "Acme\\ModuleC\\Test\\TestCase\\T3";

pub fn catalog(ids: &[&str]) -> Vec<TestCaseDescriptor> {
    ids.iter().map(|id| TestCaseDescriptor::new(*id)).collect()
}

/// Identifiers of the selected test cases as spelled in the catalog, in order.
pub fn selected_ids(selection: &Selection) -> Vec<String> {
    selection.ids().map(|id| id.as_str().to_string()).collect()
}

pub fn spelled(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// T3 (module C) uses a constraint owned by module A.
pub fn scenario_source() -> InMemorySource {
    InMemorySource::new().with(
        ArtifactKind::Constraint,
        Artifact::new("Acme\\ModuleA\\Test\\Constraint\\AssertSaved").used_by([T3]),
    )
}

pub fn write_manifest(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}
