//! Module Resolver.
//!
//! Maps fully-qualified identifiers of the form `\Vendor\Module\...\Class` to the
//! owning module, named `Vendor_Module`. Test cases, constraints, test steps and
//! pages all share this convention.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ResolutionError;

/// Namespace separator used in identifiers.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Vendor, module, and at least one class segment.
const MIN_SEGMENTS: usize = 3;

/// Name of a module, e.g. `Magento_Catalog`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Canonical spelling of an identifier: trimmed, with exactly one leading separator.
pub fn canonical_identifier(identifier: &str) -> String {
    let trimmed = identifier.trim();
    let bare = trimmed
        .strip_prefix(NAMESPACE_SEPARATOR)
        .unwrap_or(trimmed);
    format!("{NAMESPACE_SEPARATOR}{bare}")
}

/// Resolve the module owning `identifier`.
///
/// A leading separator is optional. Fails when fewer than three namespace
/// segments are present or when any segment is empty.
pub fn resolve(identifier: &str) -> Result<ModuleName, ResolutionError> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() {
        return Err(ResolutionError::Empty);
    }

    let path = trimmed
        .strip_prefix(NAMESPACE_SEPARATOR)
        .unwrap_or(trimmed);
    let segments: Vec<&str> = path.split(NAMESPACE_SEPARATOR).collect();

    if segments.len() < MIN_SEGMENTS {
        return Err(ResolutionError::missing_module_prefix(identifier));
    }
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ResolutionError::empty_segment(identifier));
    }

    Ok(ModuleName(format!("{}_{}", segments[0], segments[1])))
}
