use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::{Artifact, ArtifactKind};
use crate::error::ReferenceScanError;

const MANIFEST_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Enumerates the reusable artifacts of one category.
pub trait ArtifactSource: Send + Sync {
    fn artifacts(&self, kind: ArtifactKind) -> Result<Vec<Artifact>, ReferenceScanError>;
}

impl<S: ArtifactSource + ?Sized> ArtifactSource for &S {
    fn artifacts(&self, kind: ArtifactKind) -> Result<Vec<Artifact>, ReferenceScanError> {
        (**self).artifacts(kind)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

/// Artifact manifests laid out as `<root>/constraints`, `<root>/test_steps`
/// and `<root>/pages`, each holding `.json`/`.yaml` files with an
/// `artifacts` list.
#[derive(Debug, Clone)]
pub struct ManifestDirectory {
    root: PathBuf,
}

impl ManifestDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn manifest_paths(&self, kind: ArtifactKind) -> Result<Vec<PathBuf>, ReferenceScanError> {
        if !self.root.is_dir() {
            return Err(ReferenceScanError::source_not_found(&self.root));
        }

        let dir = self.root.join(kind.dir_name());
        if !dir.exists() {
            trace!(path = %dir.display(), "no manifests for {}", kind);
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|source| ReferenceScanError::DirectoryScanError {
                path: dir.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_manifest = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext));
            if is_manifest {
                paths.push(entry.into_path());
            } else {
                trace!(path = %entry.path().display(), "skipping non-manifest file");
            }
        }
        Ok(paths)
    }
}

impl ArtifactSource for ManifestDirectory {
    fn artifacts(&self, kind: ArtifactKind) -> Result<Vec<Artifact>, ReferenceScanError> {
        let mut artifacts = Vec::new();
        let paths = self.manifest_paths(kind)?;
        for path in &paths {
            artifacts.extend(load_manifest(path)?);
        }
        debug!(
            kind = kind.as_str(),
            manifests = paths.len(),
            artifacts = artifacts.len(),
            "scanned artifact manifests"
        );
        Ok(artifacts)
    }
}

/// Read one manifest file.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<Artifact>, ReferenceScanError> {
    let path = path.as_ref();
    trace!(path = %path.display(), "loading manifest");

    let content = fs::read_to_string(path)
        .map_err(|e| ReferenceScanError::manifest_read_error(path, e.to_string()))?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let manifest: ManifestFile = match extension {
        "json" => serde_json::from_str(&content)
            .map_err(|e| ReferenceScanError::manifest_parse_error(path, e.to_string()))?,
        "yaml" | "yml" => {
            // An empty YAML document deserializes as unit, not as a map.
            if content.trim().is_empty() {
                ManifestFile::default()
            } else {
                serde_yaml::from_str(&content)
                    .map_err(|e| ReferenceScanError::manifest_parse_error(path, e.to_string()))?
            }
        }
        _ => return Err(ReferenceScanError::unsupported_format(extension)),
    };
    Ok(manifest.artifacts)
}

/// Artifacts held in memory, for embedding callers and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    artifacts: BTreeMap<ArtifactKind, Vec<Artifact>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ArtifactKind, artifact: Artifact) -> Self {
        self.add(kind, artifact);
        self
    }

    pub fn add(&mut self, kind: ArtifactKind, artifact: Artifact) {
        self.artifacts.entry(kind).or_default().push(artifact);
    }
}

impl ArtifactSource for InMemorySource {
    fn artifacts(&self, kind: ArtifactKind) -> Result<Vec<Artifact>, ReferenceScanError> {
        Ok(self.artifacts.get(&kind).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TestCaseId;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_manifest_directory_reads_nested_files() {
        let temp_dir = TempDir::new().unwrap();
        write(
            temp_dir.path(),
            "constraints/Magento/Cms/constraints.yaml",
            "artifacts:\n  - id: 'Magento\\Cms\\Test\\Constraint\\AssertPageSaved'\n    used_by:\n      - 'Magento\\Widget\\Test\\TestCase\\CreateWidgetTest'\n",
        );
        write(
            temp_dir.path(),
            "constraints/sales.json",
            r#"{"artifacts": [{"id": "Magento\\Sales\\Test\\Constraint\\AssertOrderTotal"}]}"#,
        );
        write(temp_dir.path(), "constraints/README.md", "not a manifest");

        let source = ManifestDirectory::new(temp_dir.path());
        let artifacts = source.artifacts(ArtifactKind::Constraint).unwrap();

        assert_eq!(artifacts.len(), 2);
        let cms = artifacts
            .iter()
            .find(|a| a.id.as_str().contains("AssertPageSaved"))
            .unwrap();
        assert_eq!(
            cms.used_by,
            vec![TestCaseId::new("Magento\\Widget\\Test\\TestCase\\CreateWidgetTest")]
        );
    }

    #[test]
    fn test_manifest_directory_missing_kind_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let source = ManifestDirectory::new(temp_dir.path());
        assert!(source.artifacts(ArtifactKind::Page).unwrap().is_empty());
    }

    #[test]
    fn test_manifest_directory_missing_root() {
        let source = ManifestDirectory::new("/nonexistent/artifacts");
        assert!(matches!(
            source.artifacts(ArtifactKind::TestStep),
            Err(ReferenceScanError::SourceNotFound { .. })
        ));
    }

    #[test]
    fn test_manifest_directory_malformed_manifest() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "pages/broken.json", "{\"artifacts\": [");

        let source = ManifestDirectory::new(temp_dir.path());
        assert!(matches!(
            source.artifacts(ArtifactKind::Page),
            Err(ReferenceScanError::ManifestParseError { .. })
        ));
    }

    #[test]
    fn test_load_manifest_empty_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "empty.yaml", "");
        assert!(load_manifest(temp_dir.path().join("empty.yaml"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_load_manifest_unsupported_format() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "steps.xml", "<steps/>");
        assert!(matches!(
            load_manifest(temp_dir.path().join("steps.xml")),
            Err(ReferenceScanError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_in_memory_source() {
        let source = InMemorySource::new().with(
            ArtifactKind::TestStep,
            Artifact::new("Magento\\Customer\\Test\\TestStep\\LoginCustomerStep"),
        );
        assert_eq!(source.artifacts(ArtifactKind::TestStep).unwrap().len(), 1);
        assert!(source.artifacts(ArtifactKind::Page).unwrap().is_empty());
    }
}
