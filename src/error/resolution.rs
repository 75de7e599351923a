use thiserror::Error;

/// An identifier that does not follow the `\Vendor\Module\...\Class` convention.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("empty identifier")]
    Empty,

    #[error("identifier '{identifier}' has no module-qualifying prefix (expected \\Vendor\\Module\\...\\Class)")]
    MissingModulePrefix { identifier: String },

    #[error("identifier '{identifier}' contains an empty namespace segment")]
    EmptySegment { identifier: String },
}

impl ResolutionError {
    pub fn missing_module_prefix(identifier: impl Into<String>) -> Self {
        Self::MissingModulePrefix {
            identifier: identifier.into(),
        }
    }

    pub fn empty_segment(identifier: impl Into<String>) -> Self {
        Self::EmptySegment {
            identifier: identifier.into(),
        }
    }
}
