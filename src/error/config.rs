use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("invalid value for {setting}: '{value}' (expected true/false, 1/0, yes/no or on/off)")]
    InvalidStrictFlag { setting: String, value: String },

    #[error("environment variable {name} is not valid unicode")]
    NotUnicode { name: String },

    #[error("failed to read config file '{path}': {message}")]
    FileReadError { path: PathBuf, message: String },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("unsupported config format: {format} (expected json or yaml)")]
    UnsupportedFormat { format: String },

    #[error("cross-module expansion for modules [{modules}] needs an artifact source")]
    MissingArtifactSource { modules: String },
}

impl ConfigurationError {
    pub fn invalid_strict_flag(setting: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidStrictFlag {
            setting: setting.into(),
            value: value.into(),
        }
    }

    pub fn not_unicode(name: impl Into<String>) -> Self {
        Self::NotUnicode { name: name.into() }
    }

    pub fn file_read_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::FileReadError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn missing_artifact_source(modules: impl Into<String>) -> Self {
        Self::MissingArtifactSource {
            modules: modules.into(),
        }
    }
}
