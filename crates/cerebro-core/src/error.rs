use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    NotFound = 1,
    Duplicate = 2,
    InvalidArguments = 3,
    Io = 4,
    Config = 5,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Section '{name}' already exists")]
    DuplicateSection { name: String },

    #[error("Section '{name}' not found")]
    SectionNotFound { name: String },

    #[error("invalid section name '{name}': {reason}")]
    InvalidSectionName { name: String, reason: &'static str },

    #[error("Template '{name}' not found")]
    TemplateNotFound { name: String },

    #[error("invalid template name '{name}'")]
    InvalidTemplateName { name: String },

    #[error("Failed to read template '{name}': {source}")]
    TemplateRead { name: String, source: io::Error },

    #[error("Failed to save template '{name}': {source}")]
    TemplateWrite { name: String, source: io::Error },

    #[error("Failed to list templates: {source}")]
    TemplateList { source: io::Error },

    #[error("Failed to create template directory '{}': {source}", .path.display())]
    DirectoryCreate { path: PathBuf, source: io::Error },

    #[error("Failed to read file '{}': {source}", .path.display())]
    DocumentRead { path: PathBuf, source: io::Error },

    #[error("Failed to write file '{}': {source}", .path.display())]
    DocumentWrite { path: PathBuf, source: io::Error },
}

impl CoreError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::SectionNotFound { .. } | Self::TemplateNotFound { .. } => ExitCode::NotFound,
            Self::DuplicateSection { .. } => ExitCode::Duplicate,
            Self::InvalidSectionName { .. } | Self::InvalidTemplateName { .. } => {
                ExitCode::InvalidArguments
            }
            Self::TemplateRead { .. }
            | Self::TemplateWrite { .. }
            | Self::TemplateList { .. }
            | Self::DirectoryCreate { .. }
            | Self::DocumentRead { .. }
            | Self::DocumentWrite { .. } => ExitCode::Io,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SectionNotFound { .. } | Self::TemplateNotFound { .. }
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
