use jstrip_class_file::ClassFileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Duplicate resource path: {0}")]
    DuplicatePath(String),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    ClassFile(#[from] ClassFileError),
}
