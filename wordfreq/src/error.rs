use std::io;
use std::path::PathBuf;

use polydict::DictError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot read input file '{}': {source}", path.display())]
    Input { path: PathBuf, source: io::Error },
    #[error("cannot write report: {0}")]
    Output(#[from] io::Error),
    #[error("invalid word pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Dictionary(#[from] DictError),
    #[error("a counting thread panicked while processing {0}")]
    Worker(String),
}
