pub mod check;
pub mod extract;
pub mod vocab;

use std::path::Path;
use threadmark_core::config::load_config;
use threadmark_core::vocab::builtin::default_vocabulary;
use threadmark_core::vocab::{load_vocabulary, Vocabulary};
use threadmark_core::{PipelineConfig, ThreadmarkError};

pub(crate) fn resolve_vocabulary(path: Option<&Path>) -> Result<Vocabulary, ThreadmarkError> {
    match path {
        Some(p) => load_vocabulary(p),
        None => default_vocabulary(),
    }
}

pub(crate) fn resolve_config(path: Option<&Path>) -> Result<PipelineConfig, ThreadmarkError> {
    match path {
        Some(p) => load_config(p),
        None => Ok(PipelineConfig::default()),
    }
}
