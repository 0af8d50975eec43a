use std::io;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};

pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Resolves `tokenizer.json` from a model directory or an explicit file path.
pub fn tokenizer_path(model_path: &Path) -> io::Result<PathBuf> {
    if model_path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new(TOKENIZER_FILE))
    {
        Ok(model_path.to_path_buf())
    } else if model_path.is_dir() {
        Ok(model_path.join(TOKENIZER_FILE))
    } else {
        Ok(model_path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Model path has no parent"))?
            .join(TOKENIZER_FILE))
    }
}

/// Loads a tokenizer that truncates inputs to `max_len` tokens.
///
/// Both BERT models have a fixed position table, so longer resumes are cut rather than
/// rejected.
pub fn load_tokenizer(model_path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer = Tokenizer::from_file(tokenizer_path(model_path)?).map_err(io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    Ok(tokenizer)
}

/// Returns the first required model file missing from `model_dir`.
pub fn missing_model_file(model_dir: &Path) -> Option<&'static str> {
    [
        super::bert::CONFIG_FILE,
        super::bert::WEIGHTS_FILE,
        TOKENIZER_FILE,
    ]
    .into_iter()
    .find(|file| !model_dir.join(file).exists())
}
