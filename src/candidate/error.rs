use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("no resumes could be processed ({submitted} submitted)")]
    EmptyBatch { submitted: usize },
}
