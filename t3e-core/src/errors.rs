use thiserror::Error;

#[derive(Error, Debug)]
pub enum T3eError {
    #[error("Malformed record in {source_name} at line {line}: {reason}")]
    FormatError {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("Species not defined correctly: {name}. Supported species: {supported}")]
    UnknownSpeciesError { name: String, supported: String },

    #[error("Unknown chromosome: {0}")]
    UnknownChromosomeError(String),

    #[error("Read length must be at least 1 bp, got {0}")]
    ReadLengthError(u32),

    #[error("Background distribution for {0} has no support points")]
    EmptyDistributionError(String),

    #[error(
        "No control read starts within {read_len} bp upstream of drawn position {position} on {chrom}. Background and control reads do not match"
    )]
    EmptyCandidateError {
        chrom: String,
        position: i64,
        read_len: u32,
    },

    #[error("Weighted selection failed: {0}")]
    SamplingError(String),

    #[error("Can't read file {path}: {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build worker pool: {0}")]
    WorkerPoolError(String),

    #[error("Run cancelled before iteration {0}")]
    Cancelled(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl T3eError {
    pub fn format(source_name: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        T3eError::FormatError {
            source_name: source_name.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Result type alias for t3e operations.
pub type Result<T> = std::result::Result<T, T3eError>;
