use thiserror::Error;

/// Errors raised while converting rows into documents.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The relational source could not be reached or queried at open time.
    #[error("relational source unavailable")]
    SourceUnavailable(#[source] rusqlite::Error),

    /// The document store could not be reached or prepared at open time.
    #[error("document store unavailable")]
    SinkUnavailable(#[source] std::io::Error),

    /// Market-group ancestry resolution exceeded the depth bound.
    /// Parent pointers are external data and may be cyclic.
    #[error("market group {market_group_id} ancestry exceeded depth {depth}; parent chain is likely cyclic")]
    CycleDetected { market_group_id: i64, depth: usize },

    /// A required single-valued join found zero or multiple matches.
    #[error("expected exactly one {relation} for {owner} {owner_id}, found {found}")]
    MissingRelation {
        relation: &'static str,
        owner: &'static str,
        owner_id: i64,
        found: usize,
    },

    /// The run was canceled through the external cancellation signal.
    #[error("conversion canceled")]
    Canceled,

    #[error("query failed")]
    Query(#[from] rusqlite::Error),

    #[error("document serialization failed")]
    Document(#[from] serde_json::Error),

    #[error("document store write failed")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the pipeline orchestrator.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Preparing the destination (the destructive clear) failed before
    /// any converter ran.
    #[error("failed to prepare document store")]
    Prepare(#[source] ConvertError),

    /// A converter failed; the run stops here, later converters never run.
    #[error("converter '{name}' failed")]
    Converter {
        name: &'static str,
        #[source]
        source: ConvertError,
    },

    /// Flushing buffered writes at the end of the run failed.
    #[error("failed to flush document store")]
    Finalize(#[source] ConvertError),

    #[error("conversion canceled")]
    Canceled,
}
