pub mod cli;
pub mod convert;
pub mod error;
pub mod sink;
pub mod source;
pub mod taxonomy;
pub mod ui;

pub use cli::{Cli, Commands};
pub use convert::{
    all_converters, resolve_converters, run_pipeline, CancelToken, Converter, RunContext,
    RunSummary,
};
pub use error::{ConvertError, PipelineError};
pub use sink::{Document, DocumentStore, JsonlStore, MemoryStore};
pub use source::SdeSource;
pub use taxonomy::{CelestialKind, Variant};
pub use ui::{ConsoleUi, Phase, SilentUi, Ui};
