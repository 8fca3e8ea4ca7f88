//! Converters and the pipeline that runs them.
//!
//! A converter owns exactly one destination collection and is handed
//! explicit source/store handles for the duration of one run.
//! Converters are independent: none reads another's output, so the
//! registry order is a convention, not a dependency.

pub mod map;
pub mod market;
pub mod regions;
pub mod shape;
pub mod systems;
pub mod types;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::bail;
use serde_json::{Map, Value};

use crate::error::{ConvertError, PipelineError};
use crate::sink::DocumentStore;
use crate::source::SdeSource;
use crate::ui::{Phase, Ui};

pub use map::{MapConstellationsConverter, MapRegionsConverter, MapSystemsConverter};
pub use regions::RegionConverter;
pub use systems::SolarsystemConverter;
pub use types::TypeConverter;

/// External cancellation signal, checked between converters and between
/// rows of the map assembly pass.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-run state handed to each converter.
pub struct RunContext<'a> {
    pub ui: &'a mut dyn Ui,
    pub cancel: &'a CancelToken,
}

impl RunContext<'_> {
    /// Fail with `Canceled` if the cancellation signal is set.
    pub fn checkpoint(&self) -> Result<(), ConvertError> {
        if self.cancel.is_canceled() {
            Err(ConvertError::Canceled)
        } else {
            Ok(())
        }
    }
}

pub trait Converter {
    /// Converter name, used in filters and failure reports.
    fn name(&self) -> &'static str;

    /// The one destination collection this converter owns.
    fn collection(&self) -> &'static str;

    fn run(
        &self,
        source: &SdeSource,
        store: &mut dyn DocumentStore,
        ctx: &mut RunContext<'_>,
    ) -> Result<(), ConvertError>;
}

/// All converters, in registry order.
pub fn all_converters() -> Vec<Box<dyn Converter>> {
    vec![
        Box::new(TypeConverter),
        Box::new(SolarsystemConverter),
        Box::new(RegionConverter),
        Box::new(MapSystemsConverter),
        Box::new(MapConstellationsConverter),
        Box::new(MapRegionsConverter),
    ]
}

/// Resolve which converters to run based on include/exclude filters.
pub fn resolve_converters(
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
) -> anyhow::Result<Vec<Box<dyn Converter>>> {
    let all = all_converters();

    match (include, exclude) {
        (Some(_), Some(_)) => {
            bail!("Cannot use both --include and --exclude at the same time");
        }
        (Some(include_list), None) => {
            validate_names(&include_list)?;
            Ok(all
                .into_iter()
                .filter(|c| include_list.iter().any(|n| n == c.name()))
                .collect())
        }
        (None, Some(exclude_list)) => {
            validate_names(&exclude_list)?;
            Ok(all
                .into_iter()
                .filter(|c| !exclude_list.iter().any(|n| n == c.name()))
                .collect())
        }
        (None, None) => Ok(all),
    }
}

fn validate_names(names: &[String]) -> anyhow::Result<()> {
    let known: Vec<&'static str> = all_converters().iter().map(|c| c.name()).collect();
    for name in names {
        if !known.contains(&name.as_str()) {
            bail!("Unknown converter: {}", name);
        }
    }
    Ok(())
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    /// Destination collection name and document count, in run order.
    pub collections: Vec<(String, u64)>,
    pub total_documents: u64,
    pub elapsed: Duration,
}

/// Run the converters in order against one source and one store.
///
/// The destination is dropped wholesale before the first insert; a
/// converter failure stops the run immediately with the offending
/// converter named. A failed run leaves the destination incomplete by
/// design: re-running performs a full reload.
pub fn run_pipeline(
    source: &SdeSource,
    store: &mut dyn DocumentStore,
    converters: &[Box<dyn Converter>],
    ui: &mut dyn Ui,
    cancel: &CancelToken,
) -> Result<RunSummary, PipelineError> {
    let start = Instant::now();

    ui.set_phase(Phase::Clearing);
    store.drop_all().map_err(PipelineError::Prepare)?;

    ui.set_phase(Phase::Converting);
    let mut collections = Vec::with_capacity(converters.len());
    let mut total_documents = 0u64;

    for converter in converters {
        if cancel.is_canceled() {
            return Err(PipelineError::Canceled);
        }

        let name = converter.name();
        {
            let mut ctx = RunContext {
                ui: &mut *ui,
                cancel,
            };
            converter
                .run(source, store, &mut ctx)
                .map_err(|err| match err {
                    ConvertError::Canceled => PipelineError::Canceled,
                    err => PipelineError::Converter { name, source: err },
                })?;
        }

        ui.clear_progress();
        let count = store
            .count(converter.collection())
            .map_err(|err| PipelineError::Converter { name, source: err })?;
        ui.log(&format!("{}: {} documents", converter.collection(), count));
        collections.push((converter.collection().to_string(), count));
        total_documents += count;
    }

    store.flush().map_err(PipelineError::Finalize)?;
    ui.set_phase(Phase::Complete);

    Ok(RunSummary {
        collections,
        total_documents,
        elapsed: start.elapsed(),
    })
}

/// Serialize a row struct into a JSON object map ready for extension.
pub(crate) fn to_object<T: serde::Serialize>(
    value: &T,
) -> Result<Map<String, Value>, ConvertError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_six_converters_in_order() {
        let names: Vec<_> = all_converters().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "types",
                "solarsystems",
                "regions",
                "map-systems",
                "map-constellations",
                "map-regions",
            ]
        );
    }

    #[test]
    fn include_filter_keeps_registry_order() {
        let converters = resolve_converters(
            Some(vec!["regions".to_string(), "types".to_string()]),
            None,
        )
        .unwrap();
        let names: Vec<_> = converters.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["types", "regions"]);
    }

    #[test]
    fn exclude_filter_removes_named_converters() {
        let converters =
            resolve_converters(None, Some(vec!["map-regions".to_string()])).unwrap();
        assert_eq!(converters.len(), 5);
        assert!(converters.iter().all(|c| c.name() != "map-regions"));
    }

    #[test]
    fn unknown_names_and_conflicting_filters_error() {
        assert!(resolve_converters(Some(vec!["nonexistent".to_string()]), None).is_err());
        assert!(resolve_converters(
            Some(vec!["types".to_string()]),
            Some(vec!["regions".to_string()])
        )
        .is_err());
    }

    #[test]
    fn cancel_token_trips_the_checkpoint() {
        let cancel = CancelToken::new();
        assert!(!cancel.is_canceled());
        cancel.cancel();
        assert!(cancel.is_canceled());
    }
}
