//! The `solarsystems` converter: each system with its owning
//! constellation and region embedded.

use serde_json::Value;

use super::{to_object, Converter, RunContext};
use crate::error::ConvertError;
use crate::sink::DocumentStore;
use crate::source::SdeSource;

pub struct SolarsystemConverter;

impl Converter for SolarsystemConverter {
    fn name(&self) -> &'static str {
        "solarsystems"
    }

    fn collection(&self) -> &'static str {
        "solarsystems"
    }

    fn run(
        &self,
        source: &SdeSource,
        store: &mut dyn DocumentStore,
        ctx: &mut RunContext<'_>,
    ) -> Result<(), ConvertError> {
        let bundles = source.solar_systems_with_parents()?;
        let total = bundles.len() as u64;

        for (i, bundle) in bundles.iter().enumerate() {
            ctx.ui.set_progress(i as u64, total, self.collection());
            ctx.ui.trace(&format!(
                "parsing solar system: {}",
                bundle.system.solar_system_name.as_deref().unwrap_or("<unnamed>")
            ));

            let mut doc = to_object(&bundle.system)?;
            doc.insert(
                "uniqueId".to_string(),
                Value::from(bundle.system.solar_system_id),
            );
            doc.insert(
                "Constellation".to_string(),
                serde_json::to_value(&bundle.constellation)?,
            );
            doc.insert("Region".to_string(), serde_json::to_value(&bundle.region)?);

            store.insert(self.collection(), &Value::Object(doc))?;
        }

        ctx.ui.set_progress(total, total, self.collection());
        Ok(())
    }
}
