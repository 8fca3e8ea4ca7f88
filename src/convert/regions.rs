//! The `regions` converter: each region with its child constellation
//! and system rows embedded as flat lists.

use serde_json::Value;

use super::{to_object, Converter, RunContext};
use crate::error::ConvertError;
use crate::sink::DocumentStore;
use crate::source::SdeSource;

pub struct RegionConverter;

impl Converter for RegionConverter {
    fn name(&self) -> &'static str {
        "regions"
    }

    fn collection(&self) -> &'static str {
        "regions"
    }

    fn run(
        &self,
        source: &SdeSource,
        store: &mut dyn DocumentStore,
        ctx: &mut RunContext<'_>,
    ) -> Result<(), ConvertError> {
        let regions = source.map_regions()?;
        let constellations = source.map_constellations()?;
        let systems = source.map_solar_systems()?;
        let total = regions.len() as u64;

        for (i, region) in regions.iter().enumerate() {
            ctx.ui.set_progress(i as u64, total, self.collection());
            ctx.ui.trace(&format!(
                "parsing region: {}",
                region.region_name.as_deref().unwrap_or("<unnamed>")
            ));

            let child_constellations: Vec<_> = constellations
                .iter()
                .filter(|c| c.region_id == region.region_id)
                .collect();
            let child_systems: Vec<_> = systems
                .iter()
                .filter(|s| s.region_id == region.region_id)
                .collect();

            let mut doc = to_object(region)?;
            doc.insert("uniqueId".to_string(), Value::from(region.region_id));
            doc.insert(
                "Constellations".to_string(),
                serde_json::to_value(&child_constellations)?,
            );
            doc.insert(
                "Solarsystems".to_string(),
                serde_json::to_value(&child_systems)?,
            );

            store.insert(self.collection(), &Value::Object(doc))?;
        }

        ctx.ui.set_progress(total, total, self.collection());
        Ok(())
    }
}
