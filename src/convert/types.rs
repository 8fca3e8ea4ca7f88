//! The `types` converter: classify every type row and dispatch to its
//! shaper.

use super::shape::TypeDetails;
use super::{market, shape, Converter, RunContext};
use crate::error::ConvertError;
use crate::sink::DocumentStore;
use crate::source::SdeSource;
use crate::taxonomy::Variant;

pub struct TypeConverter;

impl Converter for TypeConverter {
    fn name(&self) -> &'static str {
        "types"
    }

    fn collection(&self) -> &'static str {
        "types"
    }

    fn run(
        &self,
        source: &SdeSource,
        store: &mut dyn DocumentStore,
        ctx: &mut RunContext<'_>,
    ) -> Result<(), ConvertError> {
        let bundles = source.types_with_taxonomy()?;
        let total = bundles.len() as u64;

        for (i, bundle) in bundles.iter().enumerate() {
            ctx.ui.set_progress(i as u64, total, self.collection());

            let type_row = &bundle.type_row;
            let variant = Variant::classify(bundle.category.category_id, type_row.group_id);
            let type_name = type_row.type_name.as_deref().unwrap_or("<unnamed>");
            match variant {
                Variant::Unknown => ctx.ui.trace(&format!(
                    "no dedicated shaper for category {} group {}; shaping '{}' generically",
                    bundle.category.category_id, type_row.group_id, type_name
                )),
                _ => ctx.ui.trace(&format!("parsing {}: {}", variant, type_name)),
            }

            let details = TypeDetails {
                attributes: source.attributes_for(type_row.type_id)?,
                effects: source.effects_for(type_row.type_id)?,
                market_group: market::ancestry(source, type_row.market_group_id)?,
            };

            let document = match variant {
                Variant::Ship => shape::ship(bundle, &details)?,
                Variant::Module => shape::module(bundle, &details)?,
                // Celestial kinds have no dedicated shaper; they take
                // the generic path together with everything unknown.
                Variant::Celestial(_) | Variant::Unknown => shape::unknown(bundle, &details)?,
            };

            store.insert(self.collection(), &document)?;
        }

        ctx.ui.set_progress(total, total, self.collection());
        Ok(())
    }
}
