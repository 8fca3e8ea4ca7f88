//! Denormalization of the flat celestial-object table.
//!
//! `mapDenormalize` tags every celestial object with a group code. The
//! rows are partitioned into per-kind buckets, then reassembled into
//! self-contained documents: systems carry their star, orbiting bodies,
//! stations, and stargate jumps; constellations carry their region and
//! assembled systems; regions carry the full three-level tree. After
//! assembly no document needs an external id lookup.

use std::collections::HashMap;

use serde_json::Value;

use super::{to_object, Converter, RunContext};
use crate::error::ConvertError;
use crate::sink::{Document, DocumentStore};
use crate::source::rows::{CelestialRow, StargateLink};
use crate::source::SdeSource;
use crate::taxonomy::CelestialKind;

/// Celestial rows partitioned by kind.
#[derive(Debug, Default)]
pub struct CelestialBuckets {
    pub regions: Vec<CelestialRow>,
    pub constellations: Vec<CelestialRow>,
    pub systems: Vec<CelestialRow>,
    pub stars: Vec<CelestialRow>,
    pub planets: Vec<CelestialRow>,
    pub moons: Vec<CelestialRow>,
    pub belts: Vec<CelestialRow>,
    pub stargates: Vec<CelestialRow>,
    pub stations: Vec<CelestialRow>,
    pub anomalies: Vec<CelestialRow>,
}

impl CelestialBuckets {
    /// Partition rows by group kind. Returns the buckets and the number
    /// of rows whose group code was not recognized (those rows join no
    /// bucket).
    pub fn partition(rows: Vec<CelestialRow>) -> (Self, usize) {
        let mut buckets = Self::default();
        let mut dropped = 0usize;

        for row in rows {
            match CelestialKind::from_group(row.group_id) {
                Some(CelestialKind::Region) => buckets.regions.push(row),
                Some(CelestialKind::Constellation) => buckets.constellations.push(row),
                Some(CelestialKind::SolarSystem) => buckets.systems.push(row),
                Some(CelestialKind::Star) => buckets.stars.push(row),
                Some(CelestialKind::Planet) => buckets.planets.push(row),
                Some(CelestialKind::Moon) => buckets.moons.push(row),
                Some(CelestialKind::AsteroidBelt) => buckets.belts.push(row),
                Some(CelestialKind::Stargate) => buckets.stargates.push(row),
                Some(CelestialKind::Station) => buckets.stations.push(row),
                Some(CelestialKind::Anomaly) => buckets.anomalies.push(row),
                None => dropped += 1,
            }
        }

        (buckets, dropped)
    }
}

/// An assembled system document, tagged with the parent ids needed to
/// group it under its constellation and region.
struct AssembledSystem {
    constellation_id: Option<i64>,
    region_id: Option<i64>,
    document: Document,
}

/// Assembles self-contained map documents from partitioned rows.
pub struct MapAssembler<'a> {
    buckets: &'a CelestialBuckets,
    links: &'a [StargateLink],
}

impl<'a> MapAssembler<'a> {
    pub fn new(buckets: &'a CelestialBuckets, links: &'a [StargateLink]) -> Self {
        Self { buckets, links }
    }

    /// One self-contained document per system row.
    pub fn system_documents(
        &self,
        ctx: &mut RunContext<'_>,
        label: &str,
    ) -> Result<Vec<Document>, ConvertError> {
        Ok(self
            .assemble_systems(ctx, label)?
            .into_iter()
            .map(|s| s.document)
            .collect())
    }

    /// One document per constellation row, embedding its region and its
    /// assembled child systems.
    pub fn constellation_documents(
        &self,
        ctx: &mut RunContext<'_>,
        label: &str,
    ) -> Result<Vec<Document>, ConvertError> {
        let systems = self.assemble_systems(ctx, label)?;
        let mut by_constellation: HashMap<i64, Vec<Document>> = HashMap::new();
        for system in systems {
            if let Some(constellation_id) = system.constellation_id {
                by_constellation
                    .entry(constellation_id)
                    .or_default()
                    .push(system.document);
            }
        }

        let mut documents = Vec::with_capacity(self.buckets.constellations.len());
        for constellation in &self.buckets.constellations {
            ctx.checkpoint()?;
            documents.push(self.constellation_document(constellation, &mut by_constellation)?);
        }
        Ok(documents)
    }

    /// One document per region row: the full region -> constellation ->
    /// system tree plus the region's systems as a flat list.
    pub fn region_documents(
        &self,
        ctx: &mut RunContext<'_>,
        label: &str,
    ) -> Result<Vec<Document>, ConvertError> {
        let systems = self.assemble_systems(ctx, label)?;
        let mut systems_by_constellation: HashMap<i64, Vec<Document>> = HashMap::new();
        let mut systems_by_region: HashMap<i64, Vec<Document>> = HashMap::new();
        for system in systems {
            if let Some(constellation_id) = system.constellation_id {
                systems_by_constellation
                    .entry(constellation_id)
                    .or_default()
                    .push(system.document.clone());
            }
            if let Some(region_id) = system.region_id {
                systems_by_region
                    .entry(region_id)
                    .or_default()
                    .push(system.document);
            }
        }

        let mut constellations_by_region: HashMap<i64, Vec<Document>> = HashMap::new();
        for constellation in &self.buckets.constellations {
            ctx.checkpoint()?;
            let document =
                self.constellation_document(constellation, &mut systems_by_constellation)?;
            if let Some(region_id) = constellation.region_id {
                constellations_by_region
                    .entry(region_id)
                    .or_default()
                    .push(document);
            }
        }

        let mut documents = Vec::with_capacity(self.buckets.regions.len());
        for region in &self.buckets.regions {
            ctx.checkpoint()?;
            let mut doc = to_object(region)?;
            doc.insert("uniqueId".to_string(), Value::from(region.item_id));
            doc.insert(
                "Constellations".to_string(),
                Value::Array(
                    constellations_by_region
                        .remove(&region.item_id)
                        .unwrap_or_default(),
                ),
            );
            doc.insert(
                "Solarsystems".to_string(),
                Value::Array(systems_by_region.remove(&region.item_id).unwrap_or_default()),
            );
            documents.push(Value::Object(doc));
        }
        Ok(documents)
    }

    fn assemble_systems(
        &self,
        ctx: &mut RunContext<'_>,
        label: &str,
    ) -> Result<Vec<AssembledSystem>, ConvertError> {
        let total = self.buckets.systems.len() as u64;
        let mut assembled = Vec::with_capacity(self.buckets.systems.len());
        for (i, system) in self.buckets.systems.iter().enumerate() {
            ctx.checkpoint()?;
            ctx.ui.set_progress(i as u64, total, label);
            assembled.push(AssembledSystem {
                constellation_id: system.constellation_id,
                region_id: system.region_id,
                document: self.system_document(system)?,
            });
        }
        ctx.ui.set_progress(total, total, label);
        Ok(assembled)
    }

    fn system_document(&self, system: &CelestialRow) -> Result<Document, ConvertError> {
        let star = exactly_one(
            self.buckets
                .stars
                .iter()
                .filter(|s| s.solar_system_id == Some(system.item_id)),
            "star",
            "solar system",
            system.item_id,
        )?;
        let constellation = exactly_one(
            self.buckets
                .constellations
                .iter()
                .filter(|c| Some(c.item_id) == system.constellation_id),
            "owning constellation",
            "solar system",
            system.item_id,
        )?;
        let region = exactly_one(
            self.buckets
                .regions
                .iter()
                .filter(|r| Some(r.item_id) == system.region_id),
            "owning region",
            "solar system",
            system.item_id,
        )?;

        let mut doc = to_object(system)?;
        doc.insert("uniqueId".to_string(), Value::from(system.item_id));
        doc.insert("Star".to_string(), serde_json::to_value(star)?);
        doc.insert(
            "Planets".to_string(),
            children_of(&self.buckets.planets, system.item_id)?,
        );
        doc.insert(
            "Moons".to_string(),
            children_of(&self.buckets.moons, system.item_id)?,
        );
        doc.insert(
            "Belts".to_string(),
            children_of(&self.buckets.belts, system.item_id)?,
        );
        doc.insert(
            "Stations".to_string(),
            children_of(&self.buckets.stations, system.item_id)?,
        );
        doc.insert(
            "Anomalies".to_string(),
            children_of(&self.buckets.anomalies, system.item_id)?,
        );
        doc.insert("Jumps".to_string(), self.jumps_of(system.item_id)?);
        doc.insert("Constellation".to_string(), serde_json::to_value(constellation)?);
        doc.insert("Region".to_string(), serde_json::to_value(region)?);
        Ok(Value::Object(doc))
    }

    fn constellation_document(
        &self,
        constellation: &CelestialRow,
        systems_by_constellation: &mut HashMap<i64, Vec<Document>>,
    ) -> Result<Document, ConvertError> {
        let region = exactly_one(
            self.buckets
                .regions
                .iter()
                .filter(|r| Some(r.item_id) == constellation.region_id),
            "owning region",
            "constellation",
            constellation.item_id,
        )?;

        let mut doc = to_object(constellation)?;
        doc.insert("uniqueId".to_string(), Value::from(constellation.item_id));
        doc.insert("Region".to_string(), serde_json::to_value(region)?);
        doc.insert(
            "Solarsystems".to_string(),
            Value::Array(
                systems_by_constellation
                    .remove(&constellation.item_id)
                    .unwrap_or_default(),
            ),
        );
        Ok(Value::Object(doc))
    }

    /// Stargates in a system, inner-joined against the link table so
    /// each jump carries its destination celestial.
    fn jumps_of(&self, system_id: i64) -> Result<Value, ConvertError> {
        let mut jumps = Vec::new();
        for gate in self
            .buckets
            .stargates
            .iter()
            .filter(|g| g.solar_system_id == Some(system_id))
        {
            let Some(link) = self.links.iter().find(|l| l.stargate_id == gate.item_id) else {
                continue;
            };
            let mut doc = to_object(gate)?;
            doc.insert("stargateId".to_string(), Value::from(link.stargate_id));
            doc.insert("celestialId".to_string(), Value::from(link.celestial_id));
            jumps.push(Value::Object(doc));
        }
        Ok(Value::Array(jumps))
    }
}

/// Serialize `rows` with a matching `solarSystemId` into a list.
fn children_of(rows: &[CelestialRow], system_id: i64) -> Result<Value, ConvertError> {
    let children: Vec<&CelestialRow> = rows
        .iter()
        .filter(|row| row.solar_system_id == Some(system_id))
        .collect();
    Ok(serde_json::to_value(children)?)
}

/// Require exactly one match from a single-valued relationship.
fn exactly_one<'r>(
    mut matches: impl Iterator<Item = &'r CelestialRow>,
    relation: &'static str,
    owner: &'static str,
    owner_id: i64,
) -> Result<&'r CelestialRow, ConvertError> {
    match (matches.next(), matches.next()) {
        (Some(row), None) => Ok(row),
        (None, _) => Err(ConvertError::MissingRelation {
            relation,
            owner,
            owner_id,
            found: 0,
        }),
        (Some(_), Some(_)) => Err(ConvertError::MissingRelation {
            relation,
            owner,
            owner_id,
            found: 2 + matches.count(),
        }),
    }
}

macro_rules! map_converter {
    ($name:ident, $converter_name:literal, $collection:literal, $method:ident) => {
        pub struct $name;

        impl Converter for $name {
            fn name(&self) -> &'static str {
                $converter_name
            }

            fn collection(&self) -> &'static str {
                $collection
            }

            fn run(
                &self,
                source: &SdeSource,
                store: &mut dyn DocumentStore,
                ctx: &mut RunContext<'_>,
            ) -> Result<(), ConvertError> {
                let (buckets, dropped) = CelestialBuckets::partition(source.celestial_rows()?);
                if dropped > 0 {
                    ctx.ui.trace(&format!(
                        "skipped {} celestial rows with unrecognized group codes",
                        dropped
                    ));
                }
                let links = source.stargate_links()?;
                let assembler = MapAssembler::new(&buckets, &links);
                let documents = assembler.$method(ctx, $collection)?;
                for document in &documents {
                    store.insert($collection, document)?;
                }
                Ok(())
            }
        }
    };
}

map_converter!(
    MapSystemsConverter,
    "map-systems",
    "map_solarsystems",
    system_documents
);
map_converter!(
    MapConstellationsConverter,
    "map-constellations",
    "map_constellations",
    constellation_documents
);
map_converter!(
    MapRegionsConverter,
    "map-regions",
    "map_regions",
    region_documents
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::CancelToken;
    use crate::ui::SilentUi;

    fn row(item_id: i64, group_id: i64) -> CelestialRow {
        CelestialRow {
            item_id,
            item_name: Some(format!("object {}", item_id)),
            type_id: None,
            group_id,
            solar_system_id: None,
            constellation_id: None,
            region_id: None,
            orbit_id: None,
            x: Some(0.0),
            y: Some(0.0),
            z: Some(0.0),
            radius: None,
            security: None,
            celestial_index: None,
            orbit_index: None,
        }
    }

    fn in_system(mut r: CelestialRow, system_id: i64) -> CelestialRow {
        r.solar_system_id = Some(system_id);
        r
    }

    /// One region (10) with one constellation (20) holding one system
    /// (30) with a star (31) and two planets (32, 33).
    fn small_universe() -> Vec<CelestialRow> {
        let region = row(10, 3);
        let mut constellation = row(20, 4);
        constellation.region_id = Some(10);
        let mut system = row(30, 5);
        system.constellation_id = Some(20);
        system.region_id = Some(10);
        vec![
            region,
            constellation,
            system,
            in_system(row(31, 6), 30),
            in_system(row(32, 7), 30),
            in_system(row(33, 7), 30),
        ]
    }

    fn assemble<F, T>(rows: Vec<CelestialRow>, links: &[StargateLink], f: F) -> Result<T, ConvertError>
    where
        F: FnOnce(&MapAssembler<'_>, &mut RunContext<'_>) -> Result<T, ConvertError>,
    {
        let (buckets, _) = CelestialBuckets::partition(rows);
        let assembler = MapAssembler::new(&buckets, links);
        let mut ui = SilentUi::new();
        let cancel = CancelToken::new();
        let mut ctx = RunContext {
            ui: &mut ui,
            cancel: &cancel,
        };
        f(&assembler, &mut ctx)
    }

    #[test]
    fn partition_buckets_by_group_code_and_counts_drops() {
        let mut rows = small_universe();
        rows.push(row(99, 12345));
        let (buckets, dropped) = CelestialBuckets::partition(rows);

        assert_eq!(buckets.regions.len(), 1);
        assert_eq!(buckets.constellations.len(), 1);
        assert_eq!(buckets.systems.len(), 1);
        assert_eq!(buckets.stars.len(), 1);
        assert_eq!(buckets.planets.len(), 2);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn system_document_counts_match_input_rows() {
        let mut rows = small_universe();
        rows.push(in_system(row(34, 8), 30)); // moon
        rows.push(in_system(row(35, 9), 30)); // belt
        rows.push(in_system(row(36, 15), 30)); // station
        rows.push(in_system(row(37, 8), 999)); // moon in another system

        let docs = assemble(rows, &[], |a, ctx| a.system_documents(ctx, "test")).unwrap();
        assert_eq!(docs.len(), 1);

        let doc = &docs[0];
        assert_eq!(doc["uniqueId"], 30);
        assert_eq!(doc["Star"]["itemId"], 31);
        assert_eq!(doc["Planets"].as_array().unwrap().len(), 2);
        assert_eq!(doc["Moons"].as_array().unwrap().len(), 1);
        assert_eq!(doc["Belts"].as_array().unwrap().len(), 1);
        assert_eq!(doc["Stations"].as_array().unwrap().len(), 1);
        assert_eq!(doc["Constellation"]["itemId"], 20);
        assert_eq!(doc["Region"]["itemId"], 10);
    }

    #[test]
    fn jumps_join_against_the_link_table() {
        let mut rows = small_universe();
        rows.push(in_system(row(40, 10), 30));
        rows.push(in_system(row(41, 10), 30)); // gate without a link row
        let links = [StargateLink {
            stargate_id: 40,
            celestial_id: 777,
        }];

        let docs = assemble(rows, &links, |a, ctx| a.system_documents(ctx, "test")).unwrap();
        let jumps = docs[0]["Jumps"].as_array().unwrap();
        assert_eq!(jumps.len(), 1);
        assert_eq!(jumps[0]["stargateId"], 40);
        assert_eq!(jumps[0]["celestialId"], 777);
    }

    #[test]
    fn system_without_a_star_is_a_missing_relation() {
        let rows: Vec<CelestialRow> = small_universe()
            .into_iter()
            .filter(|r| r.item_id != 31)
            .collect();

        let err = assemble(rows, &[], |a, ctx| a.system_documents(ctx, "test")).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MissingRelation {
                relation: "star",
                owner_id: 30,
                found: 0,
                ..
            }
        ));
    }

    #[test]
    fn system_with_two_stars_is_a_missing_relation() {
        let mut rows = small_universe();
        rows.push(in_system(row(38, 6), 30));

        let err = assemble(rows, &[], |a, ctx| a.system_documents(ctx, "test")).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MissingRelation {
                relation: "star",
                owner_id: 30,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn constellation_without_a_region_is_a_missing_relation() {
        // A lone constellation pointing at a region that has no row.
        let mut constellation = row(20, 4);
        constellation.region_id = Some(10);

        let err = assemble(vec![constellation], &[], |a, ctx| {
            a.constellation_documents(ctx, "test")
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MissingRelation {
                relation: "owning region",
                owner: "constellation",
                owner_id: 20,
                found: 0,
            }
        ));
    }

    #[test]
    fn region_tree_nests_constellation_and_system_documents() {
        let docs = assemble(small_universe(), &[], |a, ctx| {
            a.region_documents(ctx, "test")
        })
        .unwrap();
        assert_eq!(docs.len(), 1);

        let region = &docs[0];
        assert_eq!(region["uniqueId"], 10);

        let constellations = region["Constellations"].as_array().unwrap();
        assert_eq!(constellations.len(), 1);

        let systems = constellations[0]["Solarsystems"].as_array().unwrap();
        assert_eq!(systems.len(), 1);
        assert_eq!(systems[0]["Planets"].as_array().unwrap().len(), 2);
        assert_eq!(systems[0]["Star"]["itemId"], 31);

        // The region also lists its systems directly.
        assert_eq!(region["Solarsystems"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn cancellation_stops_assembly_between_rows() {
        let (buckets, _) = CelestialBuckets::partition(small_universe());
        let assembler = MapAssembler::new(&buckets, &[]);
        let mut ui = SilentUi::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut ctx = RunContext {
            ui: &mut ui,
            cancel: &cancel,
        };

        let err = assembler.system_documents(&mut ctx, "test").unwrap_err();
        assert!(matches!(err, ConvertError::Canceled));
    }
}
