//! Read-only access to the relational SDE snapshot.
//!
//! `SdeSource` owns a SQLite connection and exposes one method per
//! logical row sequence. Joins are done in SQL; no method branches on
//! row content.

pub mod rows;

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::error::ConvertError;
use self::rows::{
    qualified, AttributeRow, CategoryRow, CelestialRow, ConstellationRow, EffectRow, GroupRow,
    MarketGroupRow, RegionRow, SolarSystemRow, StargateLink, SystemBundle, TypeBundle, TypeRow,
};

pub struct SdeSource {
    conn: Connection,
}

impl SdeSource {
    /// Open the SDE database read-only and verify it answers a query.
    /// Fails with `SourceUnavailable` before any destructive step runs.
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(ConvertError::SourceUnavailable)?;

        let source = Self { conn };
        source.ping()?;
        Ok(source)
    }

    /// Wrap an existing connection. Used for embedding and for tests
    /// that build fixture databases in memory.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn ping(&self) -> Result<(), ConvertError> {
        self.conn
            .query_row("SELECT 1", [], |_| Ok(()))
            .map_err(ConvertError::SourceUnavailable)
    }

    /// All type rows joined with their group and category.
    pub fn types_with_taxonomy(&self) -> Result<Vec<TypeBundle>, ConvertError> {
        let sql = format!(
            "SELECT {}, {}, {}
             FROM invTypes i
             JOIN invGroups g ON i.groupID = g.groupID
             JOIN invCategories c ON g.categoryID = c.categoryID
             ORDER BY i.typeID",
            qualified("i", TypeRow::COLUMNS),
            qualified("g", GroupRow::COLUMNS),
            qualified("c", CategoryRow::COLUMNS),
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let bundles = stmt
            .query_map([], |row| {
                let type_row = TypeRow::from_row(row, 0)?;
                let group = GroupRow::from_row(row, TypeRow::COLUMNS.len())?;
                let category =
                    CategoryRow::from_row(row, TypeRow::COLUMNS.len() + GroupRow::COLUMNS.len())?;
                Ok(TypeBundle {
                    type_row,
                    group,
                    category,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(bundles)
    }

    /// Attribute values for one type, joined with attribute metadata,
    /// attribute category, and unit.
    pub fn attributes_for(&self, type_id: i64) -> Result<Vec<AttributeRow>, ConvertError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT ta.typeID, ta.valueInt, ta.valueFloat,
                    at.attributeID, at.attributeName, at.description, at.iconID,
                    at.defaultValue, at.published, at.displayName, at.stackable, at.highIsGood,
                    at.categoryID, ac.categoryName, ac.categoryDescription,
                    at.unitID, u.unitName, u.displayName, u.description
             FROM dgmTypeAttributes ta
             JOIN dgmAttributeTypes at ON ta.attributeID = at.attributeID
             JOIN dgmAttributeCategories ac ON at.categoryID = ac.categoryID
             JOIN eveUnits u ON at.unitID = u.unitID
             WHERE ta.typeID = ?1
             ORDER BY at.attributeID",
        )?;

        let attributes = stmt
            .query_map([type_id], |row| AttributeRow::from_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(attributes)
    }

    /// Effects for one type, joined with the effect definition.
    pub fn effects_for(&self, type_id: i64) -> Result<Vec<EffectRow>, ConvertError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT te.effectID, te.isDefault,
                    e.effectName, e.effectCategory, e.description, e.displayName,
                    e.guid, e.iconID, e.isAssistance, e.isOffensive, e.isWarpSafe,
                    e.disallowAutoRepeat, e.published, e.distribution,
                    e.durationAttributeID, e.dischargeAttributeID, e.rangeAttributeID,
                    e.falloffAttributeID, e.trackingSpeedAttributeID,
                    e.fittingUsageChanceAttributeID, e.npcUsageChanceAttributeID,
                    e.npcActivationChanceAttributeID, e.preExpression, e.postExpression,
                    e.electronicChance, e.propulsionChance, e.rangeChance, e.sfxName
             FROM dgmTypeEffects te
             JOIN dgmEffects e ON te.effectID = e.effectID
             WHERE te.typeID = ?1
             ORDER BY te.effectID",
        )?;

        let effects = stmt
            .query_map([type_id], |row| EffectRow::from_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(effects)
    }

    /// Look up a single market-group node. Returns `None` when the id
    /// has no row.
    pub fn market_group(&self, id: i64) -> Result<Option<MarketGroupRow>, ConvertError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT marketGroupID, parentGroupID, marketGroupName, description, iconID, hasTypes
             FROM invMarketGroups
             WHERE marketGroupID = ?1",
        )?;

        let mut rows = stmt.query_map([id], |row| MarketGroupRow::from_row(row))?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// All solar systems joined with their owning constellation and
    /// region.
    pub fn solar_systems_with_parents(&self) -> Result<Vec<SystemBundle>, ConvertError> {
        let sql = format!(
            "SELECT {}, {}, {}
             FROM mapSolarSystems s
             JOIN mapConstellations c ON s.constellationID = c.constellationID
             JOIN mapRegions r ON s.regionID = r.regionID
             ORDER BY s.solarSystemID",
            qualified("s", SolarSystemRow::COLUMNS),
            qualified("c", ConstellationRow::COLUMNS),
            qualified("r", RegionRow::COLUMNS),
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let bundles = stmt
            .query_map([], |row| {
                let system = SolarSystemRow::from_row(row, 0)?;
                let constellation =
                    ConstellationRow::from_row(row, SolarSystemRow::COLUMNS.len())?;
                let region = RegionRow::from_row(
                    row,
                    SolarSystemRow::COLUMNS.len() + ConstellationRow::COLUMNS.len(),
                )?;
                Ok(SystemBundle {
                    system,
                    constellation,
                    region,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(bundles)
    }

    /// All region rows.
    pub fn map_regions(&self) -> Result<Vec<RegionRow>, ConvertError> {
        let sql = format!(
            "SELECT {} FROM mapRegions r ORDER BY r.regionID",
            qualified("r", RegionRow::COLUMNS),
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let regions = stmt
            .query_map([], |row| RegionRow::from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(regions)
    }

    /// All constellation rows.
    pub fn map_constellations(&self) -> Result<Vec<ConstellationRow>, ConvertError> {
        let sql = format!(
            "SELECT {} FROM mapConstellations c ORDER BY c.constellationID",
            qualified("c", ConstellationRow::COLUMNS),
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let constellations = stmt
            .query_map([], |row| ConstellationRow::from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(constellations)
    }

    /// All solar system rows, without parents.
    pub fn map_solar_systems(&self) -> Result<Vec<SolarSystemRow>, ConvertError> {
        let sql = format!(
            "SELECT {} FROM mapSolarSystems s ORDER BY s.solarSystemID",
            qualified("s", SolarSystemRow::COLUMNS),
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let systems = stmt
            .query_map([], |row| SolarSystemRow::from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(systems)
    }

    /// The full flat celestial-object table.
    pub fn celestial_rows(&self) -> Result<Vec<CelestialRow>, ConvertError> {
        let sql = format!(
            "SELECT {} FROM mapDenormalize ORDER BY itemID",
            CelestialRow::COLUMNS.join(", "),
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| CelestialRow::from_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// All stargate links.
    pub fn stargate_links(&self) -> Result<Vec<StargateLink>, ConvertError> {
        let mut stmt = self
            .conn
            .prepare("SELECT stargateID, celestialID FROM mapJumps ORDER BY stargateID")?;
        let links = stmt
            .query_map([], |row| StargateLink::from_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(links)
    }
}
