//! Typed rows read from the SDE database.
//!
//! Each struct mirrors the column selection its query makes, in order,
//! so `from_row` can read by position starting at a caller-supplied
//! offset. Join queries concatenate the column lists of several structs
//! and parse each at its own offset. Serialization is camelCase so rows
//! embed directly into output documents.

use rusqlite::Row;
use serde::Serialize;

/// Build a qualified, comma-separated select list for `columns`.
pub(crate) fn qualified(alias: &str, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("{}.{}", alias, c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One row of `invTypes`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRow {
    pub type_id: i64,
    pub type_name: Option<String>,
    pub volume: Option<f64>,
    pub race_id: Option<i64>,
    pub published: Option<bool>,
    pub portion_size: Option<i64>,
    pub mass: Option<f64>,
    pub market_group_id: Option<i64>,
    pub icon_id: Option<i64>,
    pub group_id: i64,
    pub description: Option<String>,
    pub chance_of_duplicating: Option<f64>,
    pub capacity: Option<f64>,
    pub base_price: Option<f64>,
}

impl TypeRow {
    pub(crate) const COLUMNS: &'static [&'static str] = &[
        "typeID",
        "typeName",
        "volume",
        "raceID",
        "published",
        "portionSize",
        "mass",
        "marketGroupID",
        "iconID",
        "groupID",
        "description",
        "chanceOfDuplicating",
        "capacity",
        "basePrice",
    ];

    pub(crate) fn from_row(row: &Row, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            type_id: row.get(offset)?,
            type_name: row.get(offset + 1)?,
            volume: row.get(offset + 2)?,
            race_id: row.get(offset + 3)?,
            published: row.get(offset + 4)?,
            portion_size: row.get(offset + 5)?,
            mass: row.get(offset + 6)?,
            market_group_id: row.get(offset + 7)?,
            icon_id: row.get(offset + 8)?,
            group_id: row.get(offset + 9)?,
            description: row.get(offset + 10)?,
            chance_of_duplicating: row.get(offset + 11)?,
            capacity: row.get(offset + 12)?,
            base_price: row.get(offset + 13)?,
        })
    }
}

/// One row of `invGroups`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRow {
    pub group_id: i64,
    pub category_id: i64,
    pub group_name: Option<String>,
    pub icon_id: Option<i64>,
    pub use_base_price: Option<bool>,
    pub allow_manufacture: Option<bool>,
    pub allow_recycler: Option<bool>,
    pub anchored: Option<bool>,
    pub anchorable: Option<bool>,
    pub fittable_non_singleton: Option<bool>,
    pub published: Option<bool>,
}

impl GroupRow {
    pub(crate) const COLUMNS: &'static [&'static str] = &[
        "groupID",
        "categoryID",
        "groupName",
        "iconID",
        "useBasePrice",
        "allowManufacture",
        "allowRecycler",
        "anchored",
        "anchorable",
        "fittableNonSingleton",
        "published",
    ];

    pub(crate) fn from_row(row: &Row, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            group_id: row.get(offset)?,
            category_id: row.get(offset + 1)?,
            group_name: row.get(offset + 2)?,
            icon_id: row.get(offset + 3)?,
            use_base_price: row.get(offset + 4)?,
            allow_manufacture: row.get(offset + 5)?,
            allow_recycler: row.get(offset + 6)?,
            anchored: row.get(offset + 7)?,
            anchorable: row.get(offset + 8)?,
            fittable_non_singleton: row.get(offset + 9)?,
            published: row.get(offset + 10)?,
        })
    }
}

/// One row of `invCategories`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub category_id: i64,
    pub category_name: Option<String>,
    pub description: Option<String>,
    pub icon_id: Option<i64>,
    pub published: Option<bool>,
}

impl CategoryRow {
    pub(crate) const COLUMNS: &'static [&'static str] = &[
        "categoryID",
        "categoryName",
        "description",
        "iconID",
        "published",
    ];

    pub(crate) fn from_row(row: &Row, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            category_id: row.get(offset)?,
            category_name: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
            icon_id: row.get(offset + 3)?,
            published: row.get(offset + 4)?,
        })
    }
}

/// A type row bundled with its already-joined group and category.
#[derive(Debug, Clone)]
pub struct TypeBundle {
    pub type_row: TypeRow,
    pub group: GroupRow,
    pub category: CategoryRow,
}

/// One attribute value for a type, joined with its attribute metadata,
/// attribute category, and display unit. `value_int` and `value_float`
/// are mutually exclusive in the source data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRow {
    pub type_id: i64,
    pub value_int: Option<i64>,
    pub value_float: Option<f64>,
    pub attribute_id: i64,
    pub attribute_name: Option<String>,
    pub description: Option<String>,
    pub icon_id: Option<i64>,
    pub default_value: Option<f64>,
    pub published: Option<bool>,
    pub display_name: Option<String>,
    pub stackable: Option<bool>,
    pub high_is_good: Option<bool>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub category_description: Option<String>,
    pub unit_id: Option<i64>,
    pub unit_name: Option<String>,
    pub unit_display_name: Option<String>,
    pub unit_description: Option<String>,
}

impl AttributeRow {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            type_id: row.get(0)?,
            value_int: row.get(1)?,
            value_float: row.get(2)?,
            attribute_id: row.get(3)?,
            attribute_name: row.get(4)?,
            description: row.get(5)?,
            icon_id: row.get(6)?,
            default_value: row.get(7)?,
            published: row.get(8)?,
            display_name: row.get(9)?,
            stackable: row.get(10)?,
            high_is_good: row.get(11)?,
            category_id: row.get(12)?,
            category_name: row.get(13)?,
            category_description: row.get(14)?,
            unit_id: row.get(15)?,
            unit_name: row.get(16)?,
            unit_display_name: row.get(17)?,
            unit_description: row.get(18)?,
        })
    }
}

/// One effect of a type, joined with the effect definition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectRow {
    pub effect_id: i64,
    pub is_default: Option<bool>,
    pub effect_name: Option<String>,
    pub effect_category: Option<i64>,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub guid: Option<String>,
    pub icon_id: Option<i64>,
    pub is_assistance: Option<bool>,
    pub is_offensive: Option<bool>,
    pub is_warp_safe: Option<bool>,
    pub disallow_auto_repeat: Option<bool>,
    pub published: Option<bool>,
    pub distribution: Option<i64>,
    pub duration_attribute_id: Option<i64>,
    pub discharge_attribute_id: Option<i64>,
    pub range_attribute_id: Option<i64>,
    pub falloff_attribute_id: Option<i64>,
    pub tracking_speed_attribute_id: Option<i64>,
    pub fitting_usage_chance_attribute_id: Option<i64>,
    pub npc_usage_chance_attribute_id: Option<i64>,
    pub npc_activation_chance_attribute_id: Option<i64>,
    pub pre_expression: Option<i64>,
    pub post_expression: Option<i64>,
    pub electronic_chance: Option<bool>,
    pub propulsion_chance: Option<bool>,
    pub range_chance: Option<bool>,
    pub sfx_name: Option<String>,
}

impl EffectRow {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            effect_id: row.get(0)?,
            is_default: row.get(1)?,
            effect_name: row.get(2)?,
            effect_category: row.get(3)?,
            description: row.get(4)?,
            display_name: row.get(5)?,
            guid: row.get(6)?,
            icon_id: row.get(7)?,
            is_assistance: row.get(8)?,
            is_offensive: row.get(9)?,
            is_warp_safe: row.get(10)?,
            disallow_auto_repeat: row.get(11)?,
            published: row.get(12)?,
            distribution: row.get(13)?,
            duration_attribute_id: row.get(14)?,
            discharge_attribute_id: row.get(15)?,
            range_attribute_id: row.get(16)?,
            falloff_attribute_id: row.get(17)?,
            tracking_speed_attribute_id: row.get(18)?,
            fitting_usage_chance_attribute_id: row.get(19)?,
            npc_usage_chance_attribute_id: row.get(20)?,
            npc_activation_chance_attribute_id: row.get(21)?,
            pre_expression: row.get(22)?,
            post_expression: row.get(23)?,
            electronic_chance: row.get(24)?,
            propulsion_chance: row.get(25)?,
            range_chance: row.get(26)?,
            sfx_name: row.get(27)?,
        })
    }
}

/// One node of the market-group tree. `parent_group_id` is null at the
/// roots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketGroupRow {
    pub market_group_id: i64,
    pub parent_group_id: Option<i64>,
    pub market_group_name: Option<String>,
    pub description: Option<String>,
    pub icon_id: Option<i64>,
    pub has_types: Option<bool>,
}

impl MarketGroupRow {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            market_group_id: row.get(0)?,
            parent_group_id: row.get(1)?,
            market_group_name: row.get(2)?,
            description: row.get(3)?,
            icon_id: row.get(4)?,
            has_types: row.get(5)?,
        })
    }
}

/// One row of `mapSolarSystems`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarSystemRow {
    pub solar_system_id: i64,
    pub solar_system_name: Option<String>,
    pub region_id: i64,
    pub constellation_id: i64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub z_min: Option<f64>,
    pub z_max: Option<f64>,
    pub luminosity: Option<f64>,
    pub border: Option<bool>,
    pub fringe: Option<bool>,
    pub corridor: Option<bool>,
    pub hub: Option<bool>,
    pub international: Option<bool>,
    pub regional: Option<bool>,
    pub constellation: Option<bool>,
    pub security: Option<f64>,
    pub security_class: Option<String>,
    pub faction_id: Option<i64>,
    pub radius: Option<f64>,
    pub sun_type_id: Option<i64>,
}

impl SolarSystemRow {
    pub(crate) const COLUMNS: &'static [&'static str] = &[
        "solarSystemID",
        "solarSystemName",
        "regionID",
        "constellationID",
        "x",
        "y",
        "z",
        "xMin",
        "xMax",
        "yMin",
        "yMax",
        "zMin",
        "zMax",
        "luminosity",
        "border",
        "fringe",
        "corridor",
        "hub",
        "international",
        "regional",
        "constellation",
        "security",
        "securityClass",
        "factionID",
        "radius",
        "sunTypeID",
    ];

    pub(crate) fn from_row(row: &Row, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            solar_system_id: row.get(offset)?,
            solar_system_name: row.get(offset + 1)?,
            region_id: row.get(offset + 2)?,
            constellation_id: row.get(offset + 3)?,
            x: row.get(offset + 4)?,
            y: row.get(offset + 5)?,
            z: row.get(offset + 6)?,
            x_min: row.get(offset + 7)?,
            x_max: row.get(offset + 8)?,
            y_min: row.get(offset + 9)?,
            y_max: row.get(offset + 10)?,
            z_min: row.get(offset + 11)?,
            z_max: row.get(offset + 12)?,
            luminosity: row.get(offset + 13)?,
            border: row.get(offset + 14)?,
            fringe: row.get(offset + 15)?,
            corridor: row.get(offset + 16)?,
            hub: row.get(offset + 17)?,
            international: row.get(offset + 18)?,
            regional: row.get(offset + 19)?,
            constellation: row.get(offset + 20)?,
            security: row.get(offset + 21)?,
            security_class: row.get(offset + 22)?,
            faction_id: row.get(offset + 23)?,
            radius: row.get(offset + 24)?,
            sun_type_id: row.get(offset + 25)?,
        })
    }
}

/// One row of `mapConstellations`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstellationRow {
    pub constellation_id: i64,
    pub constellation_name: Option<String>,
    pub region_id: i64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub z_min: Option<f64>,
    pub z_max: Option<f64>,
    pub faction_id: Option<i64>,
    pub radius: Option<f64>,
}

impl ConstellationRow {
    pub(crate) const COLUMNS: &'static [&'static str] = &[
        "constellationID",
        "constellationName",
        "regionID",
        "x",
        "y",
        "z",
        "xMin",
        "xMax",
        "yMin",
        "yMax",
        "zMin",
        "zMax",
        "factionID",
        "radius",
    ];

    pub(crate) fn from_row(row: &Row, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            constellation_id: row.get(offset)?,
            constellation_name: row.get(offset + 1)?,
            region_id: row.get(offset + 2)?,
            x: row.get(offset + 3)?,
            y: row.get(offset + 4)?,
            z: row.get(offset + 5)?,
            x_min: row.get(offset + 6)?,
            x_max: row.get(offset + 7)?,
            y_min: row.get(offset + 8)?,
            y_max: row.get(offset + 9)?,
            z_min: row.get(offset + 10)?,
            z_max: row.get(offset + 11)?,
            faction_id: row.get(offset + 12)?,
            radius: row.get(offset + 13)?,
        })
    }
}

/// One row of `mapRegions`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRow {
    pub region_id: i64,
    pub region_name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub z_min: Option<f64>,
    pub z_max: Option<f64>,
    pub faction_id: Option<i64>,
    pub radius: Option<f64>,
}

impl RegionRow {
    pub(crate) const COLUMNS: &'static [&'static str] = &[
        "regionID",
        "regionName",
        "x",
        "y",
        "z",
        "xMin",
        "xMax",
        "yMin",
        "yMax",
        "zMin",
        "zMax",
        "factionID",
        "radius",
    ];

    pub(crate) fn from_row(row: &Row, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            region_id: row.get(offset)?,
            region_name: row.get(offset + 1)?,
            x: row.get(offset + 2)?,
            y: row.get(offset + 3)?,
            z: row.get(offset + 4)?,
            x_min: row.get(offset + 5)?,
            x_max: row.get(offset + 6)?,
            y_min: row.get(offset + 7)?,
            y_max: row.get(offset + 8)?,
            z_min: row.get(offset + 9)?,
            z_max: row.get(offset + 10)?,
            faction_id: row.get(offset + 11)?,
            radius: row.get(offset + 12)?,
        })
    }
}

/// A solar system bundled with its owning constellation and region.
#[derive(Debug, Clone)]
pub struct SystemBundle {
    pub system: SolarSystemRow,
    pub constellation: ConstellationRow,
    pub region: RegionRow,
}

/// One row of the flat `mapDenormalize` table. `group_id` determines
/// which of the parent id fields are meaningful.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialRow {
    pub item_id: i64,
    pub item_name: Option<String>,
    pub type_id: Option<i64>,
    pub group_id: i64,
    pub solar_system_id: Option<i64>,
    pub constellation_id: Option<i64>,
    pub region_id: Option<i64>,
    pub orbit_id: Option<i64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub radius: Option<f64>,
    pub security: Option<f64>,
    pub celestial_index: Option<i64>,
    pub orbit_index: Option<i64>,
}

impl CelestialRow {
    pub(crate) const COLUMNS: &'static [&'static str] = &[
        "itemID",
        "itemName",
        "typeID",
        "groupID",
        "solarSystemID",
        "constellationID",
        "regionID",
        "orbitID",
        "x",
        "y",
        "z",
        "radius",
        "security",
        "celestialIndex",
        "orbitIndex",
    ];

    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            item_id: row.get(0)?,
            item_name: row.get(1)?,
            type_id: row.get(2)?,
            group_id: row.get(3)?,
            solar_system_id: row.get(4)?,
            constellation_id: row.get(5)?,
            region_id: row.get(6)?,
            orbit_id: row.get(7)?,
            x: row.get(8)?,
            y: row.get(9)?,
            z: row.get(10)?,
            radius: row.get(11)?,
            security: row.get(12)?,
            celestial_index: row.get(13)?,
            orbit_index: row.get(14)?,
        })
    }
}

/// One stargate link from `mapJumps`: the gate and the celestial it
/// leads to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StargateLink {
    pub stargate_id: i64,
    pub celestial_id: i64,
}

impl StargateLink {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            stargate_id: row.get(0)?,
            celestial_id: row.get(1)?,
        })
    }
}
