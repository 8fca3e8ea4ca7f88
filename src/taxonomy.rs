//! Classification of SDE rows by their category and group codes.
//!
//! The code tables are closed: every code pair maps to exactly one
//! variant, and anything outside the enumerated set falls through to
//! `Unknown`. That fall-through is the normal path for most of the
//! dataset, not an error.

use std::fmt;

/// Kinds of celestial objects, keyed by their `invGroups` code.
///
/// The same codes tag rows in `mapDenormalize`, so this enum doubles as
/// the bucket key for the map tree assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CelestialKind {
    Region,
    Constellation,
    SolarSystem,
    Star,
    Planet,
    Moon,
    AsteroidBelt,
    Stargate,
    Station,
    Anomaly,
}

impl CelestialKind {
    /// Map a group code to a celestial kind. Codes outside the
    /// enumerated set return `None`.
    pub fn from_group(group_id: i64) -> Option<Self> {
        match group_id {
            3 => Some(CelestialKind::Region),
            4 => Some(CelestialKind::Constellation),
            5 => Some(CelestialKind::SolarSystem),
            6 => Some(CelestialKind::Star),
            7 => Some(CelestialKind::Planet),
            8 => Some(CelestialKind::Moon),
            9 => Some(CelestialKind::AsteroidBelt),
            10 => Some(CelestialKind::Stargate),
            15 => Some(CelestialKind::Station),
            995 => Some(CelestialKind::Anomaly),
            _ => None,
        }
    }
}

impl fmt::Display for CelestialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CelestialKind::Region => write!(f, "region"),
            CelestialKind::Constellation => write!(f, "constellation"),
            CelestialKind::SolarSystem => write!(f, "solar system"),
            CelestialKind::Star => write!(f, "star"),
            CelestialKind::Planet => write!(f, "planet"),
            CelestialKind::Moon => write!(f, "moon"),
            CelestialKind::AsteroidBelt => write!(f, "asteroid belt"),
            CelestialKind::Stargate => write!(f, "stargate"),
            CelestialKind::Station => write!(f, "station"),
            CelestialKind::Anomaly => write!(f, "anomaly"),
        }
    }
}

/// Semantic variant of a type row, driving shaper dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Ship,
    Module,
    Celestial(CelestialKind),
    Unknown,
}

impl Variant {
    /// Classify a (category, group) code pair.
    ///
    /// Total over the full integer domain: codes not in the mapping
    /// resolve to `Unknown`.
    pub fn classify(category_id: i64, group_id: i64) -> Self {
        match category_id {
            6 => Variant::Ship,
            7 => Variant::Module,
            2 => match CelestialKind::from_group(group_id) {
                Some(kind) => Variant::Celestial(kind),
                None => Variant::Unknown,
            },
            3 => Variant::Celestial(CelestialKind::Station),
            _ => Variant::Unknown,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Ship => write!(f, "ship"),
            Variant::Module => write!(f, "module"),
            Variant::Celestial(kind) => write!(f, "celestial {}", kind),
            Variant::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ships_and_modules_classify_by_category() {
        assert_eq!(Variant::classify(6, 25), Variant::Ship);
        assert_eq!(Variant::classify(7, 40), Variant::Module);
    }

    #[test]
    fn celestials_classify_by_group() {
        assert_eq!(
            Variant::classify(2, 5),
            Variant::Celestial(CelestialKind::SolarSystem)
        );
        assert_eq!(
            Variant::classify(2, 7),
            Variant::Celestial(CelestialKind::Planet)
        );
        assert_eq!(
            Variant::classify(3, 15),
            Variant::Celestial(CelestialKind::Station)
        );
    }

    #[test]
    fn unrecognized_codes_fall_through_to_unknown() {
        assert_eq!(Variant::classify(0, 0), Variant::Unknown);
        assert_eq!(Variant::classify(-1, 9999), Variant::Unknown);
        assert_eq!(Variant::classify(i64::MAX, i64::MIN), Variant::Unknown);
        // Celestial category with a group outside the enumerated set
        assert_eq!(Variant::classify(2, 12345), Variant::Unknown);
    }

    #[test]
    fn group_codes_map_to_celestial_kinds() {
        assert_eq!(CelestialKind::from_group(3), Some(CelestialKind::Region));
        assert_eq!(CelestialKind::from_group(10), Some(CelestialKind::Stargate));
        assert_eq!(CelestialKind::from_group(995), Some(CelestialKind::Anomaly));
        assert_eq!(CelestialKind::from_group(11), None);
    }
}
