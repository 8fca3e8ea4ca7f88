//! Market-group ancestry resolution.
//!
//! Follows `parentGroupId` from a leaf market group to the root,
//! nesting each ancestor under `parentGroup`. Parent pointers come from
//! external data, so the recursion is depth-bounded instead of trusting
//! the chain to be acyclic.

use serde_json::json;

use crate::error::ConvertError;
use crate::sink::Document;
use crate::source::SdeSource;

/// Maximum ancestry depth before the chain is declared cyclic.
pub const MAX_ANCESTRY_DEPTH: usize = 64;

/// Resolve the full ancestry chain for a type's market group.
///
/// A type without a market group (the common case) returns `Ok(None)`
/// without touching the source.
pub fn ancestry(
    source: &SdeSource,
    market_group_id: Option<i64>,
) -> Result<Option<Document>, ConvertError> {
    match market_group_id {
        None => Ok(None),
        Some(id) => resolve(source, id, 0).map(Some),
    }
}

fn resolve(source: &SdeSource, id: i64, depth: usize) -> Result<Document, ConvertError> {
    if depth >= MAX_ANCESTRY_DEPTH {
        return Err(ConvertError::CycleDetected {
            market_group_id: id,
            depth,
        });
    }

    let node = source
        .market_group(id)?
        .ok_or(ConvertError::MissingRelation {
            relation: "market group node",
            owner: "market group",
            owner_id: id,
            found: 0,
        })?;

    let parent = match node.parent_group_id {
        Some(parent_id) => Some(resolve(source, parent_id, depth + 1)?),
        None => None,
    };

    Ok(json!({
        "marketGroupId": node.market_group_id,
        "marketGroupName": node.market_group_name,
        "description": node.description,
        "iconId": node.icon_id,
        "hasTypes": node.has_types,
        "parentGroup": parent,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn market_group_source(rows: &[(i64, Option<i64>)]) -> SdeSource {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE invMarketGroups (
                marketGroupID INTEGER PRIMARY KEY,
                parentGroupID INTEGER,
                marketGroupName TEXT,
                description TEXT,
                iconID INTEGER,
                hasTypes INTEGER
            )",
        )
        .unwrap();
        for (id, parent) in rows {
            conn.execute(
                "INSERT INTO invMarketGroups VALUES (?1, ?2, ?3, NULL, NULL, 1)",
                rusqlite::params![id, parent, format!("group {}", id)],
            )
            .unwrap();
        }
        SdeSource::from_connection(conn)
    }

    #[test]
    fn no_market_group_short_circuits_without_lookups() {
        // A source with no tables at all: any lookup would fail.
        let source = SdeSource::from_connection(Connection::open_in_memory().unwrap());
        assert!(ancestry(&source, None).unwrap().is_none());
    }

    #[test]
    fn chain_nests_one_level_per_ancestor() {
        let source = market_group_source(&[(1, None), (2, Some(1)), (3, Some(2))]);
        let chain = ancestry(&source, Some(3)).unwrap().unwrap();

        assert_eq!(chain["marketGroupId"], 3);
        assert_eq!(chain["parentGroup"]["marketGroupId"], 2);
        assert_eq!(chain["parentGroup"]["parentGroup"]["marketGroupId"], 1);
        assert!(chain["parentGroup"]["parentGroup"]["parentGroup"].is_null());
    }

    #[test]
    fn cyclic_chain_fails_within_the_bound() {
        let source = market_group_source(&[(1, Some(2)), (2, Some(1))]);
        let err = ancestry(&source, Some(1)).unwrap_err();
        assert!(matches!(err, ConvertError::CycleDetected { .. }));
    }

    #[test]
    fn self_referential_node_fails_within_the_bound() {
        let source = market_group_source(&[(7, Some(7))]);
        let err = ancestry(&source, Some(7)).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::CycleDetected {
                market_group_id: 7,
                ..
            }
        ));
    }

    #[test]
    fn missing_node_is_a_missing_relation() {
        let source = market_group_source(&[(1, Some(99))]);
        let err = ancestry(&source, Some(1)).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MissingRelation {
                owner_id: 99,
                found: 0,
                ..
            }
        ));
    }
}
