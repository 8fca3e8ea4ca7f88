//! Document shapers for type rows.
//!
//! Each shaper projects one classified type row plus its joined details
//! into one output document. Shapers only read their inputs; insertion
//! happens in the converter. Ship, module, and unknown documents share
//! the same base field set and all carry both `Attributes` and
//! `Effects`; which fields a variant includes is part of the output
//! contract.

use serde_json::{json, Map, Value};

use crate::error::ConvertError;
use crate::sink::Document;
use crate::source::rows::{AttributeRow, EffectRow, TypeBundle};

/// Joined details for one type, fetched before shaping.
#[derive(Debug, Clone)]
pub struct TypeDetails {
    pub attributes: Vec<AttributeRow>,
    pub effects: Vec<EffectRow>,
    pub market_group: Option<Document>,
}

/// Shape a ship document.
pub fn ship(bundle: &TypeBundle, details: &TypeDetails) -> Result<Document, ConvertError> {
    let mut doc = base_document(bundle)?;
    attach_details(&mut doc, details)?;
    Ok(Value::Object(doc))
}

/// Shape a module document.
pub fn module(bundle: &TypeBundle, details: &TypeDetails) -> Result<Document, ConvertError> {
    let mut doc = base_document(bundle)?;
    attach_details(&mut doc, details)?;
    Ok(Value::Object(doc))
}

/// Shape a document for any type without a dedicated shaper. This is
/// the catch-all path, not an error path.
pub fn unknown(bundle: &TypeBundle, details: &TypeDetails) -> Result<Document, ConvertError> {
    let mut doc = base_document(bundle)?;
    attach_details(&mut doc, details)?;
    Ok(Value::Object(doc))
}

/// The field set common to every type document: identity, physical
/// properties, market-group id, and the nested group/category rows.
fn base_document(bundle: &TypeBundle) -> Result<Map<String, Value>, ConvertError> {
    let t = &bundle.type_row;
    let doc = json!({
        "uniqueId": t.type_id,
        "typeId": t.type_id,
        "typeName": t.type_name,
        "volume": t.volume,
        "raceId": t.race_id,
        "published": t.published,
        "portionSize": t.portion_size,
        "mass": t.mass,
        "marketGroupId": t.market_group_id,
        "iconId": t.icon_id,
        "groupId": t.group_id,
        "description": t.description,
        "chanceOfDuplicating": t.chance_of_duplicating,
        "capacity": t.capacity,
        "basePrice": t.base_price,
        "Group": serde_json::to_value(&bundle.group)?,
        "Category": serde_json::to_value(&bundle.category)?,
    });
    match doc {
        Value::Object(map) => Ok(map),
        _ => unreachable!(),
    }
}

fn attach_details(doc: &mut Map<String, Value>, details: &TypeDetails) -> Result<(), ConvertError> {
    doc.insert(
        "marketGroup".to_string(),
        details.market_group.clone().unwrap_or(Value::Null),
    );
    doc.insert(
        "Attributes".to_string(),
        serde_json::to_value(&details.attributes)?,
    );
    doc.insert(
        "Effects".to_string(),
        serde_json::to_value(&details.effects)?,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::rows::{CategoryRow, GroupRow, TypeRow};

    fn bundle() -> TypeBundle {
        TypeBundle {
            type_row: TypeRow {
                type_id: 587,
                type_name: Some("Rifter".to_string()),
                volume: Some(27289.0),
                race_id: Some(2),
                published: Some(true),
                portion_size: Some(1),
                mass: Some(1067000.0),
                market_group_id: None,
                icon_id: None,
                group_id: 25,
                description: Some("Fast frigate".to_string()),
                chance_of_duplicating: None,
                capacity: Some(140.0),
                base_price: Some(33750.0),
            },
            group: GroupRow {
                group_id: 25,
                category_id: 6,
                group_name: Some("Frigate".to_string()),
                icon_id: None,
                use_base_price: Some(true),
                allow_manufacture: Some(true),
                allow_recycler: Some(true),
                anchored: Some(false),
                anchorable: Some(false),
                fittable_non_singleton: Some(false),
                published: Some(true),
            },
            category: CategoryRow {
                category_id: 6,
                category_name: Some("Ship".to_string()),
                description: None,
                icon_id: None,
                published: Some(true),
            },
        }
    }

    fn attribute(attribute_id: i64) -> AttributeRow {
        AttributeRow {
            type_id: 587,
            value_int: Some(4),
            value_float: None,
            attribute_id,
            attribute_name: Some(format!("attribute {}", attribute_id)),
            description: None,
            icon_id: None,
            default_value: Some(0.0),
            published: Some(true),
            display_name: None,
            stackable: Some(true),
            high_is_good: Some(true),
            category_id: Some(1),
            category_name: Some("Fitting".to_string()),
            category_description: None,
            unit_id: Some(1),
            unit_name: Some("Length".to_string()),
            unit_display_name: Some("m".to_string()),
            unit_description: None,
        }
    }

    #[test]
    fn ship_document_carries_identity_and_details() {
        let details = TypeDetails {
            attributes: vec![attribute(12), attribute(13)],
            effects: vec![],
            market_group: None,
        };

        let doc = ship(&bundle(), &details).unwrap();

        assert_eq!(doc["typeId"], 587);
        assert_eq!(doc["uniqueId"], 587);
        assert_eq!(doc["typeName"], "Rifter");
        assert_eq!(doc["Attributes"].as_array().unwrap().len(), 2);
        assert_eq!(doc["Effects"].as_array().unwrap().len(), 0);
        assert_eq!(doc["Group"]["groupName"], "Frigate");
        assert_eq!(doc["Category"]["categoryName"], "Ship");
        assert!(doc["marketGroup"].is_null());
    }

    #[test]
    fn shapers_do_not_differ_on_the_base_field_set() {
        let details = TypeDetails {
            attributes: vec![attribute(12)],
            effects: vec![],
            market_group: None,
        };
        let b = bundle();

        let ship_doc = ship(&b, &details).unwrap();
        let module_doc = module(&b, &details).unwrap();
        let unknown_doc = unknown(&b, &details).unwrap();

        for key in ["typeId", "mass", "Group", "Attributes"] {
            assert_eq!(ship_doc[key], module_doc[key]);
            assert_eq!(ship_doc[key], unknown_doc[key]);
        }
    }

    #[test]
    fn market_group_chain_embeds_when_present() {
        let details = TypeDetails {
            attributes: vec![],
            effects: vec![],
            market_group: Some(json!({
                "marketGroupId": 64,
                "parentGroup": null,
            })),
        };

        let doc = module(&bundle(), &details).unwrap();
        assert_eq!(doc["marketGroup"]["marketGroupId"], 64);
    }
}
