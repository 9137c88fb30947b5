use crate::error::{GreenGrowError, RecordKind, Result};
use crate::model::{line_amount, Location, RecordRef, Sale, SaleLine, StockEntry, StockLine, TreeType};
use crate::store::StoreReader;
use std::collections::HashMap;

pub fn resolve_tree_type<R: StoreReader + ?Sized>(
    reader: &R,
    reference: &RecordRef,
) -> Result<TreeType> {
    let found = match reference {
        RecordRef::Id(id) => reader.tree_type(*id)?,
        RecordRef::Name(name) => reader.tree_type_by_name(name)?,
    };
    found.ok_or_else(|| GreenGrowError::not_found(RecordKind::TreeType, reference.to_string()))
}

pub fn resolve_location<R: StoreReader + ?Sized>(
    reader: &R,
    reference: &RecordRef,
) -> Result<Location> {
    let found = match reference {
        RecordRef::Id(id) => reader.location(*id)?,
        RecordRef::Name(name) => reader.location_by_name(name)?,
    };
    found.ok_or_else(|| GreenGrowError::not_found(RecordKind::Location, reference.to_string()))
}

/// Joins stock entries with their type and location names.
///
/// Entries whose referenced records are missing are skipped; the schema does not
/// allow them, so they only appear with hand-edited databases.
pub fn stock_lines<R: StoreReader + ?Sized>(
    reader: &R,
    entries: Vec<StockEntry>,
) -> Result<Vec<StockLine>> {
    let types: HashMap<_, _> = reader
        .tree_types()?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();
    let locations: HashMap<_, _> = reader
        .locations()?
        .into_iter()
        .map(|l| (l.id, l.name))
        .collect();

    let mut lines = Vec::with_capacity(entries.len());
    for entry in entries {
        let (Some(tree_type), Some(location)) = (
            types.get(&entry.tree_type_id),
            locations.get(&entry.location_id),
        ) else {
            continue;
        };
        lines.push(StockLine {
            tree_type: tree_type.name.clone(),
            location: location.clone(),
            unit_price: tree_type.base_price,
            value: line_amount(tree_type.base_price, entry.quantity)?,
            entry,
        });
    }
    Ok(lines)
}

pub fn sale_lines<R: StoreReader + ?Sized>(reader: &R, sales: Vec<Sale>) -> Result<Vec<SaleLine>> {
    let names: HashMap<_, _> = reader
        .tree_types()?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    Ok(sales
        .into_iter()
        .map(|sale| SaleLine {
            tree_type: names
                .get(&sale.tree_type_id)
                .cloned()
                .unwrap_or_else(|| format!("#{}", sale.tree_type_id)),
            sale,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::{DataStore, StockFilter};
    use rust_decimal_macros::dec;

    #[test]
    fn resolves_by_name_ignoring_case_and_by_id() {
        let store = StoreFixture::new()
            .with_type("Oak", dec!(10))
            .with_location("Greenhouse-A")
            .store;

        let oak = store
            .read(|r| resolve_tree_type(r, &"oak".into()))
            .unwrap();
        assert_eq!(oak.name, "Oak");

        let same = store
            .read(|r| resolve_tree_type(r, &RecordRef::Id(oak.id)))
            .unwrap();
        assert_eq!(same, oak);

        let loc = store
            .read(|r| resolve_location(r, &"GREENHOUSE-A".into()))
            .unwrap();
        assert_eq!(loc.name, "Greenhouse-A");
    }

    #[test]
    fn unknown_references_are_not_found() {
        let store = StoreFixture::new().with_type("Oak", dec!(10)).store;

        let err = store
            .read(|r| resolve_tree_type(r, &"Birch".into()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Tree type not found: Birch");

        // An id that belongs to a different kind of record
        let err = store
            .read(|r| resolve_location(r, &RecordRef::Id(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            GreenGrowError::NotFound {
                kind: RecordKind::Location,
                ..
            }
        ));
    }

    #[test]
    fn stock_lines_carry_names_and_price() {
        let store = StoreFixture::new()
            .with_type("Oak", dec!(10.00))
            .with_location("Greenhouse-A")
            .with_stock("Oak", "Greenhouse-A", 30)
            .store;

        let lines = store
            .read(|r| {
                let entries = r.stock_entries(&StockFilter::default())?;
                stock_lines(r, entries)
            })
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].tree_type, "Oak");
        assert_eq!(lines[0].location, "Greenhouse-A");
        assert_eq!(lines[0].value, dec!(300.00));
    }

    #[test]
    fn stock_value_beyond_decimal_range_is_an_error() {
        let store = StoreFixture::new()
            .with_type("Oak", rust_decimal::Decimal::MAX)
            .with_location("Greenhouse-A")
            .with_stock("Oak", "Greenhouse-A", 2)
            .store;

        let err = store
            .read(|r| {
                let entries = r.stock_entries(&StockFilter::default())?;
                stock_lines(r, entries)
            })
            .unwrap_err();
        assert!(matches!(err, GreenGrowError::Overflow(_)));
    }
}
