use crate::commands::helpers::{resolve_location, resolve_tree_type, stock_lines};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::ledger;
use crate::model::{positive_quantity, RecordRef};
use crate::store::DataStore;

pub fn run<S: DataStore>(
    store: &mut S,
    tree_type: &RecordRef,
    source: &RecordRef,
    destination: &RecordRef,
    quantity: i64,
) -> Result<CmdResult> {
    let quantity = positive_quantity(quantity)?;

    let (lines, summary) = store.transaction(|tx| {
        let tree_type = resolve_tree_type(&*tx, tree_type)?;
        let source = resolve_location(&*tx, source)?;
        let destination = resolve_location(&*tx, destination)?;
        let moved = ledger::transfer(tx, &tree_type, &source, &destination, quantity)?;
        let lines = stock_lines(&*tx, vec![moved.source, moved.destination])?;
        let summary = format!(
            "Moved {} {} from {} to {}",
            quantity, tree_type.name, source.name, destination.name
        );
        Ok((lines, summary))
    })?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(summary));
    Ok(result.with_stock(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GreenGrowError, RecordKind};
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::StockFilter;
    use rust_decimal_macros::dec;

    fn nursery() -> StoreFixture {
        StoreFixture::new()
            .with_type("Oak", dec!(10.00))
            .with_location("Greenhouse-A")
            .with_location("Greenhouse-B")
            .with_stock("Oak", "Greenhouse-A", 30)
    }

    fn quantities<S: DataStore>(store: &S) -> Vec<i64> {
        store
            .read(|r| r.stock_entries(&StockFilter::default()))
            .unwrap()
            .iter()
            .map(|e| e.quantity)
            .collect()
    }

    #[test]
    fn moves_stock_between_locations() {
        let mut store = nursery().store;
        let result = run(
            &mut store,
            &"Oak".into(),
            &"Greenhouse-A".into(),
            &"Greenhouse-B".into(),
            10,
        )
        .unwrap();

        assert_eq!(result.stock.len(), 2);
        assert_eq!(result.stock[0].location, "Greenhouse-A");
        assert_eq!(result.stock[0].entry.quantity, 20);
        assert_eq!(result.stock[1].location, "Greenhouse-B");
        assert_eq!(result.stock[1].entry.quantity, 10);
        assert_eq!(quantities(&store), vec![20, 10]);
    }

    #[test]
    fn overdrawn_transfer_changes_nothing() {
        let mut store = nursery().store;
        let err = run(
            &mut store,
            &"Oak".into(),
            &"Greenhouse-A".into(),
            &"Greenhouse-B".into(),
            40,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GreenGrowError::InsufficientStock {
                requested: 40,
                available: 30,
                ..
            }
        ));
        assert_eq!(err.exit_code(), 4);
        assert_eq!(quantities(&store), vec![30]);
    }

    #[test]
    fn source_without_entry_is_not_found() {
        let mut store = nursery().store;
        let err = run(
            &mut store,
            &"Oak".into(),
            &"Greenhouse-B".into(),
            &"Greenhouse-A".into(),
            1,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GreenGrowError::NotFound {
                kind: RecordKind::StockEntry,
                ..
            }
        ));
    }

    #[test]
    fn same_location_is_rejected() {
        let mut store = nursery().store;
        let err = run(
            &mut store,
            &"Oak".into(),
            &"Greenhouse-A".into(),
            &"greenhouse-a".into(),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, GreenGrowError::SameLocation(_)));
        assert_eq!(quantities(&store), vec![30]);
    }
}
