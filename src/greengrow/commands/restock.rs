use crate::commands::helpers::{resolve_location, resolve_tree_type, stock_lines};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::ledger;
use crate::model::{positive_quantity, RecordRef};
use crate::store::DataStore;

pub fn run<S: DataStore>(
    store: &mut S,
    tree_type: &RecordRef,
    location: &RecordRef,
    quantity: i64,
) -> Result<CmdResult> {
    let quantity = positive_quantity(quantity)?;

    let (line, tree_type, location) = store.transaction(|tx| {
        let tree_type = resolve_tree_type(&*tx, tree_type)?;
        let location = resolve_location(&*tx, location)?;
        let entry = ledger::restock(tx, &tree_type, &location, quantity)?;
        let lines = stock_lines(&*tx, vec![entry])?;
        Ok((lines, tree_type.name, location.name))
    })?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Restocked {} {} at {}",
        quantity, tree_type, location
    )));
    Ok(result.with_stock(line))
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
    }

    #[test]
    fn restock_reports_new_total() {
        let mut store = nursery().store;
        run(&mut store, &"Oak".into(), &"Greenhouse-A".into(), 50).unwrap();
        let result = run(&mut store, &"oak".into(), &"greenhouse-a".into(), 5).unwrap();

        assert_eq!(result.stock.len(), 1);
        assert_eq!(result.stock[0].entry.quantity, 55);
        assert_eq!(result.messages[0].content, "Restocked 5 Oak at Greenhouse-A");
    }

    #[test]
    fn unknown_location_writes_nothing() {
        let mut store = nursery().store;
        let err = run(&mut store, &"Oak".into(), &"Shed".into(), 5).unwrap_err();
        assert!(matches!(
            err,
            GreenGrowError::NotFound {
                kind: RecordKind::Location,
                ..
            }
        ));
        let entries = store
            .read(|r| r.stock_entries(&StockFilter::default()))
            .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn quantity_is_checked_before_lookup() {
        let mut store = nursery().store;
        let err = run(&mut store, &"Birch".into(), &"Shed".into(), 0).unwrap_err();
        assert!(matches!(err, GreenGrowError::InvalidQuantity(0)));
    }
}
