use crate::commands::{CmdMessage, CmdResult};
use crate::error::{GreenGrowError, Result};
use crate::model::{normalize_name, NewTreeType};
use crate::store::DataStore;
use rust_decimal::Decimal;

pub fn run<S: DataStore>(
    store: &mut S,
    name: &str,
    base_price: Decimal,
    description: Option<String>,
) -> Result<CmdResult> {
    let name = normalize_name(name)?;
    if base_price < Decimal::ZERO {
        return Err(GreenGrowError::InvalidPrice(base_price));
    }
    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let tree_type = store.transaction(|tx| {
        tx.insert_tree_type(&NewTreeType {
            name,
            description,
            base_price,
        })
    })?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added tree type {} (#{}) at {}",
        tree_type.name, tree_type.id, tree_type.base_price
    )));
    Ok(result.with_tree_types(vec![tree_type]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordKind;
    use crate::store::memory::InMemoryStore;
    use rust_decimal_macros::dec;

    #[test]
    fn adds_a_type() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, "  Oak ", dec!(10.00), Some("Quercus".into())).unwrap();

        assert_eq!(result.tree_types.len(), 1);
        let oak = &result.tree_types[0];
        assert_eq!(oak.name, "Oak");
        assert_eq!(oak.base_price, dec!(10.00));
        assert_eq!(oak.description.as_deref(), Some("Quercus"));
        assert_eq!(store.read(|r| r.tree_types()).unwrap().len(), 1);
    }

    #[test]
    fn zero_price_is_allowed() {
        let mut store = InMemoryStore::new();
        assert!(run(&mut store, "Sample", dec!(0), None).is_ok());
    }

    #[test]
    fn rejects_bad_input() {
        let mut store = InMemoryStore::new();
        assert!(matches!(
            run(&mut store, "   ", dec!(1), None),
            Err(GreenGrowError::InvalidName)
        ));
        assert!(matches!(
            run(&mut store, "Oak", dec!(-0.01), None),
            Err(GreenGrowError::InvalidPrice(_))
        ));
        assert!(store.read(|r| r.tree_types()).unwrap().is_empty());
    }

    #[test]
    fn duplicate_name_fails_and_keeps_first() {
        let mut store = InMemoryStore::new();
        run(&mut store, "Oak", dec!(10), None).unwrap();
        let err = run(&mut store, "oak", dec!(12), None).unwrap_err();
        assert!(matches!(
            err,
            GreenGrowError::DuplicateName {
                kind: RecordKind::TreeType,
                ..
            }
        ));
        let types = store.read(|r| r.tree_types()).unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].base_price, dec!(10));
    }
}
