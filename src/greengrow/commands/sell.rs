use crate::commands::helpers::{resolve_location, resolve_tree_type, sale_lines, stock_lines};
use crate::commands::{CmdMessage, CmdResult};
use crate::config::SalePolicy;
use crate::error::Result;
use crate::ledger;
use crate::model::{positive_quantity, RecordRef};
use crate::store::DataStore;

/// Record a sale of `quantity` seedlings at the type's current base price.
///
/// `location` restricts the sale to one stock entry; without it, `policy`
/// picks the entries.
pub fn run<S: DataStore>(
    store: &mut S,
    tree_type: &RecordRef,
    quantity: i64,
    location: Option<&RecordRef>,
    policy: SalePolicy,
) -> Result<CmdResult> {
    let quantity = positive_quantity(quantity)?;

    let (sales, stock) = store.transaction(|tx| {
        let tree_type = resolve_tree_type(&*tx, tree_type)?;
        let location = location
            .map(|reference| resolve_location(&*tx, reference))
            .transpose()?;
        let outcome = ledger::record_sale(tx, &tree_type, quantity, location.as_ref(), policy)?;
        let stock = stock_lines(&*tx, outcome.drawn.into_iter().map(|d| d.entry).collect())?;
        let sales = sale_lines(&*tx, vec![outcome.sale])?;
        Ok((sales, stock))
    })?;

    let mut result = CmdResult::default();
    if let Some(line) = sales.first() {
        result.add_message(CmdMessage::success(format!(
            "Sold {} {} at {} each (total {})",
            line.sale.quantity, line.tree_type, line.sale.unit_price, line.sale.total_amount
        )));
    }
    for line in stock.iter().filter(|l| l.entry.quantity == 0) {
        result.add_message(CmdMessage::warning(format!(
            "{} at {} is now out of stock",
            line.tree_type, line.location
        )));
    }
    Ok(result.with_sales(sales).with_stock(stock))
}
