use crate::commands::helpers::{resolve_location, resolve_tree_type, sale_lines, stock_lines};
use crate::commands::CmdResult;
use crate::error::{GreenGrowError, Result};
use crate::model::RecordRef;
use crate::store::{DataStore, SaleFilter, StockFilter};
use chrono::{DateTime, Days, NaiveDate, Utc};

pub fn stock<S: DataStore>(
    store: &S,
    tree_type: Option<&RecordRef>,
    location: Option<&RecordRef>,
) -> Result<CmdResult> {
    let lines = store.read(|r| {
        let filter = StockFilter {
            tree_type_id: tree_type
                .map(|t| resolve_tree_type(r, t).map(|t| t.id))
                .transpose()?,
            location_id: location
                .map(|l| resolve_location(r, l).map(|l| l.id))
                .transpose()?,
        };
        let entries = r.stock_entries(&filter)?;
        stock_lines(r, entries)
    })?;
    Ok(CmdResult::default().with_stock(lines))
}

/// Sales between `from` and `to`, both whole UTC days and both inclusive.
pub fn sales<S: DataStore>(
    store: &S,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<CmdResult> {
    let filter = sale_window(from, to)?;
    let lines = store.read(|r| {
        let sales = r.sales(&filter)?;
        sale_lines(r, sales)
    })?;
    Ok(CmdResult::default().with_sales(lines))
}

pub fn tree_types<S: DataStore>(store: &S) -> Result<CmdResult> {
    let types = store.read(|r| r.tree_types())?;
    Ok(CmdResult::default().with_tree_types(types))
}

pub fn locations<S: DataStore>(store: &S) -> Result<CmdResult> {
    let locations = store.read(|r| r.locations())?;
    Ok(CmdResult::default().with_locations(locations))
}

fn sale_window(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<SaleFilter> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(GreenGrowError::InvalidDateRange { from, to });
        }
    }
    Ok(SaleFilter {
        from: from.map(start_of_day),
        until: to
            .and_then(|day| day.checked_add_days(Days::new(1)))
            .map(start_of_day),
    })
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}
