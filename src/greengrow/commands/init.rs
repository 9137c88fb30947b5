use crate::commands::{CmdMessage, CmdResult, GreenGrowPaths};
use crate::error::Result;
use crate::store::DataStore;
use std::fs;

/// Create the data directory and the store schema. Safe to run repeatedly.
pub fn run<S: DataStore>(store: &mut S, paths: &GreenGrowPaths) -> Result<CmdResult> {
    fs::create_dir_all(&paths.data_dir)?;
    store.migrate()?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Initialized greengrow store at {}",
        paths.database.display()
    )));
    Ok(result)
}
