use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{normalize_name, NewLocation};
use crate::store::DataStore;

pub fn run<S: DataStore>(
    store: &mut S,
    name: &str,
    description: Option<String>,
) -> Result<CmdResult> {
    let name = normalize_name(name)?;
    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let location = store.transaction(|tx| tx.insert_location(&NewLocation { name, description }))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added location {} (#{})",
        location.name, location.id
    )));
    Ok(result.with_locations(vec![location]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GreenGrowError, RecordKind};
    use crate::store::memory::InMemoryStore;

    #[test]
    fn adds_locations_in_order() {
        let mut store = InMemoryStore::new();
        run(&mut store, "Greenhouse-A", None).unwrap();
        run(&mut store, "Field 3", Some("  ".into())).unwrap();

        let locations = store.read(|r| r.locations()).unwrap();
        let names: Vec<_> = locations.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Greenhouse-A", "Field 3"]);
        assert!(locations[1].description.is_none());
    }

    #[test]
    fn duplicate_location_is_rejected() {
        let mut store = InMemoryStore::new();
        run(&mut store, "Greenhouse-A", None).unwrap();
        let err = run(&mut store, "greenhouse-a", None).unwrap_err();
        assert!(matches!(
            err,
            GreenGrowError::DuplicateName {
                kind: RecordKind::Location,
                ..
            }
        ));
        assert_eq!(err.exit_code(), 5);
    }
}
