pub mod config;
pub mod routine;
pub mod stats;

use routinely_core::{Event, RoutineStore};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Resolve a full id or a unique id prefix to a routine id.
pub fn resolve_id<S: RoutineStore>(store: &S, query: &str) -> CliResult<String> {
    let routines = store.routines()?;
    if let Some(exact) = routines.iter().find(|r| r.id == query) {
        return Ok(exact.id.clone());
    }
    let matches: Vec<_> = routines.iter().filter(|r| r.id.starts_with(query)).collect();
    match matches.as_slice() {
        [only] => Ok(only.id.clone()),
        [] => Err(format!("Routine not found: {query}").into()),
        _ => Err(format!("Ambiguous id prefix '{query}' matches {} routines", matches.len()).into()),
    }
}

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Print events as one JSON document per line.
pub fn print_events(events: &[Event]) -> CliResult {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}
