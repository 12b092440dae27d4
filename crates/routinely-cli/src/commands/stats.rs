use routinely_core::{Database, RoutineTracker};

use super::CliResult;

pub fn run(json: bool) -> CliResult {
    let tracker = RoutineTracker::new(Database::open()?);
    let summary = tracker.summary()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "Today: {}/{} routines done ({}%)",
        summary.completed_today,
        summary.total,
        summary.completion_pct()
    );
    for group in &summary.by_category {
        println!(
            "  {} {:<10} {}/{}",
            group.category.icon(),
            group.category.label(),
            group.completed,
            group.total
        );
    }
    println!("Combined streak: {}", summary.total_streak);
    Ok(())
}
