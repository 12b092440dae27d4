use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveTime;
use clap::Subcommand;
use routinely_core::{
    Category, Config, CustomRoutine, Database, Event, Frequency, Routine, RoutineKind,
    RoutineStore, RoutineTemplate, RoutineTracker, RoutineUpdate, TimerDriver,
};

use super::{print_events, resolve_id, short_id, CliResult};

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM ({e})"))
}

#[derive(Subcommand)]
pub enum RoutineAction {
    /// Create a custom routine
    Add {
        /// Routine title
        title: String,
        /// morning, afternoon or evening
        #[arg(long)]
        category: Option<Category>,
        /// Duration in minutes (5-120)
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long, default_value = "")]
        description: String,
        /// standard, gratitude, planning, affirmations or meditation
        #[arg(long, default_value = "standard")]
        kind: RoutineKind,
        /// daily, weekly or monthly
        #[arg(long, default_value = "daily")]
        frequency: Frequency,
        /// Reminder time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        /// Enable reminders
        #[arg(long)]
        notify: bool,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Link the routine to a goal
        #[arg(long)]
        goal: bool,
        /// Message shown when a goal-linked routine is completed
        #[arg(long)]
        encouragement: Option<String>,
    },
    /// Create a routine from a TOML template file
    AddTemplate {
        path: PathBuf,
    },
    /// List routines grouped by time of day
    List {
        #[arg(long)]
        category: Option<Category>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one routine as JSON
    Show {
        /// Routine id or unique prefix
        id: String,
    },
    /// Edit a routine
    Edit {
        /// Routine id or unique prefix
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Duration in minutes
        #[arg(long)]
        duration: Option<u32>,
        /// Reminder time (HH:MM)
        #[arg(long, value_parser = parse_time, conflicts_with = "clear_time")]
        time: Option<NaiveTime>,
        /// Remove the reminder time
        #[arg(long)]
        clear_time: bool,
        /// Enable or disable reminders
        #[arg(long)]
        notify: Option<bool>,
        #[arg(long)]
        frequency: Option<Frequency>,
        /// Jump to a progression week
        #[arg(long)]
        week: Option<u32>,
        #[arg(long)]
        encouragement: Option<String>,
    },
    /// Delete a routine
    Delete {
        /// Routine id or unique prefix
        id: String,
    },
    /// Check or uncheck a routine
    Toggle {
        /// Routine id or unique prefix
        id: String,
        /// Print events as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a journal entry and complete the routine, or show the prompt
    Journal {
        /// Routine id or unique prefix
        id: String,
        /// Entry text; omit to print the prompt
        text: Option<String>,
        /// Print events as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the guided meditation countdown in the foreground (Ctrl-C stops)
    Meditate {
        /// Routine id or unique prefix
        id: String,
    },
}

pub fn run(action: RoutineAction) -> CliResult {
    let config = Config::load()?;
    let mut tracker = RoutineTracker::new(Database::open()?);

    match action {
        RoutineAction::Add {
            title,
            category,
            duration,
            description,
            kind,
            frequency,
            time,
            notify,
            icon,
            color,
            goal,
            encouragement,
        } => {
            let defaults = &config.routines;
            let mut custom = CustomRoutine::new(
                title,
                category.unwrap_or(defaults.default_category),
                duration.unwrap_or(defaults.default_duration_min),
            );
            custom.description = description;
            custom.kind = kind;
            custom.frequency = frequency;
            custom.scheduled_time = time;
            custom.notifications_enabled = notify;
            custom.icon = icon.unwrap_or_else(|| defaults.default_icon.clone());
            custom.color = color.unwrap_or_else(|| defaults.default_color.clone());
            custom.is_goal_linked = goal;
            custom.encouragement_message = encouragement;

            let routine = tracker.add_routine(custom.build()?)?;
            println!("Routine created: {}", routine.id);
            println!("{}", serde_json::to_string_pretty(&routine)?);
        }
        RoutineAction::AddTemplate { path } => {
            let template = RoutineTemplate::load(&path)?;
            let routine = tracker.add_routine(template.instantiate()?)?;
            println!("Routine created: {} ({})", routine.id, template.duration_summary());
            println!("{}", serde_json::to_string_pretty(&routine)?);
        }
        RoutineAction::List { category, json } => {
            let routines: Vec<Routine> = tracker
                .routines()?
                .into_iter()
                .filter(|r| category.map_or(true, |c| r.category == c))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&routines)?);
            } else {
                print_grouped(&routines, &config);
            }
        }
        RoutineAction::Show { id } => {
            let id = resolve_id(tracker.store(), &id)?;
            println!("{}", serde_json::to_string_pretty(&tracker.routine(&id)?)?);
        }
        RoutineAction::Edit {
            id,
            title,
            description,
            duration,
            time,
            clear_time,
            notify,
            frequency,
            week,
            encouragement,
        } => {
            let id = resolve_id(tracker.store(), &id)?;
            let update = RoutineUpdate {
                title,
                description,
                duration_min: duration,
                scheduled_time: if clear_time { Some(None) } else { time.map(Some) },
                notifications_enabled: notify,
                frequency,
                encouragement_message: encouragement.map(Some),
                week,
            };
            if update.is_empty() {
                return Err("nothing to change; pass at least one field".into());
            }
            let routine = tracker.edit_routine(&id, &update)?;
            println!("Routine updated:");
            println!("{}", serde_json::to_string_pretty(&routine)?);
        }
        RoutineAction::Delete { id } => {
            let id = resolve_id(tracker.store(), &id)?;
            let (removed, _) = tracker.delete_routine(&id)?;
            println!("Routine deleted: {} ({})", removed.id, removed.title);
        }
        RoutineAction::Toggle { id, json } => {
            let id = resolve_id(tracker.store(), &id)?;
            let events = tracker.toggle_complete(&id)?;
            if json {
                print_events(&events)?;
            } else {
                report(&tracker.routine(&id)?, &events, &config);
            }
        }
        RoutineAction::Journal { id, text, json } => {
            let id = resolve_id(tracker.store(), &id)?;
            let routine = tracker.routine(&id)?;
            let Some(kind) = routine.kind.journal() else {
                return Err(format!("'{}' is not a journal routine", routine.title).into());
            };
            match text {
                Some(text) => {
                    let events = tracker.save_input_and_complete(&id, &text)?;
                    if json {
                        print_events(&events)?;
                    } else {
                        report(&tracker.routine(&id)?, &events, &config);
                    }
                }
                None => {
                    println!("{}", kind.prompt());
                    match routine.input_value.as_deref().filter(|s| !s.is_empty()) {
                        Some(existing) => println!("Current entry: {existing}"),
                        None => println!("Run `routinely routine journal {} \"...\"` to {}.", short_id(&id), kind.call_to_action()),
                    }
                    if config.display.show_affirmation_examples && !kind.examples().is_empty() {
                        println!("Examples:");
                        for example in kind.examples().iter().take(3) {
                            println!("  - {example}");
                        }
                    }
                }
            }
        }
        RoutineAction::Meditate { id } => {
            let id = resolve_id(tracker.store(), &id)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(meditate(tracker, &config, &id))?;
        }
    }
    Ok(())
}

async fn meditate(tracker: RoutineTracker<Database>, config: &Config, id: &str) -> CliResult {
    let shared = Arc::new(Mutex::new(tracker));
    let (mut driver, mut rx) = TimerDriver::new(Arc::clone(&shared), config.timer.tick_period());

    let started = driver.start(id)?;
    let Some(Event::MeditationStarted { total_secs, .. }) = started.last() else {
        return Err("only pending meditation routines can be started".into());
    };
    println!(
        "Meditation started: {} remaining. Ctrl-C to stop.",
        routinely_core::format_time(*total_secs)
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(Event::TimerSnapshot { formatted, progress_pct, .. }) => {
                    eprint!("\r{formatted} remaining  [{}] {progress_pct}%   ", progress_bar(progress_pct));
                }
                Some(Event::RoutineCompleted { streak, .. }) => {
                    eprintln!();
                    println!("Meditation complete. Streak: {streak}");
                    break;
                }
                Some(_) => {}
                None => break,
            },
            _ = &mut ctrl_c => {
                eprintln!();
                if let Some(Event::MeditationStopped { time_left_secs, .. }) = driver.stop() {
                    println!(
                        "Meditation stopped with {} left; routine not completed.",
                        routinely_core::format_time(time_left_secs)
                    );
                }
                break;
            }
        }
    }
    tracing::debug!(routine_id = id, "foreground meditation finished");
    Ok(())
}

fn progress_bar(pct: u32) -> String {
    const WIDTH: usize = 20;
    let filled = (pct.min(100) as usize * WIDTH) / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(WIDTH - filled))
}

fn report(routine: &Routine, events: &[Event], config: &Config) {
    if events.is_empty() {
        match routine.kind.journal() {
            Some(kind) if !routine.completed => println!(
                "'{}' needs a journal entry first: routinely routine journal {} \"...\" ({})",
                routine.title,
                short_id(&routine.id),
                kind.call_to_action()
            ),
            _ => println!("No change to '{}'", routine.title),
        }
        return;
    }
    for event in events {
        match event {
            Event::MeditationStopped { .. } => println!("Meditation stopped"),
            Event::JournalSaved { chars, .. } => println!("Journal entry saved ({chars} characters)"),
            Event::RoutineCompleted { streak, .. } => {
                println!("Completed: {} (streak {streak})", routine.title);
                if let Some(message) = routine.encouragement(&config.display.encouragement_message) {
                    println!("{message}");
                }
            }
            Event::RoutineReopened { .. } => println!("Unchecked: {}", routine.title),
            _ => {}
        }
    }
}

fn print_grouped(routines: &[Routine], config: &Config) {
    if routines.is_empty() {
        println!("No routines yet. Add one with `routinely routine add`.");
        return;
    }
    for (category, group) in routinely_core::group_by_category(routines) {
        println!("{} {}", category.icon(), category.label());
        for r in group {
            let mark = if r.completed { "x" } else { " " };
            let mut line = format!(
                "  [{mark}] {} {} {} ({} min)",
                short_id(&r.id),
                r.icon,
                r.title,
                r.duration_min
            );
            if r.frequency != Frequency::Daily {
                line.push_str(&format!(" {}", r.frequency.label()));
            }
            if let Some(label) = r.progress_label() {
                line.push_str(&format!(" {label}"));
            }
            if let Some(time) = r.scheduled_time {
                line.push_str(&format!(" ⏰ {}", time.format("%H:%M")));
            }
            if r.streak > 0 {
                line.push_str(&format!(" 🔥{}", r.streak));
            }
            println!("{line}");
            if let Some(kind) = r.kind.journal() {
                match r.input_value.as_deref().filter(|s| !s.is_empty()) {
                    Some(entry) => println!("        “{entry}”"),
                    None if !r.completed => println!("        ✏️  {}", kind.call_to_action()),
                    None => {}
                }
            }
            if let Some(message) = r.encouragement(&config.display.encouragement_message) {
                println!("        {message}");
            }
        }
    }
}
