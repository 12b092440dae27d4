//! Integration tests for routine completion and the meditation countdown.
//!
//! These tests drive a tracker the way a surface does: start a meditation,
//! tick it, toggle routines, save journal entries, and check what ends up
//! in the store.

use routinely_core::{
    Category, CustomRoutine, Event, JournalKind, MemoryStore, RoutineKind, RoutineTracker,
};

fn add(tracker: &mut RoutineTracker<MemoryStore>, title: &str, kind: RoutineKind, minutes: u32) -> String {
    let mut custom = CustomRoutine::new(title, Category::Morning, minutes);
    custom.kind = kind;
    tracker.add_routine(custom.build().unwrap()).unwrap().id
}

fn completions_for(events: &[Event], id: &str) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::RoutineCompleted { routine_id, .. } if routine_id == id))
        .count()
}

#[test]
fn test_ten_minute_meditation_completes_once() {
    let mut tracker = RoutineTracker::new(MemoryStore::new());
    let id = add(&mut tracker, "Morning meditation", RoutineKind::Meditation, 10);

    tracker.start_meditation(&id).unwrap();
    assert_eq!(tracker.timer().time_left_secs(), 600);
    assert_eq!(tracker.timer().total_secs(), 600);

    let mut events = Vec::new();
    for _ in 0..600 {
        events.extend(tracker.tick().unwrap());
    }
    assert_eq!(completions_for(&events, &id), 1);
    assert!(tracker.timer().is_idle());

    // Ticks after expiry are inert.
    for _ in 0..50 {
        assert!(tracker.tick().unwrap().is_empty());
    }
    assert_eq!(tracker.routine(&id).unwrap().streak, 1);
}

#[test]
fn test_manual_completion_during_countdown_counts_once() {
    let mut tracker = RoutineTracker::new(MemoryStore::new());
    let id = add(&mut tracker, "Meditation", RoutineKind::Meditation, 5);

    tracker.start_meditation(&id).unwrap();
    let mut events = Vec::new();
    for _ in 0..120 {
        events.extend(tracker.tick().unwrap());
    }
    events.extend(tracker.toggle_complete(&id).unwrap());
    for _ in 0..600 {
        events.extend(tracker.tick().unwrap());
    }

    assert_eq!(completions_for(&events, &id), 1);
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::MeditationCompleted { .. })));
    assert!(tracker.timer().is_idle());
}

#[test]
fn test_switching_meditations_discards_first() {
    let mut tracker = RoutineTracker::new(MemoryStore::new());
    let a = add(&mut tracker, "Breathing", RoutineKind::Meditation, 5);
    let b = add(&mut tracker, "Body scan", RoutineKind::Meditation, 5);

    tracker.start_meditation(&a).unwrap();
    for _ in 0..100 {
        tracker.tick().unwrap();
    }
    let switched = tracker.start_meditation(&b).unwrap();
    assert!(matches!(&switched[0], Event::MeditationDiscarded { routine_id, .. } if *routine_id == a));
    assert_eq!(tracker.timer().active_routine(), Some(b.as_str()));
    assert_eq!(tracker.formatted_time_left(), "5:00");

    let mut events = Vec::new();
    for _ in 0..300 {
        events.extend(tracker.tick().unwrap());
    }
    assert_eq!(completions_for(&events, &a), 0);
    assert_eq!(completions_for(&events, &b), 1);
    assert!(!tracker.routine(&a).unwrap().completed);
}

#[test]
fn test_undo_never_lowers_streak() {
    let mut tracker = RoutineTracker::new(MemoryStore::new());
    let id = add(&mut tracker, "Drink water", RoutineKind::Standard, 5);

    for _ in 0..3 {
        tracker.toggle_complete(&id).unwrap(); // complete
        tracker.toggle_complete(&id).unwrap(); // undo
    }
    let routine = tracker.routine(&id).unwrap();
    assert!(!routine.completed);
    assert_eq!(routine.streak, 3);
}

#[test]
fn test_journal_flow() {
    let mut tracker = RoutineTracker::new(MemoryStore::new());
    let id = add(
        &mut tracker,
        "Gratitude",
        RoutineKind::Journal(JournalKind::Gratitude),
        5,
    );

    // Blocked until there is an entry.
    assert!(tracker.toggle_complete(&id).unwrap().is_empty());
    assert!(!tracker.routine(&id).unwrap().completed);

    tracker.begin_editing(&id).unwrap();
    let events = tracker
        .save_input_and_complete(&id, "Morning light, a good book")
        .unwrap();
    assert!(matches!(events[0], Event::JournalSaved { chars: 26, .. }));
    let routine = tracker.routine(&id).unwrap();
    assert!(routine.completed);
    assert_eq!(routine.streak, 1);

    // Undo is always allowed, and the entry is kept so re-checking works.
    assert_eq!(tracker.toggle_complete(&id).unwrap().len(), 1);
    assert!(tracker.can_toggle(&id).unwrap());
    tracker.toggle_complete(&id).unwrap();
    assert_eq!(tracker.routine(&id).unwrap().streak, 2);
}

#[test]
fn test_summary_reflects_completions() {
    let mut tracker = RoutineTracker::new(MemoryStore::new());
    let a = add(&mut tracker, "Walk", RoutineKind::Standard, 10);
    add(&mut tracker, "Read", RoutineKind::Standard, 10);
    tracker.toggle_complete(&a).unwrap();

    let summary = tracker.summary().unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.completed_today, 1);
    assert_eq!(summary.total_streak, 1);
    assert_eq!(summary.completion_pct(), 50);
}
