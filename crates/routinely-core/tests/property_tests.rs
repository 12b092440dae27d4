//! Property-based tests for the completion policy and meditation timer.

use proptest::prelude::*;

use routinely_core::{
    format_time, Category, CompletionPolicy, CustomRoutine, Event, JournalKind, MeditationTimer,
    Routine, RoutineKind,
};

fn kind_strategy() -> impl Strategy<Value = RoutineKind> {
    prop_oneof![
        Just(RoutineKind::Standard),
        Just(RoutineKind::Meditation),
        Just(RoutineKind::Journal(JournalKind::Gratitude)),
        Just(RoutineKind::Journal(JournalKind::Planning)),
        Just(RoutineKind::Journal(JournalKind::Affirmations)),
    ]
}

fn routine(kind: RoutineKind, minutes: u32) -> Routine {
    let mut custom = CustomRoutine::new("Routine", Category::Afternoon, 10);
    custom.kind = kind;
    let mut r = Routine::from_new("r", custom.build().unwrap());
    r.duration_min = minutes;
    r
}

proptest! {
    /// Routines without a journal prompt can always be toggled.
    #[test]
    fn non_journal_always_toggles(
        meditation in any::<bool>(),
        input in proptest::option::of(".*"),
        completed in any::<bool>(),
        editing in any::<bool>(),
    ) {
        let kind = if meditation { RoutineKind::Meditation } else { RoutineKind::Standard };
        let mut r = routine(kind, 10);
        r.input_value = input;
        r.completed = completed;
        prop_assert!(CompletionPolicy::can_toggle(&r, editing));
    }

    /// Journal routines toggle iff they have an entry, are being edited, or are done.
    #[test]
    fn journal_toggle_gate(
        kind in kind_strategy().prop_filter("journal only", |k| k.requires_input()),
        input in proptest::option::of("[a-z]{0,8}"),
        completed in any::<bool>(),
        editing in any::<bool>(),
    ) {
        let mut r = routine(kind, 10);
        let has_input = input.as_deref().is_some_and(|s| !s.is_empty());
        r.input_value = input;
        r.completed = completed;
        prop_assert_eq!(
            CompletionPolicy::can_toggle(&r, editing),
            has_input || editing || completed
        );
    }

    /// Start seeds the slot with duration * 60 seconds.
    #[test]
    fn start_seeds_duration(minutes in 1u32..=180) {
        let mut timer = MeditationTimer::new();
        timer.start(&routine(RoutineKind::Meditation, minutes));
        prop_assert_eq!(timer.time_left_secs(), u64::from(minutes) * 60);
        prop_assert_eq!(timer.total_secs(), u64::from(minutes) * 60);
    }

    /// Any number of ticks yields at most one completion, exactly one once
    /// the full duration has elapsed.
    #[test]
    fn at_most_one_completion(minutes in 1u32..=5, ticks in 0usize..700) {
        let mut timer = MeditationTimer::new();
        timer.start(&routine(RoutineKind::Meditation, minutes));
        let completions = (0..ticks)
            .filter_map(|_| timer.tick())
            .filter(|e| matches!(e, Event::MeditationCompleted { .. }))
            .count();
        let expected = usize::from(ticks >= minutes as usize * 60);
        prop_assert_eq!(completions, expected);
        prop_assert_eq!(timer.is_idle(), expected == 1);
    }

    /// Progress stays within 0..=1 and grows with elapsed ticks.
    #[test]
    fn progress_is_bounded(ticks in 0usize..600) {
        let mut timer = MeditationTimer::new();
        timer.start(&routine(RoutineKind::Meditation, 10));
        let mut last = timer.progress_fraction();
        for _ in 0..ticks {
            timer.tick();
            let now = timer.progress_fraction();
            prop_assert!((0.0..=1.0).contains(&now));
            prop_assert!(now >= last);
            last = now;
        }
    }

    /// Formatting keeps seconds at two digits and recovers the input.
    #[test]
    fn format_time_shape(secs in 0u64..100_000) {
        let s = format_time(secs);
        let (mins, rest) = s.split_once(':').unwrap();
        prop_assert_eq!(rest.len(), 2);
        prop_assert_eq!(mins.parse::<u64>().unwrap() * 60 + rest.parse::<u64>().unwrap(), secs);
    }
}
