//! End-to-end race scenarios through the public API.

use crossbeam_channel::unbounded;
use paddock::actor::{RaceActor, RaceEvent, RacePlan};
use paddock::race::{RaceState, ScriptedSource, SeededSource};
use paddock::{Finish, Horse, Race, RaceRules, TextSurface};
use proptest::prelude::*;

/// Every move draw succeeds for confidence > 0 and no fall draw does.
fn sure_footed() -> Box<ScriptedSource> {
    Box::new(ScriptedSource::new([0.0, 0.5]))
}

fn race(length: u32, horses: &[(char, &str, f64)], source: Box<ScriptedSource>) -> Race<TextSurface> {
    let mut race = Race::with_parts(length, TextSurface::new(), RaceRules::unpaced(), source).unwrap();
    for (i, (symbol, name, confidence)) in horses.iter().enumerate() {
        race.add_horse(Horse::new(*symbol, *name, *confidence), i + 1)
            .unwrap();
    }
    race
}

#[test_log::test]
fn confident_horse_wins_in_exactly_length_ticks() {
    let mut race = race(5, &[('A', "Arrow", 1.0), ('B', "Boulder", 0.0)], sure_footed());
    let outcome = race.start_race().unwrap();

    assert_eq!(outcome.ticks, 5);
    assert_eq!(
        outcome.finish,
        Finish::Winner {
            lane: 1,
            name: "Arrow".to_string(),
            confidence: 1.0,
        }
    );
    assert_eq!(race.state(), RaceState::Finished);

    let expected = "==\n\
                    |     A|Arrow (Current Confidence 1.0)\n\
                    |B     |Boulder (Current Confidence 0.0)\n\
                    |       |\n\
                    ==\n\
                    And the winner is Arrow";
    assert_eq!(race.surface().text(), expected);
}

#[test_log::test]
fn all_zero_confidence_stops_without_a_tick() {
    let mut race = race(5, &[('A', "Idle", 0.0), ('B', "Lazy", 0.0)], sure_footed());
    let outcome = race.start_race().unwrap();

    assert_eq!(outcome.ticks, 0);
    assert_eq!(outcome.finish, Finish::Stalled);
    assert_eq!(outcome.finish.winner_name(), None);
    assert!(race.surface().text().is_empty());
}

#[test_log::test]
fn simultaneous_finish_goes_to_lowest_lane() {
    let mut race = race(
        3,
        &[('A', "Ace", 1.0), ('B', "Bee", 1.0), ('C', "Cob", 1.0)],
        sure_footed(),
    );
    let outcome = race.start_race().unwrap();

    assert_eq!(outcome.ticks, 3);
    assert_eq!(outcome.finish.winner_name(), Some("Ace"));
    let horses = race.into_horses();
    assert!(horses.iter().all(|(_, h)| h.distance_travelled() == 3));
}

#[test_log::test]
fn seeded_races_replay_identically() {
    let run = || {
        let mut race = Race::with_parts(
            12,
            TextSurface::new(),
            RaceRules::unpaced(),
            Box::new(SeededSource::from_seed(99)),
        )
        .unwrap();
        race.add_horse(Horse::new('♘', "Pegasus", 0.7), 1).unwrap();
        race.add_horse(Horse::new('♞', "Nightmare", 0.5), 2).unwrap();
        race.add_horse(Horse::new('♜', "Rook", 0.3), 3).unwrap();
        let outcome = race.start_race().unwrap();
        (outcome, race.surface().text().to_string())
    };

    assert_eq!(run(), run());
}

#[test_log::test]
fn race_thread_streams_the_same_text() {
    let (tx, rx) = unbounded();
    let plan = RacePlan::new(
        5,
        vec![Horse::new('A', "Arrow", 1.0), Horse::new('B', "Boulder", 0.0)],
        RaceRules::unpaced(),
    )
    .with_source(sure_footed());
    RaceActor::spawn(plan, tx).join();

    let mut view = TextSurface::new();
    let mut winner = None;
    for event in rx.try_iter() {
        match event {
            RaceEvent::Surface(update) => view.apply(update),
            RaceEvent::Finished { outcome, horses } => {
                winner = outcome.unwrap().finish.winner_name().map(str::to_string);
                assert_eq!(horses[0].1.confidence(), 1.0);
            }
        }
    }

    assert_eq!(winner.as_deref(), Some("Arrow"));
    let mut direct = race(5, &[('A', "Arrow", 1.0), ('B', "Boulder", 0.0)], sure_footed());
    direct.start_race().unwrap();
    assert_eq!(view.text(), direct.surface().text());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn seeded_races_end_in_a_consistent_state(
        seed in any::<u64>(),
        length in 1u32..12,
        confidences in prop::collection::vec(0.1f64..=1.0, 2..=3),
    ) {
        let mut race = Race::with_parts(
            length,
            TextSurface::new(),
            RaceRules::unpaced(),
            Box::new(SeededSource::from_seed(seed)),
        )
        .unwrap();
        for (i, confidence) in confidences.iter().enumerate() {
            race.add_horse(Horse::new('H', format!("h{i}"), *confidence), i + 1).unwrap();
        }

        let outcome = race.start_race().unwrap();
        let text = race.surface().text().to_string();
        let horses = race.into_horses();
        prop_assert!(horses.iter().all(|(_, h)| h.distance_travelled() <= length));

        match outcome.finish {
            Finish::Winner { lane, name, .. } => {
                let finishers: Vec<usize> = horses
                    .iter()
                    .filter(|(_, h)| h.distance_travelled() == length)
                    .map(|(l, _)| *l)
                    .collect();
                prop_assert_eq!(finishers.first().copied(), Some(lane));
                let announcement = format!("And the winner is {name}");
                prop_assert!(text.ends_with(&announcement));
            }
            Finish::AllFallen => {
                prop_assert!(horses.iter().all(|(_, h)| h.has_fallen()));
            }
            Finish::Stalled => prop_assert!(false, "positive confidence never stalls"),
        }
    }
}
