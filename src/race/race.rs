//! Race: the tick loop.
//!
//! # State machine
//!
//! ```text
//!   add_horse ─┐
//!              ▼
//!          ┌──────┐  begin   ┌─────────┐  terminal condition  ┌──────────┐
//!          │ Idle │ ───────▶ │ Running │ ───────────────────▶ │ Finished │
//!          └──────┘          └─────────┘                      └──────────┘
//!                              ▲     │ step
//!                              └─────┘
//! ```
//!
//! Each tick walks the occupied lanes in order. A standing horse moves one
//! unit with probability `confidence` and then, independently, falls with
//! probability `fall_scale * confidence²`. The frame is rendered once all
//! lanes are done, then the lanes are checked for a finisher (lowest lane
//! wins ties), for everyone having fallen, and for a stall where nobody
//! left standing can move or fall.

use super::lanes::Lanes;
use super::render::render_frame;
use super::rng::{RandomSource, SeededSource};
use crate::error::{RaceError, Result};
use crate::horse::Horse;
use crate::surface::OutputSurface;
use std::thread;
use std::time::Duration;

/// Tunable constants of the race model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaceRules {
    /// Multiplier on `confidence²` giving the per-tick fall probability.
    pub fall_scale: f64,
    /// Confidence added to the winner after the race.
    pub winner_bonus: f64,
    /// Pause between ticks. Zero disables pacing.
    pub tick_interval: Duration,
}

impl Default for RaceRules {
    fn default() -> Self {
        Self {
            fall_scale: 0.1,
            winner_bonus: 0.1,
            tick_interval: Duration::from_millis(100),
        }
    }
}

impl RaceRules {
    /// Default rules with no pause between ticks.
    pub fn unpaced() -> Self {
        Self {
            tick_interval: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Per-tick fall probability for a horse of the given confidence.
    #[inline]
    pub fn fall_probability(&self, confidence: f64) -> f64 {
        self.fall_scale * confidence * confidence
    }
}

/// Lifecycle of a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceState {
    /// Accepting horses.
    Idle,
    /// Ticking.
    Running,
    /// Done; see [`Race::outcome`].
    Finished,
}

/// How a race ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Finish {
    /// A horse covered the full length.
    Winner {
        /// Lane of the winner.
        lane: usize,
        /// Winner's name.
        name: String,
        /// Winner's confidence after the post-race bonus.
        confidence: f64,
    },
    /// Every horse fell.
    AllFallen,
    /// Nobody left standing can move or fall.
    Stalled,
}

impl Finish {
    /// Winner's name, if there is one.
    pub fn winner_name(&self) -> Option<&str> {
        match self {
            Self::Winner { name, .. } => Some(name),
            Self::AllFallen | Self::Stalled => None,
        }
    }
}

/// Result of a completed race.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceOutcome {
    /// Ticks played.
    pub ticks: u32,
    /// How it ended.
    pub finish: Finish,
}

/// Result of a single [`Race::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The race goes on.
    Continue,
    /// The race just finished.
    Finished(RaceOutcome),
}

/// A race over up to three lanes.
pub struct Race<S: OutputSurface> {
    length: u32,
    lanes: Lanes,
    rules: RaceRules,
    rng: Box<dyn RandomSource>,
    surface: S,
    state: RaceState,
    ticks: u32,
    outcome: Option<RaceOutcome>,
}

impl<S: OutputSurface> Race<S> {
    /// Create an idle race of `length` units writing to `surface`.
    ///
    /// Uses default rules and an entropy-seeded random source.
    pub fn new(length: u32, surface: S) -> Result<Self> {
        Self::with_parts(
            length,
            surface,
            RaceRules::default(),
            Box::new(SeededSource::from_entropy()),
        )
    }

    /// Create an idle race with explicit rules and random source.
    pub fn with_parts(
        length: u32,
        surface: S,
        rules: RaceRules,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        if length == 0 {
            return Err(RaceError::InvalidLength { length });
        }
        Ok(Self {
            length,
            lanes: Lanes::new(),
            rules,
            rng,
            surface,
            state: RaceState::Idle,
            ticks: 0,
            outcome: None,
        })
    }

    /// Track length.
    #[inline]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Current lifecycle state.
    #[inline]
    pub const fn state(&self) -> RaceState {
        self.state
    }

    /// Ticks played so far.
    #[inline]
    pub const fn ticks(&self) -> u32 {
        self.ticks
    }

    /// The lanes.
    #[inline]
    pub const fn lanes(&self) -> &Lanes {
        &self.lanes
    }

    /// Rules in force.
    #[inline]
    pub const fn rules(&self) -> &RaceRules {
        &self.rules
    }

    /// The output surface.
    #[inline]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// The outcome, once finished.
    pub const fn outcome(&self) -> Option<&RaceOutcome> {
        self.outcome.as_ref()
    }

    /// Put `horse` in `lane` (1 to 3), replacing any horse already there.
    ///
    /// An unknown lane is reported on the surface and returned as
    /// [`RaceError::NoSuchLane`]; the horse is dropped.
    pub fn add_horse(&mut self, horse: Horse, lane: usize) -> Result<()> {
        if self.state != RaceState::Idle {
            return Err(RaceError::NotIdle);
        }

        match self.lanes.place(lane, horse) {
            Ok(_) => {
                log::debug!("lane {lane} assigned");
                Ok(())
            }
            Err(horse) => {
                let err = RaceError::NoSuchLane { lane };
                log::warn!("{err} ({})", horse.name());
                self.surface.append(&err.to_string());
                Err(err)
            }
        }
    }

    /// Run the race to completion, pausing between ticks.
    ///
    /// Blocks for roughly `ticks * tick_interval`; call it off the UI thread.
    pub fn start_race(&mut self) -> Result<RaceOutcome> {
        self.begin()?;
        loop {
            if let Step::Finished(outcome) = self.step() {
                return Ok(outcome);
            }
            self.pace();
        }
    }

    /// Move from idle to running and bring every horse to the start.
    ///
    /// Fails without changing anything if lane 1 or 2 is empty.
    pub fn begin(&mut self) -> Result<()> {
        if self.state != RaceState::Idle {
            return Err(RaceError::NotIdle);
        }
        if let Some(lane) = self.lanes.first_missing_required() {
            return Err(RaceError::MissingLane { lane });
        }

        for (_, horse) in self.lanes.occupied_mut() {
            horse.go_back_to_start();
        }
        self.state = RaceState::Running;
        self.ticks = 0;
        log::info!(
            "race started: length {}, {} horses",
            self.length,
            self.lanes.len()
        );
        Ok(())
    }

    /// Play one tick. Outside the running state this only reports the
    /// existing outcome (or `Continue` while idle).
    pub fn step(&mut self) -> Step {
        match self.state {
            RaceState::Idle => return Step::Continue,
            RaceState::Finished => {
                return self
                    .outcome
                    .clone()
                    .map_or(Step::Continue, Step::Finished);
            }
            RaceState::Running => {}
        }

        // Nothing can change; don't spin.
        if self.lanes.stalled() {
            return self.finish(Finish::Stalled);
        }

        self.ticks += 1;
        for (_, horse) in self.lanes.occupied_mut() {
            move_horse(horse, &self.rules, self.rng.as_mut());
        }
        self.print_race();
        log::debug!("tick {}: {}", self.ticks, self.positions());

        if let Some(lane) = self.lanes.finisher(self.length) {
            return self.crown(lane);
        }
        if self.lanes.all_fallen() {
            return self.finish(Finish::AllFallen);
        }
        if self.lanes.stalled() {
            return self.finish(Finish::Stalled);
        }
        Step::Continue
    }

    /// Hand the horses back, in lane order.
    pub fn into_horses(self) -> Vec<(usize, Horse)> {
        self.lanes.into_horses().collect()
    }

    /// Split into horses and the surface.
    pub fn into_parts(self) -> (Vec<(usize, Horse)>, S) {
        (self.lanes.into_horses().collect(), self.surface)
    }

    fn crown(&mut self, lane: usize) -> Step {
        self.print_race();

        let bonus = self.rules.winner_bonus;
        let Some(winner) = self.lanes.get_mut(lane) else {
            return self.finish(Finish::AllFallen);
        };
        winner.boost_confidence(bonus);
        let name = winner.name().to_string();
        let confidence = winner.confidence();

        self.surface.append(&format!("And the winner is {name}"));
        self.finish(Finish::Winner {
            lane,
            name,
            confidence,
        })
    }

    fn finish(&mut self, finish: Finish) -> Step {
        let outcome = RaceOutcome {
            ticks: self.ticks,
            finish,
        };
        match &outcome.finish {
            Finish::Winner { lane, name, .. } => {
                log::info!("{name} won from lane {lane} after {} ticks", outcome.ticks);
            }
            Finish::AllFallen => log::info!("every horse fell after {} ticks", outcome.ticks),
            Finish::Stalled => log::info!("race stalled after {} ticks", outcome.ticks),
        }
        self.state = RaceState::Finished;
        self.outcome = Some(outcome.clone());
        Step::Finished(outcome)
    }

    fn print_race(&mut self) {
        let frame = render_frame(&self.lanes, self.length);
        self.surface.clear();
        self.surface.append(&frame);
    }

    fn pace(&self) {
        if !self.rules.tick_interval.is_zero() {
            thread::sleep(self.rules.tick_interval);
        }
    }

    fn positions(&self) -> String {
        self.lanes
            .occupied()
            .map(|(lane, h)| {
                if h.has_fallen() {
                    format!("{lane}:{}X", h.distance_travelled())
                } else {
                    format!("{lane}:{}", h.distance_travelled())
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Apply one tick to a horse: a move draw, then an independent fall draw.
pub fn move_horse(horse: &mut Horse, rules: &RaceRules, rng: &mut dyn RandomSource) {
    if horse.has_fallen() {
        return;
    }

    let confidence = horse.confidence();
    if rng.next_unit() < confidence {
        horse.move_forward();
    }
    if rng.next_unit() < rules.fall_probability(confidence) {
        horse.fall();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::rng::ScriptedSource;
    use crate::surface::TextSurface;

    fn scripted_race(length: u32, draws: &[f64]) -> Race<TextSurface> {
        Race::with_parts(
            length,
            TextSurface::new(),
            RaceRules::unpaced(),
            Box::new(ScriptedSource::new(draws.iter().copied())),
        )
        .unwrap()
    }

    #[test_log::test]
    fn test_race_rejects_zero_length() {
        let err = Race::new(0, TextSurface::new()).err();
        assert_eq!(err, Some(RaceError::InvalidLength { length: 0 }));
    }

    #[test_log::test]
    fn test_add_horse_bad_lane_reports_on_surface() {
        let mut race = scripted_race(5, &[0.0]);
        let err = race.add_horse(Horse::new('H', "Stray", 0.5), 4);
        assert_eq!(err, Err(RaceError::NoSuchLane { lane: 4 }));
        assert_eq!(
            race.surface().text(),
            "Cannot add horse to lane 4 because there is no such lane"
        );
        assert!(race.lanes().is_empty());
    }

    #[test_log::test]
    fn test_start_requires_first_two_lanes() {
        let mut race = scripted_race(5, &[0.0]);
        race.add_horse(Horse::new('A', "a", 0.5), 1).unwrap();
        race.add_horse(Horse::new('C', "c", 0.5), 3).unwrap();
        assert_eq!(race.start_race(), Err(RaceError::MissingLane { lane: 2 }));
        assert_eq!(race.state(), RaceState::Idle);
    }

    #[test_log::test]
    fn test_confident_horse_wins_in_length_ticks() {
        // Move draw 0.0 always succeeds, fall draw 0.5 never trips.
        let mut race = scripted_race(5, &[0.0, 0.5]);
        race.add_horse(Horse::new('A', "Arrow", 1.0), 1).unwrap();
        race.add_horse(Horse::new('B', "Boulder", 0.0), 2).unwrap();

        let outcome = race.start_race().unwrap();
        assert_eq!(outcome.ticks, 5);
        assert_eq!(
            outcome.finish,
            Finish::Winner {
                lane: 1,
                name: "Arrow".to_string(),
                confidence: 1.0
            }
        );
        assert_eq!(race.state(), RaceState::Finished);
        assert!(race.surface().text().ends_with("And the winner is Arrow"));

        let boulder = race.lanes().get(2).unwrap();
        assert_eq!(boulder.distance_travelled(), 0);
        assert!(!boulder.has_fallen());
    }

    #[test_log::test]
    fn test_tie_goes_to_lowest_lane() {
        let mut race = scripted_race(1, &[0.0, 0.5]);
        race.add_horse(Horse::new('A', "First", 1.0), 1).unwrap();
        race.add_horse(Horse::new('B', "Second", 1.0), 2).unwrap();
        race.add_horse(Horse::new('C', "Third", 1.0), 3).unwrap();

        let outcome = race.start_race().unwrap();
        assert_eq!(outcome.ticks, 1);
        assert_eq!(outcome.finish.winner_name(), Some("First"));
        assert!(race
            .lanes()
            .occupied()
            .all(|(_, h)| h.distance_travelled() == 1));
    }

    #[test_log::test]
    fn test_zero_confidence_race_stalls_immediately() {
        let mut race = scripted_race(5, &[0.0]);
        race.add_horse(Horse::new('A', "a", 0.0), 1).unwrap();
        race.add_horse(Horse::new('B', "b", 0.0), 2).unwrap();

        let outcome = race.start_race().unwrap();
        assert_eq!(outcome.ticks, 0);
        assert_eq!(outcome.finish, Finish::Stalled);
        assert_eq!(race.surface().text(), "");
    }

    #[test_log::test]
    fn test_everyone_falls() {
        // Draw 0.0 both moves and trips any horse with positive confidence.
        let mut race = scripted_race(10, &[0.0]);
        race.add_horse(Horse::new('A', "a", 0.5), 1).unwrap();
        race.add_horse(Horse::new('B', "b", 0.9), 2).unwrap();

        let outcome = race.start_race().unwrap();
        assert_eq!(outcome.ticks, 1);
        assert_eq!(outcome.finish, Finish::AllFallen);
        assert!(!race.surface().text().contains("winner"));
        assert!(race
            .lanes()
            .occupied()
            .all(|(_, h)| h.has_fallen() && h.distance_travelled() == 1));
    }

    #[test_log::test]
    fn test_last_standing_zero_confidence_stalls() {
        let mut race = scripted_race(10, &[0.0]);
        race.add_horse(Horse::new('A', "a", 0.7), 1).unwrap();
        race.add_horse(Horse::new('B', "b", 0.0), 2).unwrap();

        let outcome = race.start_race().unwrap();
        assert_eq!(outcome.ticks, 1);
        assert_eq!(outcome.finish, Finish::Stalled);
    }

    #[test_log::test]
    fn test_fallen_horse_draws_nothing() {
        let rules = RaceRules::unpaced();
        let mut horse = Horse::new('H', "h", 1.0);
        horse.fall();
        let mut rng = ScriptedSource::new([0.0, 0.99]);
        move_horse(&mut horse, &rules, &mut rng);
        assert_eq!(horse.distance_travelled(), 0);
        // The script was not advanced.
        assert_eq!(rng.next_unit(), 0.0);
    }

    #[test_log::test]
    fn test_fall_check_runs_without_a_move() {
        let rules = RaceRules::unpaced();
        let mut horse = Horse::new('H', "h", 0.5);
        // Move draw misses, fall draw 0.01 < 0.1 * 0.25.
        let mut rng = ScriptedSource::new([0.9, 0.01]);
        move_horse(&mut horse, &rules, &mut rng);
        assert_eq!(horse.distance_travelled(), 0);
        assert!(horse.has_fallen());
    }

    #[test_log::test]
    fn test_add_after_start_is_refused() {
        let mut race = scripted_race(3, &[0.0, 0.5]);
        race.add_horse(Horse::new('A', "a", 1.0), 1).unwrap();
        race.add_horse(Horse::new('B', "b", 1.0), 2).unwrap();
        race.begin().unwrap();
        assert_eq!(
            race.add_horse(Horse::new('C', "c", 1.0), 3),
            Err(RaceError::NotIdle)
        );
        assert_eq!(race.begin(), Err(RaceError::NotIdle));
    }

    #[test_log::test]
    fn test_winner_frame_precedes_announcement() {
        let mut race = scripted_race(2, &[0.0, 0.5]);
        race.add_horse(Horse::new('A', "Ace", 0.95), 1).unwrap();
        race.add_horse(Horse::new('B', "Bee", 0.0), 2).unwrap();
        race.start_race().unwrap();

        // The last frame still shows the pre-bonus confidence.
        let expected = "=\n\
                        |  A|Ace (Current Confidence 0.9)\n\
                        |B  |Bee (Current Confidence 0.0)\n\
                        |    |\n\
                        =\n\
                        And the winner is Ace";
        assert_eq!(race.surface().text(), expected);
        assert_eq!(race.lanes().get(1).unwrap().confidence(), 1.0);
    }

    #[test]
    fn test_seeded_races_are_reproducible() {
        let run = |seed| {
            let mut race = Race::with_parts(
                15,
                TextSurface::new(),
                RaceRules::unpaced(),
                Box::new(SeededSource::from_seed(seed)),
            )
            .unwrap();
            race.add_horse(Horse::new('A', "a", 0.6), 1).unwrap();
            race.add_horse(Horse::new('B', "b", 0.7), 2).unwrap();
            race.add_horse(Horse::new('C', "c", 0.8), 3).unwrap();
            race.start_race().unwrap()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_fall_probability_scales_with_confidence_squared() {
        let rules = RaceRules::default();
        assert!((rules.fall_probability(1.0) - 0.1).abs() < 1e-12);
        assert!((rules.fall_probability(0.5) - 0.025).abs() < 1e-12);
        assert_eq!(rules.fall_probability(0.0), 0.0);
    }

    #[test]
    fn test_full_confidence_always_moves_and_falls_one_tick_in_ten() {
        const TRIALS: u32 = 200_000;
        let rules = RaceRules::default();
        let mut rng = SeededSource::from_seed(2024);
        let mut falls = 0;
        for _ in 0..TRIALS {
            let mut horse = Horse::new('H', "Steady", 1.0);
            move_horse(&mut horse, &rules, &mut rng);
            assert_eq!(horse.distance_travelled(), 1);
            if horse.has_fallen() {
                falls += 1;
            }
        }
        let rate = f64::from(falls) / f64::from(TRIALS);
        assert!((rate - 0.1).abs() < 0.005, "fall rate {rate}");
    }
}
