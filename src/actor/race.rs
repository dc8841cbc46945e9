//! Race Actor: Dedicated thread that runs one race to completion.
//!
//! The race writes its frames to a [`ChannelSurface`], so the main loop
//! only ever sees [`RaceEvent`] messages and never shares race state. When
//! the race ends the horses travel back in [`RaceEvent::Finished`].

use super::messages::RaceEvent;
use crate::horse::Horse;
use crate::race::{Race, RaceRules, RandomSource, SeededSource};
use crate::surface::ChannelSurface;
use crossbeam_channel::Sender;
use std::thread::{self, JoinHandle};

/// Everything needed to run one race.
pub struct RacePlan {
    /// Track length.
    pub length: u32,
    /// Horses in lane order; the first goes to lane 1.
    pub horses: Vec<Horse>,
    /// Race rules.
    pub rules: RaceRules,
    /// Random source for the race.
    pub source: Box<dyn RandomSource>,
}

impl RacePlan {
    /// Plan with an entropy-seeded source.
    pub fn new(length: u32, horses: Vec<Horse>, rules: RaceRules) -> Self {
        Self {
            length,
            horses,
            rules,
            source: Box::new(SeededSource::from_entropy()),
        }
    }

    /// Use a fixed seed, or OS entropy for `None`.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.source = Box::new(SeededSource::from_optional_seed(seed));
        self
    }

    /// Use a custom random source.
    #[must_use]
    pub fn with_source(mut self, source: Box<dyn RandomSource>) -> Self {
        self.source = source;
        self
    }

    /// Build the race and run it on `surface`, returning the final event.
    ///
    /// Horses beyond the third are offered to lanes 4 and up, which the race
    /// reports as missing lanes.
    pub fn run(self, surface: ChannelSurface<RaceEvent>) -> RaceEvent {
        let mut race = match Race::with_parts(self.length, surface, self.rules, self.source) {
            Ok(race) => race,
            Err(e) => {
                return RaceEvent::Finished {
                    outcome: Err(e),
                    horses: Vec::new(),
                }
            }
        };

        for (i, horse) in self.horses.into_iter().enumerate() {
            // Reported on the surface; the remaining lanes still race.
            let _ = race.add_horse(horse, i + 1);
        }

        let outcome = race.start_race();
        RaceEvent::Finished {
            outcome,
            horses: race.into_horses(),
        }
    }
}

/// Race actor that owns the race thread.
pub struct RaceActor {
    /// Handle to the race thread.
    handle: Option<JoinHandle<()>>,
}

impl RaceActor {
    /// Spawn a thread running `plan`, reporting to `events`.
    pub fn spawn(plan: RacePlan, events: Sender<RaceEvent>) -> Self {
        let handle = thread::Builder::new()
            .name("paddock-race".to_string())
            .spawn(move || {
                let surface = ChannelSurface::new(events.clone());
                let finished = plan.run(surface);
                if events.send(finished).is_err() {
                    log::warn!("race finished after the main loop went away");
                }
            })
            .expect("Failed to spawn race thread");

        Self {
            handle: Some(handle),
        }
    }

    /// Whether the race thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the race thread to finish.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("race thread panicked");
            }
        }
    }
}
