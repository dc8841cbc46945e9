//! Lanes: three fixed slots, numbered from 1.

use crate::horse::Horse;

/// Number of lanes on the track.
pub const LANE_COUNT: usize = 3;

/// Lanes that must be occupied for a race to start.
pub const REQUIRED_LANES: usize = 2;

/// A fixed-capacity set of optional horse slots.
///
/// Lane numbers in this API are 1-based, matching what the user sees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lanes {
    slots: [Option<Horse>; LANE_COUNT],
}

impl Lanes {
    /// Three empty lanes.
    pub const fn new() -> Self {
        Self {
            slots: [None, None, None],
        }
    }

    /// Whether `lane` names a real lane.
    #[inline]
    pub const fn is_valid(lane: usize) -> bool {
        lane >= 1 && lane <= LANE_COUNT
    }

    /// Put `horse` in `lane`, returning whoever was there.
    ///
    /// Returns `Err(horse)` untouched if the lane does not exist.
    pub fn place(&mut self, lane: usize, horse: Horse) -> Result<Option<Horse>, Horse> {
        if !Self::is_valid(lane) {
            return Err(horse);
        }
        Ok(self.slots[lane - 1].replace(horse))
    }

    /// The horse in `lane`, if the lane exists and is occupied.
    pub fn get(&self, lane: usize) -> Option<&Horse> {
        if Self::is_valid(lane) {
            self.slots[lane - 1].as_ref()
        } else {
            None
        }
    }

    /// Lane numbers and slots in track order, including empty ones.
    pub fn slots(&self) -> impl Iterator<Item = (usize, Option<&Horse>)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (i + 1, slot.as_ref()))
    }

    /// Occupied lanes in track order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &Horse)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|h| (i + 1, h)))
    }

    /// Occupied lanes in track order, mutably.
    pub fn occupied_mut(&mut self) -> impl Iterator<Item = (usize, &mut Horse)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|h| (i + 1, h)))
    }

    /// Number of occupied lanes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether every lane is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// First required lane that is still empty.
    pub fn first_missing_required(&self) -> Option<usize> {
        (1..=REQUIRED_LANES).find(|&lane| self.get(lane).is_none())
    }

    /// Whether every occupied lane's horse has fallen. Empty lanes count as fallen.
    pub fn all_fallen(&self) -> bool {
        self.occupied().all(|(_, h)| h.has_fallen())
    }

    /// Whether no standing horse can ever move or fall again.
    pub fn stalled(&self) -> bool {
        self.occupied()
            .filter(|(_, h)| !h.has_fallen())
            .all(|(_, h)| h.confidence() <= 0.0)
    }

    /// Lowest lane whose horse has covered exactly `length`.
    pub fn finisher(&self, length: u32) -> Option<usize> {
        self.occupied()
            .find(|(_, h)| h.distance_travelled() == length)
            .map(|(lane, _)| lane)
    }

    /// Empty the lanes, yielding the horses in lane order.
    pub fn into_horses(self) -> impl Iterator<Item = (usize, Horse)> {
        self.slots
            .into_iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|h| (i + 1, h)))
    }

    pub(crate) fn get_mut(&mut self, lane: usize) -> Option<&mut Horse> {
        if Self::is_valid(lane) {
            self.slots[lane - 1].as_mut()
        } else {
            None
        }
    }
}
