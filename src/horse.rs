//! Horse: the actor that runs in a lane.
//!
//! A horse carries its display symbol, its name, a confidence in `[0, 1]`
//! and its progress in the current race.

use crate::error::HorseSpecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker drawn in place of the symbol once a horse has fallen.
pub const FALLEN_MARKER: char = 'X';

/// A single race participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horse {
    /// Character drawn on the track.
    symbol: char,
    /// Display name.
    name: String,
    /// Advance probability per tick, always within `[0, 1]`.
    #[serde(deserialize_with = "deserialize_confidence")]
    confidence: f64,
    /// Units covered since the last reset.
    #[serde(skip)]
    distance_travelled: u32,
    /// Whether the horse is out of the current race.
    #[serde(skip)]
    fallen: bool,
}

impl Horse {
    /// Create a horse at the start line. `confidence` is clamped to `[0, 1]`.
    pub fn new(symbol: char, name: impl Into<String>, confidence: f64) -> Self {
        Self {
            symbol,
            name: name.into(),
            confidence: clamp_confidence(confidence),
            distance_travelled: 0,
            fallen: false,
        }
    }

    /// Bring the horse back to the start line, standing.
    pub const fn go_back_to_start(&mut self) {
        self.distance_travelled = 0;
        self.fallen = false;
    }

    /// Advance one unit. Does nothing once the horse has fallen.
    pub const fn move_forward(&mut self) {
        if !self.fallen {
            self.distance_travelled += 1;
        }
    }

    /// Knock the horse over. Idempotent.
    pub const fn fall(&mut self) {
        self.fallen = true;
    }

    /// Whether the horse has fallen in the current race.
    #[inline]
    pub const fn has_fallen(&self) -> bool {
        self.fallen
    }

    /// Units covered since the last reset.
    #[inline]
    pub const fn distance_travelled(&self) -> u32 {
        self.distance_travelled
    }

    /// Current confidence.
    #[inline]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Replace the confidence, clamping to `[0, 1]`.
    pub fn set_confidence(&mut self, confidence: f64) {
        self.confidence = clamp_confidence(confidence);
    }

    /// Add `delta` to the confidence, staying within `[0, 1]`.
    pub fn boost_confidence(&mut self, delta: f64) {
        self.set_confidence(self.confidence + delta);
    }

    /// Character drawn on the track.
    #[inline]
    pub const fn symbol(&self) -> char {
        self.symbol
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Character to draw this tick: the symbol, or [`FALLEN_MARKER`].
    #[inline]
    pub const fn marker(&self) -> char {
        if self.fallen {
            FALLEN_MARKER
        } else {
            self.symbol
        }
    }
}

impl fmt::Display for Horse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Symbol: {}, Confidence: {:.1}",
            self.name, self.symbol, self.confidence
        )
    }
}

/// NaN becomes 0, everything else is pinned to `[0, 1]`.
fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn deserialize_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_confidence)
}

/// A horse described on the command line as `NAME,SYMBOL,CONFIDENCE`.
#[derive(Debug, Clone, PartialEq)]
pub struct HorseSpec(pub Horse);

impl FromStr for HorseSpec {
    type Err = HorseSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [name, symbol, confidence] = parts.as_slice() else {
            return Err(HorseSpecError::Shape(s.to_string()));
        };

        if name.is_empty() {
            return Err(HorseSpecError::EmptyName);
        }

        let mut chars = symbol.chars();
        let (Some(symbol_char), None) = (chars.next(), chars.next()) else {
            return Err(HorseSpecError::Symbol((*symbol).to_string()));
        };

        let value: f64 = confidence
            .parse()
            .map_err(|_| HorseSpecError::Confidence((*confidence).to_string()))?;
        if !(0.0..=1.0).contains(&value) {
            return Err(HorseSpecError::Confidence((*confidence).to_string()));
        }

        Ok(Self(Horse::new(symbol_char, *name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_horse_move_and_fall() {
        let mut horse = Horse::new('H', "Hopper", 0.5);
        horse.move_forward();
        horse.move_forward();
        assert_eq!(horse.distance_travelled(), 2);

        horse.fall();
        horse.fall();
        assert!(horse.has_fallen());
        assert_eq!(horse.marker(), FALLEN_MARKER);

        // Frozen once fallen
        horse.move_forward();
        assert_eq!(horse.distance_travelled(), 2);
    }

    #[test]
    fn test_horse_confidence_clamped() {
        assert_eq!(Horse::new('H', "a", 1.7).confidence(), 1.0);
        assert_eq!(Horse::new('H', "a", -0.3).confidence(), 0.0);
        assert_eq!(Horse::new('H', "a", f64::NAN).confidence(), 0.0);

        let mut horse = Horse::new('H', "a", 0.95);
        horse.boost_confidence(0.1);
        assert_eq!(horse.confidence(), 1.0);
    }

    #[test]
    fn test_horse_display() {
        let horse = Horse::new('♘', "Pegasus", 0.5);
        assert_eq!(horse.to_string(), "Pegasus, Symbol: ♘, Confidence: 0.5");
    }

    #[test]
    fn test_horse_spec_parse() {
        let HorseSpec(horse) = "Bolt, ♞ ,0.7".parse().unwrap();
        assert_eq!(horse.name(), "Bolt");
        assert_eq!(horse.symbol(), '♞');
        assert!((horse.confidence() - 0.7).abs() < f64::EPSILON);

        assert!(matches!("Bolt,♞".parse::<HorseSpec>(), Err(HorseSpecError::Shape(_))));
        assert_eq!(",♞,0.5".parse::<HorseSpec>(), Err(HorseSpecError::EmptyName));
        assert!(matches!("Bolt,ab,0.5".parse::<HorseSpec>(), Err(HorseSpecError::Symbol(_))));
        assert!(matches!("Bolt,♞,1.5".parse::<HorseSpec>(), Err(HorseSpecError::Confidence(_))));
        assert!(matches!("Bolt,♞,fast".parse::<HorseSpec>(), Err(HorseSpecError::Confidence(_))));
    }

    #[test]
    fn test_horse_roster_json() {
        let horse: Horse =
            serde_json::from_str(r#"{"symbol":"♜","name":"Rook","confidence":3.0}"#).unwrap();
        assert_eq!(horse.confidence(), 1.0);
        assert_eq!(horse.distance_travelled(), 0);
        assert!(!horse.has_fallen());
    }

    proptest! {
        #[test]
        fn prop_confidence_always_in_unit_range(value in proptest::num::f64::ANY) {
            let mut horse = Horse::new('H', "p", value);
            prop_assert!((0.0..=1.0).contains(&horse.confidence()));
            horse.boost_confidence(value);
            prop_assert!((0.0..=1.0).contains(&horse.confidence()));
        }

        #[test]
        fn prop_go_back_to_start_resets(steps in 0u32..50, fallen in any::<bool>()) {
            let mut horse = Horse::new('H', "p", 0.5);
            for _ in 0..steps {
                horse.move_forward();
            }
            if fallen {
                horse.fall();
            }
            horse.go_back_to_start();
            prop_assert_eq!(horse.distance_travelled(), 0);
            prop_assert!(!horse.has_fallen());
        }
    }
}
