//! Guessing rounds: the player points at where they think the hint view is located.

use log::info;
use num_complex::Complex64;

use crate::{error::ParameterError, view::View};

/// Framing of the guess view is widened by this much beyond the guess distance.
const FRAME_MARGIN: f64 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Round {
    pub target: Complex64,
    /// Diameter the hint view was auto-framed at.
    pub hint_diameter: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Guess {
    pub pointer: Complex64,
    pub target: Complex64,
    pub distance: f64,
    pub points: u64,
}

impl Guess {
    /// Midpoint of the guess and the target.
    pub fn frame_center(&self) -> Complex64 {
        0.5 * self.target + 0.5 * self.pointer
    }
}

impl Round {
    pub fn new(target: Complex64, hint_diameter: f64) -> Self {
        Self {
            target,
            hint_diameter,
        }
    }

    /// Guesses closer than the hint diameter all score the same.
    pub fn score(&self, distance: f64) -> u64 {
        (4.0 / distance.max(self.hint_diameter)).sqrt() as u64
    }

    pub fn guess(&self, pointer: Complex64) -> Guess {
        let distance = (self.target - pointer).norm();
        let points = self.score(distance);
        info!("guess {} is {:e} from target, worth {} points", pointer, distance, points);
        Guess {
            pointer,
            target: self.target,
            distance,
            points,
        }
    }

    /// Frame `view` so that both the guess and the target are visible.
    pub fn frame(&self, view: &mut View, guess: &Guess) -> Result<(), ParameterError> {
        let diameter = (FRAME_MARGIN * guess.distance).max(self.hint_diameter);
        view.set_frame(guess.frame_center(), diameter)
    }
}

/// Running total across every guess of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub total: u64,
    pub guesses: u32,
}

impl Scoreboard {
    pub fn record(&mut self, guess: &Guess) {
        self.total += guess.points;
        self.guesses += 1;
    }
}
