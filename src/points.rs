//! Points of interest: known hyperbolic centres to use as guessing targets.
//!
//! The file is a JSON array of `[re, im]` pairs.

use std::{fs, io::Read, path::Path};

use fnv::FnvHashSet;
use log::{debug, info};
use num_complex::Complex64;
use rand::Rng;

use crate::error::PointsError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointsOfInterest {
    remaining: Vec<Complex64>,
}

impl PointsOfInterest {
    /// Exact duplicates are dropped; order is otherwise irrelevant.
    pub fn new(points: impl IntoIterator<Item = Complex64>) -> Self {
        let mut seen: FnvHashSet<(u64, u64)> = FnvHashSet::default();
        let remaining = points
            .into_iter()
            .filter(|point| seen.insert((point.re.to_bits(), point.im.to_bits())))
            .collect();
        Self { remaining }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PointsError> {
        let path = path.as_ref();
        let points = Self::from_reader(fs::File::open(path)?)?;
        info!("loaded {} points of interest from {}", points.len(), path.display());
        Ok(points)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, PointsError> {
        let pairs: Vec<(f64, f64)> = serde_json::from_reader(reader)?;
        if pairs.is_empty() {
            return Err(PointsError::Empty);
        }
        Ok(Self::new(pairs.into_iter().map(|(re, im)| Complex64::new(re, im))))
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Take a random point that hasn't been drawn before, or `None` once all are used.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<Complex64> {
        if self.remaining.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.remaining.len());
        let point = self.remaining.swap_remove(index);
        debug!("drew point {} ({} left)", point, self.remaining.len());
        Some(point)
    }
}
