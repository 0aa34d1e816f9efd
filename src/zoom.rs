/*!
Automatic framing of a point of interest.

The search keeps the centre fixed and rescales the diameter until the share of
interior cells lands in a target band. Interior area grows roughly with the
square of the diameter, so each step divides the diameter by
`sqrt(ideal / ratio)`. When almost nothing interior is visible the step is a
blind shrink instead.

Nothing guarantees the band is reached. The search stops after a fixed number
of steps, or once the diameter passes a ceiling, and reports whatever it ended
on. [`ZoomOutcome::converged`] tells the caller which case it got.
*/

use log::{debug, info};
use num_complex::Complex64;

use crate::{
    error::RenderError,
    grid::{mandel_grid_cancellable, CancelToken},
    params::{RenderProfile, DISPLAY, SEARCH},
    raster::Raster,
};

/// Band of interior ratios a framed view should show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTarget {
    pub lower: f64,
    pub ideal: f64,
    pub upper: f64,
}

impl ZoomTarget {
    /// Strictly between `lower` and `upper`.
    pub fn contains(&self, ratio: f64) -> bool {
        self.lower < ratio && ratio < self.upper
    }
}

impl Default for ZoomTarget {
    fn default() -> Self {
        Self {
            lower: 0.02,
            ideal: 0.04,
            upper: 0.06,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomSearch {
    pub target: ZoomTarget,
    /// Ratios at or below this count as "no interior visible".
    pub ratio_floor: f64,
    pub blind_shrink: f64,
    pub diameter_ceiling: f64,
    pub max_iterations: usize,
    pub search: RenderProfile,
    pub display: RenderProfile,
}

impl Default for ZoomSearch {
    fn default() -> Self {
        Self {
            target: ZoomTarget::default(),
            ratio_floor: 4e-8,
            blind_shrink: 1000.0,
            diameter_ceiling: 0.05,
            max_iterations: 20,
            search: SEARCH,
            display: DISPLAY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomOutcome {
    pub diameter: f64,
    /// Interior ratio of the last search-profile render.
    pub ratio: f64,
    /// Number of rescaling steps taken.
    pub iterations: usize,
    pub converged: bool,
}

impl ZoomSearch {
    pub fn in_band(&self, ratio: f64) -> bool {
        self.target.contains(ratio)
    }

    pub fn rescale(&self, diameter: f64, ratio: f64) -> f64 {
        if ratio > self.ratio_floor {
            diameter / (self.target.ideal / ratio).sqrt()
        } else {
            diameter / self.blind_shrink
        }
    }

    /**
    Search for a diameter around `center`, starting from `diameter`.

    Intermediate renders use the search profile. On success `raster` holds a
    final render at the returned diameter using the display profile.
    */
    pub fn find_zoom(
        &self,
        center: Complex64,
        diameter: f64,
        raster: &mut Raster,
        cancel: &CancelToken,
    ) -> Result<ZoomOutcome, RenderError> {
        let mut diameter = diameter;
        mandel_grid_cancellable(center, diameter, raster, self.search.params, cancel)?;
        let mut ratio = raster.interior_ratio();
        debug!("interior ratio {} at diameter {:e}", ratio, diameter);

        let mut iterations = 0;
        while iterations < self.max_iterations {
            diameter = self.rescale(diameter, ratio);
            mandel_grid_cancellable(center, diameter, raster, self.search.params, cancel)?;
            ratio = raster.interior_ratio();
            iterations += 1;
            debug!("interior ratio {} at diameter {:e}", ratio, diameter);

            if self.in_band(ratio) || diameter > self.diameter_ceiling {
                break;
            }
        }

        mandel_grid_cancellable(center, diameter, raster, self.display.params, cancel)?;

        let outcome = ZoomOutcome {
            diameter,
            ratio,
            iterations,
            converged: self.in_band(ratio),
        };
        info!(
            "framed {} at diameter {:e} after {} steps (converged: {})",
            center, outcome.diameter, outcome.iterations, outcome.converged
        );
        Ok(outcome)
    }
}
