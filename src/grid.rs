//! Parallel raster fill.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use log::{debug, trace};
use num_complex::Complex64;
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};

use crate::{
    error::RenderError,
    escape::escape_time,
    geometry::SamplingGeometry,
    params::{validate_diameter, RenderParameters},
    raster::Raster,
};

/// Shared flag a caller can raise to abandon an in-flight render.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Fill `raster` with escape values for the view described by `center` and `diameter`.
pub fn mandel_grid(
    center: Complex64,
    diameter: f64,
    raster: &mut Raster,
    params: RenderParameters,
) -> Result<(), RenderError> {
    mandel_grid_cancellable(center, diameter, raster, params, &CancelToken::new())
}

/**
Like [`mandel_grid`], but checks `cancel` before each row.

Rows are independent and write disjoint slices of the raster, so they are
handed to rayon as-is. On [`RenderError::Cancelled`] the raster holds a mix of
old and new rows and must not be presented; [`crate::view::View`] renders into
a back buffer for that reason.
*/
pub fn mandel_grid_cancellable(
    center: Complex64,
    diameter: f64,
    raster: &mut Raster,
    params: RenderParameters,
    cancel: &CancelToken,
) -> Result<(), RenderError> {
    validate_diameter(diameter)?;

    let size = raster.size();
    if size.area() == 0 {
        return Ok(());
    }

    let geometry = SamplingGeometry::new(center, diameter, size);
    let (max_iter, esc_radius) = (params.max_iter(), params.esc_radius());

    trace!(
        "begin mandel_grid center={} diameter={:e} size={:?} max_iter={} esc_radius={}",
        center,
        diameter,
        size,
        max_iter,
        esc_radius
    );
    let started = Instant::now();

    raster
        .cells_mut()
        .par_chunks_mut(size.width as usize)
        .enumerate()
        .try_for_each(|(m, row)| {
            if cancel.is_cancelled() {
                return Err(RenderError::Cancelled);
            }

            let y = m as f64;
            for (n, cell) in row.iter_mut().enumerate() {
                *cell = escape_time(geometry.pixel_to_z(n as f64, y), max_iter, esc_radius);
            }
            Ok(())
        })?;

    debug!(
        "rendered {}x{} at diameter {:e} in {:?}",
        size.width,
        size.height,
        diameter,
        started.elapsed()
    );
    Ok(())
}
