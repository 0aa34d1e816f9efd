//! Mapping between raster pixels and the complex plane.
//!
//! The grid evaluator and every overlay go through [`SamplingGeometry`], so a
//! pixel coordinate always names the parameter that was actually sampled there.

use num_complex::Complex64;

use crate::screen;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingGeometry {
    delta: f64,
    corner: Complex64,
}

impl SamplingGeometry {
    /**
    `diameter` is the extent of the sampled region along the width axis. The
    height extent is `delta * height`, so pixels are always square.

    Pixel `(0, 0)` is the south-west sample. It sits half a pixel inside the
    region, which keeps `center` off the sample grid when both dimensions are
    even.
    */
    pub fn new(center: Complex64, diameter: f64, size: screen::Size) -> Self {
        let delta = diameter / f64::from(size.width);
        let extent = Complex64::new(f64::from(size.width), f64::from(size.height));
        let corner = center - extent * delta / 2.0 + Complex64::new(0.5, 0.5) * delta;
        Self { delta, corner }
    }

    /// Distance between neighbouring samples, in plane units.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// The parameter sampled at pixel `(0, 0)`.
    pub fn corner(&self) -> Complex64 {
        self.corner
    }

    /// Accepts fractional coordinates, e.g. a pointer between pixel centres.
    pub fn pixel_to_z(&self, x: f64, y: f64) -> Complex64 {
        self.corner + Complex64::new(x * self.delta, y * self.delta)
    }

    pub fn z_to_pixel(&self, z: Complex64) -> (f64, f64) {
        let pixel = (z - self.corner) / self.delta;
        (pixel.re, pixel.im)
    }
}
