/*!
Escape-time sampling and auto-framing for the Mandelbrot set.

A render takes a centre, a diameter (the plane extent along the raster's
width) and [`params::RenderParameters`], and fills a [`raster::Raster`] with
one [`escape::Escape`] per pixel. [`geometry::SamplingGeometry`] is the single
source of the pixel/plane mapping, so overlays drawn with it line up with what
was sampled. [`zoom::ZoomSearch`] frames a point of interest by rescaling the
diameter until a target share of the raster is interior.
*/

pub mod colour;
pub mod double_buffered;
pub mod error;
pub mod escape;
pub mod game;
pub mod geometry;
pub mod grid;
pub mod params;
pub mod points;
pub mod raster;
pub mod screen;
pub mod view;
pub mod zoom;
