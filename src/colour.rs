//! Colouring of escape rasters.

use std::f64::consts::TAU;

use bytemuck::{Pod, Zeroable};
use rayon::prelude::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::{escape::Escape, raster::Raster};

/**
Shift every escaped cell by `shift` and wrap it into `[0, 1)`.

Interior cells pass through untouched; they never take part in the modulo.
*/
pub fn normalize(raster: &Raster, shift: f64) -> Raster {
    raster.map(|cell| match cell {
        Escape::Escaped(value) => Escape::Escaped(wrap_unit(value + shift)),
        Escape::Interior => Escape::Interior,
    })
}

fn wrap_unit(value: f64) -> f64 {
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid rounds tiny negative inputs up to exactly 1.0
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// [`bytemuck`]-compatible colour output for a single pixel.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::opaque(0, 0, 0)
    }
}

/// Cyclic palette: light at both ends of the unit interval, dark in the middle.
#[derive(Clone, Copy, Debug)]
pub struct CyclicPalette {
    interior: Rgba,
}

impl CyclicPalette {
    pub fn new() -> Self {
        Self {
            interior: Self::sample(0.5),
        }
    }

    fn sample(t: f64) -> Rgba {
        let channel = |phase: f64| {
            let level = 0.5 + 0.5 * (TAU * (t + phase)).cos();
            (level.clamp(0.0, 1.0) * 255.0).round() as u8
        };
        Rgba::opaque(channel(0.0), channel(0.08), channel(0.16))
    }

    /// Colour for one normalized cell. Interior cells get the palette midpoint.
    pub fn colour(&self, cell: Escape) -> Rgba {
        match cell {
            Escape::Escaped(value) => Self::sample(value),
            Escape::Interior => self.interior,
        }
    }

    /// Colour a normalized raster into `pixels`, which must hold one entry per cell.
    pub fn paint(&self, normalized: &Raster, pixels: &mut [Rgba]) {
        debug_assert!(pixels.len() == normalized.cells().len());

        normalized
            .cells()
            .par_iter()
            .zip(pixels)
            .for_each(|(cell, pixel)| *pixel = self.colour(*cell));
    }
}

impl Default for CyclicPalette {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen;

    fn raster_of(values: &[Escape]) -> Raster {
        Raster::from_cells(screen::Size::new(values.len() as u32, 1), values.to_vec()).unwrap()
    }

    #[test]
    fn wraps_shifted_values_into_unit_interval() {
        let raster = raster_of(&[
            Escape::Escaped(0.25),
            Escape::Escaped(1.75),
            Escape::Escaped(0.9),
        ]);
        let normalized = normalize(&raster, 0.5);

        let values: Vec<f64> = normalized.cells().iter().filter_map(Escape::value).collect();
        let expected = [0.75, 0.25, 0.4];
        for (value, expected) in values.iter().zip(expected) {
            assert!((value - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn interior_cells_pass_through() {
        let raster = raster_of(&[Escape::Interior, Escape::Escaped(0.1), Escape::Interior]);
        let normalized = normalize(&raster, 0.3);
        assert!(normalized.cells()[0].is_interior());
        assert!(normalized.cells()[2].is_interior());
    }

    #[test]
    fn tiny_negative_values_do_not_reach_one() {
        let raster = raster_of(&[Escape::Escaped(-1e-18)]);
        let value = normalize(&raster, 0.0).cells()[0].value().unwrap();
        assert!((0.0..1.0).contains(&value));
    }

    #[test]
    fn interior_colour_is_palette_midpoint() {
        let palette = CyclicPalette::new();
        assert_eq!(palette.colour(Escape::Interior), palette.colour(Escape::Escaped(0.5)));
        assert_ne!(palette.colour(Escape::Interior), palette.colour(Escape::Escaped(0.0)));
    }

    #[test]
    fn paint_fills_every_pixel() {
        let raster = raster_of(&[Escape::Escaped(0.0), Escape::Interior]);
        let palette = CyclicPalette::new();
        let mut pixels = vec![Rgba::default(); 2];
        palette.paint(&raster, &mut pixels);
        assert_eq!(pixels[0], palette.colour(Escape::Escaped(0.0)));
        assert_eq!(pixels[1], palette.colour(Escape::Interior));
    }
}
