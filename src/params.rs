//! Render tunables.
//!
//! Parameters are a plain value handed to every render call. They are
//! validated when they are built or updated, so a render never sees an
//! iteration budget or escape radius the kernel can't work with.

use crate::error::ParameterError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParameters {
    max_iter: u32,
    esc_radius: f64,
}

impl RenderParameters {
    pub fn new(max_iter: i64, esc_radius: f64) -> Result<Self, ParameterError> {
        Ok(Self {
            max_iter: validate_max_iter(max_iter)?,
            esc_radius: validate_esc_radius(esc_radius)?,
        })
    }

    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    pub fn esc_radius(&self) -> f64 {
        self.esc_radius
    }

    /// Replace the iteration budget. On error the previous value is kept.
    pub fn set_max_iter(&mut self, max_iter: i64) -> Result<(), ParameterError> {
        self.max_iter = validate_max_iter(max_iter)?;
        Ok(())
    }

    /// Replace the escape radius. On error the previous value is kept.
    pub fn set_esc_radius(&mut self, esc_radius: f64) -> Result<(), ParameterError> {
        self.esc_radius = validate_esc_radius(esc_radius)?;
        Ok(())
    }
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            max_iter: 256,
            esc_radius: 100.0,
        }
    }
}

fn validate_max_iter(max_iter: i64) -> Result<u32, ParameterError> {
    match u32::try_from(max_iter) {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ParameterError::InvalidMaxIter(max_iter)),
    }
}

/// Largest accepted escape radius. Orbits below it can still be squared without overflowing.
pub const MAX_ESC_RADIUS: f64 = 1e150;

fn validate_esc_radius(esc_radius: f64) -> Result<f64, ParameterError> {
    if esc_radius > 1.0 && esc_radius <= MAX_ESC_RADIUS {
        Ok(esc_radius)
    } else {
        Err(ParameterError::InvalidEscapeRadius(esc_radius))
    }
}

pub fn validate_diameter(diameter: f64) -> Result<f64, ParameterError> {
    if diameter.is_finite() && diameter > 0.0 {
        Ok(diameter)
    } else {
        Err(ParameterError::InvalidDiameter(diameter))
    }
}

/// A named set of parameters used for a particular kind of render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderProfile {
    pub name: &'static str,
    pub params: RenderParameters,
}

/// Low fidelity profile for the intermediate renders of an auto-zoom search.
pub const SEARCH: RenderProfile = RenderProfile {
    name: "search",
    params: RenderParameters {
        max_iter: 512,
        esc_radius: 100.0,
    },
};

/// High fidelity profile for the render that actually gets displayed after a search.
pub const DISPLAY: RenderProfile = RenderProfile {
    name: "display",
    params: RenderParameters {
        max_iter: 2048,
        esc_radius: 100.0,
    },
};
