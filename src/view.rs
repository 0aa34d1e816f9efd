//! A single viewport onto the parameter plane, together with the raster it owns.

use log::debug;
use num_complex::Complex64;

use crate::{
    double_buffered::DoubleBuffered,
    error::{ParameterError, RenderError},
    geometry::SamplingGeometry,
    grid::{mandel_grid_cancellable, CancelToken},
    params::{validate_diameter, RenderParameters},
    raster::Raster,
    screen,
    zoom::{ZoomOutcome, ZoomSearch},
};

#[derive(Clone, Debug)]
pub struct View {
    center: Complex64,
    diameter: f64,
    init_center: Complex64,
    init_diameter: f64,
    buffers: DoubleBuffered,
}

impl View {
    /// A view whose reset target is the given frame. Nothing is rendered yet.
    pub fn new(center: Complex64, diameter: f64, size: screen::Size) -> Result<Self, ParameterError> {
        let diameter = validate_diameter(diameter)?;
        Ok(Self {
            center,
            diameter,
            init_center: center,
            init_diameter: diameter,
            buffers: DoubleBuffered::new(size),
        })
    }

    pub fn center(&self) -> Complex64 {
        self.center
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn init_center(&self) -> Complex64 {
        self.init_center
    }

    pub fn init_diameter(&self) -> f64 {
        self.init_diameter
    }

    pub fn size(&self) -> screen::Size {
        self.buffers.front.size()
    }

    /// The last completed render.
    pub fn raster(&self) -> &Raster {
        &self.buffers.front
    }

    pub fn geometry(&self) -> SamplingGeometry {
        SamplingGeometry::new(self.center, self.diameter, self.size())
    }

    pub fn pixel_to_z(&self, x: f64, y: f64) -> Complex64 {
        self.geometry().pixel_to_z(x, y)
    }

    pub fn z_to_pixel(&self, z: Complex64) -> (f64, f64) {
        self.geometry().z_to_pixel(z)
    }

    /// Point the view somewhere new; this also becomes the reset target.
    pub fn retarget(&mut self, center: Complex64, diameter: f64) -> Result<(), ParameterError> {
        let diameter = validate_diameter(diameter)?;
        self.init_center = center;
        self.init_diameter = diameter;
        self.center = center;
        self.diameter = diameter;
        Ok(())
    }

    /// Move the live frame without touching the reset target.
    pub fn set_frame(&mut self, center: Complex64, diameter: f64) -> Result<(), ParameterError> {
        self.diameter = validate_diameter(diameter)?;
        self.center = center;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.center = self.init_center;
        self.diameter = self.init_diameter;
    }

    /// Halve the diameter, keeping `pointer` at the same place on screen.
    ///
    /// Fails without moving once the diameter would underflow to zero.
    pub fn zoom_in(&mut self, pointer: Complex64) -> Result<(), ParameterError> {
        self.diameter = validate_diameter(self.diameter / 2.0)?;
        self.center = 0.5 * self.center + 0.5 * pointer;
        Ok(())
    }

    /// Double the diameter, keeping `pointer` at the same place on screen.
    ///
    /// Fails without moving once the diameter would overflow.
    pub fn zoom_out(&mut self, pointer: Complex64) -> Result<(), ParameterError> {
        self.diameter = validate_diameter(self.diameter * 2.0)?;
        self.center = 2.0 * self.center - pointer;
        Ok(())
    }

    pub fn recenter(&mut self, pointer: Complex64) {
        self.center = pointer;
    }

    /// Render the live frame. The displayed raster only changes if the render completes.
    pub fn render(&mut self, params: RenderParameters, cancel: &CancelToken) -> Result<(), RenderError> {
        mandel_grid_cancellable(self.center, self.diameter, &mut self.buffers.back, params, cancel)?;
        self.buffers.swap();
        Ok(())
    }

    /**
    Auto-frame the current centre, starting from the current diameter.

    On success the live diameter becomes the one the search settled on and the
    displayed raster is the search's final render. The reset target is left alone.
    */
    pub fn find_zoom(
        &mut self,
        search: &ZoomSearch,
        cancel: &CancelToken,
    ) -> Result<ZoomOutcome, RenderError> {
        let outcome = search.find_zoom(self.center, self.diameter, &mut self.buffers.back, cancel)?;
        self.diameter = outcome.diameter;
        self.buffers.swap();
        debug!("view diameter now {:e}", self.diameter);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> View {
        View::new(Complex64::new(-0.5, 0.0), 4.0, screen::Size::new(20, 20)).unwrap()
    }

    #[test]
    fn rejects_invalid_diameter() {
        assert!(View::new(Complex64::new(0.0, 0.0), -1.0, screen::Size::new(2, 2)).is_err());
        let mut view = view();
        assert!(view.set_frame(Complex64::new(0.0, 0.0), 0.0).is_err());
        assert_eq!(view.diameter(), 4.0);
    }

    #[test]
    fn zoom_in_then_out_restores_frame() {
        let mut view = view();
        let pointer = Complex64::new(0.25, 0.5);

        view.zoom_in(pointer).unwrap();
        assert_eq!(view.diameter(), 2.0);
        assert_eq!(view.center(), Complex64::new(-0.125, 0.25));

        view.zoom_out(pointer).unwrap();
        assert_eq!(view.diameter(), 4.0);
        assert_eq!(view.center(), Complex64::new(-0.5, 0.0));
    }

    #[test]
    fn zoom_keeps_pointer_fixed_on_screen() {
        let mut view = view();
        let pointer = view.pixel_to_z(3.0, 15.0);
        let before = view.z_to_pixel(pointer);
        view.zoom_in(pointer).unwrap();
        let after = view.z_to_pixel(pointer);
        assert!((after.0 - before.0).abs() < 1e-9);
        assert!((after.1 - before.1).abs() < 1e-9);

        view.zoom_out(pointer).unwrap();
        let restored = view.z_to_pixel(pointer);
        assert!((restored.0 - before.0).abs() < 1e-9);
        assert!((restored.1 - before.1).abs() < 1e-9);
    }

    #[test]
    fn zoom_out_stops_before_diameter_overflows() {
        let mut view = view();
        let pointer = Complex64::new(0.0, 0.0);
        let mut steps = 0;
        let err = loop {
            let (center, diameter) = (view.center(), view.diameter());
            match view.zoom_out(pointer) {
                Ok(()) => steps += 1,
                Err(err) => {
                    assert_eq!(view.center(), center);
                    assert_eq!(view.diameter(), diameter);
                    break err;
                }
            }
            assert!(steps < 2000);
        };

        assert_eq!(err, ParameterError::InvalidDiameter(f64::INFINITY));
        assert_eq!(view.diameter(), 2f64.powi(1023));
        assert!(view.center().is_finite());
    }

    #[test]
    fn zoom_in_stops_before_diameter_underflows() {
        let mut view = view();
        let pointer = Complex64::new(0.25, 0.5);
        let mut steps = 0;
        let err = loop {
            let (center, diameter) = (view.center(), view.diameter());
            match view.zoom_in(pointer) {
                Ok(()) => steps += 1,
                Err(err) => {
                    assert_eq!(view.center(), center);
                    assert_eq!(view.diameter(), diameter);
                    break err;
                }
            }
            assert!(steps < 2000);
        };

        assert_eq!(err, ParameterError::InvalidDiameter(0.0));
        assert!(view.diameter() > 0.0);
    }

    #[test]
    fn reset_returns_to_init_frame() {
        let mut view = view();
        view.recenter(Complex64::new(1.0, 1.0));
        view.zoom_in(Complex64::new(0.0, 0.0)).unwrap();
        view.reset();
        assert_eq!(view.center(), view.init_center());
        assert_eq!(view.diameter(), view.init_diameter());
    }

    #[test]
    fn retarget_moves_reset_target() {
        let mut view = view();
        view.retarget(Complex64::new(-1.0, 0.0), 1e-3).unwrap();
        view.zoom_out(Complex64::new(0.0, 0.0)).unwrap();
        view.reset();
        assert_eq!(view.center(), Complex64::new(-1.0, 0.0));
        assert_eq!(view.diameter(), 1e-3);
    }

    #[test]
    fn cancelled_render_keeps_previous_raster() {
        let mut view = view();
        view.render(RenderParameters::default(), &CancelToken::new()).unwrap();
        let before = view.raster().clone();

        let cancel = CancelToken::new();
        cancel.cancel();
        view.recenter(Complex64::new(5.0, 5.0));
        assert_eq!(
            view.render(RenderParameters::default(), &cancel),
            Err(RenderError::Cancelled)
        );
        assert_eq!(view.raster(), &before);
    }

    #[test]
    fn find_zoom_updates_live_diameter_only() {
        let mut view = View::new(Complex64::new(-1.0, 0.0), 1e-5, screen::Size::new(16, 16)).unwrap();
        let outcome = view.find_zoom(&ZoomSearch::default(), &CancelToken::new()).unwrap();
        assert_eq!(view.diameter(), outcome.diameter);
        assert_eq!(view.init_diameter(), 1e-5);
    }
}
