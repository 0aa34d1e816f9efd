use crate::{raster::Raster, screen};

/// The raster on display plus a scratch raster that renders land in first.
#[derive(Clone, Debug)]
pub struct DoubleBuffered {
    pub front: Raster,
    pub back: Raster,
}

impl DoubleBuffered {
    pub fn new(size: screen::Size) -> Self {
        Self {
            front: Raster::new(size),
            back: Raster::new(size),
        }
    }

    /// Promote the back raster after a render completes.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back)
    }
}
