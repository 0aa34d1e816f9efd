use crate::{escape::Escape, screen};

/// Escape values for one rendered view, stored row-major with row 0 along the southern edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    size: screen::Size,
    cells: Vec<Escape>,
}

impl Raster {
    /// A raster with every cell marked interior until the first render.
    pub fn new(size: screen::Size) -> Self {
        Self {
            size,
            cells: vec![Escape::Interior; size.area()],
        }
    }

    /// Wrap existing cells; `None` unless there is exactly one cell per pixel.
    pub fn from_cells(size: screen::Size, cells: Vec<Escape>) -> Option<Self> {
        (cells.len() == size.area()).then_some(Self { size, cells })
    }

    pub fn size(&self) -> screen::Size {
        self.size
    }

    pub fn cells(&self) -> &[Escape] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Escape] {
        &mut self.cells
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<Escape> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.cells
            .get(y as usize * self.size.width as usize + x as usize)
            .copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Escape]> {
        self.cells.chunks(self.size.width.max(1) as usize)
    }

    pub fn interior_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_interior()).count()
    }

    /// Fraction of cells that never escaped. An empty raster has ratio 0.
    pub fn interior_ratio(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.interior_count() as f64 / self.cells.len() as f64
    }

    /// Copy of the `size` block whose south-west cell is `(x, y)`, clipped to this raster.
    pub fn region(&self, x: u32, y: u32, size: screen::Size) -> Raster {
        let width = size.width.min(self.size.width.saturating_sub(x));
        let height = size.height.min(self.size.height.saturating_sub(y));
        if width == 0 || height == 0 {
            return Raster::new(screen::Size::new(width, height));
        }

        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for row in self.rows().skip(y as usize).take(height as usize) {
            cells.extend_from_slice(&row[x as usize..(x + width) as usize]);
        }

        Raster {
            size: screen::Size::new(width, height),
            cells,
        }
    }

    /// Apply `f` to every cell, keeping the shape.
    pub fn map(&self, f: impl Fn(Escape) -> Escape) -> Raster {
        Raster {
            size: self.size,
            cells: self.cells.iter().map(|cell| f(*cell)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped(size: screen::Size) -> Raster {
        let mut raster = Raster::new(size);
        for (index, cell) in raster.cells_mut().iter_mut().enumerate() {
            if index % 2 == 0 {
                *cell = Escape::Escaped(index as f64);
            }
        }
        raster
    }

    #[test]
    fn new_raster_is_all_interior() {
        let raster = Raster::new(screen::Size::new(3, 2));
        assert_eq!(raster.cells().len(), 6);
        assert_eq!(raster.interior_ratio(), 1.0);
    }

    #[test]
    fn from_cells_checks_shape() {
        let size = screen::Size::new(2, 2);
        assert!(Raster::from_cells(size, vec![Escape::Interior; 3]).is_none());
        let raster = Raster::from_cells(size, vec![Escape::Escaped(0.5); 4]).unwrap();
        assert_eq!(raster.interior_ratio(), 0.0);
    }

    #[test]
    fn empty_raster_has_zero_ratio() {
        assert_eq!(Raster::new(screen::Size::new(0, 0)).interior_ratio(), 0.0);
    }

    #[test]
    fn interior_ratio_counts_interior_tags() {
        let raster = striped(screen::Size::new(4, 4));
        assert_eq!(raster.interior_count(), 8);
        assert_eq!(raster.interior_ratio(), 0.5);
    }

    #[test]
    fn get_is_row_major_and_bounds_checked() {
        let raster = striped(screen::Size::new(4, 3));
        assert_eq!(raster.get(2, 1), Some(Escape::Escaped(6.0)));
        assert_eq!(raster.get(1, 1), Some(Escape::Interior));
        assert_eq!(raster.get(4, 0), None);
        assert_eq!(raster.get(0, 3), None);
    }

    #[test]
    fn region_copies_block_and_clips() {
        let raster = striped(screen::Size::new(4, 4));

        let block = raster.region(1, 2, screen::Size::new(2, 2));
        assert_eq!(block.size(), screen::Size::new(2, 2));
        assert_eq!(block.get(0, 0), raster.get(1, 2));
        assert_eq!(block.get(1, 1), raster.get(2, 3));

        let clipped = raster.region(3, 3, screen::Size::new(5, 5));
        assert_eq!(clipped.size(), screen::Size::new(1, 1));
        assert_eq!(clipped.get(0, 0), raster.get(3, 3));
    }
}
