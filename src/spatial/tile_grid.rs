//! Sparse tile storage indexed by tile coordinate.
//!
//! Every accessor takes signed coordinates and treats anything outside the
//! grid as an empty cell, so callers can probe neighbours without range checks.

#[derive(Clone, Debug)]
pub struct TileGrid<T> {
    width: u32,
    height: u32,
    cells: Vec<Option<T>>,
}

impl<T> TileGrid<T> {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize);
        let mut cells = Vec::with_capacity(size);
        cells.resize_with(size, || None);
        Self { width, height, cells }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    #[inline]
    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        self.index(col, row).is_some()
    }

    pub fn get(&self, col: i32, row: i32) -> Option<&T> {
        self.index(col, row).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, col: i32, row: i32) -> Option<&mut T> {
        match self.index(col, row) {
            Some(i) => self.cells[i].as_mut(),
            None => None,
        }
    }

    pub fn is_occupied(&self, col: i32, row: i32) -> bool {
        self.get(col, row).is_some()
    }

    /// Stores `tile` in an empty cell. Out of range or occupied cells keep
    /// what they hold and drop `tile`.
    pub fn insert(&mut self, col: i32, row: i32, tile: T) -> bool {
        match self.index(col, row) {
            Some(i) if self.cells[i].is_none() => {
                self.cells[i] = Some(tile);
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, col: i32, row: i32) -> Option<T> {
        let i = self.index(col, row)?;
        self.cells[i].take()
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Occupied cells in the inclusive column/row range, column by column.
    /// The range may extend past the grid.
    pub fn region(&self, col0: i32, row0: i32, col1: i32, row1: i32) -> impl Iterator<Item = (u32, u32, &T)> + '_ {
        let c0 = col0.max(0);
        let r0 = row0.max(0);
        let c1 = col1.min(self.width as i32 - 1);
        let r1 = row1.min(self.height as i32 - 1);
        (c0..=c1).flat_map(move |col| {
            (r0..=r1).filter_map(move |row| self.get(col, row).map(|t| (col as u32, row as u32, t)))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.as_ref().map(|t| (i as u32 % width, i as u32 / width, t)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, u32, &mut T)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter_mut()
            .enumerate()
            .filter_map(move |(i, c)| c.as_mut().map(|t| (i as u32 % width, i as u32 / width, t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_is_empty() {
        let mut grid: TileGrid<u8> = TileGrid::new(4, 3);
        assert!(grid.insert(3, 2, 7));
        assert!(!grid.insert(4, 0, 1));
        assert!(!grid.insert(-1, 0, 1));
        assert!(!grid.insert(3, 2, 9));
        assert_eq!(grid.get(3, 2), Some(&7));
        assert_eq!(grid.get(-1, -1), None);
        assert_eq!(grid.get(100, 1), None);
        assert_eq!(grid.remove(9, 9), None);
        assert_eq!(grid.count(), 1);
    }

    #[test]
    fn region_clamps_and_orders_by_column() {
        let mut grid = TileGrid::new(3, 3);
        grid.insert(0, 1, 'a');
        grid.insert(0, 0, 'b');
        grid.insert(2, 0, 'c');
        let found: Vec<char> = grid.region(-5, -5, 1, 10).map(|(_, _, t)| *t).collect();
        assert_eq!(found, vec!['b', 'a']);
        assert_eq!(grid.region(-3, -3, -1, -1).count(), 0);
    }
}
