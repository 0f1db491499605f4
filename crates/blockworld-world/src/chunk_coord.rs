use serde::{Deserialize, Serialize};

/// Horizontal chunk coordinate. Chunk `(cx, cz)` covers world x in
/// `[cx * width, cx * width + width)`, the same for z, and the full height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    /// Grid (Chebyshev) distance, the metric used for draw distance.
    #[inline]
    pub fn chebyshev(self, other: ChunkCoord) -> i32 {
        (self.cx - other.cx).abs().max((self.cz - other.cz).abs())
    }

    /// All coordinates within grid radius `radius` of `self`, row by row.
    pub fn square_around(self, radius: i32) -> impl Iterator<Item = ChunkCoord> {
        let r = radius.max(0);
        (-r..=r).flat_map(move |dz| (-r..=r).map(move |dx| self.offset(dx, dz)))
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

/// Position of a cell inside a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl LocalPos {
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

/// Chunk dimensions: `width` along x and z, `height` along y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkSize {
    pub width: usize,
    pub height: usize,
}

impl ChunkSize {
    #[inline]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn volume(&self) -> usize {
        self.width * self.width * self.height
    }

    /// World-space x/z of the chunk's minimum corner.
    #[inline]
    pub fn origin(&self, coord: ChunkCoord) -> (i32, i32) {
        let w = self.width as i32;
        (coord.cx * w, coord.cz * w)
    }

    #[inline]
    pub fn chunk_of(&self, wx: i32, wz: i32) -> ChunkCoord {
        let w = self.width as i32;
        ChunkCoord::new(wx.div_euclid(w), wz.div_euclid(w))
    }

    /// Splits a world block coordinate into its chunk and chunk-local position.
    /// Returns `None` when `wy` is outside `[0, height)`.
    pub fn world_to_chunk(&self, wx: i32, wy: i32, wz: i32) -> Option<(ChunkCoord, LocalPos)> {
        if wy < 0 || wy >= self.height as i32 {
            return None;
        }
        let w = self.width as i32;
        let coord = self.chunk_of(wx, wz);
        let local = LocalPos::new(
            wx.rem_euclid(w) as usize,
            wy as usize,
            wz.rem_euclid(w) as usize,
        );
        Some((coord, local))
    }

    #[inline]
    pub fn chunk_to_world(&self, coord: ChunkCoord, local: LocalPos) -> (i32, i32, i32) {
        let (ox, oz) = self.origin(coord);
        (ox + local.x as i32, local.y as i32, oz + local.z as i32)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        let w = self.width as i32;
        let h = self.height as i32;
        (0..w).contains(&x) && (0..h).contains(&y) && (0..w).contains(&z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_world_coords_map_to_negative_chunks() {
        let size = ChunkSize::new(32, 20);
        let (c, l) = size.world_to_chunk(-1, 3, -32).unwrap();
        assert_eq!(c, ChunkCoord::new(-1, -1));
        assert_eq!(l, LocalPos::new(31, 3, 0));
    }

    #[test]
    fn out_of_height_has_no_chunk() {
        let size = ChunkSize::new(16, 8);
        assert!(size.world_to_chunk(0, -1, 0).is_none());
        assert!(size.world_to_chunk(0, 8, 0).is_none());
        assert!(size.world_to_chunk(0, 7, 0).is_some());
    }

    #[test]
    fn square_around_covers_grid_radius() {
        let c = ChunkCoord::new(4, -2);
        let coords: Vec<_> = c.square_around(2).collect();
        assert_eq!(coords.len(), 25);
        assert!(coords.iter().all(|k| k.chebyshev(c) <= 2));
        assert_eq!(ChunkCoord::new(0, 0).square_around(0).count(), 1);
    }
}
