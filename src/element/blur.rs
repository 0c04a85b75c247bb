use egui::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Edge length of one pixelation tile.
pub const TILE_SIZE: f32 = 15.0;

// Tile greys stay away from pure black/white so the region reads as "blurred"
const MIN_GREY: u8 = 64;
const MAX_GREY: u8 = 224;

/// Grid of opaque grey tiles imitating a pixelated region.
///
/// Tile values are random per tile; nothing underneath is sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlurData {
    pub width: f32,
    pub height: f32,
    pub tile_size: f32,
    pub columns: u32,
    pub rows: u32,
    /// Row-major grey levels, `columns * rows` long.
    pub tiles: Vec<u8>,
}

impl BlurData {
    pub fn generate<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Self {
        let columns = (width / TILE_SIZE).ceil().max(1.0) as u32;
        let rows = (height / TILE_SIZE).ceil().max(1.0) as u32;
        let tiles = (0..columns * rows)
            .map(|_| rng.random_range(MIN_GREY..=MAX_GREY))
            .collect();

        Self {
            width,
            height,
            tile_size: TILE_SIZE,
            columns,
            rows,
            tiles,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn tile(&self, column: u32, row: u32) -> Option<u8> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.tiles.get((row * self.columns + column) as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn tile_count_rounds_up() {
        let mut rng = StdRng::seed_from_u64(1);
        let blur = BlurData::generate(31.0, 45.0, &mut rng);

        assert_eq!(blur.columns, 3);
        assert_eq!(blur.rows, 3);
        assert_eq!(blur.tiles.len(), 9);
        assert!(blur.tiles.iter().all(|g| (MIN_GREY..=MAX_GREY).contains(g)));
        assert_eq!(blur.tile(3, 0), None);
    }
}
