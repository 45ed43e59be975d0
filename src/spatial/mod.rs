//! Spatial indexing for static tiles.

pub mod tile_grid;

pub use tile_grid::TileGrid;
