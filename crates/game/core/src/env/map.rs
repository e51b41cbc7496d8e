use crate::state::Position;

/// Static grid oracle exposing immutable layout information.
pub trait GridOracle {
    fn dimensions(&self) -> MapDimensions;

    /// Terrain at `position`, or `None` outside the grid.
    fn tile(&self, position: Position) -> Option<TerrainKind>;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    /// In bounds and not impassable terrain.
    fn is_passable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(TerrainKind::is_passable)
    }

    /// Whether `position` is the designated exit tile.
    fn is_exit(&self, position: Position) -> bool {
        self.tile(position) == Some(TerrainKind::Exit)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Canonical terrain classes for static map tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Floor,
    Wall,
    Void,
    Water,
    /// Passable; standing on it freezes every non-player actor.
    Exit,
}

impl TerrainKind {
    pub fn is_passable(self) -> bool {
        matches!(self, TerrainKind::Floor | TerrainKind::Exit)
    }

    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(TerrainKind::Floor),
            '#' => Some(TerrainKind::Wall),
            '~' => Some(TerrainKind::Water),
            ' ' => Some(TerrainKind::Void),
            'E' => Some(TerrainKind::Exit),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridParseError {
    #[error("grid layout is empty")]
    Empty,

    #[error("row {row} has width {width}, expected {expected}")]
    RaggedRow {
        row: usize,
        width: usize,
        expected: usize,
    },

    #[error("unknown glyph {glyph:?} at {position}")]
    UnknownGlyph { glyph: char, position: Position },
}

/// In-memory rectangular grid, row-major with `y` growing downwards.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticGrid {
    dimensions: MapDimensions,
    tiles: Vec<TerrainKind>,
}

impl StaticGrid {
    /// Grid of the given size filled with floor.
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            dimensions: MapDimensions::new(width, height),
            tiles: vec![TerrainKind::Floor; (width * height) as usize],
        }
    }

    /// Parses an ASCII layout: `.` floor, `#` wall, `~` water, ` ` void, `E` exit.
    pub fn parse(layout: &str) -> Result<Self, GridParseError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(|row| row.trim_end_matches('\r'))
            .filter(|row| !row.is_empty())
            .collect();
        let expected = rows.first().ok_or(GridParseError::Empty)?.chars().count();

        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width != expected {
                return Err(GridParseError::RaggedRow {
                    row: y,
                    width,
                    expected,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let terrain =
                    TerrainKind::from_glyph(glyph).ok_or(GridParseError::UnknownGlyph {
                        glyph,
                        position: Position::new(x as i32, y as i32),
                    })?;
                tiles.push(terrain);
            }
        }

        Ok(Self {
            dimensions: MapDimensions::new(expected as u32, rows.len() as u32),
            tiles,
        })
    }

    /// Overwrites the terrain at `position`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, position: Position, terrain: TerrainKind) {
        if let Some(index) = self.index(position) {
            self.tiles[index] = terrain;
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions
            .contains(position)
            .then(|| position.y as usize * self.dimensions.width as usize + position.x as usize)
    }
}

impl GridOracle for StaticGrid {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<TerrainKind> {
        self.index(position).map(|index| self.tiles[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_terrain_row_major() {
        let grid = StaticGrid::parse("..#\n~.E\n").unwrap();
        assert_eq!(grid.dimensions(), MapDimensions::new(3, 2));
        assert_eq!(grid.tile(Position::new(2, 0)), Some(TerrainKind::Wall));
        assert_eq!(grid.tile(Position::new(0, 1)), Some(TerrainKind::Water));
        assert!(grid.is_exit(Position::new(2, 1)));
        assert!(grid.is_passable(Position::new(2, 1)));
        assert!(!grid.is_passable(Position::new(2, 0)));
        assert!(!grid.is_passable(Position::new(3, 0)));
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let error = StaticGrid::parse("...\n..\n").unwrap_err();
        assert_eq!(
            error,
            GridParseError::RaggedRow {
                row: 1,
                width: 2,
                expected: 3
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_glyphs() {
        let error = StaticGrid::parse("..x\n").unwrap_err();
        assert!(matches!(error, GridParseError::UnknownGlyph { glyph: 'x', .. }));
        assert_eq!(StaticGrid::parse("\n\n"), Err(GridParseError::Empty));
    }

    #[test]
    fn set_ignores_out_of_bounds() {
        let mut grid = StaticGrid::open(2, 2);
        grid.set(Position::new(5, 5), TerrainKind::Wall);
        grid.set(Position::new(1, 1), TerrainKind::Wall);
        assert_eq!(grid.tile(Position::new(1, 1)), Some(TerrainKind::Wall));
    }
}
