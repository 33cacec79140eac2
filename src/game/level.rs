//! Level Definitions
//!
//! Immutable level parameters supplied by the catalog. The engine never
//! mutates a level; it only reads grid size, time limit, target score and
//! the set of shape kinds allowed on the board.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Smallest playable grid edge.
pub const MIN_GRID_SIZE: u32 = 2;

// =============================================================================
// SHAPE KIND
// =============================================================================

/// Kind of shape placed on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ShapeKind {
    /// Round
    Circle = 0,
    /// Three sides
    Triangle = 1,
    /// Four equal sides
    Square = 2,
    /// Square turned on its corner
    Diamond = 3,
    /// Five sides
    Pentagon = 4,
    /// Six sides
    Hexagon = 5,
}

impl ShapeKind {
    /// Every kind, in declaration order.
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Circle,
        ShapeKind::Triangle,
        ShapeKind::Square,
        ShapeKind::Diamond,
        ShapeKind::Pentagon,
        ShapeKind::Hexagon,
    ];

    /// Get from index.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// Difficulty band shown next to a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Introductory levels
    Easy,
    /// Mid-game
    Medium,
    /// Late game
    Hard,
    /// Final levels
    Expert,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Level validation and lookup errors.
///
/// These surface at level-load time only; nothing during play returns them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// Level ids start at 1.
    #[error("level id must be at least 1")]
    InvalidId,

    /// No shape kinds to draw from.
    #[error("level {0} has no shape types")]
    EmptyShapeTypes(u32),

    /// Grid edge below [`MIN_GRID_SIZE`].
    #[error("level {level} grid size {grid_size} is below the minimum of 2")]
    GridTooSmall {
        /// Offending level id
        level: u32,
        /// Requested grid edge
        grid_size: u32,
    },

    /// Countdown would expire immediately.
    #[error("level {0} has a zero time limit")]
    ZeroTimeLimit(u32),

    /// Catalog has no level with this id.
    #[error("unknown level: {0}")]
    UnknownLevel(u32),

    /// Catalog lists the same id twice.
    #[error("duplicate level id: {0}")]
    DuplicateId(u32),
}

// =============================================================================
// LEVEL DEFINITION
// =============================================================================

/// Immutable parameters for one level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Level id (1-based, catalog order)
    pub id: u32,

    /// Display name
    pub name: String,

    /// Display blurb
    pub description: String,

    /// Grid edge length; the board has `grid_size²` cells
    pub grid_size: u32,

    /// Countdown length in seconds
    pub time_limit_seconds: u32,

    /// Score needed to complete the level
    pub target_score: u32,

    /// Kinds the generator may place
    pub shape_types: Vec<ShapeKind>,

    /// Difficulty band
    pub difficulty: Difficulty,
}

impl LevelDefinition {
    /// Build and validate a level.
    pub fn new(
        id: u32,
        grid_size: u32,
        time_limit_seconds: u32,
        target_score: u32,
        shape_types: Vec<ShapeKind>,
    ) -> Result<Self, LevelError> {
        let level = Self {
            id,
            name: format!("Level {id}"),
            description: String::new(),
            grid_size,
            time_limit_seconds,
            target_score,
            shape_types,
            difficulty: Difficulty::Easy,
        };
        level.validate()?;
        Ok(level)
    }

    /// Attach display metadata.
    pub fn with_display(mut self, name: &str, description: &str, difficulty: Difficulty) -> Self {
        self.name = name.to_owned();
        self.description = description.to_owned();
        self.difficulty = difficulty;
        self
    }

    /// Check construction preconditions.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.id == 0 {
            return Err(LevelError::InvalidId);
        }
        if self.shape_types.is_empty() {
            return Err(LevelError::EmptyShapeTypes(self.id));
        }
        if self.grid_size < MIN_GRID_SIZE {
            return Err(LevelError::GridTooSmall {
                level: self.id,
                grid_size: self.grid_size,
            });
        }
        if self.time_limit_seconds == 0 {
            return Err(LevelError::ZeroTimeLimit(self.id));
        }
        Ok(())
    }

    /// Number of grid cells.
    #[inline]
    pub fn cell_count(&self) -> u32 {
        self.grid_size * self.grid_size
    }

    /// Number of shape pairs placed on a board for this level.
    #[inline]
    pub fn pair_count(&self) -> u32 {
        self.cell_count() / 2
    }
}
