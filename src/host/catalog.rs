//! Level Catalog
//!
//! Ordered, immutable list of levels loaded once per process. Ships with
//! the 24 built-in levels; hosts may load their own from JSON instead.

use std::collections::BTreeSet;
use thiserror::Error;

use crate::game::level::{Difficulty, LevelDefinition, LevelError, ShapeKind};

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed JSON
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A level failed validation
    #[error("invalid level: {0}")]
    Invalid(#[from] LevelError),
}

/// Catalog contract consumed by the session.
pub trait LevelCatalog {
    /// All levels in play order.
    fn levels(&self) -> &[LevelDefinition];

    /// Look up a level by id.
    fn level(&self, id: u32) -> Option<&LevelDefinition> {
        self.levels().iter().find(|l| l.id == id)
    }

    /// Does another level follow `id` in play order?
    fn has_next(&self, id: u32) -> bool {
        let levels = self.levels();
        levels
            .iter()
            .position(|l| l.id == id)
            .is_some_and(|i| i + 1 < levels.len())
    }
}

/// A validated, in-memory catalog.
#[derive(Clone, Debug)]
pub struct Catalog {
    levels: Vec<LevelDefinition>,
}

impl Catalog {
    /// Build from a list of levels in play order, validating each.
    ///
    /// Ids need not be contiguous but must be unique.
    pub fn from_levels(levels: Vec<LevelDefinition>) -> Result<Self, LevelError> {
        let mut seen = BTreeSet::new();
        for level in &levels {
            level.validate()?;
            if !seen.insert(level.id) {
                return Err(LevelError::DuplicateId(level.id));
            }
        }
        Ok(Self { levels })
    }

    /// Load a JSON array of levels.
    pub fn from_json(s: &str) -> Result<Self, CatalogError> {
        let levels: Vec<LevelDefinition> = serde_json::from_str(s)?;
        Ok(Self::from_levels(levels)?)
    }

    /// The shipped level set.
    pub fn builtin() -> Self {
        use Difficulty::*;
        use ShapeKind::*;

        let all = ShapeKind::ALL.to_vec();
        let table: Vec<(&str, &str, u32, u32, u32, Vec<ShapeKind>, Difficulty)> = vec![
            ("First Steps", "Learn the basics", 3, 90, 50, vec![Circle, Square], Easy),
            ("Shape Shifter", "More shapes to match", 3, 80, 100, vec![Circle, Square, Triangle], Easy),
            ("Quick Match", "Speed things up", 3, 70, 150, vec![Circle, Square, Triangle], Easy),
            ("Pattern Play", "Find the patterns", 4, 75, 200, vec![Circle, Square, Triangle], Easy),
            ("Diamond Intro", "New shape appears", 4, 70, 250, vec![Circle, Square, Triangle, Diamond], Easy),
            ("Easy Master", "Complete basics", 4, 65, 300, vec![Circle, Square, Triangle, Diamond], Easy),
            ("Pentagon Power", "Five sides challenge", 4, 60, 350, vec![Circle, Triangle, Diamond, Pentagon], Medium),
            ("Time Pressure", "Beat the clock", 5, 55, 400, vec![Square, Diamond, Pentagon], Medium),
            ("Shape Variety", "All shapes available", 5, 60, 450, all.clone(), Medium),
            ("Hexagon Hunt", "Six-sided challenge", 5, 50, 500, all.clone(), Medium),
            ("Quick Thinking", "Faster decisions", 5, 45, 550, all.clone(), Medium),
            ("Rotation Master", "Complex rotations", 5, 50, 600, all.clone(), Medium),
            ("Grid Expansion", "Bigger playground", 6, 60, 650, all.clone(), Medium),
            ("Medium Master", "Peak performance", 6, 55, 700, all.clone(), Medium),
            ("Speed Demon", "Ultimate speed test", 6, 45, 750, all.clone(), Hard),
            ("Chaos Theory", "Pure chaos", 6, 40, 800, all.clone(), Hard),
            ("Memory Challenge", "Remember everything", 6, 50, 850, all.clone(), Hard),
            ("Precision Strike", "No mistakes allowed", 6, 45, 900, all.clone(), Hard),
            ("Time Crunch", "Extreme pressure", 6, 35, 950, all.clone(), Hard),
            ("Hard Master", "Conquer the hard", 6, 40, 1000, all.clone(), Hard),
            ("Elite Challenge", "For experts only", 6, 50, 1100, all.clone(), Expert),
            ("Grand Master", "Supreme difficulty", 6, 40, 1200, all.clone(), Expert),
            ("Impossible Task", "Nearly impossible", 6, 35, 1300, all.clone(), Expert),
            ("The Ultimate", "Can you beat this?", 6, 30, 1500, all, Expert),
        ];

        let levels = table
            .into_iter()
            .enumerate()
            .map(|(i, (name, description, grid_size, time_limit, target, kinds, difficulty))| {
                LevelDefinition {
                    id: i as u32 + 1,
                    name: name.to_owned(),
                    description: description.to_owned(),
                    grid_size,
                    time_limit_seconds: time_limit,
                    target_score: target,
                    shape_types: kinds,
                    difficulty,
                }
            })
            .collect();

        Self { levels }
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Is the catalog empty?
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog for Catalog {
    fn levels(&self) -> &[LevelDefinition] {
        &self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_are_valid() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 24);
        for (i, level) in catalog.levels().iter().enumerate() {
            assert_eq!(level.id, i as u32 + 1);
            level.validate().unwrap();
        }
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.level(8).map(|l| l.name.as_str()), Some("Time Pressure"));
        assert_eq!(catalog.level(8).map(|l| l.grid_size), Some(5));
        assert!(catalog.level(0).is_none());
        assert!(catalog.level(25).is_none());
    }

    #[test]
    fn test_has_next() {
        let catalog = Catalog::builtin();
        assert!(catalog.has_next(1));
        assert!(catalog.has_next(23));
        assert!(!catalog.has_next(24));
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let json = r#"[{
            "id": 1, "name": "Bad", "description": "", "grid_size": 3,
            "time_limit_seconds": 30, "target_score": 0, "shape_types": [],
            "difficulty": "easy"
        }]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::Invalid(LevelError::EmptyShapeTypes(1)))
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[{
            "id": 1, "name": "Tiny", "description": "two by two", "grid_size": 2,
            "time_limit_seconds": 30, "target_score": 0, "shape_types": ["circle"],
            "difficulty": "easy"
        }]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.has_next(1));
    }

    #[test]
    fn test_has_next_follows_play_order() {
        let json = r#"[
            { "id": 5, "name": "Five", "description": "", "grid_size": 2,
              "time_limit_seconds": 30, "target_score": 0, "shape_types": ["circle"],
              "difficulty": "easy" },
            { "id": 6, "name": "Six", "description": "", "grid_size": 2,
              "time_limit_seconds": 30, "target_score": 0, "shape_types": ["square"],
              "difficulty": "easy" }
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();

        assert!(catalog.has_next(5));
        assert!(!catalog.has_next(6));
        assert!(!catalog.has_next(1));
        assert_eq!(catalog.level(6).map(|l| l.name.as_str()), Some("Six"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let level = LevelDefinition::new(1, 2, 30, 0, vec![ShapeKind::Circle]).unwrap();
        let result = Catalog::from_levels(vec![level.clone(), level]);
        assert!(matches!(result, Err(LevelError::DuplicateId(1))));
    }
}
