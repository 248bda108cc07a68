//! Rotation and stats operations over an injected store.

use std::sync::Arc;

use crate::rotation::types::{ColorStats, Palette, Rotation};
use crate::store::{ColorStore, StorageResult};

/// How a rotation's four store steps are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    /// One transaction; concurrent rotations serialize.
    Atomic,
    /// Independent store calls. Concurrent rotations may serve the same
    /// color, and a failed increment leaves the cursor advanced.
    Sequential,
}

impl RotationMode {
    pub fn from_atomic(atomic: bool) -> Self {
        if atomic {
            Self::Atomic
        } else {
            Self::Sequential
        }
    }
}

/// Serves colors from a palette and records visits in a [`ColorStore`].
///
/// Calls block on the store; async callers run them on the blocking pool.
#[derive(Clone)]
pub struct RotationEngine {
    store: Arc<dyn ColorStore>,
    palette: Arc<Palette>,
    mode: RotationMode,
}

impl RotationEngine {
    pub fn new(store: Arc<dyn ColorStore>, palette: Palette, mode: RotationMode) -> Self {
        Self {
            store,
            palette: Arc::new(palette),
            mode,
        }
    }

    /// Create tables and seed rows for this engine's palette.
    pub fn initialize(&self) -> StorageResult<()> {
        self.store.initialize(&self.palette)
    }

    /// Serve the color under the cursor, advance the cursor, count the visit.
    pub fn next_color(&self) -> StorageResult<Rotation> {
        let rotation = match self.mode {
            RotationMode::Atomic => self.store.rotate_atomic(&self.palette)?,
            RotationMode::Sequential => self.rotate_sequential()?,
        };
        tracing::debug!(color = %rotation.current_color, mode = ?self.mode, "Color served");
        Ok(rotation)
    }

    /// Current visit table. Never mutates the store.
    pub fn stats(&self) -> StorageResult<ColorStats> {
        Ok(ColorStats {
            colors: self.store.list_counts()?,
        })
    }

    fn rotate_sequential(&self) -> StorageResult<Rotation> {
        let cursor = self.store.cursor()? % self.palette.len();
        let color = self.palette.color_at(cursor).to_string();
        self.store.set_cursor(self.palette.next_index(cursor))?;
        self.store.increment_count(&color)?;
        let visitor_counts = self.store.list_counts()?;
        Ok(Rotation {
            current_color: color,
            visitor_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::types::ColorCount;
    use crate::store::SqliteStore;

    fn engine(palette: Palette, mode: RotationMode) -> RotationEngine {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let engine = RotationEngine::new(store, palette, mode);
        engine.initialize().unwrap();
        engine
    }

    fn toy_scenario(mode: RotationMode) {
        let engine = engine(Palette::new(["#FF5733", "#33FF57"]).unwrap(), mode);

        let r1 = engine.next_color().unwrap();
        assert_eq!(r1.current_color, "#FF5733");
        assert_eq!(
            r1.visitor_counts,
            vec![ColorCount::new("#FF5733", 1), ColorCount::new("#33FF57", 0)]
        );

        let r2 = engine.next_color().unwrap();
        assert_eq!(r2.current_color, "#33FF57");
        assert_eq!(
            r2.visitor_counts,
            vec![ColorCount::new("#FF5733", 1), ColorCount::new("#33FF57", 1)]
        );

        let r3 = engine.next_color().unwrap();
        assert_eq!(r3.current_color, "#FF5733");
        assert_eq!(
            r3.visitor_counts,
            vec![ColorCount::new("#FF5733", 2), ColorCount::new("#33FF57", 1)]
        );
    }

    #[test]
    fn test_two_color_scenario_atomic() {
        toy_scenario(RotationMode::Atomic);
    }

    #[test]
    fn test_two_color_scenario_sequential() {
        toy_scenario(RotationMode::Sequential);
    }

    #[test]
    fn test_full_cycle_follows_palette_order() {
        let palette = Palette::default();
        let expected: Vec<String> = palette.iter().map(String::from).collect();
        let engine = engine(palette, RotationMode::Atomic);

        let served: Vec<String> = (0..expected.len() * 2)
            .map(|_| engine.next_color().unwrap().current_color)
            .collect();

        assert_eq!(&served[..15], &expected[..]);
        assert_eq!(&served[15..], &expected[..]);
    }

    #[test]
    fn test_count_sum_matches_rotations() {
        let engine = engine(Palette::default(), RotationMode::Sequential);
        for _ in 0..37 {
            engine.next_color().unwrap();
        }
        let total: u64 = engine.stats().unwrap().colors.iter().map(|c| c.count).sum();
        assert_eq!(total, 37);
    }

    #[test]
    fn test_duplicate_color_accumulates_both_positions() {
        let engine = engine(Palette::default(), RotationMode::Atomic);
        for _ in 0..15 {
            engine.next_color().unwrap();
        }
        let colors = engine.stats().unwrap().colors;
        let dup: Vec<_> = colors.iter().filter(|c| c.color == "#FF5733").collect();
        assert_eq!(dup.len(), 1);
        assert_eq!(dup[0].count, 2);
        assert!(colors.iter().filter(|c| c.color != "#FF5733").all(|c| c.count == 1));
    }

    #[test]
    fn test_stats_is_read_only() {
        let engine = engine(Palette::default(), RotationMode::Atomic);
        engine.next_color().unwrap();

        let a = engine.stats().unwrap();
        let b = engine.stats().unwrap();
        assert_eq!(a, b);
        assert_eq!(engine.next_color().unwrap().current_color, "#33FF57");
    }

    #[test]
    fn test_sequential_wraps_out_of_range_cursor() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let engine = RotationEngine::new(
            store.clone(),
            Palette::new(["#FF5733", "#33FF57"]).unwrap(),
            RotationMode::Sequential,
        );
        engine.initialize().unwrap();
        store.set_cursor(7).unwrap();

        let rotation = engine.next_color().unwrap();
        assert_eq!(rotation.current_color, "#33FF57");
        assert_eq!(store.cursor().unwrap(), 0);
        assert_eq!(
            rotation.visitor_counts,
            vec![ColorCount::new("#FF5733", 0), ColorCount::new("#33FF57", 1)]
        );
    }
}
