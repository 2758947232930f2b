use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SimError};

/// One grid location holding a renewable sugar stock bounded by a capacity.
///
/// A cell starts empty; its capacity is raised during environment setup by
/// the resource distributions, and its level moves every cycle under cell
/// rules and agent consumption. At most one agent occupies a cell at a
/// time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    capacity: f64,
    level: f64,
    occupant: Option<Uuid>,
}

impl Cell {
    #[must_use]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    #[must_use]
    pub fn level(&self) -> f64 {
        self.level
    }

    #[must_use]
    pub fn occupant(&self) -> Option<Uuid> {
        self.occupant
    }

    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Sets the sugar level. Fails if negative or above the capacity.
    pub fn set_level(&mut self, level: f64) -> Result<()> {
        if level < 0.0 {
            return Err(SimError::invariant("cell level cannot be negative"));
        }
        if level > self.capacity {
            return Err(SimError::invariant(format!(
                "cell level {level} exceeds capacity {}",
                self.capacity
            )));
        }
        self.level = level;
        Ok(())
    }

    /// Adds to the current level. All level changes funnel through the
    /// validating setter, so a caller that overshoots the capacity gets an
    /// `InvariantViolation` instead of a silently broken bound.
    pub fn add_level(&mut self, delta: f64) -> Result<()> {
        self.set_level(self.level + delta)
    }

    /// Sets the capacity. Fails if negative or above the environment-wide
    /// ceiling, which the caller passes in.
    pub fn set_capacity(&mut self, capacity: f64, max_capacity: f64) -> Result<()> {
        if capacity < 0.0 {
            return Err(SimError::invariant("cell capacity cannot be negative"));
        }
        if capacity > max_capacity {
            return Err(SimError::invariant(format!(
                "cell capacity {capacity} exceeds environment maximum {max_capacity}"
            )));
        }
        self.capacity = capacity;
        Ok(())
    }

    /// Adds capacity, silently clamped to the environment ceiling. Used by
    /// the resource-distribution initializers, which accumulate additively.
    pub fn add_capacity(&mut self, delta: f64, max_capacity: f64) {
        self.capacity = (self.capacity + delta).min(max_capacity);
    }

    pub fn set_occupant(&mut self, occupant: Option<Uuid>) {
        self.occupant = occupant;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_empty() {
        let cell = Cell::default();
        assert_eq!(cell.capacity(), 0.0);
        assert_eq!(cell.level(), 0.0);
        assert!(!cell.is_occupied());
    }

    #[test]
    fn test_set_level_rejects_negative() {
        let mut cell = Cell::default();
        assert!(cell.set_level(-0.1).is_err());
    }

    #[test]
    fn test_set_level_rejects_above_capacity() {
        let mut cell = Cell::default();
        cell.set_capacity(2.0, 10.0).unwrap();
        assert!(cell.set_level(2.5).is_err());
        assert!(cell.set_level(2.0).is_ok());
    }

    #[test]
    fn test_set_capacity_rejects_above_ceiling() {
        let mut cell = Cell::default();
        assert!(cell.set_capacity(11.0, 10.0).is_err());
    }

    #[test]
    fn test_add_capacity_clamps() {
        let mut cell = Cell::default();
        cell.add_capacity(7.0, 10.0);
        cell.add_capacity(7.0, 10.0);
        assert_eq!(cell.capacity(), 10.0);
    }

    #[test]
    fn test_add_level_goes_through_validation() {
        let mut cell = Cell::default();
        cell.set_capacity(3.0, 10.0).unwrap();
        cell.set_level(2.0).unwrap();
        assert!(cell.add_level(2.0).is_err());
        assert_eq!(cell.level(), 2.0);
        cell.add_level(1.0).unwrap();
        assert_eq!(cell.level(), 3.0);
    }
}
