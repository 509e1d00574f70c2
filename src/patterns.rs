//! Built-in catalog of named patterns.

use crate::error::{LifeError, Result};

/// A named set of live-cell offsets relative to an anchor cell.
#[derive(Debug, PartialEq, Eq)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(i32, i32)],
}

pub const BLINKER: Pattern = Pattern {
    name: "blinker",
    cells: &[(-1, 0), (0, 0), (1, 0)],
};

pub const TOAD: Pattern = Pattern {
    name: "toad",
    cells: &[(0, 0), (1, 0), (2, 0), (-1, 1), (0, 1), (1, 1)],
};

pub const BEACON: Pattern = Pattern {
    name: "beacon",
    cells: &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)],
};

/// Travels one cell right and one cell up every four generations.
pub const GLIDER: Pattern = Pattern {
    name: "glider",
    cells: &[(0, 0), (1, 0), (2, 0), (2, 1), (1, 2)],
};

pub const PATTERNS: &[Pattern] = &[BLINKER, TOAD, BEACON, GLIDER];

impl Pattern {
    /// Axis-aligned extent of the offsets as `(min_dx, min_dy, max_dx, max_dy)`.
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        self.cells.iter().fold(
            (i32::MAX, i32::MAX, i32::MIN, i32::MIN),
            |(min_x, min_y, max_x, max_y), &(dx, dy)| {
                (min_x.min(dx), min_y.min(dy), max_x.max(dx), max_y.max(dy))
            },
        )
    }
}

/// Looks a pattern up by name, ignoring ASCII case.
pub fn find(name: &str) -> Result<&'static Pattern> {
    PATTERNS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| LifeError::UnknownPattern(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(find("blinker").unwrap().cells.len(), 3);
        assert_eq!(find("toad").unwrap().cells.len(), 6);
        assert_eq!(find("beacon").unwrap().cells.len(), 8);
        assert_eq!(find("glider").unwrap().cells.len(), 5);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("Glider").unwrap(), &GLIDER);
        assert_eq!(
            find("pulsar"),
            Err(LifeError::UnknownPattern("pulsar".to_string()))
        );
    }

    #[test]
    fn test_offsets_are_unique() {
        for pattern in PATTERNS {
            let mut cells = pattern.cells.to_vec();
            cells.sort_unstable();
            cells.dedup();
            assert_eq!(cells.len(), pattern.cells.len(), "{}", pattern.name);
        }
    }

    #[test]
    fn test_bounds() {
        assert_eq!(BLINKER.bounds(), (-1, 0, 1, 0));
        assert_eq!(TOAD.bounds(), (-1, 0, 2, 1));
        assert_eq!(BEACON.bounds(), (0, 0, 3, 3));
        assert_eq!(GLIDER.bounds(), (0, 0, 2, 2));
    }
}
