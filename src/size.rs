use std::fmt;
use std::str::FromStr;

use crate::error::{LayoutError, SizeError};

pub const MAX_SIDE: usize = 30;

/// Maze dimensions in play squares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MazeSize {
    width: usize,
    height: usize,
}

impl MazeSize {
    pub const DEFAULT: MazeSize = MazeSize {
        width: 8,
        height: 8,
    };

    /// Both sides in `1..=30` and at least two squares in total.
    pub fn new(width: usize, height: usize) -> Result<Self, LayoutError> {
        let in_range = |side: usize| (1..=MAX_SIDE).contains(&side);
        if !in_range(width) || !in_range(height) || width + height <= 2 {
            return Err(LayoutError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    pub fn width(self) -> usize {
        self.width
    }

    pub fn height(self) -> usize {
        self.height
    }

    /// Width in cells, walls included.
    pub fn cell_width(self) -> usize {
        self.width * 2 + 1
    }

    pub fn cell_height(self) -> usize {
        self.height * 2 + 1
    }
}

impl Default for MazeSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for MazeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for MazeSize {
    type Err = SizeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let malformed = || SizeError::Malformed {
            input: input.to_string(),
        };
        let lowered = input.to_ascii_lowercase();
        let (w, h) = lowered.split_once('x').ok_or_else(malformed)?;
        let w: i64 = w.trim().parse().map_err(|_| malformed())?;
        let h: i64 = h.trim().parse().map_err(|_| malformed())?;
        let side = |v: i64| usize::try_from(v).map_err(|_| LayoutError::InvalidDimensions);
        Ok(MazeSize::new(side(w)?, side(h)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("8x8".parse::<MazeSize>(), Ok(MazeSize::DEFAULT));
        let size: MazeSize = "12X5".parse().unwrap();
        assert_eq!((size.width(), size.height()), (12, 5));
        let size: MazeSize = " 3 x 4 ".parse().unwrap();
        assert_eq!(size.to_string(), "3x4");
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        for input in ["", "8", "8x", "ax3", "3x3x3", "3*3"] {
            assert!(
                matches!(input.parse::<MazeSize>(), Err(SizeError::Malformed { .. })),
                "{input:?} should be malformed"
            );
        }
    }

    #[test]
    fn out_of_range_is_invalid_dimensions() {
        for input in ["31x5", "0x5", "-2x4", "1x1", "5x31"] {
            assert_eq!(
                input.parse::<MazeSize>(),
                Err(SizeError::OutOfBounds(LayoutError::InvalidDimensions)),
                "{input:?}"
            );
        }
    }

    #[test]
    fn smallest_sizes_accepted() {
        assert!(MazeSize::new(1, 2).is_ok());
        assert!(MazeSize::new(2, 1).is_ok());
        assert!(MazeSize::new(30, 30).is_ok());
        assert_eq!(MazeSize::new(1, 1), Err(LayoutError::InvalidDimensions));
    }

    #[test]
    fn cell_dimensions_include_walls() {
        let size = MazeSize::new(2, 1).unwrap();
        assert_eq!((size.cell_width(), size.cell_height()), (5, 3));
    }
}
