use crate::shared::constants;

/// Represents a single character cell on the terminal
///
/// Uses TrueColor (RGB) for foreground and background
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CellData {
    pub char: char,
    pub fg: (u8, u8, u8), // RGB
    pub bg: (u8, u8, u8), // RGB
}

impl CellData {
    pub fn blank() -> Self {
        Self {
            char: ' ',
            fg: constants::BACKGROUND_COLOR,
            bg: constants::BACKGROUND_COLOR,
        }
    }
}

impl Default for CellData {
    fn default() -> Self {
        Self {
            char: ' ',
            fg: (0, 0, 0),
            bg: (0, 0, 0),
        }
    }
}
