pub const APP_NAME: &str = "bad-apple-grid";

pub const CONFIG_FILE: &str = "badapple.json";
pub const CONFIG_DIR_FILE: &str = "config.json";
pub const ERROR_LOG_FILE: &str = "error.log";
pub const DEBUG_LOG_FILE: &str = "debug.log";

// Frame files written by the extraction tool: <base>_<index>.bmp
pub const FRAME_EXTENSION: &str = "bmp";
pub const BMP_HEADER_SIZE: u64 = 54;
pub const CHANNEL_STRIDE: usize = 3;
pub const WHITE: u8 = u8::MAX;

pub const DEFAULT_FRAME_WIDTH: u32 = 48;
pub const DEFAULT_FRAME_HEIGHT: u32 = 36;
pub const DEFAULT_BASE_PATH: &str = "Frames/frame";
pub const DEFAULT_FPS: f64 = 6.2;
pub const DEFAULT_START_FRAME: u32 = 1;

pub const DEFAULT_XMIN: i32 = -24;
pub const DEFAULT_XMAX: i32 = 24;
pub const DEFAULT_YMIN: i32 = -18;
pub const DEFAULT_YMAX: i32 = 18;

pub const POINT_GLYPH: char = '█';
pub const UPPER_HALF_GLYPH: char = '▀';
pub const LOWER_HALF_GLYPH: char = '▄';
pub const GRID_COLOR: (u8, u8, u8) = (0, 0, 255);
pub const POINT_COLOR: (u8, u8, u8) = (0, 0, 0);
pub const BACKGROUND_COLOR: (u8, u8, u8) = (128, 128, 128);

/// Terminal rows kept below the canvas for the status line
pub const STATUS_ROWS: u16 = 1;

pub const BANNER: &[&str] = &[
    "**********************************************************************",
    "* Bad Apple in the terminal point grid                               *",
    "*                                                                    *",
    "* Press ENTER to reset                                               *",
    "* Press ESC to finish the program                                    *",
    "**********************************************************************",
];
