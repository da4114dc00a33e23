use anyhow::Result;
use crossterm::{
    cursor,
    style::Print,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io::{BufWriter, Stdout, Write};

use super::cell::CellData;
use crate::shared::constants;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum DisplayMode {
    /// Plain ASCII glyphs, no color sequences
    Ascii,
    Rgb,
}

pub struct DisplayManager {
    stdout: BufWriter<Stdout>,
    mode: DisplayMode,
    last_cells: Option<Vec<CellData>>,
    render_buffer: Vec<u8>,
}

impl DisplayManager {
    pub fn new(mode: DisplayMode) -> Result<Self> {
        let stdout = BufWriter::with_capacity(256 * 1024, std::io::stdout());
        let mut dm = Self {
            stdout,
            mode,
            last_cells: None,
            render_buffer: Vec::with_capacity(256 * 1024),
        };

        dm.initialize_terminal()?;

        Ok(dm)
    }

    fn initialize_terminal(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.execute(EnterAlternateScreen)?;
        self.stdout.execute(cursor::Hide)?;

        // Disable line wrapping (DECRAWM) to prevent scrolling at edges
        self.stdout.execute(Print("\x1b[?7l"))?;

        Ok(())
    }

    pub fn terminal_size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    /// Forget what is on screen so the next render repaints every cell
    pub fn invalidate(&mut self) {
        self.last_cells = None;
    }

    #[inline(always)]
    fn write_u8_fast(buffer: &mut Vec<u8>, mut n: u8) {
        if n >= 100 {
            buffer.push(b'0' + (n / 100));
            n %= 100;
            buffer.push(b'0' + (n / 10));
            n %= 10;
            buffer.push(b'0' + n);
        } else if n >= 10 {
            buffer.push(b'0' + (n / 10));
            n %= 10;
            buffer.push(b'0' + n);
        } else {
            buffer.push(b'0' + n);
        }
    }

    #[inline(always)]
    fn write_u16_fast(buffer: &mut Vec<u8>, n: u16) {
        if n >= 10 {
            Self::write_u16_fast(buffer, n / 10);
        }
        buffer.push(b'0' + (n % 10) as u8);
    }

    fn move_to(buffer: &mut Vec<u8>, x: u16, y: u16) {
        buffer.extend_from_slice(b"\x1b[");
        Self::write_u16_fast(buffer, y + 1);
        buffer.push(b';');
        Self::write_u16_fast(buffer, x + 1);
        buffer.push(b'H');
    }

    fn ascii_glyph(c: char) -> char {
        match c {
            constants::POINT_GLYPH => '#',
            constants::UPPER_HALF_GLYPH => '"',
            constants::LOWER_HALF_GLYPH => ',',
            '┼' => '+',
            '─' => '-',
            '│' => '|',
            c if c.is_ascii() => c,
            _ => '.',
        }
    }

    /// Top-left corner that centers a `width` x `height` block on screen
    fn centered_origin(&self, width: u16, height: u16) -> (u16, u16, u16, u16) {
        let (term_cols, term_rows) = terminal::size().unwrap_or((80, 24));
        let offset_x = term_cols.saturating_sub(width) / 2;
        let offset_y = term_rows.saturating_sub(height) / 2;
        (term_cols, term_rows, offset_x, offset_y)
    }

    /// Canvas origin and the rows it may use, leaving the status line free
    fn canvas_origin(term: (u16, u16), content: (u16, u16)) -> (u16, u16, u16) {
        let canvas_rows = term.1.saturating_sub(constants::STATUS_ROWS);
        let offset_x = term.0.saturating_sub(content.0) / 2;
        let offset_y = canvas_rows.saturating_sub(content.1) / 2;
        (offset_x, offset_y, canvas_rows)
    }

    /// Write the cells that differ from the previous call, centered on screen.
    pub fn render_diff(&mut self, cells: &[CellData], width: usize) -> Result<()> {
        let start_render = std::time::Instant::now();
        if width == 0 {
            return Ok(());
        }

        self.render_buffer.clear();
        let buffer = &mut self.render_buffer;

        // Synchronized update begin
        buffer.extend_from_slice(b"\x1b[?2026h");

        let mut force_redraw = false;
        if self.last_cells.as_ref().map(|v| v.len()).unwrap_or(0) != cells.len() {
            buffer.extend_from_slice(b"\x1b[0m\x1b[2J");
            self.last_cells = Some(vec![CellData::default(); cells.len()]);
            force_redraw = true;
        }

        let Some(last_cells) = self.last_cells.as_mut() else {
            return Ok(());
        };

        let mut last_fg: Option<(u8, u8, u8)> = None;
        let mut last_bg: Option<(u8, u8, u8)> = None;

        let (term_cols, term_rows) = terminal::size().unwrap_or((80, 24));
        let content_width = width as u16;
        let content_height = (cells.len() / width) as u16;
        let (offset_x, offset_y, canvas_rows) =
            Self::canvas_origin((term_cols, term_rows), (content_width, content_height));

        // Virtual cursor position, -1 when unknown
        let mut cursor_x: i32 = -1;
        let mut cursor_y: i32 = -1;

        for (i, cell) in cells.iter().enumerate() {
            if !force_redraw && *cell == last_cells[i] {
                cursor_x = -1;
                continue;
            }

            let target_x = (i % width) as u16 + offset_x;
            let target_y = (i / width) as u16 + offset_y;

            if target_x >= term_cols || target_y >= canvas_rows {
                cursor_x = -1;
                continue;
            }

            if cursor_x != target_x as i32 || cursor_y != target_y as i32 {
                Self::move_to(buffer, target_x, target_y);
                cursor_x = target_x as i32;
                cursor_y = target_y as i32;
            }

            let glyph = match self.mode {
                DisplayMode::Rgb => {
                    // FG: \x1b[38;2;R;G;Bm
                    if Some(cell.fg) != last_fg {
                        buffer.extend_from_slice(b"\x1b[38;2;");
                        Self::write_u8_fast(buffer, cell.fg.0);
                        buffer.push(b';');
                        Self::write_u8_fast(buffer, cell.fg.1);
                        buffer.push(b';');
                        Self::write_u8_fast(buffer, cell.fg.2);
                        buffer.push(b'm');
                        last_fg = Some(cell.fg);
                    }
                    // BG: \x1b[48;2;R;G;Bm
                    if Some(cell.bg) != last_bg {
                        buffer.extend_from_slice(b"\x1b[48;2;");
                        Self::write_u8_fast(buffer, cell.bg.0);
                        buffer.push(b';');
                        Self::write_u8_fast(buffer, cell.bg.1);
                        buffer.push(b';');
                        Self::write_u8_fast(buffer, cell.bg.2);
                        buffer.push(b'm');
                        last_bg = Some(cell.bg);
                    }
                    cell.char
                }
                DisplayMode::Ascii => Self::ascii_glyph(cell.char),
            };

            let mut b_dst = [0u8; 4];
            buffer.extend_from_slice(glyph.encode_utf8(&mut b_dst).as_bytes());

            last_cells[i] = *cell;
            cursor_x += 1;
        }

        buffer.extend_from_slice(b"\x1b[0m");

        // Synchronized update end
        buffer.extend_from_slice(b"\x1b[?2026l");

        self.stdout.write_all(buffer)?;
        self.stdout.flush()?;

        let total_time = start_render.elapsed();
        if total_time.as_millis() > 10 {
            crate::utils::logger::debug(&format!(
                "slow render: {}us for {} cells",
                total_time.as_micros(),
                cells.len()
            ));
        }

        Ok(())
    }

    /// One line of text on the bottom row of the terminal
    pub fn render_status(&mut self, text: &str) -> Result<()> {
        let (term_cols, term_rows, _, _) = self.centered_origin(0, 0);
        let line: String = text.chars().take(term_cols as usize).collect();

        self.render_buffer.clear();
        Self::move_to(&mut self.render_buffer, 0, term_rows.saturating_sub(constants::STATUS_ROWS));
        self.render_buffer.extend_from_slice(b"\x1b[0m\x1b[2K");
        self.render_buffer.extend_from_slice(line.as_bytes());

        self.stdout.write_all(&self.render_buffer)?;
        self.stdout.flush()?;
        Ok(())
    }

    /// Centered lines of text, used before the first frame is drawn
    pub fn render_banner(&mut self, lines: &[&str]) -> Result<()> {
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
        let (_, _, offset_x, offset_y) = self.centered_origin(width, lines.len() as u16);

        self.render_buffer.clear();
        self.render_buffer.extend_from_slice(b"\x1b[0m\x1b[2J");
        for (row, line) in lines.iter().enumerate() {
            Self::move_to(&mut self.render_buffer, offset_x, offset_y + row as u16);
            self.render_buffer.extend_from_slice(line.as_bytes());
        }
        self.last_cells = None;

        self.stdout.write_all(&self.render_buffer)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for DisplayManager {
    fn drop(&mut self) {
        let _ = self.stdout.execute(Print("\x1b[0m\x1b[?7h"));
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
