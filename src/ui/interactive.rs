use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::core::App;
use crate::renderer::{Canvas, DisplayManager, DisplayMode};
use crate::shared::{constants, PlayerConfig};
use crate::sync::LoopClock;
use crate::utils::logger;

const POLL_INTERVAL: Duration = Duration::from_millis(5);
const BANNER_HOLD: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Map one key press onto the application state
pub fn handle_key(app: &mut App, key: KeyEvent) -> Control {
    if key.kind == KeyEventKind::Release {
        return Control::Continue;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.request_quit();
            Control::Quit
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.request_quit();
            Control::Quit
        }
        KeyCode::Enter => {
            app.restart();
            Control::Continue
        }
        KeyCode::Tab => {
            app.next_image_set();
            Control::Continue
        }
        _ => Control::Continue,
    }
}

pub fn handle_event(app: &mut App, event: Event) -> Control {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(cols, rows) => {
            app.resize(cols, rows);
            Control::Continue
        }
        _ => Control::Continue,
    }
}

/// Interactive playback until Esc, `q` or Ctrl+C.
pub fn run_player(config: PlayerConfig, mode: DisplayMode) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let mut display = DisplayManager::new(mode)?;
    let viewport = display.terminal_size()?;
    let mut app = App::new(config, viewport);
    let mut canvas = Canvas::new(app.config().grid, app.cell_width(), app.rows_per_cell());
    canvas.set_grid(app.grid());

    display.render_banner(constants::BANNER)?;
    std::thread::sleep(BANNER_HOLD);

    logger::info(&format!(
        "playback start: frames={} size={}x{} fps={} start={}",
        app.config().base_path,
        app.config().width,
        app.config().height,
        app.config().fps,
        app.config().start_frame
    ));

    let mut clock = LoopClock::new();
    while running.load(Ordering::SeqCst) && !app.should_quit() {
        // A failing iteration is logged and playback carries on
        if let Err(e) = run_iteration(&mut app, &mut canvas, &mut display, &mut clock) {
            logger::error(&format!("loop iteration failed: {:#}", e));
        }
    }

    let elapsed = clock.elapsed();
    logger::info(&format!(
        "playback end: shown={} failed={} iterations={} time={:.2}s",
        app.frames_shown(),
        app.frames_failed(),
        clock.ticks(),
        elapsed.as_secs_f64()
    ));

    drop(display);
    println!(
        "Played {} frames in {:.2}s ({} could not be loaded)",
        app.frames_shown(),
        elapsed.as_secs_f64(),
        app.frames_failed()
    );
    Ok(())
}

fn run_iteration(
    app: &mut App,
    canvas: &mut Canvas,
    display: &mut DisplayManager,
    clock: &mut LoopClock,
) -> Result<()> {
    if app.update() {
        if !canvas.matches(app.cell_width(), app.rows_per_cell()) {
            *canvas = Canvas::new(app.config().grid, app.cell_width(), app.rows_per_cell());
            canvas.set_grid(app.grid());
            display.invalidate();
        }

        canvas.draw(app.points());
        display.render_diff(canvas.cells(), canvas.width())?;
        display.render_status(&format!(
            " frame {:>5} | {:>4} dots | dot size {:.1} | ENTER reset  TAB set  ESC quit",
            app.source.current_frame().saturating_sub(1),
            app.points().len(),
            app.point_size()
        ))?;

        app.playback.mark_drawn();
    }

    if event::poll(POLL_INTERVAL)? {
        let ev = event::read()?;
        if let Event::Resize(..) = ev {
            display.invalidate();
        }
        handle_event(app, ev);
    }

    app.tick(clock.tick_ms());
    Ok(())
}
