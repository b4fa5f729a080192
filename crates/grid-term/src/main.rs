//! Terminal front-end. Renders the cell grid with '▀' half-blocks (one
//! terminal row carries two grid rows), feeds mouse motion and clicks into
//! the session, and drives frames only while the session asks for them.

use std::io::{self, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use grid_core::config::{GridConfig, Orientation, Rgb};
use grid_core::render::Surface;
use grid_core::session::GridSession;
use grid_core::BlockFontRaster;
use instant::Instant;

const FRAME_MS: u64 = 16;
const HUD_ROWS: u16 = 1;

/// Per-cell RGB buffer the session composes into; alpha blends over whatever
/// is already in the cell.
struct TermSurface {
    grid_size: usize,
    cells: Vec<Rgb>,
}

impl TermSurface {
    fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            cells: vec![[0, 0, 0]; grid_size * grid_size],
        }
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> Rgb {
        self.cells[y * self.grid_size + x]
    }
}

impl Surface for TermSurface {
    fn clear(&mut self, color: Rgb) {
        self.cells.fill(color);
    }

    fn fill_cell(&mut self, x: f32, y: f32, size: f32, color: Rgb, alpha: f32) {
        // One terminal half-block per grid cell; snap to the cell under the
        // rect's center.
        let n = self.grid_size as f32;
        let cx = x + size * 0.5;
        let cy = y + size * 0.5;
        if cx < 0.0 || cy < 0.0 || cx >= n || cy >= n {
            return;
        }
        let idx = cy as usize * self.grid_size + cx as usize;
        let a = alpha.clamp(0.0, 1.0);
        let dst = &mut self.cells[idx];
        for (d, &c) in dst.iter_mut().zip(color.iter()) {
            *d = (*d as f32 * (1.0 - a) + c as f32 * a).round() as u8;
        }
    }
}

fn draw(out: &mut impl Write, surface: &TermSurface, x_off: u16, y_off: u16) -> io::Result<()> {
    let n = surface.grid_size;
    queue!(out, BeginSynchronizedUpdate)?;
    for ty in 0..n / 2 {
        queue!(out, cursor::MoveTo(x_off, y_off + ty as u16))?;
        for tx in 0..n {
            let top = surface.at(tx, ty * 2);
            let bot = surface.at(tx, ty * 2 + 1);
            queue!(
                out,
                SetForegroundColor(Color::Rgb {
                    r: top[0],
                    g: top[1],
                    b: top[2]
                }),
                SetBackgroundColor(Color::Rgb {
                    r: bot[0],
                    g: bot[1],
                    b: bot[2]
                }),
                Print('▀')
            )?;
        }
    }
    queue!(out, ResetColor, EndSynchronizedUpdate)?;
    out.flush()
}

/// Largest even grid side that fits the terminal, within sane bounds.
fn pick_grid_size(cols: u16, rows: u16) -> usize {
    let fit = (cols as usize).min((rows.saturating_sub(HUD_ROWS) as usize) * 2);
    (fit.clamp(32, 96)) & !1
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let (cols, rows) = terminal::size()?;
    let mut cfg = GridConfig {
        grid_size: pick_grid_size(cols, rows),
        ..GridConfig::default()
    };
    if (rows.saturating_sub(HUD_ROWS) as usize) * 2 > cols as usize {
        cfg.orientation = Orientation::Portrait;
    }
    let n = cfg.grid_size;
    let auto_interval_ms = cfg.auto_scatter_interval_ms;
    let x_off = (cols.saturating_sub(n as u16)) / 2;
    let y_off = HUD_ROWS;

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(42);
    let mut session = GridSession::new(cfg, &BlockFontRaster, seed);
    let mut surface = TermSurface::new(n);

    let mut out = io::stdout();
    execute!(
        out,
        EnterAlternateScreen,
        DisableLineWrap,
        cursor::Hide,
        EnableMouseCapture
    )?;
    terminal::enable_raw_mode()?;
    execute!(
        out,
        cursor::MoveTo(0, 0),
        Print("q quit · s scatter · click explode · [ ] drift")
    )?;

    let start = Instant::now();
    let mut last_auto = Instant::now();
    let to_grid = |col: u16, row: u16| -> Option<(f32, f32)> {
        let gx = col.checked_sub(x_off)? as f32 + 0.5;
        let gy = (row.checked_sub(y_off)? as f32) * 2.0 + 1.0;
        Some((gx, gy))
    };

    'outer: loop {
        while event::poll(Duration::from_millis(0))? {
            let now_ms = start.elapsed().as_secs_f64() * 1000.0;
            match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Press => match k.code {
                    KeyCode::Char('q') | KeyCode::Esc => break 'outer,
                    KeyCode::Char('s') => session.trigger_scatter(now_ms),
                    KeyCode::Char('[') => {
                        session.set_curl_amount(session.curl_amount() - 0.1);
                    }
                    KeyCode::Char(']') => {
                        session.set_curl_amount(session.curl_amount() + 0.1);
                    }
                    _ => {}
                },
                Event::Mouse(m) => match m.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                        if let Some((gx, gy)) = to_grid(m.column, m.row) {
                            session.pointer_move(gx, gy, now_ms);
                        }
                    }
                    MouseEventKind::Down(MouseButton::Left) => {
                        if let Some((gx, gy)) = to_grid(m.column, m.row) {
                            session.pointer_down(gx, gy, now_ms);
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
        if last_auto.elapsed().as_millis() as f64 >= auto_interval_ms {
            last_auto = Instant::now();
            session.trigger_scatter(now_ms);
        }

        if session.needs_frame() {
            session.frame(now_ms, &mut surface);
            draw(&mut out, &surface, x_off, y_off)?;
        }
        std::thread::sleep(Duration::from_millis(FRAME_MS));
    }

    session.teardown();
    terminal::disable_raw_mode()?;
    execute!(
        out,
        DisableMouseCapture,
        ResetColor,
        cursor::Show,
        EnableLineWrap,
        LeaveAlternateScreen
    )?;
    Ok(())
}
