use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute,
    style::ResetColor,
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use crate::color::{mix, Rgb};
use crate::grid::Grid;
use crate::render::Renderer;
use crate::scene::Scene;
use crate::transport::{Directive, Transport};

/// Rows reserved around the grid: title/status on top, key help below.
pub const CHROME_ROWS: u16 = 2;

const MIN_COLS: u16 = 20;
const MIN_ROWS: u16 = 6;

#[derive(Clone, Copy)]
pub struct Options {
    pub fps: u32,
}

impl Default for Options {
    fn default() -> Self {
        Options { fps: 30 }
    }
}

impl Options {
    pub fn fps(fps: u32) -> Self {
        Options {
            fps: fps.clamp(15, 120),
        }
    }
}

/// Run a scene at the default 30 fps.
pub fn run(scene: impl Scene) -> io::Result<()> {
    run_with(scene, Options::default())
}

/// Terminal bracketing: enter the alternate screen, run the loop, restore
/// the terminal whether or not the loop failed.
pub fn run_with(mut scene: impl Scene, opts: Options) -> io::Result<()> {
    let mut out = io::stdout();
    execute!(out, EnterAlternateScreen, cursor::Hide, DisableLineWrap)?;
    terminal::enable_raw_mode()?;

    let res = drive(&mut out, &mut scene, opts);

    terminal::disable_raw_mode().ok();
    execute!(out, ResetColor, EnableLineWrap, cursor::Show, LeaveAlternateScreen).ok();
    res
}

fn drive(out: &mut Stdout, scene: &mut dyn Scene, opts: Options) -> io::Result<()> {
    let fps = opts.fps.clamp(15, 120);
    let dt = 1.0 / fps as f32;
    let frame = Duration::from_secs_f32(dt);
    let bg = scene.bg();

    let (mut cols, mut rows) = clamped_size()?;
    let mut grid = Grid::new(cols as usize, (rows - CHROME_ROWS) as usize, bg);
    let mut renderer = Renderer::new(cols, rows, bg);
    scene.resize(grid.cols(), grid.rows());

    let mut transport = Transport::new();
    execute!(out, Clear(ClearType::All))?;

    loop {
        let start = Instant::now();

        // One message at a time: keys and resizes first, then the tick.
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Press => {
                    if transport.key(scene, k.code, k.modifiers) == Directive::Quit {
                        return Ok(());
                    }
                }
                Event::Resize(_, _) => {
                    // Applied below from the polled size.
                }
                _ => {}
            }
        }

        let (c, r) = clamped_size()?;
        if (c, r) != (cols, rows) {
            cols = c;
            rows = r;
            grid.resize(cols as usize, (rows - CHROME_ROWS) as usize);
            renderer.resize(cols, rows);
            scene.resize(grid.cols(), grid.rows());
            execute!(out, Clear(ClearType::All))?;
        }

        transport.tick(scene, dt);

        grid.clear();
        scene.render(&mut grid);

        renderer.clear_back();
        renderer.blit(&grid, 0, 1);
        chrome(&mut renderer, scene, &transport, rows, bg);
        renderer.flush(out)?;

        let spent = start.elapsed();
        if spent < frame {
            std::thread::sleep(frame - spent);
        }
    }
}

fn chrome(renderer: &mut Renderer, scene: &dyn Scene, transport: &Transport, rows: u16, bg: Rgb) {
    let hud = mix(bg, Rgb::WHITE, 0.45);
    let title_fg = mix(bg, Rgb::WHITE, 0.9);

    let state = if transport.paused() { "paused" } else { "running" };
    let status = scene.status();
    let top = if status.is_empty() {
        format!(" {} | {}", scene.title(), state)
    } else {
        format!(" {} | {} | {}", scene.title(), status, state)
    };
    renderer.text(0, 0, &top, title_fg);

    let mut help = String::from(" ");
    help.push_str(scene.help());
    if !scene.help().is_empty() {
        help.push_str(" | ");
    }
    help.push_str("space pause | r reset | q quit");
    renderer.text(0, rows - 1, &help, hud);
}

fn clamped_size() -> io::Result<(u16, u16)> {
    let (c, r) = terminal::size()?;
    Ok((c.max(MIN_COLS), r.max(MIN_ROWS)))
}
