//! Launcher: a menu over the demo catalog. Selecting an entry hands the
//! terminal to that demo as a child process, then the menu resumes.

use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::process::Command;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

enum Entry {
    Section(&'static str),
    Demo {
        title: &'static str,
        description: &'static str,
        bin: &'static str,
    },
}

const CATALOG: [Entry; 20] = [
    Entry::Section("Effects"),
    Entry::Demo { title: "Waves", description: "Layered sine waves over a water fill", bin: "waves" },
    Entry::Demo { title: "Particles", description: "Emitter with gravity, wind and decay", bin: "particles" },
    Entry::Demo { title: "Rain", description: "The digital rain, one stream per column", bin: "rain" },
    Entry::Demo { title: "Bounce", description: "Gravity balls with damped bounces and trails", bin: "bounce" },
    Entry::Demo { title: "Starfield", description: "Flying through a perspective starfield", bin: "starfield" },
    Entry::Demo { title: "Spectrum", description: "Simulated analyzer bars with peak hold", bin: "spectrum" },
    Entry::Section("Simulations"),
    Entry::Demo { title: "Fire", description: "Heat field fed from below, cooling upward", bin: "fire" },
    Entry::Demo { title: "Ripples", description: "Droplets and expanding rings on a pond", bin: "ripples" },
    Entry::Demo { title: "Cube", description: "Rotating wireframe cube in perspective", bin: "cube" },
    Entry::Demo { title: "Life", description: "Conway's automaton with the classic seeds", bin: "life" },
    Entry::Demo { title: "Mandelzoom", description: "Fractal explorer with endless zoom", bin: "mandelzoom" },
    Entry::Section("Demoscene"),
    Entry::Demo { title: "Plasma", description: "Interfering sine fields, four palettes", bin: "plasma" },
    Entry::Demo { title: "Tunnel", description: "Polar tunnel with four render modes", bin: "tunnel" },
    Entry::Demo { title: "Metaballs", description: "Organic threshold field over moving balls", bin: "metaballs" },
    Entry::Demo { title: "Rotozoom", description: "Rotating, zooming pattern sampler", bin: "rotozoom" },
    Entry::Demo { title: "Scroller", description: "Bitmap-font sine scroller", bin: "scroller" },
    Entry::Demo { title: "Vaporwave", description: "Neon horizon with sun and floor grid", bin: "vaporwave" },
];

const ACCENT: Color = Color::Rgb { r: 0x7D, g: 0x56, b: 0xF4 };
const DIM: Color = Color::Rgb { r: 0x88, g: 0x88, b: 0x88 };

fn first_selectable() -> usize {
    CATALOG
        .iter()
        .position(|e| matches!(e, Entry::Demo { .. }))
        .unwrap_or(0)
}

fn step_selection(from: usize, delta: i32) -> usize {
    let len = CATALOG.len() as i32;
    let mut i = from as i32;
    loop {
        i = (i + delta).rem_euclid(len);
        if matches!(CATALOG[i as usize], Entry::Demo { .. }) {
            return i as usize;
        }
    }
}

fn draw_menu(out: &mut Stdout, selected: usize, note: &str) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    queue!(
        out,
        SetForegroundColor(ACCENT),
        Print(" terminal effect showcase"),
        ResetColor
    )?;

    let mut row = 2u16;
    for (i, entry) in CATALOG.iter().enumerate() {
        queue!(out, cursor::MoveTo(0, row))?;
        match entry {
            Entry::Section(name) => {
                queue!(out, SetForegroundColor(DIM), Print(format!(" {name}")), ResetColor)?;
            }
            Entry::Demo { title, description, .. } => {
                if i == selected {
                    queue!(
                        out,
                        SetForegroundColor(ACCENT),
                        Print(format!(" > {title:<12}")),
                        SetForegroundColor(Color::White),
                        Print(*description),
                        ResetColor
                    )?;
                } else {
                    queue!(
                        out,
                        Print(format!("   {title:<12}")),
                        SetForegroundColor(DIM),
                        Print(*description),
                        ResetColor
                    )?;
                }
            }
        }
        row += 1;
    }

    queue!(out, cursor::MoveTo(0, row + 1))?;
    if note.is_empty() {
        queue!(
            out,
            SetForegroundColor(DIM),
            Print(" up/down select | enter launch | q quit"),
            ResetColor
        )?;
    } else {
        queue!(
            out,
            SetForegroundColor(Color::Rgb { r: 0xe7, g: 0x4c, b: 0x3c }),
            Print(format!(" {note}")),
            ResetColor
        )?;
    }
    out.flush()
}

fn demo_path(bin: &str) -> io::Result<PathBuf> {
    let mut path = std::env::current_exe()?;
    path.pop();
    path.push(bin);
    Ok(path)
}

/// Hand the terminal over to the chosen demo and take it back afterwards.
/// A demo that cannot be spawned at all is fatal; a demo that ran and
/// exited non-zero is only worth a note on the menu.
fn launch(out: &mut Stdout, bin: &str) -> io::Result<String> {
    terminal::disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen, cursor::Show)?;

    let status = demo_path(bin).and_then(|path| Command::new(path).status());
    let note = match status {
        Ok(s) if s.success() => String::new(),
        Ok(s) => format!("{bin} exited with {s}"),
        Err(e) => {
            return Err(io::Error::new(
                e.kind(),
                format!("failed to launch {bin}: {e}"),
            ));
        }
    };

    execute!(out, EnterAlternateScreen, cursor::Hide)?;
    terminal::enable_raw_mode()?;
    Ok(note)
}

fn menu(out: &mut Stdout) -> io::Result<()> {
    let mut selected = first_selectable();
    let mut note = String::new();

    loop {
        draw_menu(out, selected, &note)?;
        if let Event::Key(k) = event::read()? {
            if k.kind != KeyEventKind::Press {
                continue;
            }
            match k.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') | KeyCode::Char('C')
                    if k.modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    return Ok(());
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    selected = step_selection(selected, -1);
                    note.clear();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    selected = step_selection(selected, 1);
                    note.clear();
                }
                KeyCode::Enter => {
                    if let Entry::Demo { bin, .. } = &CATALOG[selected] {
                        note = launch(out, bin)?;
                    }
                }
                _ => {}
            }
        }
    }
}

fn main() {
    let mut out = io::stdout();
    let setup = execute!(out, EnterAlternateScreen, cursor::Hide)
        .and_then(|_| terminal::enable_raw_mode());
    if let Err(e) = setup {
        eprintln!("showcase: {e}");
        std::process::exit(1);
    }

    let res = menu(&mut out);

    terminal::disable_raw_mode().ok();
    execute!(out, ResetColor, cursor::Show, LeaveAlternateScreen).ok();

    if let Err(e) = res {
        eprintln!("showcase: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_skips_section_rows() {
        let mut at = first_selectable();
        assert!(matches!(CATALOG[at], Entry::Demo { .. }));
        for _ in 0..CATALOG.len() * 2 {
            at = step_selection(at, 1);
            assert!(matches!(CATALOG[at], Entry::Demo { .. }));
        }
        for _ in 0..CATALOG.len() * 2 {
            at = step_selection(at, -1);
            assert!(matches!(CATALOG[at], Entry::Demo { .. }));
        }
    }

    #[test]
    fn every_catalog_binary_is_unique() {
        let mut bins: Vec<&str> = CATALOG
            .iter()
            .filter_map(|e| match e {
                Entry::Demo { bin, .. } => Some(*bin),
                _ => None,
            })
            .collect();
        let n = bins.len();
        assert_eq!(n, 17);
        bins.sort_unstable();
        bins.dedup();
        assert_eq!(bins.len(), n);
    }
}
