//! Demoscene text scroller: a 5×5 bitmap font rides a sine wave across the
//! screen, colored by one of four animated ramps.

use stage::{Gradient, Grid, KeyCode, Rgb, Scene};

const MESSAGE: &str = "DEMOSCENE GREETINGS! * TERMINAL GRAPHICS RULE * ";
const CHAR_CELL: f32 = 6.0; // 5 columns of bitmap plus 1 of spacing

const SPEED_MIN: f32 = 0.1;
const SPEED_MAX: f32 = 4.0;
const WAVE_MAX: f32 = 8.0;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Font {
    Block,
    Outline,
    Dotted,
}

const FONTS: [Font; 3] = [Font::Block, Font::Outline, Font::Dotted];

impl Font {
    fn name(self) -> &'static str {
        match self {
            Font::Block => "block",
            Font::Outline => "outline",
            Font::Dotted => "dotted",
        }
    }

    fn glyph(self) -> char {
        match self {
            Font::Block => '█',
            Font::Outline => '▓',
            Font::Dotted => '●',
        }
    }
}

struct ColorMode {
    name: &'static str,
    ramp: Gradient,
}

fn color_modes() -> Vec<ColorMode> {
    vec![
        ColorMode {
            name: "rainbow",
            ramp: Gradient::new(&[
                Rgb::hex(0xFF0000),
                Rgb::hex(0xFF8000),
                Rgb::hex(0xFFFF00),
                Rgb::hex(0x00FF00),
                Rgb::hex(0x0080FF),
                Rgb::hex(0x8000FF),
            ]),
        },
        ColorMode {
            name: "fire",
            ramp: Gradient::new(&[
                Rgb::hex(0xFF0000),
                Rgb::hex(0xFF4000),
                Rgb::hex(0xFF8000),
                Rgb::hex(0xFFFF00),
            ]),
        },
        ColorMode {
            name: "matrix",
            ramp: Gradient::new(&[
                Rgb::hex(0x004000),
                Rgb::hex(0x008000),
                Rgb::hex(0x00C000),
                Rgb::hex(0x00FF00),
            ]),
        },
        ColorMode {
            name: "plasma",
            ramp: Gradient::new(&[
                Rgb::hex(0xFF0080),
                Rgb::hex(0x8000FF),
                Rgb::hex(0x0080FF),
                Rgb::hex(0x00FF80),
                Rgb::hex(0x80FF00),
            ]),
        },
    ]
}

/// 5×5 bitmap rows for the scroller alphabet; '1' bits become glyphs.
fn bitmap(c: char) -> [&'static str; 5] {
    match c {
        'A' => ["01110", "10001", "11111", "10001", "10001"],
        'B' => ["11110", "10001", "11110", "10001", "11110"],
        'C' => ["01111", "10000", "10000", "10000", "01111"],
        'D' => ["11110", "10001", "10001", "10001", "11110"],
        'E' => ["11111", "10000", "11110", "10000", "11111"],
        'F' => ["11111", "10000", "11110", "10000", "10000"],
        'G' => ["01111", "10000", "10011", "10001", "01111"],
        'H' => ["10001", "10001", "11111", "10001", "10001"],
        'I' => ["11111", "00100", "00100", "00100", "11111"],
        'J' => ["11111", "00010", "00010", "10010", "01100"],
        'K' => ["10010", "10100", "11000", "10100", "10010"],
        'L' => ["10000", "10000", "10000", "10000", "11111"],
        'M' => ["10001", "11011", "10101", "10001", "10001"],
        'N' => ["10001", "11001", "10101", "10011", "10001"],
        'O' => ["01110", "10001", "10001", "10001", "01110"],
        'P' => ["11110", "10001", "11110", "10000", "10000"],
        'Q' => ["01110", "10001", "10101", "10010", "01101"],
        'R' => ["11110", "10001", "11110", "10010", "10001"],
        'S' => ["01111", "10000", "01110", "00001", "11110"],
        'T' => ["11111", "00100", "00100", "00100", "00100"],
        'U' => ["10001", "10001", "10001", "10001", "01110"],
        'V' => ["10001", "10001", "10001", "01010", "00100"],
        'W' => ["10001", "10001", "10101", "11011", "10001"],
        'X' => ["10001", "01010", "00100", "01010", "10001"],
        'Y' => ["10001", "10001", "01010", "00100", "00100"],
        'Z' => ["11111", "00010", "00100", "01000", "11111"],
        '0' => ["01110", "10001", "10001", "10001", "01110"],
        '1' => ["00100", "01100", "00100", "00100", "01110"],
        '2' => ["01110", "10001", "00110", "01000", "11111"],
        '3' => ["01110", "10001", "00110", "10001", "01110"],
        '4' => ["10001", "10001", "11111", "00001", "00001"],
        '5' => ["11111", "10000", "11110", "00001", "11110"],
        '6' => ["01110", "10000", "11110", "10001", "01110"],
        '7' => ["11111", "00001", "00010", "00100", "01000"],
        '8' => ["01110", "10001", "01110", "10001", "01110"],
        '9' => ["01110", "10001", "01111", "00001", "01110"],
        '*' => ["00100", "10101", "01110", "10101", "00100"],
        '!' => ["00100", "00100", "00100", "00000", "00100"],
        '.' => ["00000", "00000", "00000", "00000", "00100"],
        ',' => ["00000", "00000", "00000", "00100", "01000"],
        '?' => ["01110", "10001", "00110", "00000", "00100"],
        '-' => ["00000", "00000", "11111", "00000", "00000"],
        '+' => ["00000", "00100", "01110", "00100", "00000"],
        ' ' => ["00000", "00000", "00000", "00000", "00000"],
        _ => ["11111", "10001", "10001", "10001", "11111"],
    }
}

struct Scroller {
    t: f32,
    scroll: f32,
    speed: f32,
    wave_height: f32,
    font: Font,
    mode: usize,
    modes: Vec<ColorMode>,
    cols: usize,
}

impl Scroller {
    fn new() -> Self {
        Scroller {
            t: 0.0,
            scroll: -80.0,
            speed: 1.0,
            wave_height: 3.0,
            font: Font::Block,
            mode: 0,
            modes: color_modes(),
            cols: 80,
        }
    }

    fn color_at(&self, x: i32, y: i32, char_index: usize) -> Rgb {
        let (x, y) = (x as f32, y as f32);
        let intensity = match self.mode {
            0 => ((x + char_index as f32 * 20.0) * 0.05 + self.t).rem_euclid(1.0),
            1 => ((x * 0.1 + self.t * 2.0).sin() + 1.0) / 2.0,
            2 => ((y * 0.2 + self.t * 3.0).sin() + 1.0) / 2.0,
            _ => {
                let plasma = (x * 0.1).sin() + (y * 0.15).sin() + (self.t * 2.0).sin();
                (plasma + 3.0) / 6.0
            }
        };
        self.modes[self.mode].ramp.at(intensity)
    }
}

impl Scene for Scroller {
    fn title(&self) -> &str {
        "scroller"
    }

    fn advance(&mut self, dt: f32) {
        let step = dt * 30.0;
        self.t += 0.05 * self.speed * step;
        self.scroll += 0.8 * self.speed * step;

        let message_width = MESSAGE.len() as f32 * CHAR_CELL;
        if self.scroll > message_width + self.cols as f32 {
            self.scroll = -(self.cols as f32);
        }
    }

    fn render(&self, grid: &mut Grid) {
        let center_y = grid.rows() as i32 / 2;
        let start_x = -self.scroll as i32;
        let glyph = self.font.glyph();

        for (ci, c) in MESSAGE.chars().enumerate() {
            let char_x = start_x + (ci as f32 * CHAR_CELL) as i32;
            if char_x <= -6 || char_x >= grid.cols() as i32 + 6 {
                continue;
            }
            let rows = bitmap(c);
            let start_y = center_y - rows.len() as i32 / 2;
            for (by, row) in rows.iter().enumerate() {
                for (bx, bit) in row.bytes().enumerate() {
                    if bit != b'1' {
                        continue;
                    }
                    let sx = char_x + bx as i32;
                    let wave = ((sx as f32) * 0.08 + self.t * 2.5).sin() * self.wave_height;
                    let sy = start_y + by as i32 + wave as i32;
                    let fg = self.color_at(sx, sy, ci);
                    grid.set(sx, sy, glyph, fg);
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c @ '1'..='3') => {
                self.font = FONTS[c as usize - '1' as usize];
                true
            }
            KeyCode::Char(c @ '4'..='7') => {
                self.mode = c as usize - '4' as usize;
                true
            }
            KeyCode::Up => {
                self.speed = (self.speed + 0.2).min(SPEED_MAX);
                true
            }
            KeyCode::Down => {
                self.speed = (self.speed - 0.2).max(SPEED_MIN);
                true
            }
            KeyCode::Left => {
                self.wave_height = (self.wave_height - 0.5).max(0.0);
                true
            }
            KeyCode::Right => {
                self.wave_height = (self.wave_height + 0.5).min(WAVE_MAX);
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, cols: usize, _rows: usize) {
        self.cols = cols;
    }

    fn reset(&mut self) {
        self.t = 0.0;
        self.scroll = -(self.cols as f32);
    }

    fn status(&self) -> String {
        format!(
            "font {} | color {} | speed {:.1} | wave {:.1}",
            self.font.name(),
            self.modes[self.mode].name,
            self.speed,
            self.wave_height
        )
    }

    fn help(&self) -> &str {
        "1-3 font | 4-7 colors | up/down speed | left/right wave"
    }
}

fn main() {
    if let Err(e) = stage::run(Scroller::new()) {
        eprintln!("scroller: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_wraps_after_message_passes() {
        let mut s = Scroller::new();
        s.resize(80, 24);
        let mut wrapped = false;
        for _ in 0..20_000 {
            let before = s.scroll;
            s.advance(1.0 / 30.0);
            if s.scroll < before {
                wrapped = true;
                break;
            }
        }
        assert!(wrapped);
        assert_eq!(s.scroll, -80.0);
    }

    #[test]
    fn every_message_char_has_a_bitmap_shape() {
        for c in MESSAGE.chars() {
            let rows = bitmap(c);
            assert!(rows.iter().all(|r| r.len() == 5));
        }
    }

    #[test]
    fn wave_stays_within_limit() {
        let mut s = Scroller::new();
        for _ in 0..100 {
            s.handle_key(KeyCode::Right);
        }
        assert_eq!(s.wave_height, WAVE_MAX);
        for _ in 0..100 {
            s.handle_key(KeyCode::Left);
        }
        assert_eq!(s.wave_height, 0.0);
    }
}
