//! Classic demoscene plasma: five interfering sine fields, bucketed into a
//! glyph ramp and one of four palettes.

use stage::{clamp01, Grid, KeyCode, Rgb, Scene, Shader};

const SPEED_MIN: f32 = 0.1;
const SPEED_MAX: f32 = 3.0;
const INTENSITY_MIN: f32 = 0.3;
const INTENSITY_MAX: f32 = 2.0;

const GLYPHS: &str = " ·∘•◦○●▫▪▒▓█";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Palette {
    Fire,
    Ocean,
    Psychedelic,
    Mono,
}

impl Palette {
    fn name(self) -> &'static str {
        match self {
            Palette::Fire => "fire",
            Palette::Ocean => "ocean",
            Palette::Psychedelic => "psychedelic",
            Palette::Mono => "mono",
        }
    }

    fn shader(self) -> Shader {
        match self {
            Palette::Fire => Shader::new(
                GLYPHS,
                &[
                    Rgb::hex(0x330000),
                    Rgb::hex(0x660000),
                    Rgb::hex(0x990000),
                    Rgb::hex(0xCC3300),
                    Rgb::hex(0xFF4400),
                    Rgb::hex(0xFF8800),
                    Rgb::hex(0xFFCC00),
                ],
            ),
            Palette::Ocean => Shader::new(
                GLYPHS,
                &[
                    Rgb::hex(0x000033),
                    Rgb::hex(0x000066),
                    Rgb::hex(0x003399),
                    Rgb::hex(0x0066CC),
                    Rgb::hex(0x0099FF),
                    Rgb::hex(0x33CCFF),
                    Rgb::hex(0x66FFFF),
                ],
            ),
            Palette::Psychedelic => Shader::new(
                GLYPHS,
                &[
                    Rgb::hex(0xFF0080),
                    Rgb::hex(0x8000FF),
                    Rgb::hex(0x0080FF),
                    Rgb::hex(0x00FF80),
                    Rgb::hex(0x80FF00),
                    Rgb::hex(0xFF8000),
                ],
            ),
            Palette::Mono => Shader::new(
                GLYPHS,
                &[
                    Rgb::gray(20),
                    Rgb::gray(60),
                    Rgb::gray(100),
                    Rgb::gray(140),
                    Rgb::gray(180),
                    Rgb::gray(220),
                    Rgb::gray(255),
                ],
            ),
        }
    }
}

const PALETTES: [Palette; 4] = [
    Palette::Fire,
    Palette::Ocean,
    Palette::Psychedelic,
    Palette::Mono,
];

struct Plasma {
    t: f32,
    speed: f32,
    intensity: f32,
    palette: Palette,
    shader: Shader,
}

impl Plasma {
    fn new() -> Self {
        Plasma {
            t: 0.0,
            speed: 1.0,
            intensity: 1.0,
            palette: Palette::Fire,
            shader: Palette::Fire.shader(),
        }
    }

    fn set_palette(&mut self, p: Palette) {
        self.palette = p;
        self.shader = p.shader();
    }

    fn field(&self, x: usize, y: usize, cols: usize, rows: usize) -> f32 {
        let fx = x as f32 / cols.max(1) as f32 * 16.0;
        let fy = y as f32 / rows.max(1) as f32 * 16.0;
        let t = self.t;

        let v = (fx * 0.5 + t).sin()
            + (fy * 0.3 + t * 1.2).sin()
            + ((fx + fy) * 0.25 + t * 0.8).sin()
            + ((fx * fx + fy * fy).sqrt() * 0.4 + t * 1.5).sin()
            + (fx * 0.1 + fy * 0.2 + t * 0.6).sin();

        clamp01((v + 5.0) / 10.0 * self.intensity)
    }
}

impl Scene for Plasma {
    fn title(&self) -> &str {
        "plasma"
    }

    fn advance(&mut self, dt: f32) {
        self.t += dt * 3.0 * self.speed;
    }

    fn render(&self, grid: &mut Grid) {
        let (cols, rows) = (grid.cols(), grid.rows());
        for y in 0..rows {
            for x in 0..cols {
                let v = self.field(x, y, cols, rows);
                let (ch, fg) = self.shader.shade(v);
                grid.set(x as i32, y as i32, ch, fg);
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c @ '1'..='4') => {
                self.set_palette(PALETTES[c as usize - '1' as usize]);
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
                self.intensity = (self.intensity - 0.1).max(INTENSITY_MIN);
                true
            }
            KeyCode::Right => {
                self.intensity = (self.intensity + 0.1).min(INTENSITY_MAX);
                true
            }
            _ => false,
        }
    }

    fn reset(&mut self) {
        self.t = 0.0;
    }

    fn status(&self) -> String {
        format!(
            "palette {} | speed {:.1} | intensity {:.1}",
            self.palette.name(),
            self.speed,
            self.intensity
        )
    }

    fn help(&self) -> &str {
        "1-4 palette | up/down speed | left/right intensity"
    }
}

fn main() {
    if let Err(e) = stage::run(Plasma::new()) {
        eprintln!("plasma: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stage::KeyModifiers;

    #[test]
    fn field_stays_normalized() {
        let mut p = Plasma::new();
        p.intensity = INTENSITY_MAX;
        for _ in 0..100 {
            p.advance(1.0 / 30.0);
        }
        for y in 0..24 {
            for x in 0..80 {
                let v = p.field(x, y, 80, 24);
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn parameter_clamps() {
        let mut p = Plasma::new();
        for _ in 0..50 {
            p.handle_key(KeyCode::Up);
            p.handle_key(KeyCode::Right);
        }
        assert_eq!(p.speed, SPEED_MAX);
        assert_eq!(p.intensity, INTENSITY_MAX);
        for _ in 0..50 {
            p.handle_key(KeyCode::Down);
            p.handle_key(KeyCode::Left);
        }
        assert_eq!(p.speed, SPEED_MIN);
        assert_eq!(p.intensity, INTENSITY_MIN);
    }

    #[test]
    fn frozen_state_renders_identically() {
        let mut p = Plasma::new();
        p.advance(0.5);
        let mut a = Grid::new(40, 12, Rgb::BLACK);
        let mut b = Grid::new(40, 12, Rgb::BLACK);
        p.render(&mut a);
        p.render(&mut b);
        assert_eq!(a.to_text(), b.to_text());
    }

    #[test]
    fn reset_twice_equals_once() {
        let mut t = stage::Transport::new();
        let mut p = Plasma::new();
        for _ in 0..30 {
            t.tick(&mut p, 1.0 / 30.0);
        }
        t.key(&mut p, KeyCode::Char('r'), KeyModifiers::NONE);
        let once = p.t;
        t.key(&mut p, KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(p.t, once);
        assert_eq!(t.clock(), 0.0);
    }
}
