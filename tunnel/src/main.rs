//! Polar tunnel. Four sampling modes over the same distance/angle field.

use std::f32::consts::PI;

use stage::{mix, Grid, KeyCode, Rgb, Scene};

const SPEED_MIN: f32 = 0.1;
const SPEED_MAX: f32 = 3.0;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Classic,
    Checker,
    Spiral,
    Ripple,
}

const MODES: [Mode; 4] = [Mode::Classic, Mode::Checker, Mode::Spiral, Mode::Ripple];

impl Mode {
    fn name(self) -> &'static str {
        match self {
            Mode::Classic => "classic",
            Mode::Checker => "checkerboard",
            Mode::Spiral => "spiral",
            Mode::Ripple => "ripple",
        }
    }
}

struct Tunnel {
    t: f32,
    speed: f32,
    mode: Mode,
}

impl Tunnel {
    fn new() -> Self {
        Tunnel {
            t: 0.0,
            speed: 1.0,
            mode: Mode::Classic,
        }
    }

    /// Intensity, glyph and color for one cell. The minimum-distance guard
    /// keeps the depth division finite at the screen center.
    fn sample(&self, dist: f32, angle: f32) -> (f32, char, Rgb) {
        let dist = dist.max(1.0);
        let t = self.t;
        match self.mode {
            Mode::Classic => {
                let depth = 50.0 / dist + t * 2.0;
                let ring = depth.rem_euclid(2.0);
                let (intensity, ch) = if ring < 1.0 { (ring, '▓') } else { (2.0 - ring, '▒') };
                (intensity, ch, depth_color((depth * 0.2).rem_euclid(1.0)))
            }
            Mode::Checker => {
                let depth = 30.0 / dist + t * 3.0;
                let seg = ((angle + PI) / (PI / 8.0)) as i32;
                let (intensity, ch) = if (seg + depth as i32) % 2 == 0 {
                    (0.8, '█')
                } else {
                    (0.2, '░')
                };
                (intensity, ch, depth_color((depth * 0.1).rem_euclid(1.0)))
            }
            Mode::Spiral => {
                let depth = 40.0 / dist + t * 2.0;
                let s = ((angle + depth * 0.5) * 4.0).sin();
                let (intensity, ch) = if s > 0.0 { (s, '◤') } else { (-s, '◥') };
                (intensity, ch, spiral_color((depth * 0.15).rem_euclid(1.0)))
            }
            Mode::Ripple => {
                let depth = 35.0 / dist + t * 2.5;
                let ripple = (dist * 0.3 - t * 4.0).sin();
                let wave = (depth * 2.0 + ripple * 2.0).sin();
                let intensity = (wave + 1.0) / 2.0;
                let ch = if intensity > 0.7 {
                    '●'
                } else if intensity > 0.4 {
                    '◦'
                } else {
                    '·'
                };
                (
                    intensity,
                    ch,
                    ripple_color((depth * 0.25 + ripple * 0.1).rem_euclid(1.0)),
                )
            }
        }
    }
}

fn depth_color(v: f32) -> Rgb {
    if v < 0.33 {
        Rgb::hex(0x0000FF)
    } else if v < 0.66 {
        Rgb::hex(0x8800FF)
    } else {
        Rgb::hex(0xFF00FF)
    }
}

fn spiral_color(v: f32) -> Rgb {
    if v < 0.33 {
        Rgb::hex(0x00FF00)
    } else if v < 0.66 {
        Rgb::hex(0x88FF00)
    } else {
        Rgb::hex(0xFFFF00)
    }
}

fn ripple_color(v: f32) -> Rgb {
    if v < 0.25 {
        Rgb::hex(0x00FFFF)
    } else if v < 0.5 {
        Rgb::hex(0x44FFFF)
    } else if v < 0.75 {
        Rgb::hex(0x88FFFF)
    } else {
        Rgb::hex(0xCCFFFF)
    }
}

impl Scene for Tunnel {
    fn title(&self) -> &str {
        "tunnel"
    }

    fn advance(&mut self, dt: f32) {
        self.t += dt * 3.0 * self.speed;
    }

    fn render(&self, grid: &mut Grid) {
        let cx = grid.cols() as f32 / 2.0;
        let cy = grid.rows() as f32 / 2.0;
        for y in 0..grid.rows() {
            for x in 0..grid.cols() {
                let dx = x as f32 - cx;
                // Terminal cells are about twice as tall as wide.
                let dy = (y as f32 - cy) * 2.0;
                let dist = (dx * dx + dy * dy).sqrt();
                let angle = dy.atan2(dx);

                let (intensity, ch, color) = self.sample(dist, angle);
                // Fade the faint cells toward black, push the hot ones
                // toward white instead of toggling terminal attributes.
                let fg = if intensity < 0.1 {
                    mix(Rgb::BLACK, color, 0.4)
                } else if intensity > 0.8 {
                    mix(color, Rgb::WHITE, 0.25)
                } else {
                    color
                };
                grid.set(x as i32, y as i32, ch, fg);
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c @ '1'..='4') => {
                self.mode = MODES[c as usize - '1' as usize];
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
            _ => false,
        }
    }

    fn reset(&mut self) {
        self.t = 0.0;
    }

    fn status(&self) -> String {
        format!("mode {} | speed {:.1}", self.mode.name(), self.speed)
    }

    fn help(&self) -> &str {
        "1-4 mode | up/down speed"
    }
}

fn main() {
    if let Err(e) = stage::run(Tunnel::new()) {
        eprintln!("tunnel: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_cell_is_finite_in_every_mode() {
        let mut t = Tunnel::new();
        t.advance(1.0);
        for mode in MODES {
            t.mode = mode;
            // Distance zero hits the minimum-distance guard.
            let (intensity, _, _) = t.sample(0.0, 0.0);
            assert!(intensity.is_finite());
        }
    }

    #[test]
    fn intensity_within_unit_range() {
        let mut t = Tunnel::new();
        t.advance(2.3);
        for mode in MODES {
            t.mode = mode;
            for d in 0..100 {
                let (intensity, _, _) = t.sample(d as f32, (d as f32 * 0.1) - PI);
                assert!((-0.001..=1.001).contains(&intensity));
            }
        }
    }

    #[test]
    fn renders_full_grid() {
        let t = Tunnel::new();
        let mut g = Grid::new(40, 12, Rgb::BLACK);
        t.render(&mut g);
        // Every cell gets painted; the tunnel has no gaps.
        assert!(g.to_text().split('\n').all(|l| l.chars().count() == 40));
    }
}
