//! Rotozoom: inverse-rotate each screen cell into texture space and sample
//! one of five procedural patterns.

use stage::{Grid, KeyCode, Rgb, Scene};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pattern {
    Checker,
    Stripes,
    Dots,
    Mandala,
    Circuit,
}

const PATTERNS: [Pattern; 5] = [
    Pattern::Checker,
    Pattern::Stripes,
    Pattern::Dots,
    Pattern::Mandala,
    Pattern::Circuit,
];

impl Pattern {
    fn name(self) -> &'static str {
        match self {
            Pattern::Checker => "checkerboard",
            Pattern::Stripes => "stripes",
            Pattern::Dots => "dots",
            Pattern::Mandala => "mandala",
            Pattern::Circuit => "circuit",
        }
    }
}

const STRIPE_COLORS: [Rgb; 6] = [
    Rgb::hex(0xFF0000),
    Rgb::hex(0x00FF00),
    Rgb::hex(0x0000FF),
    Rgb::hex(0xFFFF00),
    Rgb::hex(0xFF00FF),
    Rgb::hex(0x00FFFF),
];

struct Rotozoom {
    t: f32,
    rotation: f32,
    zoom: f32,
    offset_x: f32,
    offset_y: f32,
    pattern: Pattern,
}

impl Rotozoom {
    fn new() -> Self {
        Rotozoom {
            t: 0.0,
            rotation: 0.0,
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            pattern: Pattern::Checker,
        }
    }

    fn sample(&self, x: f32, y: f32) -> (char, Rgb) {
        match self.pattern {
            Pattern::Checker => {
                let tile = 4.0;
                let tx = (x / tile).floor() as i64;
                let ty = (y / tile).floor() as i64;
                if (tx + ty).rem_euclid(2) == 0 {
                    ('█', Rgb::WHITE)
                } else {
                    ('█', Rgb::BLACK)
                }
            }
            Pattern::Stripes => {
                let idx = (x / 3.0).floor() as i64;
                ('█', STRIPE_COLORS[idx.rem_euclid(6) as usize])
            }
            Pattern::Dots => {
                let grid_size = 6.0;
                let gx = x.rem_euclid(grid_size);
                let gy = y.rem_euclid(grid_size);
                let half = grid_size / 2.0;
                let d = ((gx - half).powi(2) + (gy - half).powi(2)).sqrt();
                if d < 2.0 {
                    let v = (x * 0.1).sin() * (y * 0.1).cos();
                    let fg = if v > 0.3 {
                        Rgb::hex(0xFF4080)
                    } else if v > -0.3 {
                        Rgb::hex(0x4080FF)
                    } else {
                        Rgb::hex(0x80FF40)
                    };
                    ('●', fg)
                } else {
                    (' ', Rgb::BLACK)
                }
            }
            Pattern::Mandala => {
                let dist = (x * x + y * y).sqrt();
                let angle = y.atan2(x);
                let rings = (dist * 0.3).sin();
                let spokes = (angle * 8.0).sin();
                let drift = (dist * 0.2 - self.t * 2.0).sin() * (angle * 6.0 + self.t).cos();
                let v = (rings * spokes + drift) / 2.0;
                if v > 0.6 {
                    ('◆', Rgb::hex(0xFFD700))
                } else if v > 0.2 {
                    ('◇', Rgb::hex(0xFF8000))
                } else if v > -0.2 {
                    ('○', Rgb::hex(0xFF4000))
                } else if v > -0.6 {
                    ('∘', Rgb::hex(0x800040))
                } else {
                    (' ', Rgb::BLACK)
                }
            }
            Pattern::Circuit => {
                let grid_size = 8.0;
                let gx = x.rem_euclid(grid_size);
                let gy = y.rem_euclid(grid_size);
                let horiz = (gy - grid_size / 2.0).abs() < 1.0;
                let vert = (gx - grid_size / 2.0).abs() < 1.0;
                let pad = (gx - grid_size / 2.0).abs() < 2.0 && (gy - grid_size / 2.0).abs() < 2.0;
                let hash =
                    ((x / grid_size).floor() * 12.345 + (y / grid_size).floor() * 67.890).sin();
                if pad && hash > 0.3 {
                    ('●', Rgb::hex(0x00FF80))
                } else if horiz || vert {
                    let ch = if hash > 0.0 { '─' } else { '│' };
                    (ch, Rgb::hex(0x80FF80))
                } else if hash > 0.8 {
                    ('▪', Rgb::gray(0x40))
                } else {
                    (' ', Rgb::BLACK)
                }
            }
        }
    }
}

impl Scene for Rotozoom {
    fn title(&self) -> &str {
        "rotozoom"
    }

    fn advance(&mut self, dt: f32) {
        let step = dt * 30.0;
        self.t += 0.1 * step;
        self.rotation += 0.02 * step;
        self.zoom = 1.0 + (self.t * 0.3).sin() * 0.8;
        self.offset_x = (self.t * 0.15).sin() * 20.0;
        self.offset_y = (self.t * 0.2).cos() * 15.0;
    }

    fn render(&self, grid: &mut Grid) {
        let cx = grid.cols() as f32 / 2.0;
        let cy = grid.rows() as f32 / 2.0;
        let (cos_t, sin_t) = (self.rotation.cos(), self.rotation.sin());
        // Zoom oscillates in [0.2, 1.8]; never reaches zero.
        let inv_zoom = 1.0 / self.zoom;

        for y in 0..grid.rows() {
            for x in 0..grid.cols() {
                let sx = x as f32 - cx;
                let sy = (y as f32 - cy) * 2.0;

                let tx = (sx * cos_t + sy * sin_t) * inv_zoom + self.offset_x;
                let ty = (-sx * sin_t + sy * cos_t) * inv_zoom + self.offset_y;

                let (ch, fg) = self.sample(tx, ty);
                grid.set(x as i32, y as i32, ch, fg);
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        if let KeyCode::Char(c @ '1'..='5') = key {
            self.pattern = PATTERNS[c as usize - '1' as usize];
            return true;
        }
        false
    }

    fn reset(&mut self) {
        self.t = 0.0;
        self.rotation = 0.0;
        self.zoom = 1.0;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    fn status(&self) -> String {
        format!("pattern {} | zoom {:.2}", self.pattern.name(), self.zoom)
    }

    fn help(&self) -> &str {
        "1-5 pattern"
    }
}

fn main() {
    if let Err(e) = stage::run(Rotozoom::new()) {
        eprintln!("rotozoom: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_never_hits_zero() {
        let mut r = Rotozoom::new();
        let mut min_zoom = f32::MAX;
        for _ in 0..2000 {
            r.advance(1.0 / 30.0);
            min_zoom = min_zoom.min(r.zoom);
        }
        assert!(min_zoom > 0.15);
    }

    #[test]
    fn stripes_index_safe_for_negative_texture_coords() {
        let r = Rotozoom {
            pattern: Pattern::Stripes,
            ..Rotozoom::new()
        };
        for i in -100..100 {
            let _ = r.sample(i as f32 * 1.7, -i as f32 * 0.9);
        }
    }

    #[test]
    fn checker_alternates() {
        let r = Rotozoom::new();
        let (_, a) = r.sample(0.0, 0.0);
        let (_, b) = r.sample(4.0, 0.0);
        assert_ne!(a, b);
    }
}
