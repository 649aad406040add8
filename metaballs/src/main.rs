//! Metaballs: an inverse-square field over drifting balls, thresholded into
//! an organic surface with faint field lines outside it.

use stage::{clamp01, mix, GlyphRamp, Gradient, Grid, KeyCode, Rgb, Scene};

const THRESHOLD_MIN: f32 = 0.3;
const THRESHOLD_MAX: f32 = 3.0;
const MAX_BALLS: usize = 8;
const MAX_VEL: f32 = 1.5;
// Field strength is strength * r^2 / d^2; d^2 is floored so a cell sitting
// exactly on a ball center stays finite.
const MIN_DIST_SQ: f32 = 0.25;

#[derive(Clone, Copy)]
struct Ball {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: f32,
    strength: f32,
    phase: f32,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ColorMode {
    Classic,
    Rainbow,
    Heat,
    Electric,
}

const COLOR_MODES: [ColorMode; 4] = [
    ColorMode::Classic,
    ColorMode::Rainbow,
    ColorMode::Heat,
    ColorMode::Electric,
];

impl ColorMode {
    fn name(self) -> &'static str {
        match self {
            ColorMode::Classic => "classic",
            ColorMode::Rainbow => "rainbow",
            ColorMode::Heat => "heat",
            ColorMode::Electric => "electric",
        }
    }
}

fn initial_balls() -> Vec<Ball> {
    vec![
        Ball { x: 20.0, y: 10.0, vx: 0.8, vy: 0.3, radius: 8.0, strength: 1.0, phase: 0.0 },
        Ball { x: 40.0, y: 15.0, vx: -0.5, vy: 0.7, radius: 6.0, strength: 0.8, phase: 1.05 },
        Ball { x: 60.0, y: 8.0, vx: 0.6, vy: -0.4, radius: 7.0, strength: 0.9, phase: 2.09 },
        Ball { x: 30.0, y: 20.0, vx: -0.7, vy: -0.6, radius: 5.0, strength: 0.7, phase: 3.14 },
    ]
}

struct Metaballs {
    balls: Vec<Ball>,
    t: f32,
    threshold: f32,
    mode: ColorMode,
    cols: usize,
    rows: usize,
    glyphs: GlyphRamp,
    classic: Gradient,
    rainbow: Gradient,
    heat: Gradient,
    electric: Gradient,
}

impl Metaballs {
    fn new() -> Self {
        Metaballs {
            balls: initial_balls(),
            t: 0.0,
            threshold: 1.0,
            mode: ColorMode::Classic,
            cols: 80,
            rows: 24,
            glyphs: GlyphRamp::new("▒▓█▉▊▋▌▍▎▏"),
            classic: Gradient::new(&[
                Rgb::hex(0x0044FF),
                Rgb::hex(0x4488FF),
                Rgb::hex(0x88CCFF),
                Rgb::hex(0xCCFFFF),
            ]),
            rainbow: Gradient::new(&[
                Rgb::hex(0xFF0080),
                Rgb::hex(0x8000FF),
                Rgb::hex(0x0080FF),
                Rgb::hex(0x00FF80),
                Rgb::hex(0x80FF00),
                Rgb::hex(0xFF8000),
            ]),
            heat: Gradient::new(&[
                Rgb::hex(0x440000),
                Rgb::hex(0x880000),
                Rgb::hex(0xFF4400),
                Rgb::hex(0xFFFF00),
            ]),
            electric: Gradient::new(&[
                Rgb::hex(0x001188),
                Rgb::hex(0x0044FF),
                Rgb::hex(0x00AAFF),
                Rgb::hex(0x88FFFF),
            ]),
        }
    }

    /// Total field strength and summed color phase at one cell.
    fn field(&self, x: f32, y: f32) -> (f32, f32) {
        let mut total = 0.0;
        let mut color_influence = 0.0;
        for b in &self.balls {
            let dx = x - b.x;
            let dy = (y - b.y) * 2.0;
            let d2 = (dx * dx + dy * dy).max(MIN_DIST_SQ);
            let s = b.strength * b.radius * b.radius / d2;
            total += s;
            color_influence += s * b.phase;
        }
        (total, color_influence)
    }

    fn surface_color(&self, strength: f32, color_influence: f32) -> Rgb {
        match self.mode {
            ColorMode::Classic => self.classic.at(strength),
            ColorMode::Rainbow => {
                self.rainbow.at(((color_influence + self.t) * 0.17).rem_euclid(1.0))
            }
            ColorMode::Heat => self.heat.at(strength),
            ColorMode::Electric => {
                let flicker = (self.t * 20.0).sin() * 0.2;
                self.electric.at(strength + flicker)
            }
        }
    }
}

impl Scene for Metaballs {
    fn title(&self) -> &str {
        "metaballs"
    }

    fn advance(&mut self, dt: f32) {
        self.t += dt * 3.0;
        let (w, h) = (self.cols as f32, self.rows as f32);
        for b in self.balls.iter_mut() {
            b.x += b.vx;
            b.y += b.vy;

            if b.x <= b.radius || b.x >= w - b.radius {
                b.vx = -b.vx;
                b.x = b.x.max(b.radius).min(w - b.radius);
            }
            if b.y <= b.radius || b.y >= h - b.radius {
                b.vy = -b.vy;
                b.y = b.y.max(b.radius).min(h - b.radius);
            }

            // Organic drift on top of the straight-line motion.
            b.vx += (self.t * 0.7 + b.phase).sin() * 0.05;
            b.vy += (self.t * 0.8 + b.phase).cos() * 0.05;
            let vel = (b.vx * b.vx + b.vy * b.vy).sqrt();
            if vel > MAX_VEL {
                b.vx = b.vx / vel * MAX_VEL;
                b.vy = b.vy / vel * MAX_VEL;
            }

            b.radius = 4.0 + (self.t * 1.2 + b.phase).sin() * 2.0;
            b.strength = 0.7 + (self.t * 0.9 + b.phase).sin() * 0.3;
        }
    }

    fn render(&self, grid: &mut Grid) {
        for y in 0..grid.rows() {
            for x in 0..grid.cols() {
                let (total, color_influence) = self.field(x as f32, y as f32);
                if total >= self.threshold {
                    let norm =
                        clamp01((total - self.threshold) / (self.threshold * 2.0));
                    let ch = self.glyphs.at(norm);
                    let mut fg = self.surface_color(norm, color_influence);
                    if total > self.threshold * 2.0 {
                        fg = mix(fg, Rgb::WHITE, 0.25);
                    }
                    grid.set(x as i32, y as i32, ch, fg);
                } else if total > self.threshold * 0.6 {
                    grid.set(x as i32, y as i32, '∘', Rgb::gray(0x33));
                } else if total > self.threshold * 0.3 {
                    grid.set(x as i32, y as i32, '·', Rgb::gray(0x33));
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c @ '1'..='4') => {
                self.mode = COLOR_MODES[c as usize - '1' as usize];
                true
            }
            KeyCode::Up => {
                self.threshold = (self.threshold + 0.1).min(THRESHOLD_MAX);
                true
            }
            KeyCode::Down => {
                self.threshold = (self.threshold - 0.1).max(THRESHOLD_MIN);
                true
            }
            KeyCode::Char('a') => {
                if self.balls.len() < MAX_BALLS {
                    self.balls.push(Ball {
                        x: self.cols as f32 / 2.0,
                        y: self.rows as f32 / 2.0,
                        vx: self.t.sin() * 0.8,
                        vy: self.t.cos() * 0.8,
                        radius: 4.0 + (self.t * 2.0).sin() * 2.0,
                        strength: 0.6 + (self.t * 3.0).sin() * 0.3,
                        phase: self.t,
                    });
                }
                true
            }
            KeyCode::Char('d') => {
                if self.balls.len() > 1 {
                    self.balls.pop();
                }
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        let (w, h) = (cols as f32, rows as f32);
        for b in self.balls.iter_mut() {
            b.x = b.x.min(w - 1.0).max(0.0);
            b.y = b.y.min(h - 1.0).max(0.0);
        }
    }

    fn reset(&mut self) {
        self.t = 0.0;
        self.threshold = 1.0;
        self.balls = initial_balls();
    }

    fn status(&self) -> String {
        format!(
            "balls {} | threshold {:.1} | mode {}",
            self.balls.len(),
            self.threshold,
            self.mode.name()
        )
    }

    fn help(&self) -> &str {
        "a add | d drop | 1-4 colors | up/down threshold"
    }
}

fn main() {
    if let Err(e) = stage::run(Metaballs::new()) {
        eprintln!("metaballs: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_finite_on_a_ball_center() {
        let m = Metaballs::new();
        let b = m.balls[0];
        let (total, _) = m.field(b.x, b.y);
        assert!(total.is_finite());
        assert!(total > 0.0);
    }

    #[test]
    fn ball_count_stays_within_bounds() {
        let mut m = Metaballs::new();
        for _ in 0..20 {
            m.handle_key(KeyCode::Char('a'));
        }
        assert_eq!(m.balls.len(), MAX_BALLS);
        for _ in 0..20 {
            m.handle_key(KeyCode::Char('d'));
        }
        assert_eq!(m.balls.len(), 1);
    }

    #[test]
    fn threshold_clamped() {
        let mut m = Metaballs::new();
        for _ in 0..100 {
            m.handle_key(KeyCode::Up);
        }
        assert!((m.threshold - THRESHOLD_MAX).abs() < 1e-5);
        for _ in 0..100 {
            m.handle_key(KeyCode::Down);
        }
        assert!((m.threshold - THRESHOLD_MIN).abs() < 1e-5);
    }

    #[test]
    fn velocity_capped_after_advancing() {
        let mut m = Metaballs::new();
        for _ in 0..300 {
            m.advance(1.0 / 30.0);
        }
        for b in &m.balls {
            let vel = (b.vx * b.vx + b.vy * b.vy).sqrt();
            assert!(vel <= MAX_VEL + 1e-3);
        }
    }

    #[test]
    fn reset_restores_initial_layout() {
        let mut m = Metaballs::new();
        for _ in 0..100 {
            m.advance(1.0 / 30.0);
        }
        m.handle_key(KeyCode::Char('a'));
        m.reset();
        assert_eq!(m.balls.len(), 4);
        assert_eq!(m.t, 0.0);
        let first = m.balls[0];
        assert_eq!((first.x, first.y), (20.0, 10.0));
    }
}
