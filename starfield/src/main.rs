//! Starfield flown toward the viewer: stars live in a unit cube and are
//! perspective-projected; depth picks the glyph and brightness.

use rand::{rngs::StdRng, Rng, SeedableRng};
use stage::{Grid, KeyCode, Rgb, Scene, Shader};

const SPEED_MIN: f32 = 0.005;
const SPEED_MAX: f32 = 0.3;
const TRAIL_SPEED: f32 = 0.08;

#[derive(Clone, Copy)]
struct Star {
    x: f32,
    y: f32,
    z: f32,
    prev_sx: f32,
    prev_sy: f32,
}

struct Starfield {
    stars: Vec<Star>,
    count: usize,
    speed: f32,
    cols: usize,
    rows: usize,
    shader: Shader,
    rng: StdRng,
}

impl Starfield {
    fn new(count: usize) -> Self {
        let mut s = Starfield {
            stars: Vec::new(),
            count,
            speed: 0.05,
            cols: 80,
            rows: 24,
            // Brightness ramp: far and dim through near and blazing.
            shader: Shader::new(
                "·∘•✧★✦",
                &[
                    Rgb::gray(0x44),
                    Rgb::gray(0x66),
                    Rgb::gray(0x99),
                    Rgb::gray(0xCC),
                    Rgb::hex(0xFFFF99),
                    Rgb::WHITE,
                ],
            ),
            rng: StdRng::from_entropy(),
        };
        s.seed_stars();
        s
    }

    fn seed_stars(&mut self) {
        self.stars = (0..self.count)
            .map(|_| Star {
                x: (self.rng.gen::<f32>() - 0.5) * 2.0,
                y: (self.rng.gen::<f32>() - 0.5) * 2.0,
                z: self.rng.gen::<f32>().max(f32::MIN_POSITIVE),
                prev_sx: 0.0,
                prev_sy: 0.0,
            })
            .collect();
    }

    fn project(&self, star: &Star) -> (f32, f32) {
        let cx = self.cols as f32 / 2.0;
        let cy = self.rows as f32 / 2.0;
        (star.x / star.z * cx + cx, star.y / star.z * cy + cy)
    }
}

impl Scene for Starfield {
    fn title(&self) -> &str {
        "starfield"
    }

    fn advance(&mut self, _dt: f32) {
        for i in 0..self.stars.len() {
            let (sx, sy) = self.project(&self.stars[i]);
            let star = &mut self.stars[i];
            star.prev_sx = sx;
            star.prev_sy = sy;

            star.z -= self.speed;
            if star.z <= 0.0 {
                star.x = (self.rng.gen::<f32>() - 0.5) * 2.0;
                star.y = (self.rng.gen::<f32>() - 0.5) * 2.0;
                star.z = 1.0;
            }
        }
    }

    fn render(&self, grid: &mut Grid) {
        for star in &self.stars {
            let (sx, sy) = self.project(star);
            let (x, y) = (sx as i32, sy as i32);
            if x < 0 || y < 0 || x >= grid.cols() as i32 || y >= grid.rows() as i32 {
                continue;
            }
            let brightness = 1.0 - star.z;
            let (ch, fg) = self.shader.shade(brightness);
            grid.set(x, y, ch, fg);

            // Streak one cell of trail once we are moving fast enough.
            if self.speed > TRAIL_SPEED && brightness > 0.5 {
                let (px, py) = (star.prev_sx as i32, star.prev_sy as i32);
                let vacant = grid.get(px, py).map(|c| c.ch == ' ').unwrap_or(false);
                if (px, py) != (x, y) && vacant {
                    grid.set(px, py, '·', self.shader.color(brightness * 0.5));
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Up => {
                self.speed = (self.speed + 0.01).min(0.2);
                true
            }
            KeyCode::Down => {
                self.speed = (self.speed - 0.01).max(0.01);
                true
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.speed = (self.speed + 0.02).min(SPEED_MAX);
                true
            }
            KeyCode::Char('-') => {
                self.speed = (self.speed - 0.02).max(SPEED_MIN);
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
    }

    fn reset(&mut self) {
        self.seed_stars();
        self.speed = 0.05;
    }

    fn status(&self) -> String {
        format!("speed {:.3} | stars {}", self.speed, self.stars.len())
    }

    fn help(&self) -> &str {
        "up/down speed | +/- turbo"
    }
}

fn parse_args() -> (usize, stage::Options) {
    let mut fps = 30;
    let mut stars = 200usize;
    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--stars" => {
                if let Some(v) = it.next() {
                    stars = v.parse().unwrap_or(stars);
                }
            }
            "--fps" => {
                if let Some(v) = it.next() {
                    fps = v.parse().unwrap_or(fps);
                }
            }
            "--help" | "-h" => {
                println!(
                    "starfield\n\nUSAGE:\n\tstarfield [--stars 50..1000] [--fps 15..120]\n\nKEYS:\n\tup/down speed | +/- turbo | space pause | r reset | q quit"
                );
                std::process::exit(0);
            }
            _ => {}
        }
    }
    (stars.clamp(50, 1000), stage::Options::fps(fps))
}

fn main() {
    let (stars, opts) = parse_args();
    if let Err(e) = stage::run_with(Starfield::new(stars), opts) {
        eprintln!("starfield: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_never_reaches_zero() {
        let mut s = Starfield::new(100);
        s.rng = StdRng::seed_from_u64(4);
        s.seed_stars();
        s.speed = SPEED_MAX;
        for _ in 0..500 {
            s.advance(1.0 / 30.0);
        }
        assert!(s.stars.iter().all(|st| st.z > 0.0 && st.z <= 1.0));
    }

    #[test]
    fn speed_clamps() {
        let mut s = Starfield::new(10);
        for _ in 0..100 {
            s.handle_key(KeyCode::Char('+'));
        }
        assert!(s.speed <= SPEED_MAX + 1e-6);
        for _ in 0..100 {
            s.handle_key(KeyCode::Char('-'));
        }
        assert!(s.speed >= SPEED_MIN - 1e-6);
    }

    #[test]
    fn centered_star_projects_to_center() {
        let mut s = Starfield::new(1);
        s.resize(80, 24);
        s.stars[0] = Star {
            x: 0.0,
            y: 0.0,
            z: 0.5,
            prev_sx: 0.0,
            prev_sy: 0.0,
        };
        let (sx, sy) = s.project(&s.stars[0]);
        assert_eq!((sx, sy), (40.0, 12.0));
    }
}
