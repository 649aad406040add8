//! Synthwave horizon, painted back to front: sky gradient, pulsing sun,
//! perspective floor grid, floating shapes, then atmospheric particles.

use rand::{rngs::StdRng, Rng, SeedableRng};
use stage::{clamp01, Gradient, Grid, KeyCode, Rgb, Scene};

const SPEED_MIN: f32 = 0.1;
const SPEED_MAX: f32 = 3.0;
const GRID_MIN: f32 = 0.2;
const GRID_MAX: f32 = 2.0;
const SHAPE_COUNT: usize = 12;
const MAX_PARTICLES: usize = 30;

const SHAPE_GLYPHS: [char; 16] = [
    '◆', '◇', '▲', '△', '●', '○', '■', '□', '★', '☆', '♦', '◈', '▼', '▽', '◉', '◎',
];

struct Theme {
    name: &'static str,
    sky: Gradient,
    sun: Gradient,
    floor: Gradient,
    haze: Rgb,
}

fn themes() -> Vec<Theme> {
    vec![
        Theme {
            name: "classic vaporwave",
            sky: Gradient::new(&[
                Rgb::hex(0xFF1493),
                Rgb::hex(0xFF69B4),
                Rgb::hex(0xDA70D6),
                Rgb::hex(0x9370DB),
                Rgb::hex(0x8A2BE2),
                Rgb::hex(0x4B0082),
            ]),
            sun: Gradient::new(&[
                Rgb::hex(0xFFD700),
                Rgb::hex(0xFFA500),
                Rgb::hex(0xFF8C00),
                Rgb::hex(0xFF4500),
            ]),
            floor: Gradient::new(&[
                Rgb::hex(0xFF1493),
                Rgb::hex(0xDA70D6),
                Rgb::hex(0x9370DB),
                Rgb::hex(0x663399),
                Rgb::hex(0x4B0082),
            ]),
            haze: Rgb::hex(0xFF69B4),
        },
        Theme {
            name: "miami vice",
            sky: Gradient::new(&[
                Rgb::hex(0xFF6EC7),
                Rgb::hex(0xFF8A80),
                Rgb::hex(0xFFB74D),
                Rgb::hex(0x4FC3F7),
                Rgb::hex(0x29B6F6),
                Rgb::hex(0x0277BD),
            ]),
            sun: Gradient::new(&[
                Rgb::hex(0xFFD54F),
                Rgb::hex(0xFF8A65),
                Rgb::hex(0xFF7043),
                Rgb::hex(0xE91E63),
            ]),
            floor: Gradient::new(&[
                Rgb::hex(0xFF6EC7),
                Rgb::hex(0xAB47BC),
                Rgb::hex(0x7E57C2),
                Rgb::hex(0x5E35B1),
            ]),
            haze: Rgb::hex(0xFF6EC7),
        },
        Theme {
            name: "outrun",
            sky: Gradient::new(&[
                Rgb::hex(0xFF073A),
                Rgb::hex(0xFF6B35),
                Rgb::hex(0xF7931E),
                Rgb::hex(0xFFD23F),
                Rgb::hex(0x06FFA5),
                Rgb::hex(0x4ECDC4),
            ]),
            sun: Gradient::new(&[
                Rgb::hex(0xFFD23F),
                Rgb::hex(0xF7931E),
                Rgb::hex(0xFF6B35),
                Rgb::hex(0xFF073A),
            ]),
            floor: Gradient::new(&[
                Rgb::hex(0x06FFA5),
                Rgb::hex(0x4ECDC4),
                Rgb::hex(0x45B7D1),
                Rgb::hex(0x96CEB4),
            ]),
            haze: Rgb::hex(0x06FFA5),
        },
        Theme {
            name: "synthwave",
            sky: Gradient::new(&[
                Rgb::hex(0xFF0099),
                Rgb::hex(0xFF6600),
                Rgb::hex(0xFFFF00),
                Rgb::hex(0x00FFFF),
                Rgb::hex(0x9900FF),
                Rgb::hex(0x000033),
            ]),
            sun: Gradient::new(&[
                Rgb::hex(0xFFFF00),
                Rgb::hex(0xFF6600),
                Rgb::hex(0xFF0099),
                Rgb::hex(0x9900FF),
            ]),
            floor: Gradient::new(&[
                Rgb::hex(0x00FFFF),
                Rgb::hex(0x00CCFF),
                Rgb::hex(0x0099FF),
                Rgb::hex(0x0066FF),
            ]),
            haze: Rgb::hex(0xFF0099),
        },
    ]
}

#[derive(Clone, Copy)]
struct Shape {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    rotation: f32,
    rot_speed: f32,
    glyph: char,
    color: Rgb,
    age: f32,
}

#[derive(Clone, Copy)]
struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    life: f32,
    glyph: char,
    color: Rgb,
}

struct Vaporwave {
    t: f32,
    frame: u32,
    speed: f32,
    grid_intensity: f32,
    theme: usize,
    themes: Vec<Theme>,
    show_shapes: bool,
    show_haze: bool,
    sun_pulse: bool,
    shapes: Vec<Shape>,
    particles: Vec<Particle>,
    cols: usize,
    rows: usize,
    seed: u64,
    rng: StdRng,
}

impl Vaporwave {
    fn new(seed: u64) -> Self {
        let mut v = Vaporwave {
            t: 0.0,
            frame: 0,
            speed: 1.0,
            grid_intensity: 1.2,
            theme: 0,
            themes: themes(),
            show_shapes: true,
            show_haze: true,
            sun_pulse: true,
            shapes: Vec::new(),
            particles: Vec::new(),
            cols: 80,
            rows: 24,
            seed,
            rng: StdRng::seed_from_u64(seed),
        };
        v.spawn_shapes();
        v
    }

    fn theme(&self) -> &Theme {
        &self.themes[self.theme]
    }

    fn spawn_shapes(&mut self) {
        let theme_sky = self.themes[self.theme].sky.clone();
        self.shapes.clear();
        for _ in 0..SHAPE_COUNT {
            // Three depth layers with their own drift speed and band.
            let layer: f32 = self.rng.gen();
            let (band, drift) = if layer < 0.3 {
                (0.7, 0.2)
            } else if layer < 0.7 {
                (0.5, 0.4)
            } else {
                (0.3, 0.6)
            };
            self.shapes.push(Shape {
                x: self.rng.gen::<f32>() * self.cols as f32,
                y: self.rng.gen::<f32>() * self.rows as f32 * band,
                vx: (self.rng.gen::<f32>() - 0.5) * drift,
                vy: (self.rng.gen::<f32>() - 0.5) * drift * 0.3,
                rotation: self.rng.gen::<f32>() * std::f32::consts::TAU,
                rot_speed: (self.rng.gen::<f32>() - 0.5) * 0.05,
                glyph: SHAPE_GLYPHS[self.rng.gen_range(0..SHAPE_GLYPHS.len())],
                color: theme_sky.at(self.rng.gen()),
                age: 0.0,
            });
        }
    }

    fn emit_particles(&mut self) {
        if self.particles.len() >= MAX_PARTICLES || self.rng.gen::<f32>() >= 0.4 {
            return;
        }
        let kind: f32 = self.rng.gen();
        let theme = &self.themes[self.theme];
        let p = if kind < 0.6 {
            // Drifting sparkle in the sky band.
            const SPARK: [char; 6] = ['·', '•', '◦', '∘', '⋅', '∙'];
            Particle {
                x: self.rng.gen::<f32>() * self.cols as f32,
                y: self.rng.gen::<f32>() * self.rows as f32 / 2.0,
                vx: (self.rng.gen::<f32>() - 0.5) * 0.3,
                vy: (self.rng.gen::<f32>() - 0.5) * 0.2,
                life: 1.0,
                glyph: SPARK[self.rng.gen_range(0..SPARK.len())],
                color: theme.haze,
            }
        } else if kind < 0.8 {
            // Star rising from the floor.
            const STARS: [char; 6] = ['✦', '✧', '⋆', '✶', '✷', '✸'];
            Particle {
                x: self.rng.gen::<f32>() * self.cols as f32,
                y: self.rows as f32,
                vx: (self.rng.gen::<f32>() - 0.5) * 0.1,
                vy: -self.rng.gen::<f32>() * 0.3 - 0.1,
                life: 1.5,
                glyph: STARS[self.rng.gen_range(0..STARS.len())],
                color: theme.sky.at(self.rng.gen()),
            }
        } else {
            const GLOWS: [char; 5] = ['◉', '◎', '○', '●', '◯'];
            Particle {
                x: self.rng.gen::<f32>() * self.cols as f32,
                y: self.rng.gen::<f32>() * self.rows as f32 * 2.0 / 3.0,
                vx: (self.rng.gen::<f32>() - 0.5) * 0.15,
                vy: (self.rng.gen::<f32>() - 0.5) * 0.1,
                life: 2.0,
                glyph: GLOWS[self.rng.gen_range(0..GLOWS.len())],
                color: theme.sun.at(self.rng.gen()),
            }
        };
        self.particles.push(p);
    }

    fn paint_sky(&self, grid: &mut Grid) {
        let sky_rows = (grid.rows() / 3).max(1);
        for y in 0..sky_rows {
            let base = y as f32 / sky_rows as f32;
            for x in 0..grid.cols() {
                let (fx, fy) = (x as f32, y as f32);
                let noise = (fx * 0.08 + fy * 0.12 + self.t * 0.6).sin() * 0.15
                    + (fx * 0.15 + fy * 0.08 + self.t * 0.4).sin() * 0.08
                    + (fx * 0.05 + fy * 0.2 + self.t * 1.2).sin() * 0.05;
                let v = clamp01(base + noise);
                let mut ch = sky_glyph(v, x, y);
                if v > 0.7 && (fx * 0.2 + self.t * 2.0).sin() > 0.8 {
                    ch = '░';
                } else if y < sky_rows / 4 && (fx * 0.3 + self.t * 0.8).sin() > 0.9 {
                    ch = '·';
                }
                grid.set(x as i32, y as i32, ch, self.theme().sky.at(v));
            }
        }
    }

    fn paint_sun(&self, grid: &mut Grid) {
        let cx = grid.cols() as f32 / 2.0;
        let cy = grid.rows() as f32 / 4.0;
        let pulse = if self.sun_pulse {
            1.0 + (self.t * 2.5).sin() * 0.4 + (self.t * 4.0).sin() * 0.15
        } else {
            1.0
        };
        let radius = 5.0 * pulse;
        let sun = &self.theme().sun;

        for y in 0..grid.rows() / 2 {
            for x in 0..grid.cols() {
                let dx = x as f32 - cx;
                let dy = (y as f32 - cy) * 1.6;
                let dist = (dx * dx + dy * dy).sqrt();

                if dist < radius - 2.0 {
                    let core = 1.0 - dist / (radius - 2.0).max(0.5) * 0.3;
                    let ch = if dist < radius - 3.0 { '◉' } else { '●' };
                    grid.set(x as i32, y as i32, ch, sun.at(core));
                } else if dist < radius {
                    let edge = 0.6 + (self.t * 3.0 + dist).sin() * 0.3;
                    let ch = if (self.t * 2.0 + dist).sin() > 0.5 { '○' } else { '◎' };
                    grid.set(x as i32, y as i32, ch, sun.at(edge));
                } else if dist < radius + 6.0 {
                    // Scanline glow below the rim, the retro CRT look.
                    let glow = (radius + 6.0 - dist) / 6.0 * 0.3;
                    if y % 2 == (self.t * 10.0) as usize % 2 {
                        grid.set(x as i32, y as i32, '▒', sun.at(glow));
                    }
                }
            }
        }
    }

    fn paint_floor(&self, grid: &mut Grid) {
        let start = grid.rows() / 3;
        let floor = &self.theme().floor;

        for y in start..grid.rows() {
            let depth = (y - start + 1) as f32;
            let scale = 25.0 / (depth * 1.2);
            let offset = self.t * self.speed * scale * 1.5;
            let scan = ((y as f32) * 0.5 + self.t * 8.0).sin() * 0.1;

            for x in 0..grid.cols() {
                let gx = (x as f32 - grid.cols() as f32 / 2.0) / scale;
                let gz = depth + offset;

                let spacing = 1.8;
                let thickness = (0.12 / scale) * self.grid_intensity;
                let line_x = ((gx + 0.5).rem_euclid(spacing) - spacing / 2.0).abs() < thickness;
                let line_z = ((gz + 0.5).rem_euclid(spacing) - spacing / 2.0).abs() < thickness;

                if line_x || line_z {
                    let mut intensity = (1.0 / (depth * 0.08 + 1.0)) * self.grid_intensity;
                    let major_x = ((gx + 0.5).rem_euclid(spacing * 4.0) - spacing * 2.0).abs()
                        < thickness * 2.0;
                    let major_z = ((gz + 0.5).rem_euclid(spacing * 4.0) - spacing * 2.0).abs()
                        < thickness * 2.0;
                    if major_x || major_z {
                        intensity *= 2.0;
                    }
                    if line_x && line_z {
                        intensity *= 1.6;
                    }
                    let glow = clamp01(intensity + (self.t * 2.5).sin() * 0.3 + scan);
                    let ch = floor_glyph(line_x, line_z, major_x, major_z, glow);
                    grid.set(x as i32, y as i32, ch, floor.at(glow));
                } else if ((y as f32) * 0.3 + self.t * 5.0).sin() > 0.95 {
                    grid.set(x as i32, y as i32, '▁', floor.at(0.2));
                }
            }
        }
    }

    fn paint_shapes(&self, grid: &mut Grid) {
        for (i, s) in self.shapes.iter().enumerate() {
            let glyph = if (s.rotation * 4.0) as i32 % 2 == 1 {
                match s.glyph {
                    '◆' => '◇',
                    '▲' => '▼',
                    '■' => '▪',
                    g => g,
                }
            } else {
                s.glyph
            };
            let shimmer = 0.7 + ((s.age * 2.0 + i as f32).sin()) * 0.3;
            let fg = if shimmer < 0.5 { Rgb::gray(0x66) } else { s.color };
            grid.set(s.x as i32, s.y as i32, glyph, fg);
        }
    }

    fn paint_particles(&self, grid: &mut Grid) {
        for p in &self.particles {
            // Dying particles blink at frame rate.
            if p.life > 0.5 || self.frame % 2 == 0 {
                grid.set(p.x as i32, p.y as i32, p.glyph, p.color);
            }
        }
    }
}

fn sky_glyph(v: f32, x: usize, y: usize) -> char {
    if v < 0.1 {
        '█'
    } else if v < 0.25 {
        '▓'
    } else if v < 0.45 {
        '▒'
    } else if v < 0.65 {
        '░'
    } else if v < 0.85 && (x + y) % 3 == 0 {
        '·'
    } else {
        ' '
    }
}

fn floor_glyph(line_x: bool, line_z: bool, major_x: bool, major_z: bool, glow: f32) -> char {
    if line_x && line_z {
        if major_x && major_z {
            '╬'
        } else if major_x || major_z {
            '┼'
        } else {
            '+'
        }
    } else if line_x {
        if major_x {
            '┃'
        } else {
            '|'
        }
    } else if line_z {
        if major_z {
            '━'
        } else {
            '─'
        }
    } else if glow > 0.9 {
        '▓'
    } else {
        '░'
    }
}

impl Scene for Vaporwave {
    fn title(&self) -> &str {
        "vaporwave"
    }

    fn advance(&mut self, dt: f32) {
        let step = dt * 30.0;
        self.frame = self.frame.wrapping_add(1);
        self.t += 0.05 * self.speed * step;

        let ceiling = self.rows as f32 / 3.0;
        for (i, s) in self.shapes.iter_mut().enumerate() {
            s.x += s.vx * self.speed;
            s.y += s.vy * self.speed;
            s.rotation += s.rot_speed * self.speed;
            s.age += 0.01;
            s.y += (s.age * 2.0 + i as f32).sin() * 0.1;

            if s.x < 0.0 {
                s.x = self.cols as f32;
            } else if s.x > self.cols as f32 {
                s.x = 0.0;
            }
            if s.y < 0.0 {
                s.y = ceiling;
            } else if s.y > ceiling {
                s.y = 0.0;
            }
        }

        if self.show_haze {
            self.emit_particles();
            let (w, h) = (self.cols as f32, self.rows as f32);
            let survivors: Vec<Particle> = self
                .particles
                .iter()
                .copied()
                .map(|mut p| {
                    p.x += p.vx * self.speed;
                    p.y += p.vy * self.speed;
                    p.life -= 0.02;
                    p
                })
                .filter(|p| p.life > 0.0 && p.x >= 0.0 && p.x < w && p.y >= 0.0 && p.y < h)
                .collect();
            self.particles = survivors;
        }
    }

    fn render(&self, grid: &mut Grid) {
        self.paint_sky(grid);
        self.paint_sun(grid);
        self.paint_floor(grid);
        if self.show_shapes {
            self.paint_shapes(grid);
        }
        if self.show_haze {
            self.paint_particles(grid);
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c @ '1'..='4') => {
                let new = c as usize - '1' as usize;
                if new != self.theme {
                    self.theme = new;
                    self.spawn_shapes();
                }
                true
            }
            KeyCode::Char('s') => {
                self.show_shapes = !self.show_shapes;
                true
            }
            KeyCode::Char('f') => {
                self.show_haze = !self.show_haze;
                true
            }
            KeyCode::Char('p') => {
                self.sun_pulse = !self.sun_pulse;
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
                self.grid_intensity = (self.grid_intensity - 0.2).max(GRID_MIN);
                true
            }
            KeyCode::Right => {
                self.grid_intensity = (self.grid_intensity + 0.2).min(GRID_MAX);
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.spawn_shapes();
        self.particles.clear();
    }

    fn reset(&mut self) {
        self.t = 0.0;
        self.frame = 0;
        self.rng = StdRng::seed_from_u64(self.seed);
        self.spawn_shapes();
        self.particles.clear();
    }

    fn status(&self) -> String {
        format!(
            "{} | speed {:.1} | grid {:.1}",
            self.theme().name,
            self.speed,
            self.grid_intensity
        )
    }

    fn help(&self) -> &str {
        "1-4 theme | s shapes | f haze | p pulse | arrows speed/grid"
    }
}

fn parse_args() -> stage::Options {
    let mut fps = 30;
    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--fps" => {
                if let Some(v) = it.next() {
                    fps = v.parse().unwrap_or(fps);
                }
            }
            "--help" | "-h" => {
                println!(
                    "vaporwave\n\nUSAGE:\n\tvaporwave [--fps 15..120]\n\nKEYS:\n\t1-4 theme | s shapes | f haze | p sun pulse\n\tarrows speed/grid | space pause | r reset | q quit"
                );
                std::process::exit(0);
            }
            _ => {}
        }
    }
    stage::Options::fps(fps)
}

fn main() {
    if let Err(e) = stage::run_with(Vaporwave::new(0xAE_57_7E_71), parse_args()) {
        eprintln!("vaporwave: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_is_idempotent_including_shapes() {
        let mut v = Vaporwave::new(42);
        for _ in 0..200 {
            v.advance(1.0 / 30.0);
        }
        v.reset();
        let once: Vec<(f32, f32)> = v.shapes.iter().map(|s| (s.x, s.y)).collect();
        v.reset();
        let twice: Vec<(f32, f32)> = v.shapes.iter().map(|s| (s.x, s.y)).collect();
        assert_eq!(once, twice);
        assert!(v.particles.is_empty());
    }

    #[test]
    fn shapes_stay_wrapped_into_the_sky_band() {
        let mut v = Vaporwave::new(7);
        v.resize(60, 24);
        for _ in 0..2000 {
            v.advance(1.0 / 30.0);
        }
        let ceiling = 24.0 / 3.0;
        for s in &v.shapes {
            assert!(s.x >= 0.0 && s.x <= 60.0);
            assert!(s.y >= 0.0 && s.y <= ceiling + 1.0);
        }
    }

    #[test]
    fn particle_population_bounded() {
        let mut v = Vaporwave::new(3);
        for _ in 0..5000 {
            v.advance(1.0 / 30.0);
        }
        assert!(v.particles.len() <= MAX_PARTICLES);
    }

    #[test]
    fn layers_paint_without_out_of_range_writes() {
        let mut v = Vaporwave::new(11);
        v.resize(40, 12);
        for _ in 0..60 {
            v.advance(1.0 / 30.0);
        }
        let mut g = Grid::new(40, 12, Rgb::BLACK);
        v.render(&mut g);
        let text = g.to_text();
        assert_eq!(text.split('\n').count(), 12);
    }
}
