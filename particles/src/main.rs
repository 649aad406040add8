//! Particle fountain: an emitter at the bottom center, gravity and wind,
//! per-particle life decay.

use rand::{rngs::StdRng, Rng, SeedableRng};
use stage::{mix, Grid, KeyCode, Rgb, Scene};

const MAX_PARTICLES: usize = 100;
const EMIT_PER_TICK: usize = 3;
const LIFE_DECAY: f32 = 0.02;
// A life at or below this is spent; a full life lasts exactly 50 ticks
// despite f32 accumulation.
const LIFE_EPS: f32 = 1e-6;

const WIND_MAX: f32 = 0.5;

const GLYPHS: [char; 8] = ['✦', '✧', '⋆', '◦', '•', '∘', '○', '◌'];
const COLORS: [Rgb; 4] = [
    Rgb::hex(0xf1c40f),
    Rgb::hex(0xFFA500),
    Rgb::hex(0xe74c3c),
    Rgb::hex(0xFF69B4),
];

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

struct Particles {
    particles: Vec<Particle>,
    emitting: bool,
    gravity: f32,
    wind: f32,
    cols: usize,
    rows: usize,
    rng: StdRng,
}

impl Particles {
    fn new() -> Self {
        Particles {
            particles: Vec::new(),
            emitting: true,
            gravity: 0.1,
            wind: 0.0,
            cols: 80,
            rows: 24,
            rng: StdRng::from_entropy(),
        }
    }

    fn emit(&mut self) {
        let p = Particle {
            x: self.cols as f32 / 2.0,
            y: self.rows as f32 - 3.0,
            vx: (self.rng.gen::<f32>() - 0.5) * 3.0,
            vy: -self.rng.gen::<f32>() * 2.0 - 1.0,
            life: 1.0,
            glyph: GLYPHS[self.rng.gen_range(0..GLYPHS.len())],
            color: COLORS[self.rng.gen_range(0..COLORS.len())],
        };
        self.particles.push(p);
    }

    fn step(&mut self) {
        if self.emitting && self.particles.len() < MAX_PARTICLES {
            for _ in 0..EMIT_PER_TICK {
                self.emit();
            }
        }

        let (w, h) = (self.cols as f32, self.rows as f32);
        let (gravity, wind) = (self.gravity, self.wind);
        // Survivors into a fresh set, relative order preserved.
        let survivors: Vec<Particle> = self
            .particles
            .iter()
            .copied()
            .map(|mut p| {
                p.vy += gravity;
                p.vx += wind;
                p.x += p.vx;
                p.y += p.vy;
                p.life -= LIFE_DECAY;
                p
            })
            .filter(|p| p.life > LIFE_EPS && p.y < h && p.x >= 0.0 && p.x < w)
            .collect();
        self.particles = survivors;
    }
}

impl Scene for Particles {
    fn title(&self) -> &str {
        "particles"
    }

    fn advance(&mut self, _dt: f32) {
        self.step();
    }

    fn render(&self, grid: &mut Grid) {
        for p in &self.particles {
            let fg = if p.life < 0.5 {
                mix(Rgb::BLACK, p.color, 0.5)
            } else {
                p.color
            };
            grid.set(p.x as i32, p.y as i32, p.glyph, fg);
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('e') => {
                self.emitting = !self.emitting;
                true
            }
            KeyCode::Char('g') => {
                self.gravity = -self.gravity;
                true
            }
            KeyCode::Left => {
                self.wind = (self.wind - 0.05).max(-WIND_MAX);
                true
            }
            KeyCode::Right => {
                self.wind = (self.wind + 0.05).min(WIND_MAX);
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
        self.particles.clear();
        self.emitting = true;
        self.gravity = 0.1;
        self.wind = 0.0;
    }

    fn status(&self) -> String {
        format!(
            "particles {} | gravity {:.1} | wind {:.2} | {}",
            self.particles.len(),
            self.gravity,
            self.wind,
            if self.emitting { "emitting" } else { "idle" }
        )
    }

    fn help(&self) -> &str {
        "e emit | g flip gravity | left/right wind"
    }
}

fn main() {
    if let Err(e) = stage::run(Particles::new()) {
        eprintln!("particles: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_scene() -> Particles {
        let mut p = Particles::new();
        p.emitting = false;
        p.gravity = 0.0;
        p.wind = 0.0;
        p.rng = StdRng::seed_from_u64(1);
        p
    }

    #[test]
    fn full_life_lasts_exactly_fifty_ticks() {
        let mut s = quiet_scene();
        s.particles.push(Particle {
            x: 40.0,
            y: 10.0,
            vx: 0.0,
            vy: 0.0,
            life: 1.0,
            glyph: '•',
            color: COLORS[0],
        });

        for tick in 1..=49 {
            s.step();
            assert_eq!(s.particles.len(), 1, "died early at tick {tick}");
        }
        s.step();
        assert!(s.particles.is_empty(), "survived past tick 50");
    }

    #[test]
    fn out_of_bounds_particles_are_culled() {
        let mut s = quiet_scene();
        s.particles.push(Particle {
            x: 0.5,
            y: 10.0,
            vx: -2.0,
            vy: 0.0,
            life: 1.0,
            glyph: '•',
            color: COLORS[0],
        });
        s.step();
        assert!(s.particles.is_empty());
    }

    #[test]
    fn survivor_pass_preserves_order() {
        let mut s = quiet_scene();
        for i in 0..5 {
            s.particles.push(Particle {
                x: 10.0 + i as f32,
                y: 10.0,
                vx: 0.0,
                vy: 0.0,
                life: if i == 2 { LIFE_DECAY / 2.0 } else { 1.0 },
                glyph: '•',
                color: COLORS[0],
            });
        }
        s.step();
        let xs: Vec<i32> = s.particles.iter().map(|p| p.x as i32).collect();
        assert_eq!(xs, vec![10, 11, 13, 14]);
    }

    #[test]
    fn population_capped() {
        let mut s = Particles::new();
        s.rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            s.step();
        }
        assert!(s.particles.len() <= MAX_PARTICLES + EMIT_PER_TICK);
    }
}
