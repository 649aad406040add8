//! Droplet pond: falling droplets raise expanding rings on a surface
//! field, over a gently rolling waterline.

use rand::{rngs::StdRng, Rng, SeedableRng};
use stage::{hash01, Grid, KeyCode, Rgb, Scene};

const MAX_DROPLETS: usize = 150;
const MAX_RIPPLES_PER_DROPLET: usize = 5;
const GRAVITY_MIN: f32 = 0.1;
const GRAVITY_MAX: f32 = 1.0;
const VISCOSITY_MIN: f32 = 0.90;
const VISCOSITY_MAX: f32 = 0.99;
const WATERLINE_DEPTH: f32 = 8.0;

#[derive(Clone, Copy)]
struct Ripple {
    x: f32,
    y: f32,
    radius: f32,
    strength: f32,
}

#[derive(Clone)]
struct Droplet {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    life: f32,
    size: f32,
    ripples: Vec<Ripple>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EmitMode {
    Rain,
    Drops,
    Fountain,
}

const EMIT_MODES: [EmitMode; 3] = [EmitMode::Rain, EmitMode::Drops, EmitMode::Fountain];

impl EmitMode {
    fn name(self) -> &'static str {
        match self {
            EmitMode::Rain => "rain",
            EmitMode::Drops => "drops",
            EmitMode::Fountain => "fountain",
        }
    }
}

struct Ripples {
    droplets: Vec<Droplet>,
    surface: Vec<f32>,
    t: f32,
    gravity: f32,
    viscosity: f32,
    mode: EmitMode,
    cols: usize,
    rows: usize,
    rng: StdRng,
}

impl Ripples {
    fn new() -> Self {
        Ripples {
            droplets: Vec::new(),
            surface: vec![0.0; 80 * 24],
            t: 0.0,
            gravity: 0.3,
            viscosity: 0.98,
            mode: EmitMode::Rain,
            cols: 80,
            rows: 24,
            rng: StdRng::from_entropy(),
        }
    }

    fn add_droplet(&mut self, x: f32, y: f32, vx: f32, vy: f32, size: f32) {
        if self.droplets.len() < MAX_DROPLETS {
            self.droplets.push(Droplet {
                x,
                y,
                vx,
                vy,
                life: 1.0,
                size,
                ripples: Vec::new(),
            });
        }
    }

    fn emit(&mut self) {
        let (w, h) = (self.cols as f32, self.rows as f32);
        match self.mode {
            EmitMode::Rain => {
                if self.rng.gen::<f32>() < 0.3 {
                    let x = self.rng.gen::<f32>() * w;
                    let size = 0.5 + self.rng.gen::<f32>() * 0.5;
                    let vx = (self.rng.gen::<f32>() - 0.5) * 0.5;
                    self.add_droplet(x, 0.0, vx, 0.0, size);
                }
            }
            EmitMode::Drops => {
                if self.rng.gen::<f32>() < 0.1 {
                    let x = self.rng.gen::<f32>() * w;
                    let y = self.rng.gen::<f32>() * h / 2.0;
                    let vx = (self.rng.gen::<f32>() - 0.5) * 2.0;
                    let vy = self.rng.gen::<f32>() * 2.0;
                    let size = 0.3 + self.rng.gen::<f32>() * 0.4;
                    self.add_droplet(x, y, vx, vy, size);
                }
            }
            EmitMode::Fountain => {
                if self.rng.gen::<f32>() < 0.4 {
                    let x = w / 2.0 + (self.rng.gen::<f32>() - 0.5) * 10.0;
                    let vx = (self.rng.gen::<f32>() - 0.5) * 3.0;
                    let vy = -3.0 - self.rng.gen::<f32>() * 2.0;
                    let size = 0.4 + self.rng.gen::<f32>() * 0.3;
                    self.add_droplet(x, h - 5.0, vx, vy, size);
                }
            }
        }
    }

    fn step_droplets(&mut self) {
        let (w, h) = (self.cols as f32, self.rows as f32);
        let gravity = self.gravity;
        let viscosity = self.viscosity;

        let mut survivors: Vec<Droplet> = Vec::with_capacity(self.droplets.len());
        for d in self.droplets.iter() {
            let mut d = d.clone();
            d.vy += gravity;
            d.x += d.vx;
            d.y += d.vy;
            d.life -= 0.01;

            let mut rings: Vec<Ripple> = Vec::with_capacity(d.ripples.len());
            for r in d.ripples.iter() {
                let mut r = *r;
                r.radius += 0.5;
                r.strength *= viscosity;
                if r.strength > 0.01 && r.radius < 20.0 {
                    rings.push(r);
                }
            }
            d.ripples = rings;

            // Surface impact: spawn a ring and skip back up with a loss.
            if d.y >= h - 10.0 && d.vy > 0.0 {
                if d.ripples.len() < MAX_RIPPLES_PER_DROPLET {
                    let impact = (d.vy.abs() * d.size).min(2.0);
                    d.ripples.push(Ripple {
                        x: d.x,
                        y: d.y,
                        radius: 0.0,
                        strength: impact,
                    });
                }
                d.vy = -d.vy * 0.3;
                d.vx *= 0.7;
                d.life -= 0.2;
            }

            if d.x < 0.0 || d.x >= w {
                d.vx = -d.vx * 0.8;
                d.x = d.x.max(0.0).min(w - 1.0);
            }

            if d.life > 0.0 && d.y < h {
                survivors.push(d);
            }
        }
        self.droplets = survivors;
    }

    /// Rebuild the surface field from live rings plus the base waterline.
    fn rebuild_surface(&mut self) {
        self.surface.fill(0.0);
        let (w, h) = (self.cols, self.rows);

        let rings: Vec<Ripple> = self
            .droplets
            .iter()
            .flat_map(|d| d.ripples.iter().copied())
            .collect();
        for r in rings {
            let radius = r.radius as i32;
            let (cx, cy) = (r.x as i32, r.y as i32);
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let (x, y) = (cx + dx, cy + dy);
                    if x < 0 || y < 0 || x >= w as i32 || y >= h as i32 {
                        continue;
                    }
                    let dist = ((dx * dx + dy * dy) as f32).sqrt();
                    if dist <= r.radius {
                        let height =
                            r.strength * (dist * std::f32::consts::PI / (r.radius * 2.0).max(0.5)).cos();
                        if height > 0.0 {
                            let i = y as usize * w + x as usize;
                            self.surface[i] = self.surface[i].max(height);
                        }
                    }
                }
            }
        }

        let waterline = h as f32 - WATERLINE_DEPTH;
        for x in 0..w {
            let wave = (x as f32 * 0.2 + self.t * 2.0).sin() * 0.5
                + (x as f32 * 0.1 + self.t * 1.5).sin() * 0.3;
            let y = (waterline + wave) as i32;
            if y >= 0 && (y as usize) < h {
                let i = y as usize * w + x as usize;
                self.surface[i] = self.surface[i].max(0.3);
            }
        }
    }
}

impl Scene for Ripples {
    fn title(&self) -> &str {
        "ripples"
    }

    fn advance(&mut self, _dt: f32) {
        self.t += 0.1;
        self.emit();
        self.step_droplets();
        self.rebuild_surface();
    }

    fn render(&self, grid: &mut Grid) {
        let (w, h) = (self.cols, self.rows);
        let waterline = h as f32 - WATERLINE_DEPTH;

        for y in 0..h.min(grid.rows()) {
            for x in 0..w.min(grid.cols()) {
                let v = self.surface[y * w + x];
                if v > 0.0 {
                    let pick = (hash01(x as u32, y as u32, 11) * 3.0) as usize % 3;
                    let (chars, color) = if v > 0.6 {
                        (['█', '▓', '▒'], Rgb::hex(0x0066CC))
                    } else if v > 0.3 {
                        (['▒', '░', '▫'], Rgb::hex(0x0088FF))
                    } else {
                        (['░', '▫', '·'], Rgb::hex(0x00AAFF))
                    };
                    grid.set(x as i32, y as i32, chars[pick], color);
                } else if y as f32 >= waterline {
                    grid.set(x as i32, y as i32, '░', Rgb::hex(0x003366));
                }
            }
        }

        for d in &self.droplets {
            let (ch, fg) = if d.size > 0.7 {
                ('●', Rgb::hex(0x3498db))
            } else {
                ('•', Rgb::hex(0x00CED1))
            };
            grid.set(d.x as i32, d.y as i32, ch, fg);
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c @ '1'..='3') => {
                self.mode = EMIT_MODES[c as usize - '1' as usize];
                true
            }
            KeyCode::Up => {
                self.gravity = (self.gravity + 0.1).min(GRAVITY_MAX);
                true
            }
            KeyCode::Down => {
                self.gravity = (self.gravity - 0.1).max(GRAVITY_MIN);
                true
            }
            KeyCode::Left => {
                self.viscosity = (self.viscosity - 0.01).max(VISCOSITY_MIN);
                true
            }
            KeyCode::Right => {
                self.viscosity = (self.viscosity + 0.01).min(VISCOSITY_MAX);
                true
            }
            KeyCode::Char('c') => {
                self.add_droplet(self.cols as f32 / 2.0, 5.0, 0.0, 0.0, 1.0);
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.surface = vec![0.0; cols * rows];
        self.droplets.clear();
    }

    fn reset(&mut self) {
        self.droplets.clear();
        self.surface.fill(0.0);
        self.t = 0.0;
    }

    fn status(&self) -> String {
        format!(
            "mode {} | droplets {} | gravity {:.1} | viscosity {:.2}",
            self.mode.name(),
            self.droplets.len(),
            self.gravity,
            self.viscosity
        )
    }

    fn help(&self) -> &str {
        "1-3 mode | up/down gravity | left/right viscosity | c drop"
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
                    "ripples\n\nUSAGE:\n\tripples [--fps 15..120]\n\nKEYS:\n\t1 rain | 2 drops | 3 fountain | c add droplet\n\tup/down gravity | left/right viscosity\n\tspace pause | r reset | q quit"
                );
                std::process::exit(0);
            }
            _ => {}
        }
    }
    stage::Options::fps(fps)
}

fn main() {
    if let Err(e) = stage::run_with(Ripples::new(), parse_args()) {
        eprintln!("ripples: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_pond() -> Ripples {
        let mut r = Ripples::new();
        r.rng = StdRng::seed_from_u64(12);
        r.resize(40, 20);
        r
    }

    #[test]
    fn impact_spawns_a_ring_and_reverses_the_droplet() {
        let mut r = still_pond();
        r.droplets.push(Droplet {
            x: 20.0,
            y: 12.0,
            vx: 0.0,
            vy: 3.0,
            life: 1.0,
            size: 1.0,
            ripples: Vec::new(),
        });
        r.step_droplets();
        let d = &r.droplets[0];
        assert_eq!(d.ripples.len(), 1);
        assert!(d.vy < 0.0);
        assert!(d.ripples[0].strength > 0.0);
    }

    #[test]
    fn rings_expand_and_are_culled_at_the_radius_cap() {
        let mut r = still_pond();
        r.gravity = GRAVITY_MIN;
        r.droplets.push(Droplet {
            x: 20.0,
            y: 18.0,
            vx: 0.0,
            vy: 0.0,
            life: 50.0,
            size: 1.0,
            ripples: vec![Ripple {
                x: 20.0,
                y: 18.0,
                radius: 0.0,
                strength: 2.0,
            }],
        });

        let mut max_radius: f32 = 0.0;
        let mut ring_died = false;
        let mut prev_count = 1;
        for _ in 0..300 {
            r.step_droplets();
            let Some(d) = r.droplets.first() else { break };
            for ring in &d.ripples {
                assert!(ring.radius < 20.5);
                max_radius = max_radius.max(ring.radius);
            }
            if d.ripples.len() < prev_count {
                ring_died = true;
            }
            prev_count = d.ripples.len();
        }
        assert!(max_radius > 5.0);
        assert!(ring_died);
    }

    #[test]
    fn waterline_always_painted_after_rebuild() {
        let mut r = still_pond();
        r.rebuild_surface();
        let marked = r.surface.iter().filter(|&&v| v > 0.0).count();
        assert!(marked >= r.cols / 2);
    }

    #[test]
    fn droplet_cap_respected() {
        let mut r = still_pond();
        for _ in 0..400 {
            r.add_droplet(1.0, 1.0, 0.0, 0.0, 0.5);
        }
        assert_eq!(r.droplets.len(), MAX_DROPLETS);
    }
}
