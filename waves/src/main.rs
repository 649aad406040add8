//! Layered sine waves over a water fill. Waves can be stacked and peeled
//! off at runtime.

use std::f32::consts::{PI, TAU};

use stage::{mix, Gradient, Grid, KeyCode, Rgb, Scene};

const MAX_WAVES: usize = 5;

const BLUE: Rgb = Rgb::hex(0x3498db);

#[derive(Clone, Copy)]
struct Wave {
    amplitude: f32,
    frequency: f32,
    phase: f32,
    speed: f32,
}

fn initial_waves() -> Vec<Wave> {
    vec![
        Wave { amplitude: 0.3, frequency: 0.05, phase: 0.0, speed: 0.05 },
        Wave { amplitude: 0.2, frequency: 0.08, phase: PI / 3.0, speed: 0.08 },
        Wave { amplitude: 0.25, frequency: 0.03, phase: PI / 2.0, speed: 0.03 },
    ]
}

struct Waves {
    t: f32,
    waves: Vec<Wave>,
    crest: Gradient,
}

impl Waves {
    fn new() -> Self {
        Waves {
            t: 0.0,
            waves: initial_waves(),
            crest: Gradient::new(&[
                Rgb::hex(0x001f3f),
                Rgb::hex(0x003d7a),
                Rgb::hex(0x0059b3),
                Rgb::hex(0x0074d9),
                Rgb::hex(0x4192ff),
                Rgb::hex(0x7abfff),
                Rgb::hex(0xb3d9ff),
            ]),
        }
    }

    /// Combined surface height at a normalized x, centered on 0.5.
    fn height(&self, nx: f32) -> f32 {
        let mut h = 0.5;
        for w in &self.waves {
            h += w.amplitude * (TAU * (w.frequency * nx * 80.0 + w.speed * self.t) + w.phase).sin();
        }
        h
    }
}

impl Scene for Waves {
    fn title(&self) -> &str {
        "waves"
    }

    fn advance(&mut self, dt: f32) {
        self.t += dt * 30.0 * 0.05;
    }

    fn render(&self, grid: &mut Grid) {
        let rows = grid.rows();
        let cols = grid.cols();
        for y in 0..rows {
            let ny = y as f32 / (rows.saturating_sub(1).max(1)) as f32;
            for x in 0..cols {
                let nx = x as f32 / (cols.saturating_sub(1).max(1)) as f32;
                let h = self.height(nx);
                let surface = 0.5 - h / 2.0;

                if (ny - surface).abs() < 0.05 {
                    // Crest band, colored by total height.
                    grid.set(x as i32, y as i32, '█', self.crest.at((h + 1.0) / 2.0));
                } else if ny > surface {
                    let ch = if (x as f32 + self.t * 10.0).rem_euclid(3.0) < 1.0 {
                        '▒'
                    } else {
                        '░'
                    };
                    grid.set(x as i32, y as i32, ch, mix(Rgb::BLACK, BLUE, 0.55));
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('a') => {
                if self.waves.len() < MAX_WAVES {
                    // Derive the new layer from the clock so repeated adds differ.
                    self.waves.push(Wave {
                        amplitude: 0.1 + self.t.rem_euclid(0.3),
                        frequency: 0.02 + self.t.rem_euclid(0.08),
                        phase: self.t,
                        speed: 0.02 + self.t.rem_euclid(0.06),
                    });
                }
                true
            }
            KeyCode::Char('d') | KeyCode::Backspace => {
                if self.waves.len() > 1 {
                    self.waves.pop();
                }
                true
            }
            _ => false,
        }
    }

    fn reset(&mut self) {
        self.t = 0.0;
        self.waves = initial_waves();
    }

    fn status(&self) -> String {
        format!("waves {}", self.waves.len())
    }

    fn help(&self) -> &str {
        "a add wave | d remove"
    }
}

fn main() {
    if let Err(e) = stage::run(Waves::new()) {
        eprintln!("waves: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_bounded_by_total_amplitude() {
        let mut w = Waves::new();
        for _ in 0..500 {
            w.advance(1.0 / 30.0);
        }
        let bound: f32 = 0.5 + w.waves.iter().map(|v| v.amplitude).sum::<f32>();
        for i in 0..200 {
            let h = w.height(i as f32 / 200.0);
            assert!(h <= bound + 1e-4 && h >= 1.0 - bound - 1e-4);
        }
    }

    #[test]
    fn layer_count_clamped() {
        let mut w = Waves::new();
        for _ in 0..10 {
            w.handle_key(KeyCode::Char('a'));
        }
        assert_eq!(w.waves.len(), MAX_WAVES);
        for _ in 0..10 {
            w.handle_key(KeyCode::Char('d'));
        }
        assert_eq!(w.waves.len(), 1);
    }

    #[test]
    fn reset_restores_three_layers() {
        let mut w = Waves::new();
        w.handle_key(KeyCode::Char('a'));
        w.advance(1.0);
        w.reset();
        assert_eq!(w.waves.len(), 3);
        assert_eq!(w.t, 0.0);
    }
}
