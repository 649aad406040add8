//! Simulated audio analyzer: synthesized band energies smoothed into bars
//! with peak-hold markers.

use rand::{rngs::StdRng, Rng, SeedableRng};
use stage::{Gradient, Grid, KeyCode, Rgb, Scene};

const INTENSITY_MIN: f32 = 0.2;
const INTENSITY_MAX: f32 = 2.0;
const PEAK_HOLD_TICKS: u32 = 15;

#[derive(Clone, Copy, Default)]
struct Bar {
    height: f32,
    peak: f32,
    peak_age: u32,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Music,
    Bass,
    Electronic,
}

const MODES: [Mode; 3] = [Mode::Music, Mode::Bass, Mode::Electronic];

impl Mode {
    fn name(self) -> &'static str {
        match self {
            Mode::Music => "music",
            Mode::Bass => "bass",
            Mode::Electronic => "electronic",
        }
    }
}

struct Spectrum {
    bars: Vec<Bar>,
    t: f32,
    intensity: f32,
    mode: Mode,
    ramp: Gradient,
    rng: StdRng,
}

fn bar_count(cols: usize) -> usize {
    (cols / 2).clamp(16, 128)
}

impl Spectrum {
    fn new() -> Self {
        Spectrum {
            bars: vec![Bar::default(); bar_count(80)],
            t: 0.0,
            intensity: 1.0,
            mode: Mode::Music,
            ramp: Gradient::new(&[
                Rgb::hex(0x2ecc71),
                Rgb::hex(0xa3e635),
                Rgb::hex(0xf1c40f),
                Rgb::hex(0xFFA500),
                Rgb::hex(0xe74c3c),
            ]),
            rng: StdRng::from_entropy(),
        }
    }

    /// Synthesized band energy for a normalized frequency in [0, 1].
    fn target(&self, freq: f32) -> f32 {
        let t = self.t;
        let raw = match self.mode {
            Mode::Music => {
                let bass = (t * 0.5).sin() * (-freq * 2.0).exp();
                let mids = (t * 1.2 + freq * std::f32::consts::PI).sin()
                    * (-(freq - 0.3) * (freq - 0.3) * 10.0).exp();
                let treble = (t * 2.5 + freq * std::f32::consts::TAU).sin()
                    * (-(freq - 0.8) * (freq - 0.8) * 15.0).exp();
                bass + mids + treble
            }
            Mode::Bass => (t * 0.8).sin() * (-freq * 4.0).exp() * 1.5,
            Mode::Electronic => {
                let beat = (t * 4.0).sin();
                if beat > 0.7 {
                    1.0 - freq
                } else {
                    (t * 3.0 + freq * std::f32::consts::TAU * 2.0).sin() * (1.0 - freq) * 0.3
                }
            }
        };
        (raw * self.intensity).max(0.0)
    }
}

impl Scene for Spectrum {
    fn title(&self) -> &str {
        "spectrum"
    }

    fn advance(&mut self, _dt: f32) {
        self.t += 0.1;
        let n = self.bars.len().max(1);
        for i in 0..self.bars.len() {
            let freq = i as f32 / n as f32;
            let jitter = (self.rng.gen::<f32>() - 0.5) * 0.2 * self.intensity;
            let target = (self.target(freq) + jitter).max(0.0);

            let bar = &mut self.bars[i];
            bar.height += (target - bar.height) * 0.3;

            if bar.height > bar.peak {
                bar.peak = bar.height;
                bar.peak_age = 0;
            } else {
                bar.peak_age += 1;
                if bar.peak_age > PEAK_HOLD_TICKS {
                    bar.peak *= 0.95;
                }
            }
        }
    }

    fn render(&self, grid: &mut Grid) {
        let rows = grid.rows() as i32;
        for (i, bar) in self.bars.iter().enumerate() {
            let x = (i * 2) as i32;
            let h = (bar.height.min(1.2) * rows as f32) as i32;
            for dy in 0..h {
                let y = rows - 1 - dy;
                let frac = dy as f32 / rows as f32;
                let fg = self.ramp.at(frac);
                grid.set(x, y, '█', fg);
                grid.set(x + 1, y, '█', fg);
            }
            let peak_y = rows - 1 - (bar.peak.min(1.2) * rows as f32) as i32;
            if peak_y >= 0 && bar.peak > 0.05 {
                grid.set(x, peak_y, '▔', Rgb::WHITE);
                grid.set(x + 1, peak_y, '▔', Rgb::WHITE);
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c @ '1'..='3') => {
                self.mode = MODES[c as usize - '1' as usize];
                true
            }
            KeyCode::Up => {
                self.intensity = (self.intensity + 0.1).min(INTENSITY_MAX);
                true
            }
            KeyCode::Down => {
                self.intensity = (self.intensity - 0.1).max(INTENSITY_MIN);
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, cols: usize, _rows: usize) {
        let n = bar_count(cols);
        // Keep existing motion where the new layout overlaps the old.
        self.bars.resize(n, Bar::default());
    }

    fn reset(&mut self) {
        self.t = 0.0;
        for b in self.bars.iter_mut() {
            *b = Bar::default();
        }
    }

    fn status(&self) -> String {
        format!(
            "mode {} | intensity {:.1} | bands {}",
            self.mode.name(),
            self.intensity,
            self.bars.len()
        )
    }

    fn help(&self) -> &str {
        "1-3 mode | up/down intensity"
    }
}

fn main() {
    if let Err(e) = stage::run(Spectrum::new()) {
        eprintln!("spectrum: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_count_clamped() {
        assert_eq!(bar_count(10), 16);
        assert_eq!(bar_count(80), 40);
        assert_eq!(bar_count(500), 128);
    }

    #[test]
    fn targets_never_negative() {
        let mut s = Spectrum::new();
        s.rng = StdRng::seed_from_u64(8);
        for mode in MODES {
            s.mode = mode;
            for _ in 0..100 {
                s.t += 0.1;
                for i in 0..=20 {
                    assert!(s.target(i as f32 / 20.0) >= 0.0);
                }
            }
        }
    }

    #[test]
    fn peaks_ride_above_bars() {
        let mut s = Spectrum::new();
        s.rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            s.advance(1.0 / 30.0);
        }
        for b in &s.bars {
            assert!(b.peak >= b.height * 0.9);
        }
    }

    #[test]
    fn intensity_clamped() {
        let mut s = Spectrum::new();
        for _ in 0..100 {
            s.handle_key(KeyCode::Up);
        }
        assert!((s.intensity - INTENSITY_MAX).abs() < 1e-5);
        for _ in 0..100 {
            s.handle_key(KeyCode::Down);
        }
        assert!((s.intensity - INTENSITY_MIN).abs() < 1e-5);
    }
}
