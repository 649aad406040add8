//! Mandelbrot explorer: auto-zoom toward a chosen boundary point, with an
//! iteration budget that deepens as the view narrows.

use stage::{Grid, KeyCode, Rgb, Scene};

const ITER_MIN: u32 = 20;
const ITER_MAX: u32 = 200;
// Past this magnification f64 pixel spacing is long gone; start over.
// The exact bound is arbitrary, it only has to stop the runaway zoom.
const ZOOM_RESET: f64 = 1e12;

struct Target {
    name: &'static str,
    re: f64,
    im: f64,
    start_re: f64,
    start_im: f64,
}

const TARGETS: [Target; 4] = [
    Target { name: "spirals", re: -0.7463, im: 0.1102, start_re: -0.75, start_im: 0.1 },
    Target { name: "bulb edge", re: -0.16, im: 1.0405, start_re: -0.2, start_im: 1.0 },
    Target { name: "seahorse valley", re: -0.74529, im: 0.11307, start_re: -0.75, start_im: 0.11 },
    Target { name: "feather", re: -0.235125, im: 0.827215, start_re: -0.24, start_im: 0.83 },
];

struct MandelZoom {
    center_re: f64,
    center_im: f64,
    zoom: f64,
    max_iter: u32,
    auto_zoom: bool,
    target: usize,
}

impl MandelZoom {
    fn new() -> Self {
        MandelZoom {
            center_re: -0.75,
            center_im: 0.1,
            zoom: 1.0,
            max_iter: 80,
            auto_zoom: true,
            target: 0,
        }
    }

    fn go_to(&mut self, target: usize) {
        self.target = target;
        let t = &TARGETS[target];
        self.center_re = t.start_re;
        self.center_im = t.start_im;
        self.zoom = 1.0;
        self.max_iter = 80;
    }

    fn iterations(&self, cre: f64, cim: f64) -> u32 {
        let mut zre = 0.0f64;
        let mut zim = 0.0f64;
        for i in 0..self.max_iter {
            if zre * zre + zim * zim > 4.0 {
                return i;
            }
            let next_re = zre * zre - zim * zim + cre;
            zim = 2.0 * zre * zim + cim;
            zre = next_re;
        }
        self.max_iter
    }
}

/// Escape-count to glyph and color on a log scale; points in the set stay
/// solid black.
fn pixel(iterations: u32, max_iter: u32) -> (char, Rgb) {
    if iterations >= max_iter {
        return ('█', Rgb::BLACK);
    }
    let log_ratio = ((iterations + 1) as f64).ln() / ((max_iter + 1) as f64).ln();
    let cycle = iterations as usize;

    if log_ratio < 0.15 {
        (['█', '▓', '▒'][cycle % 3], Rgb::hex(0xFF0000))
    } else if log_ratio < 0.3 {
        (['▒', '░', '▫'][cycle % 3], Rgb::hex(0xFF4400))
    } else if log_ratio < 0.45 {
        (['▫', '•', '◦'][cycle % 3], Rgb::hex(0xFF8800))
    } else if log_ratio < 0.6 {
        (['◦', '∘', '·'][cycle % 3], Rgb::hex(0xFFCC00))
    } else if log_ratio < 0.75 {
        (['·', '.', ' '][cycle % 3], Rgb::hex(0x88FF00))
    } else if log_ratio < 0.85 {
        (' ', Rgb::hex(0x00FF88))
    } else if log_ratio < 0.95 {
        (' ', Rgb::hex(0x0088FF))
    } else {
        (' ', Rgb::hex(0x8800FF))
    }
}

impl Scene for MandelZoom {
    fn title(&self) -> &str {
        "mandelzoom"
    }

    fn advance(&mut self, _dt: f32) {
        if !self.auto_zoom {
            return;
        }
        let t = &TARGETS[self.target];
        self.zoom *= 1.03;
        self.center_re += (t.re - self.center_re) * 0.01;
        self.center_im += (t.im - self.center_im) * 0.01;

        if self.zoom > 100.0 && self.max_iter < 150 {
            self.max_iter += 1;
        }
        if self.zoom > ZOOM_RESET {
            let target = self.target;
            self.go_to(target);
        }
    }

    fn render(&self, grid: &mut Grid) {
        let (cols, rows) = (grid.cols(), grid.rows());
        let aspect = cols as f64 / rows.max(1) as f64 * 2.0;
        let scale = 3.0 / self.zoom;

        let min_re = self.center_re - scale * aspect / 2.0;
        let max_re = self.center_re + scale * aspect / 2.0;
        let min_im = self.center_im - scale / 2.0;
        let max_im = self.center_im + scale / 2.0;

        for y in 0..rows {
            // Imaginary axis points up on screen.
            let cim = max_im - y as f64 * (max_im - min_im) / rows as f64;
            for x in 0..cols {
                let cre = min_re + x as f64 * (max_re - min_re) / cols as f64;
                let (ch, fg) = pixel(self.iterations(cre, cim), self.max_iter);
                grid.set(x as i32, y as i32, ch, fg);
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('a') => {
                self.auto_zoom = !self.auto_zoom;
                true
            }
            KeyCode::Char(c @ '1'..='4') => {
                self.go_to(c as usize - '1' as usize);
                true
            }
            KeyCode::Char('i') => {
                self.max_iter = (self.max_iter + 10).min(ITER_MAX);
                true
            }
            KeyCode::Char('d') => {
                self.max_iter = self.max_iter.saturating_sub(10).max(ITER_MIN);
                true
            }
            KeyCode::Up if !self.auto_zoom => {
                self.center_im += 0.1 / self.zoom;
                true
            }
            KeyCode::Down if !self.auto_zoom => {
                self.center_im -= 0.1 / self.zoom;
                true
            }
            KeyCode::Left if !self.auto_zoom => {
                self.center_re -= 0.1 / self.zoom;
                true
            }
            KeyCode::Right if !self.auto_zoom => {
                self.center_re += 0.1 / self.zoom;
                true
            }
            KeyCode::Char('+') | KeyCode::Char('=') if !self.auto_zoom => {
                self.zoom *= 1.2;
                true
            }
            KeyCode::Char('-') if !self.auto_zoom => {
                self.zoom = (self.zoom / 1.2).max(0.1);
                true
            }
            _ => false,
        }
    }

    fn reset(&mut self) {
        let target = self.target;
        self.go_to(target);
    }

    fn status(&self) -> String {
        format!(
            "{} | center ({:.6}, {:.6}) | zoom {:.2e} | iter {} | {}",
            TARGETS[self.target].name,
            self.center_re,
            self.center_im,
            self.zoom,
            self.max_iter,
            if self.auto_zoom { "auto" } else { "manual" }
        )
    }

    fn help(&self) -> &str {
        "a auto/manual | 1-4 target | arrows move | +/- zoom | i/d iter"
    }
}

fn parse_args() -> stage::Options {
    let mut fps = 15;
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
                    "mandelzoom\n\nUSAGE:\n\tmandelzoom [--fps 15..120]\n\nKEYS:\n\ta auto/manual | 1-4 zoom target | arrows move | +/- zoom | i/d iterations\n\tspace pause | r reset | q quit"
                );
                std::process::exit(0);
            }
            _ => {}
        }
    }
    stage::Options::fps(fps)
}

fn main() {
    if let Err(e) = stage::run_with(MandelZoom::new(), parse_args()) {
        eprintln!("mandelzoom: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_in_the_set() {
        let m = MandelZoom::new();
        assert_eq!(m.iterations(0.0, 0.0), m.max_iter);
    }

    #[test]
    fn far_points_escape_immediately() {
        let m = MandelZoom::new();
        assert!(m.iterations(2.0, 2.0) <= 1);
    }

    #[test]
    fn pixel_mapping_covers_all_counts() {
        for max_iter in [ITER_MIN, 80, ITER_MAX] {
            for i in 0..=max_iter {
                let _ = pixel(i, max_iter);
            }
        }
        assert_eq!(pixel(80, 80).0, '█');
    }

    #[test]
    fn runaway_zoom_resets() {
        let mut m = MandelZoom::new();
        m.zoom = ZOOM_RESET * 2.0;
        m.advance(1.0 / 15.0);
        assert_eq!(m.zoom, 1.0);
        assert_eq!(m.max_iter, 80);
    }

    #[test]
    fn iteration_budget_clamped() {
        let mut m = MandelZoom::new();
        for _ in 0..100 {
            m.handle_key(KeyCode::Char('i'));
        }
        assert_eq!(m.max_iter, ITER_MAX);
        for _ in 0..100 {
            m.handle_key(KeyCode::Char('d'));
        }
        assert_eq!(m.max_iter, ITER_MIN);
    }

    #[test]
    fn auto_zoom_tracks_its_target() {
        let mut m = MandelZoom::new();
        let t = &TARGETS[0];
        let before = (m.center_re - t.re).abs();
        for _ in 0..100 {
            m.advance(1.0 / 15.0);
        }
        assert!((m.center_re - t.re).abs() < before);
    }
}
