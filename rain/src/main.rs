//! Matrix digital rain: one glyph stream per column, each with its own
//! speed and tail length.

use rand::{rngs::StdRng, Rng, SeedableRng};
use stage::{Grid, Rgb, Scene};

const CHARSET: &str = "ｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿﾀﾁﾂﾃﾄﾅﾆﾇﾈﾉﾊﾋﾌﾍﾎﾏﾐﾑﾒﾓﾔﾕﾖﾗﾘﾙﾚﾛﾜﾝ0123456789";

const SHADES: [Rgb; 5] = [
    Rgb::hex(0x00FF00),
    Rgb::hex(0x00CC00),
    Rgb::hex(0x009900),
    Rgb::hex(0x006600),
    Rgb::hex(0x003300),
];
const HEAD: Rgb = Rgb::WHITE;

struct Column {
    glyphs: Vec<char>,
    position: i32,
    speed: u32,
    length: i32,
}

struct Rain {
    columns: Vec<Column>,
    charset: Vec<char>,
    frame: u32,
    cols: usize,
    rows: usize,
    rng: StdRng,
}

/// Tail shade for a glyph `distance` rows behind the stream head.
fn shade_for(distance: i32, length: i32) -> Rgb {
    let idx = (distance * SHADES.len() as i32 / length.max(1)).clamp(0, SHADES.len() as i32 - 1);
    SHADES[idx as usize]
}

impl Rain {
    fn new() -> Self {
        let mut r = Rain {
            columns: Vec::new(),
            charset: CHARSET.chars().collect(),
            frame: 0,
            cols: 80,
            rows: 24,
            rng: StdRng::from_entropy(),
        };
        r.seed_columns();
        r
    }

    fn seed_columns(&mut self) {
        let rows = self.rows as i32;
        self.columns = (0..self.cols)
            .map(|_| {
                let mut glyphs = Vec::with_capacity(self.rows);
                for _ in 0..self.rows {
                    glyphs.push(self.charset[self.rng.gen_range(0..self.charset.len())]);
                }
                Column {
                    glyphs,
                    position: -self.rng.gen_range(0..rows.max(1)),
                    speed: self.rng.gen_range(1..=3),
                    length: self.rng.gen_range(5..rows.max(6) / 2 + 5),
                }
            })
            .collect();
    }
}

impl Scene for Rain {
    fn title(&self) -> &str {
        "rain"
    }

    fn advance(&mut self, _dt: f32) {
        self.frame = self.frame.wrapping_add(1);
        let rows = self.rows as i32;
        for col in self.columns.iter_mut() {
            if self.frame % col.speed != 0 {
                continue;
            }
            col.position += 1;

            if col.position - col.length > rows {
                col.position = -self.rng.gen_range(0..rows.max(1));
                col.speed = self.rng.gen_range(1..=3);
                col.length = self.rng.gen_range(5..rows.max(6) / 2 + 5);
            }

            // Flicker: occasionally rewrite one glyph in the stream.
            if self.rng.gen::<f32>() < 0.1 {
                let at = self.rng.gen_range(0..col.glyphs.len().max(1));
                col.glyphs[at] = self.charset[self.rng.gen_range(0..self.charset.len())];
            }
        }
    }

    fn render(&self, grid: &mut Grid) {
        for (x, col) in self.columns.iter().enumerate() {
            for y in 0..self.rows as i32 {
                if y < col.position - col.length || y >= col.position {
                    continue;
                }
                let distance = col.position - y;
                let fg = if distance == 1 {
                    HEAD
                } else {
                    shade_for(distance, col.length)
                };
                if let Some(ch) = col.glyphs.get(y as usize) {
                    grid.set(x as i32, y, *ch, fg);
                }
            }
        }
    }

    fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.seed_columns();
    }

    fn reset(&mut self) {
        self.seed_columns();
        self.frame = 0;
    }

    fn status(&self) -> String {
        format!("streams {}", self.columns.len())
    }
}

fn main() {
    if let Err(e) = stage::run(Rain::new()) {
        eprintln!("rain: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shade_index_always_in_range() {
        for length in 1..40 {
            for distance in 0..80 {
                let _ = shade_for(distance, length);
            }
        }
    }

    #[test]
    fn one_stream_per_column_after_resize() {
        let mut r = Rain::new();
        r.rng = StdRng::seed_from_u64(5);
        r.resize(33, 17);
        assert_eq!(r.columns.len(), 33);
        assert!(r.columns.iter().all(|c| c.glyphs.len() == 17));
    }

    #[test]
    fn streams_recycle_after_leaving_the_screen() {
        let mut r = Rain::new();
        r.rng = StdRng::seed_from_u64(9);
        r.resize(10, 12);
        for _ in 0..2000 {
            r.advance(1.0 / 30.0);
        }
        for c in &r.columns {
            assert!(c.position - c.length <= 12);
            assert!((1..=3).contains(&c.speed));
        }
    }
}
