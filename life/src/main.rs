//! Conway's Game of Life with age-colored cells and a handful of the
//! famous seed patterns.

use rand::{rngs::StdRng, Rng, SeedableRng};
use stage::{Grid, KeyCode, Rgb, Scene};

const INTERVAL_MIN: u32 = 2;
const INTERVAL_MAX: u32 = 30;

#[derive(Clone, Copy, Default, PartialEq)]
struct Cell {
    alive: bool,
    age: u32,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pattern {
    Random,
    Gliders,
    Oscillators,
    Spaceship,
    GosperGun,
}

const PATTERNS: [Pattern; 5] = [
    Pattern::Random,
    Pattern::Gliders,
    Pattern::Oscillators,
    Pattern::Spaceship,
    Pattern::GosperGun,
];

impl Pattern {
    fn name(self) -> &'static str {
        match self {
            Pattern::Random => "random",
            Pattern::Gliders => "gliders",
            Pattern::Oscillators => "oscillators",
            Pattern::Spaceship => "spaceship",
            Pattern::GosperGun => "gosper gun",
        }
    }
}

const GLIDER: [(usize, usize); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
const LWSS: [(usize, usize); 9] = [
    (1, 0), (4, 0), (0, 1), (0, 2), (4, 2), (0, 3), (1, 3), (2, 3), (3, 3),
];
const BEACON: [(usize, usize); 6] = [(0, 0), (1, 0), (0, 1), (3, 2), (2, 3), (3, 3)];
const GOSPER: [(usize, usize); 36] = [
    (1, 5), (1, 6), (2, 5), (2, 6),
    (11, 5), (11, 6), (11, 7), (12, 4), (12, 8), (13, 3), (13, 9), (14, 3), (14, 9),
    (15, 6), (16, 4), (16, 8), (17, 5), (17, 6), (17, 7), (18, 6),
    (21, 3), (21, 4), (21, 5), (22, 3), (22, 4), (22, 5), (23, 2), (23, 6),
    (25, 1), (25, 2), (25, 6), (25, 7),
    (35, 3), (35, 4), (36, 3), (36, 4),
];

struct Life {
    board: Vec<Cell>,
    cols: usize,
    rows: usize,
    generation: u64,
    frame: u32,
    interval: u32,
    pattern: Pattern,
    seed: u64,
}

impl Life {
    fn new(seed: u64) -> Self {
        let mut l = Life {
            board: Vec::new(),
            cols: 80,
            rows: 24,
            generation: 0,
            frame: 0,
            interval: 6,
            pattern: Pattern::Random,
            seed,
        };
        l.reseed();
        l
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    fn stamp(&mut self, cells: &[(usize, usize)], ox: usize, oy: usize) {
        for &(x, y) in cells {
            let (x, y) = (ox + x, oy + y);
            if x < self.cols && y < self.rows {
                let i = self.idx(x, y);
                self.board[i].alive = true;
            }
        }
    }

    /// Reseeding is deterministic per scene: the stored seed makes reset
    /// reproduce the exact same random board.
    fn reseed(&mut self) {
        self.board = vec![Cell::default(); self.cols * self.rows];
        self.generation = 0;
        self.frame = 0;
        match self.pattern {
            Pattern::Random => {
                let mut rng = StdRng::seed_from_u64(self.seed);
                for cell in self.board.iter_mut() {
                    cell.alive = rng.gen::<f64>() < 0.3;
                }
            }
            Pattern::Gliders => {
                for i in 0..3 {
                    self.stamp(&GLIDER, i * 20 + 5, i * 8 + 5);
                }
            }
            Pattern::Oscillators => {
                let (cx, cy) = (self.cols / 2, self.rows / 2);
                // Blinker.
                for dx in 0..3usize {
                    let x = (cx + dx).saturating_sub(1);
                    if x < self.cols {
                        let i = self.idx(x, cy);
                        self.board[i].alive = true;
                    }
                }
                // Toad above, beacon below.
                if cy >= 6 {
                    for i in 0..3 {
                        self.stamp(&[(0, 0)], cx + i, cy - 5);
                        self.stamp(&[(0, 0)], (cx + i).saturating_sub(1), cy - 4);
                    }
                }
                self.stamp(&BEACON, cx.saturating_sub(2), cy + 5);
            }
            Pattern::Spaceship => {
                self.stamp(&LWSS, 10, self.rows / 2);
            }
            Pattern::GosperGun => {
                if self.cols < 40 || self.rows < 15 {
                    // The gun needs room; fall back to a random soup.
                    let mut rng = StdRng::seed_from_u64(self.seed);
                    for cell in self.board.iter_mut() {
                        cell.alive = rng.gen::<f64>() < 0.3;
                    }
                } else {
                    self.stamp(&GOSPER, 0, 0);
                }
            }
        }
    }

    fn neighbors(&self, x: usize, y: usize) -> u32 {
        let mut count = 0;
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx >= 0
                    && ny >= 0
                    && (nx as usize) < self.cols
                    && (ny as usize) < self.rows
                    && self.board[ny as usize * self.cols + nx as usize].alive
                {
                    count += 1;
                }
            }
        }
        count
    }

    fn step(&mut self) {
        let mut next = vec![Cell::default(); self.cols * self.rows];
        for y in 0..self.rows {
            for x in 0..self.cols {
                let n = self.neighbors(x, y);
                let cell = self.board[self.idx(x, y)];
                let target = &mut next[y * self.cols + x];
                if cell.alive {
                    target.alive = n == 2 || n == 3;
                    if target.alive {
                        target.age = cell.age + 1;
                    }
                } else {
                    target.alive = n == 3;
                }
            }
        }
        self.board = next;
        self.generation += 1;
    }

    fn population(&self) -> usize {
        self.board.iter().filter(|c| c.alive).count()
    }
}

fn age_color(age: u32) -> Rgb {
    if age < 5 {
        Rgb::hex(0x2ecc71)
    } else if age < 15 {
        Rgb::hex(0xf1c40f)
    } else if age < 30 {
        Rgb::hex(0xFFA500)
    } else {
        Rgb::hex(0xe74c3c)
    }
}

impl Scene for Life {
    fn title(&self) -> &str {
        "life"
    }

    fn advance(&mut self, _dt: f32) {
        self.frame = self.frame.wrapping_add(1);
        if self.frame % self.interval == 0 {
            self.step();
        }
    }

    fn render(&self, grid: &mut Grid) {
        for y in 0..self.rows.min(grid.rows()) {
            for x in 0..self.cols.min(grid.cols()) {
                let cell = self.board[y * self.cols + x];
                if cell.alive {
                    grid.set(x as i32, y as i32, '●', age_color(cell.age));
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c @ '1'..='5') => {
                self.pattern = PATTERNS[c as usize - '1' as usize];
                self.reseed();
                true
            }
            KeyCode::Up => {
                self.interval = ((self.interval as f32 * 0.8) as u32).max(INTERVAL_MIN);
                true
            }
            KeyCode::Down => {
                self.interval = ((self.interval as f32 * 1.2) as u32 + 1).min(INTERVAL_MAX);
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.reseed();
    }

    fn reset(&mut self) {
        self.reseed();
    }

    fn status(&self) -> String {
        format!(
            "gen {} | pop {} | {} | every {} frames",
            self.generation,
            self.population(),
            self.pattern.name(),
            self.interval
        )
    }

    fn help(&self) -> &str {
        "1-5 pattern | up/down speed"
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
                    "life\n\nUSAGE:\n\tlife [--fps 15..120]\n\nKEYS:\n\t1 random | 2 gliders | 3 oscillators | 4 spaceship | 5 gosper gun\n\tup/down generation speed | space pause | r reset | q quit"
                );
                std::process::exit(0);
            }
            _ => {}
        }
    }
    stage::Options::fps(fps)
}

fn main() {
    if let Err(e) = stage::run_with(Life::new(0xC0FFEE), parse_args()) {
        eprintln!("life: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_board(cols: usize, rows: usize) -> Life {
        let mut l = Life::new(1);
        l.cols = cols;
        l.rows = rows;
        l.board = vec![Cell::default(); cols * rows];
        l
    }

    fn set_alive(l: &mut Life, cells: &[(usize, usize)]) {
        for &(x, y) in cells {
            let i = l.idx(x, y);
            l.board[i].alive = true;
        }
    }

    fn alive_set(l: &Life) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..l.rows {
            for x in 0..l.cols {
                if l.board[y * l.cols + x].alive {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn blinker_oscillates_with_period_two() {
        let mut l = empty_board(9, 9);
        set_alive(&mut l, &[(3, 4), (4, 4), (5, 4)]);
        l.step();
        assert_eq!(alive_set(&l), vec![(4, 3), (4, 4), (4, 5)]);
        l.step();
        assert_eq!(alive_set(&l), vec![(3, 4), (4, 4), (5, 4)]);
    }

    #[test]
    fn block_is_a_still_life() {
        let mut l = empty_board(8, 8);
        set_alive(&mut l, &[(3, 3), (4, 3), (3, 4), (4, 4)]);
        l.step();
        assert_eq!(alive_set(&l), vec![(3, 3), (4, 3), (3, 4), (4, 4)]);
    }

    #[test]
    fn survivor_ages_accumulate() {
        let mut l = empty_board(8, 8);
        set_alive(&mut l, &[(3, 3), (4, 3), (3, 4), (4, 4)]);
        for _ in 0..7 {
            l.step();
        }
        assert!(l.board.iter().filter(|c| c.alive).all(|c| c.age == 7));
    }

    #[test]
    fn random_reseed_is_deterministic_for_a_seed() {
        let mut l = Life::new(99);
        l.resize(40, 20);
        let first = alive_set(&l);
        for _ in 0..10 {
            l.step();
        }
        l.reset();
        assert_eq!(alive_set(&l), first);
        l.reset();
        assert_eq!(alive_set(&l), first);
    }

    #[test]
    fn interval_clamped() {
        let mut l = Life::new(1);
        for _ in 0..20 {
            l.handle_key(KeyCode::Up);
        }
        assert_eq!(l.interval, INTERVAL_MIN);
        for _ in 0..40 {
            l.handle_key(KeyCode::Down);
        }
        assert_eq!(l.interval, INTERVAL_MAX);
    }
}
