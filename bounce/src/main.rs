//! Bouncing balls under gravity, with damped wall reflection and fading
//! trails.

use stage::{mix, Grid, KeyCode, Rgb, Scene};

const MAX_BALLS: usize = 5;
const TRAIL_TICKS: u32 = 10;

const BALL_GLYPHS: [char; 4] = ['●', '○', '◉', '⬤'];
const BALL_COLORS: [Rgb; 5] = [
    Rgb::hex(0xe74c3c),
    Rgb::hex(0x3498db),
    Rgb::hex(0x2ecc71),
    Rgb::hex(0xf1c40f),
    Rgb::hex(0x9b59b6),
];

#[derive(Clone, Copy)]
struct TrailDot {
    x: f32,
    y: f32,
    age: u32,
    color: Rgb,
}

#[derive(Clone)]
struct Ball {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    glyph: char,
    color: Rgb,
    trail: Vec<TrailDot>,
}

/// Damped reflection off [0, max]: fold the overshoot back inside and flip
/// the velocity once.
fn reflect(pos: f32, vel: f32, max: f32, damping: f32) -> (f32, f32) {
    if pos < 0.0 {
        ((-pos).min(max), -vel * damping)
    } else if pos > max {
        ((2.0 * max - pos).max(0.0), -vel * damping)
    } else {
        (pos, vel)
    }
}

struct Bounce {
    balls: Vec<Ball>,
    gravity: f32,
    friction: f32,
    cols: usize,
    rows: usize,
}

fn first_ball() -> Ball {
    Ball {
        x: 40.0,
        y: 10.0,
        vx: 2.0,
        vy: 0.0,
        glyph: '●',
        color: BALL_COLORS[0],
        trail: Vec::new(),
    }
}

impl Bounce {
    fn new() -> Self {
        Bounce {
            balls: vec![first_ball()],
            gravity: 0.5,
            friction: 0.98,
            cols: 80,
            rows: 24,
        }
    }
}

impl Scene for Bounce {
    fn title(&self) -> &str {
        "bounce"
    }

    fn advance(&mut self, _dt: f32) {
        let w = self.cols as f32 - 1.0;
        let h = self.rows as f32 - 1.0;
        for ball in self.balls.iter_mut() {
            ball.trail.push(TrailDot {
                x: ball.x,
                y: ball.y,
                age: 0,
                color: ball.color,
            });
            let kept: Vec<TrailDot> = ball
                .trail
                .iter()
                .copied()
                .map(|mut d| {
                    d.age += 1;
                    d
                })
                .filter(|d| d.age < TRAIL_TICKS)
                .collect();
            ball.trail = kept;

            ball.vy += self.gravity;
            ball.x += ball.vx;
            ball.y += ball.vy;

            let (x, vx) = reflect(ball.x, ball.vx, w, self.friction);
            ball.x = x;
            ball.vx = vx;

            if ball.y < 0.0 {
                let (y, vy) = reflect(ball.y, ball.vy, h, self.friction);
                ball.y = y;
                ball.vy = vy;
            } else if ball.y > h {
                let (y, vy) = reflect(ball.y, ball.vy, h, self.friction);
                ball.y = y;
                ball.vy = vy;
                ball.vx *= self.friction;
                // Keep the floor lively; a settled ball gets kicked back up.
                if ball.vy.abs() < 0.5 {
                    ball.vy = -2.0;
                }
            }
        }
    }

    fn render(&self, grid: &mut Grid) {
        for ball in &self.balls {
            for dot in &ball.trail {
                let alpha = (TRAIL_TICKS - dot.age) as f32 / TRAIL_TICKS as f32;
                let ch = if alpha > 0.7 {
                    '•'
                } else if alpha > 0.4 {
                    '∘'
                } else {
                    '·'
                };
                let fg = if alpha < 0.5 {
                    mix(Rgb::BLACK, dot.color, 0.45)
                } else {
                    dot.color
                };
                grid.set(dot.x as i32, dot.y as i32, ch, fg);
            }
        }
        for ball in &self.balls {
            grid.set(ball.x as i32, ball.y as i32, ball.glyph, ball.color);
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('g') => {
                self.gravity = -self.gravity;
                true
            }
            KeyCode::Up => {
                if let Some(b) = self.balls.first_mut() {
                    b.vy -= 3.0;
                }
                true
            }
            KeyCode::Left => {
                if let Some(b) = self.balls.first_mut() {
                    b.vx -= 1.0;
                }
                true
            }
            KeyCode::Right => {
                if let Some(b) = self.balls.first_mut() {
                    b.vx += 1.0;
                }
                true
            }
            KeyCode::Char('a') => {
                if self.balls.len() < MAX_BALLS {
                    let n = self.balls.len();
                    self.balls.push(Ball {
                        x: self.cols as f32 / 2.0,
                        y: 5.0,
                        vx: (n as f32 - 2.5) * 0.8,
                        vy: 0.0,
                        glyph: BALL_GLYPHS[n % BALL_GLYPHS.len()],
                        color: BALL_COLORS[n % BALL_COLORS.len()],
                        trail: Vec::new(),
                    });
                }
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        let (w, h) = (cols as f32 - 1.0, rows as f32 - 1.0);
        for b in self.balls.iter_mut() {
            b.x = b.x.min(w).max(0.0);
            b.y = b.y.min(h).max(0.0);
        }
    }

    fn reset(&mut self) {
        self.balls = vec![first_ball()];
        self.gravity = 0.5;
        self.friction = 0.98;
    }

    fn status(&self) -> String {
        format!("balls {} | gravity {:.1}", self.balls.len(), self.gravity)
    }

    fn help(&self) -> &str {
        "up/left/right kick | a add ball | g flip gravity"
    }
}

fn main() {
    if let Err(e) = stage::run(Bounce::new()) {
        eprintln!("bounce: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflection_keeps_position_in_domain_and_flips_velocity_once() {
        let (x, vx) = reflect(-2.5, -3.0, 79.0, 1.0);
        assert!((0.0..=79.0).contains(&x));
        assert_eq!(vx, 3.0);

        let (x, vx) = reflect(81.0, 3.0, 79.0, 1.0);
        assert!((0.0..=79.0).contains(&x));
        assert_eq!(vx, -3.0);

        // Inside the domain nothing changes.
        let (x, vx) = reflect(40.0, 3.0, 79.0, 1.0);
        assert_eq!((x, vx), (40.0, 3.0));
    }

    #[test]
    fn damping_scales_reflected_velocity() {
        let (_, vx) = reflect(-1.0, -4.0, 79.0, 0.5);
        assert_eq!(vx, 2.0);
    }

    #[test]
    fn balls_stay_inside_after_many_ticks() {
        let mut b = Bounce::new();
        b.resize(60, 20);
        for _ in 0..3 {
            b.handle_key(KeyCode::Char('a'));
        }
        for _ in 0..2000 {
            b.advance(1.0 / 30.0);
        }
        for ball in &b.balls {
            assert!(ball.x >= 0.0 && ball.x <= 59.0);
            assert!(ball.y >= 0.0 && ball.y <= 19.0);
        }
    }

    #[test]
    fn trail_ages_out() {
        let mut b = Bounce::new();
        for _ in 0..100 {
            b.advance(1.0 / 30.0);
        }
        for ball in &b.balls {
            assert!(ball.trail.len() <= TRAIL_TICKS as usize);
            assert!(ball.trail.iter().all(|d| d.age < TRAIL_TICKS));
        }
    }
}
