//! Wireframe cube: rotate eight vertices, perspective-project, and draw the
//! twelve edges with Bresenham strokes.

use stage::{Grid, KeyCode, Rgb, Scene};

const SCALE_MIN: f32 = 2.0;
const SCALE_MAX: f32 = 20.0;
const PERSPECTIVE_MIN: f32 = 1.0;
const PERSPECTIVE_MAX: f32 = 10.0;

const EDGE_COLOR: Rgb = Rgb::hex(0x2ecc71);
const NEAR_VERTEX: Rgb = Rgb::hex(0xe74c3c);
const FAR_VERTEX: Rgb = Rgb::hex(0x3498db);

#[derive(Clone, Copy)]
struct Point3 {
    x: f32,
    y: f32,
    z: f32,
}

const VERTICES: [Point3; 8] = [
    Point3 { x: -1.0, y: -1.0, z: -1.0 },
    Point3 { x: 1.0, y: -1.0, z: -1.0 },
    Point3 { x: 1.0, y: 1.0, z: -1.0 },
    Point3 { x: -1.0, y: 1.0, z: -1.0 },
    Point3 { x: -1.0, y: -1.0, z: 1.0 },
    Point3 { x: 1.0, y: -1.0, z: 1.0 },
    Point3 { x: 1.0, y: 1.0, z: 1.0 },
    Point3 { x: -1.0, y: 1.0, z: 1.0 },
];

const EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0), // back face
    (4, 5), (5, 6), (6, 7), (7, 4), // front face
    (0, 4), (1, 5), (2, 6), (3, 7), // connectors
];

struct Cube {
    rx: f32,
    ry: f32,
    rz: f32,
    scale: f32,
    perspective: f32,
    auto_rotate: bool,
}

impl Cube {
    fn new() -> Self {
        Cube {
            rx: 0.0,
            ry: 0.0,
            rz: 0.0,
            scale: 8.0,
            perspective: 4.0,
            auto_rotate: true,
        }
    }

    fn rotate(&self, p: Point3) -> Point3 {
        let (sx, cx) = self.rx.sin_cos();
        let y1 = p.y * cx - p.z * sx;
        let z1 = p.y * sx + p.z * cx;

        let (sy, cy) = self.ry.sin_cos();
        let x2 = p.x * cy + z1 * sy;
        let z2 = -p.x * sy + z1 * cy;

        let (sz, cz) = self.rz.sin_cos();
        let x3 = x2 * cz - y1 * sz;
        let y3 = x2 * sz + y1 * cz;

        Point3 { x: x3, y: y3, z: z2 }
    }

    fn project(&self, p: Point3, cols: usize, rows: usize) -> (i32, i32) {
        let distance = (self.perspective + p.z).max(0.1);
        let sx = p.x * self.scale / distance + cols as f32 / 2.0;
        let sy = -p.y * self.scale / distance + rows as f32 / 2.0;
        (sx as i32, sy as i32)
    }
}

fn stroke_glyph(x0: i32, y0: i32, x1: i32, y1: i32) -> char {
    let dx = x1 - x0;
    let dy = y1 - y0;
    if dx.abs() > dy.abs() {
        '─'
    } else if dy.abs() > dx.abs() {
        '│'
    } else if (dx > 0) == (dy > 0) {
        '╲'
    } else {
        '╱'
    }
}

fn draw_line(grid: &mut Grid, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = (x1 - x0).signum();
    let sy = (y1 - y0).signum();
    let mut err = dx - dy;
    let (mut x, mut y) = (x0, y0);
    let glyph = stroke_glyph(x0, y0, x1, y1);

    loop {
        grid.set(x, y, glyph, EDGE_COLOR);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

impl Scene for Cube {
    fn title(&self) -> &str {
        "cube"
    }

    fn advance(&mut self, dt: f32) {
        if self.auto_rotate {
            let step = dt * 30.0;
            self.rx += 0.02 * step;
            self.ry += 0.03 * step;
            self.rz += 0.01 * step;
        }
    }

    fn render(&self, grid: &mut Grid) {
        let (cols, rows) = (grid.cols(), grid.rows());

        let rotated: Vec<Point3> = VERTICES.iter().map(|&v| self.rotate(v)).collect();
        let projected: Vec<(i32, i32)> = rotated
            .iter()
            .map(|&p| self.project(p, cols, rows))
            .collect();

        for &(a, b) in EDGES.iter() {
            let (x0, y0) = projected[a];
            let (x1, y1) = projected[b];
            draw_line(grid, x0, y0, x1, y1);
        }

        for (i, &(x, y)) in projected.iter().enumerate() {
            let fg = if rotated[i].z > 0.0 { NEAR_VERTEX } else { FAR_VERTEX };
            grid.set(x, y, '●', fg);
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('a') => {
                self.auto_rotate = !self.auto_rotate;
                true
            }
            KeyCode::Up if !self.auto_rotate => {
                self.rx -= 0.1;
                true
            }
            KeyCode::Down if !self.auto_rotate => {
                self.rx += 0.1;
                true
            }
            KeyCode::Left if !self.auto_rotate => {
                self.ry -= 0.1;
                true
            }
            KeyCode::Right if !self.auto_rotate => {
                self.ry += 0.1;
                true
            }
            KeyCode::Char('z') if !self.auto_rotate => {
                self.rz -= 0.1;
                true
            }
            KeyCode::Char('x') if !self.auto_rotate => {
                self.rz += 0.1;
                true
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.scale = (self.scale + 1.0).min(SCALE_MAX);
                true
            }
            KeyCode::Char('-') => {
                self.scale = (self.scale - 1.0).max(SCALE_MIN);
                true
            }
            KeyCode::Char('p') => {
                self.perspective = (self.perspective - 0.5).max(PERSPECTIVE_MIN);
                true
            }
            KeyCode::Char('o') => {
                self.perspective = (self.perspective + 0.5).min(PERSPECTIVE_MAX);
                true
            }
            _ => false,
        }
    }

    fn reset(&mut self) {
        self.rx = 0.0;
        self.ry = 0.0;
        self.rz = 0.0;
    }

    fn status(&self) -> String {
        format!(
            "scale {:.0} | perspective {:.1} | {}",
            self.scale,
            self.perspective,
            if self.auto_rotate { "auto" } else { "manual" }
        )
    }

    fn help(&self) -> &str {
        "a auto/manual | arrows,z,x rotate | +/- scale | p/o perspective"
    }
}

fn main() {
    if let Err(e) = stage::run(Cube::new()) {
        eprintln!("cube: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rotation_is_identity() {
        let c = Cube::new();
        let p = c.rotate(Point3 { x: 1.0, y: -1.0, z: 1.0 });
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!((p.y + 1.0).abs() < 1e-6);
        assert!((p.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let c = Cube::new();
        let (x, y) = c.project(Point3 { x: 0.0, y: 0.0, z: 0.0 }, 80, 24);
        assert_eq!((x, y), (40, 12));
    }

    #[test]
    fn projection_guards_the_near_plane() {
        let mut c = Cube::new();
        c.perspective = PERSPECTIVE_MIN;
        // A vertex closer than the camera would divide by a negative
        // distance without the floor.
        let (x, y) = c.project(Point3 { x: 1.0, y: 1.0, z: -5.0 }, 80, 24);
        assert!(x.abs() < 10_000 && y.abs() < 10_000);
    }

    #[test]
    fn lines_paint_within_the_grid_only() {
        let c = Cube::new();
        let mut g = Grid::new(30, 10, Rgb::BLACK);
        c.render(&mut g);
        // Out-of-range strokes are dropped by the grid; flatten still holds
        // the exact dimensions.
        let text = g.to_text();
        assert_eq!(text.split('\n').count(), 10);
        assert!(text.contains('●'));
    }

    #[test]
    fn rotation_frozen_when_manual() {
        let mut c = Cube::new();
        c.handle_key(KeyCode::Char('a'));
        let before = (c.rx, c.ry, c.rz);
        c.advance(1.0);
        assert_eq!(before, (c.rx, c.ry, c.rz));
    }
}
