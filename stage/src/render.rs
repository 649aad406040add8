use std::io::{self, Stdout, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate},
};

use crate::color::Rgb;
use crate::grid::{Cell, Grid};

/// Back/front cell buffers over the whole terminal. Only cells that changed
/// since the previous flush are written, in horizontal runs, inside a
/// synchronized update.
pub struct Renderer {
    cols: u16,
    rows: u16,
    bg: Rgb,
    back: Vec<Cell>,
    front: Vec<Cell>,
}

impl Renderer {
    pub fn new(cols: u16, rows: u16, bg: Rgb) -> Self {
        let n = cols as usize * rows as usize;
        Renderer {
            cols,
            rows,
            bg,
            back: vec![Cell::blank(bg); n],
            front: vec![Cell::blank(bg); n],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        let n = cols as usize * rows as usize;
        self.back = vec![Cell::blank(self.bg); n];
        // Poison the front buffer so the next flush repaints everything.
        self.front = vec![
            Cell {
                ch: '\0',
                fg: self.bg,
                bg: self.bg
            };
            n
        ];
    }

    pub fn clear_back(&mut self) {
        self.back.fill(Cell::blank(self.bg));
    }

    pub fn set(&mut self, x: u16, y: u16, ch: char, fg: Rgb, bg: Rgb) {
        if x >= self.cols || y >= self.rows {
            return;
        }
        self.back[y as usize * self.cols as usize + x as usize] = Cell { ch, fg, bg };
    }

    pub fn text(&mut self, x: u16, y: u16, s: &str, fg: Rgb) {
        for (i, ch) in s.chars().enumerate() {
            let xx = x as usize + i;
            if xx >= self.cols as usize {
                break;
            }
            self.set(xx as u16, y, ch, fg, self.bg);
        }
    }

    /// Copy a scene grid into the back buffer at the given offset.
    pub fn blit(&mut self, grid: &Grid, x0: u16, y0: u16) {
        for y in 0..grid.rows() {
            let ty = y0 as usize + y;
            if ty >= self.rows as usize {
                break;
            }
            for x in 0..grid.cols() {
                let tx = x0 as usize + x;
                if tx >= self.cols as usize {
                    break;
                }
                self.back[ty * self.cols as usize + tx] = grid.cell(x, y);
            }
        }
    }

    pub fn flush(&mut self, out: &mut Stdout) -> io::Result<()> {
        queue!(out, BeginSynchronizedUpdate)?;
        let mut last_fg: Option<Rgb> = None;
        let mut last_bg: Option<Rgb> = None;

        let cols = self.cols as usize;
        let rows = self.rows as usize;

        for y in 0..rows {
            let mut x = 0usize;
            while x < cols {
                let i = y * cols + x;
                if self.back[i] == self.front[i] {
                    x += 1;
                    continue;
                }
                let mut x2 = x + 1;
                while x2 < cols && self.back[y * cols + x2] != self.front[y * cols + x2] {
                    x2 += 1;
                }

                queue!(out, cursor::MoveTo(x as u16, y as u16))?;
                for xx in x..x2 {
                    let c = self.back[y * cols + xx];
                    if last_bg != Some(c.bg) {
                        queue!(
                            out,
                            SetBackgroundColor(Color::Rgb {
                                r: c.bg.r,
                                g: c.bg.g,
                                b: c.bg.b
                            })
                        )?;
                        last_bg = Some(c.bg);
                    }
                    if last_fg != Some(c.fg) {
                        queue!(
                            out,
                            SetForegroundColor(Color::Rgb {
                                r: c.fg.r,
                                g: c.fg.g,
                                b: c.fg.b
                            })
                        )?;
                        last_fg = Some(c.fg);
                    }
                    queue!(out, Print(c.ch))?;
                }

                self.front[i..y * cols + x2].copy_from_slice(&self.back[i..y * cols + x2]);
                x = x2;
            }
        }

        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()
    }
}
