use crossterm::event::{KeyCode, KeyModifiers};

use crate::scene::Scene;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Directive {
    Continue,
    Quit,
}

/// The {Running, Paused} machine and frame clock shared by every demo.
/// Kept free of terminal I/O so the pause and reset invariants are plain
/// unit tests.
pub struct Transport {
    paused: bool,
    clock: f32,
}

impl Transport {
    pub fn new() -> Self {
        Transport {
            paused: false,
            clock: 0.0,
        }
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// One tick: advances the clock and the scene only while running.
    /// Paused ticks are delivered but change nothing.
    pub fn tick(&mut self, scene: &mut dyn Scene, dt: f32) {
        if self.paused {
            return;
        }
        self.clock += dt;
        scene.advance(dt);
    }

    /// Common key contract: quit, pause toggle, reset. Everything else is
    /// forwarded to the scene.
    pub fn key(&mut self, scene: &mut dyn Scene, code: KeyCode, mods: KeyModifiers) -> Directive {
        match code {
            KeyCode::Char('c') | KeyCode::Char('C') if mods.contains(KeyModifiers::CONTROL) => {
                Directive::Quit
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Directive::Quit,
            KeyCode::Char(' ') => {
                self.paused = !self.paused;
                Directive::Continue
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                scene.reset();
                self.clock = 0.0;
                Directive::Continue
            }
            _ => {
                scene.handle_key(code);
                Directive::Continue
            }
        }
    }
}

impl Default for Transport {
    fn default() -> Self {
        Transport::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    struct Probe {
        advances: u32,
        resets: u32,
        value: f32,
    }

    impl Probe {
        fn new() -> Self {
            Probe {
                advances: 0,
                resets: 0,
                value: 7.0,
            }
        }
    }

    impl Scene for Probe {
        fn title(&self) -> &str {
            "probe"
        }
        fn advance(&mut self, dt: f32) {
            self.advances += 1;
            self.value += dt;
        }
        fn render(&self, _grid: &mut Grid) {}
        fn reset(&mut self) {
            self.resets += 1;
            self.value = 7.0;
        }
    }

    #[test]
    fn paused_ticks_change_nothing() {
        let mut t = Transport::new();
        let mut s = Probe::new();
        t.tick(&mut s, 0.033);
        assert_eq!(s.advances, 1);

        t.key(&mut s, KeyCode::Char(' '), KeyModifiers::NONE);
        assert!(t.paused());
        let clock = t.clock();
        let value = s.value;
        for _ in 0..100 {
            t.tick(&mut s, 0.033);
        }
        assert_eq!(s.advances, 1);
        assert_eq!(t.clock(), clock);
        assert_eq!(s.value, value);

        t.key(&mut s, KeyCode::Char(' '), KeyModifiers::NONE);
        t.tick(&mut s, 0.033);
        assert_eq!(s.advances, 2);
    }

    #[test]
    fn reset_zeroes_clock_and_is_idempotent() {
        let mut t = Transport::new();
        let mut s = Probe::new();
        for _ in 0..10 {
            t.tick(&mut s, 0.033);
        }
        assert!(t.clock() > 0.0);

        t.key(&mut s, KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(t.clock(), 0.0);
        assert_eq!(s.value, 7.0);
        let once = s.value;

        t.key(&mut s, KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(t.clock(), 0.0);
        assert_eq!(s.value, once);
        assert_eq!(s.resets, 2);
    }

    #[test]
    fn quit_keys() {
        let mut t = Transport::new();
        let mut s = Probe::new();
        assert_eq!(
            t.key(&mut s, KeyCode::Char('q'), KeyModifiers::NONE),
            Directive::Quit
        );
        assert_eq!(t.key(&mut s, KeyCode::Esc, KeyModifiers::NONE), Directive::Quit);
        assert_eq!(
            t.key(&mut s, KeyCode::Char('c'), KeyModifiers::CONTROL),
            Directive::Quit
        );
        // Plain 'c' is a scene key, not quit.
        assert_eq!(
            t.key(&mut s, KeyCode::Char('c'), KeyModifiers::NONE),
            Directive::Continue
        );
    }
}
