use crossterm::event::KeyCode;

use crate::color::Rgb;
use crate::grid::Grid;

/// One animated effect. The harness owns the loop; a scene only advances
/// its state, paints the grid, and reacts to the keys the harness does not
/// reserve (quit, pause and reset belong to the [`Transport`]).
///
/// `render` takes `&self` and must be deterministic: while paused the
/// harness keeps calling it with frozen state and the frame may not change.
///
/// [`Transport`]: crate::Transport
pub trait Scene {
    fn title(&self) -> &str;

    /// Advance the simulation by one fixed tick.
    fn advance(&mut self, dt: f32);

    /// Paint the current state into a cleared grid.
    fn render(&self, grid: &mut Grid);

    /// A key the harness did not consume. Return true if the scene used it.
    fn handle_key(&mut self, key: KeyCode) -> bool {
        let _ = key;
        false
    }

    /// Grid dimensions changed; rebuild size-dependent state.
    fn resize(&mut self, cols: usize, rows: usize) {
        let _ = (cols, rows);
    }

    /// Return to startup state. Must be idempotent.
    fn reset(&mut self) {}

    /// One-line state readout for the chrome row.
    fn status(&self) -> String {
        String::new()
    }

    /// Key legend for the bottom chrome row.
    fn help(&self) -> &str {
        ""
    }

    /// Scene background; the grid and renderer are cleared to this.
    fn bg(&self) -> Rgb {
        Rgb::BLACK
    }
}
