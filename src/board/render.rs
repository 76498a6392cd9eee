//! Plain-text board rendering for chat output.

use super::{Board, Cell, Ruleset};

/// Render a board as a fixed-width grid.
///
/// Empty cells show their 1-based number so players can type it back.
/// Line-game marks show as `X`/`O`; hybrid values show the digit followed by the
/// owner in lowercase, e.g. `3x`.
pub fn render(board: &Board) -> String {
    let labels: Vec<String> = board
        .cells()
        .iter()
        .enumerate()
        .map(|(i, cell)| label(board.ruleset(), i, cell))
        .collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(1);

    let n = board.size();
    let separator = vec!["-".repeat(width + 2); n].join("+");

    let rows: Vec<String> = labels
        .chunks(n)
        .map(|row| {
            let padded: Vec<String> = row.iter().map(|l| format!("{l:>width$}")).collect();
            format!(" {}", padded.join(" | "))
        })
        .collect();

    rows.join(&format!("\n{separator}\n"))
}

fn label(ruleset: Ruleset, index: usize, cell: &Cell) -> String {
    match (ruleset, cell) {
        (_, Cell::Empty) => (index + 1).to_string(),
        (Ruleset::Line, Cell::Occupied { side, .. }) => side.symbol().to_string(),
        (Ruleset::Hybrid, Cell::Occupied { side, value }) => {
            format!("{}{}", value, side.symbol().to_ascii_lowercase())
        }
    }
}
