//! Candidate generation.
//!
//! Candidates are ordered for alpha-beta: larger buildings come first, and
//! within one building the placements that claim fresh ground (no cell of the
//! mover's own territory) come before those that fill it in. The order is a
//! pruning heuristic only; every emitted placement is legal.

use crate::board::{CellState, Placement};
use crate::building::{Building, Color};
use crate::rules::GameRules;

/// Distinct buildings of `color` still in hand, largest first.
///
/// Equal scores keep catalog order (the sort is stable).
fn buildings_by_score<G: GameRules>(state: &G, color: Color) -> Vec<Building> {
    let mut buildings: Vec<Building> = Vec::new();
    for b in state.unplaced_buildings(color) {
        if !buildings.contains(&b) {
            buildings.push(b);
        }
    }
    buildings.sort_by_key(|b| std::cmp::Reverse(b.score()));
    buildings
}

/// Every placement of `building` on the board, legal or not, in board order.
fn all_placements<G: GameRules>(state: &G, building: Building) -> impl Iterator<Item = Placement> {
    let (w, h) = (state.width() as i32, state.height() as i32);
    (0..h).flat_map(move |y| {
        (0..w).flat_map(move |x| {
            building
                .directions()
                .iter()
                .map(move |&d| Placement::new(x, y, d, building))
        })
    })
}

/// Legal placements of `color`, ordered for search and cut at `limit`.
///
/// Returns an empty vector when `color` cannot move. The state is only read.
pub fn generate<G: GameRules>(state: &G, color: Color, limit: Option<usize>) -> Vec<Placement> {
    let limit = limit.unwrap_or(usize::MAX);
    let mut out = Vec::new();
    if limit == 0 {
        return out;
    }

    for building in buildings_by_score(state, color) {
        let mut back = Vec::new();
        for p in all_placements(state, building) {
            if !state.is_legal(&p) {
                continue;
            }
            if covers_own_territory(state, &p, color) {
                back.push(p);
            } else {
                out.push(p);
            }
        }
        out.append(&mut back);
        if out.len() >= limit {
            out.truncate(limit);
            break;
        }
    }
    out
}

/// Every legal placement of one building, in board order (y, x, direction).
pub fn legal_placements<G: GameRules>(state: &G, building: Building) -> Vec<Placement> {
    all_placements(state, building)
        .filter(|p| state.is_legal(p))
        .collect()
}

/// Whether `color` has any legal placement at all.
pub fn has_any_placement<G: GameRules>(state: &G, color: Color) -> bool {
    buildings_by_score(state, color)
        .into_iter()
        .any(|b| all_placements(state, b).any(|p| state.is_legal(&p)))
}

fn covers_own_territory<G: GameRules>(state: &G, p: &Placement, color: Color) -> bool {
    p.cells().any(|(x, y)| {
        x >= 0
            && y >= 0
            && (x as usize) < state.width()
            && (y as usize) < state.height()
            && state.cell_state(x as usize, y as usize) == CellState::Owned(color)
    })
}
