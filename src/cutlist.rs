//! Reconstructs the order in which a panel saw reproduces a layout: rip cuts
//! across the panel into horizontal strips, then cross cuts along each strip.

use std::fmt::Write;

use serde::Serialize;

use crate::types::{EPSILON, Panel, PlacedPiece};

/// One strip ripped from the panel, `thickness` high, starting at `y`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RipCut<'a> {
    pub y: f64,
    pub thickness: f64,
    pub cross_cuts: Vec<CrossCut<'a>>,
}

/// Separates one piece out of its strip.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CrossCut<'a> {
    pub piece: &'a PlacedPiece,
}

/// Groups pieces sharing a top edge and a placed height into strips, ordered
/// top to bottom; pieces inside a strip are ordered left to right.
///
/// Strips starting at the same `y` are listed tallest first: the tall strip
/// is ripped at its full height and the shorter ones come out of its remnant.
pub fn derive_cut_sequence(panel: &Panel) -> Vec<RipCut<'_>> {
    let mut ordered: Vec<&PlacedPiece> = panel.pieces.iter().collect();
    ordered.sort_by(|a, b| {
        a.y.total_cmp(&b.y)
            .then(b.height.total_cmp(&a.height))
            .then(a.x.total_cmp(&b.x))
    });

    let mut rips: Vec<RipCut<'_>> = Vec::new();
    for piece in ordered {
        match rips.last_mut() {
            Some(rip)
                if (rip.y - piece.y).abs() <= EPSILON
                    && (rip.thickness - piece.height).abs() <= EPSILON =>
            {
                rip.cross_cuts.push(CrossCut { piece });
            }
            _ => rips.push(RipCut {
                y: piece.y,
                thickness: piece.height,
                cross_cuts: vec![CrossCut { piece }],
            }),
        }
    }
    rips
}

/// Numbered, human-readable instructions for a cut sequence.
pub fn format_cut_list(rips: &[RipCut<'_>]) -> String {
    let mut out = String::new();
    for (i, rip) in rips.iter().enumerate() {
        let _ = writeln!(out, "Strip #{}: {:.1} high", i + 1, rip.thickness);
        for cross in &rip.cross_cuts {
            let _ = writeln!(
                out,
                "  cut piece {:.1} x {:.1}",
                cross.piece.width, cross.piece.height
            );
        }
    }
    out
}
