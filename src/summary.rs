use std::fmt::Write;

use serde::Serialize;

use crate::config::CostRates;
use crate::types::{EdgeBanding, Panel, PlacedPiece, Solution};

/// Offcuts with a side shorter than this are slivers, not remnants.
pub const MIN_OFFCUT_SIZE: f64 = 1.0;

const CM_PER_M: f64 = 100.0;

/// Length of edge banding a piece needs, measured on its requested dimensions.
pub fn banding_length(piece: &PlacedPiece) -> f64 {
    piece.original_width() * piece.width_banding.edges() as f64
        + piece.original_height() * piece.height_banding.edges() as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub panel_count: usize,
    pub panel_cost: f64,
    pub banding_length_m: f64,
    pub banding_cost: f64,
    pub total_cost: f64,
}

impl CostSummary {
    pub fn compute(solution: &Solution, rates: &CostRates) -> Self {
        let panel_count = solution.panel_count();
        let panel_cost = panel_count as f64 * rates.panel_cost;
        let banding_length_m =
            solution.placed_pieces().map(banding_length).sum::<f64>() / CM_PER_M;
        let banding_cost = banding_length_m * rates.banding_cost_per_m;
        Self {
            panel_count,
            panel_cost,
            banding_length_m,
            banding_cost,
            total_cost: panel_cost + banding_cost,
        }
    }
}

/// Remnants of the same size, whatever their orientation on the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffcutGroup {
    pub width: f64,
    pub height: f64,
    pub quantity: u32,
}

pub fn offcut_summary(panels: &[Panel], min_size: f64) -> Vec<OffcutGroup> {
    let mut groups: Vec<OffcutGroup> = Vec::new();
    for offcut in panels.iter().flat_map(|p| &p.offcuts) {
        if offcut.width < min_size || offcut.height < min_size {
            continue;
        }
        let width = round_tenth(offcut.width.min(offcut.height));
        let height = round_tenth(offcut.width.max(offcut.height));
        match groups
            .iter_mut()
            .find(|g| g.width == width && g.height == height)
        {
            Some(group) => group.quantity += 1,
            None => groups.push(OffcutGroup {
                width,
                height,
                quantity: 1,
            }),
        }
    }
    groups.sort_by(|a, b| (b.width * b.height).total_cmp(&(a.width * a.height)));
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceGroup {
    pub width: f64,
    pub height: f64,
    pub width_banding: EdgeBanding,
    pub height_banding: EdgeBanding,
    pub quantity: u32,
}

/// Placed pieces grouped by requested size and banding, in first-seen order.
pub fn piece_summary(panels: &[Panel]) -> Vec<PieceGroup> {
    let mut groups: Vec<PieceGroup> = Vec::new();
    for piece in panels.iter().flat_map(|p| &p.pieces) {
        let (width, height) = (piece.original_width(), piece.original_height());
        match groups.iter_mut().find(|g| {
            g.width == width
                && g.height == height
                && g.width_banding == piece.width_banding
                && g.height_banding == piece.height_banding
        }) {
            Some(group) => group.quantity += 1,
            None => groups.push(PieceGroup {
                width,
                height,
                width_banding: piece.width_banding,
                height_banding: piece.height_banding,
                quantity: 1,
            }),
        }
    }
    groups
}

/// One line per group, e.g. `  60.0 x 40.0 (x2) banding 1/0` for a piece banded
/// on one width edge.
pub fn format_piece_summary(groups: &[PieceGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = write!(
            out,
            "  {:.1} x {:.1} (x{})",
            group.width, group.height, group.quantity
        );
        let (w_edges, h_edges) = (group.width_banding.edges(), group.height_banding.edges());
        if w_edges + h_edges > 0 {
            let _ = write!(out, " banding {w_edges}/{h_edges}");
        }
        out.push('\n');
    }
    out
}

fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
