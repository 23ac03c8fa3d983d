use crate::config::OptimizerConfig;
use crate::error::{Error, Result};
use crate::guillotine::GuillotineBin;
use crate::types::{Panel, Piece, Solution};

/// Lays out `pieces` on as many `panel_width` x `panel_height` panels as needed.
pub fn optimize(
    pieces: &[Piece],
    panel_width: f64,
    panel_height: f64,
    kerf: f64,
) -> Result<Solution> {
    Solver::new(
        OptimizerConfig::new(panel_width, panel_height, kerf),
        pieces.to_vec(),
    )
    .solve()
}

/// Greedy first-fit panel allocator.
pub struct Solver {
    config: OptimizerConfig,
    pieces: Vec<Piece>,
}

impl Solver {
    pub fn new(config: OptimizerConfig, pieces: Vec<Piece>) -> Self {
        Self { config, pieces }
    }

    pub fn solve(&self) -> Result<Solution> {
        self.validate()?;

        let stock = self.config.stock();
        let mut pending = self.pieces.clone();
        let mut panels = Vec::new();

        while !pending.is_empty() {
            match self.fill_panel(&mut pending) {
                Some(panel) => {
                    tracing::debug!(
                        panel = panels.len() + 1,
                        pieces = panel.pieces.len(),
                        offcuts = panel.offcuts.len(),
                        efficiency = panel.efficiency(),
                        "panel closed"
                    );
                    panels.push(panel);
                }
                None => {
                    for piece in pending.iter().filter(|p| !p.fits_panel(stock)) {
                        tracing::warn!(
                            id = %piece.id,
                            size = %piece.rect(),
                            rotation = ?piece.rotation,
                            "piece does not fit an empty {} panel",
                            stock
                        );
                    }
                    break;
                }
            }
        }

        Ok(Solution {
            panels,
            unplaced: pending,
            stock,
        })
    }

    /// Fills one fresh panel from `pending`, removing the pieces it places.
    /// Returns `None` (discarding the panel) when not a single piece fits.
    fn fill_panel(&self, pending: &mut Vec<Piece>) -> Option<Panel> {
        // Stable: equal areas keep their pending order.
        pending.sort_by(|a, b| b.area().total_cmp(&a.area()));

        let mut bin = GuillotineBin::new(self.config.stock(), self.config.kerf);
        while let Some(index) = pending.iter().position(|piece| bin.place(piece).is_some()) {
            pending.remove(index);
        }

        if bin.is_empty() {
            None
        } else {
            Some(bin.into_panel())
        }
    }

    fn validate(&self) -> Result<()> {
        self.config.validate()?;
        for piece in &self.pieces {
            if !(piece.width.is_finite() && piece.width > 0.0)
                || !(piece.height.is_finite() && piece.height > 0.0)
            {
                return Err(Error::InvalidInput(format!(
                    "piece {} has non-positive dimensions {}x{}",
                    piece.id, piece.width, piece.height
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlacedPiece, Rotation};

    /// Validates a complete solution:
    /// 1. Every placement fits within the panel
    /// 2. No two kerf-expanded placements on the same panel overlap
    /// 3. The total number of placed pieces matches expectations
    fn assert_solution_valid(sol: &Solution, kerf: f64, expected_pieces: usize) {
        let stock = sol.stock;
        let total_placed = sol.placed_pieces().count();
        assert_eq!(
            total_placed, expected_pieces,
            "expected {} pieces placed, got {}",
            expected_pieces, total_placed
        );

        for (si, panel) in sol.panels.iter().enumerate() {
            for (pi, p) in panel.pieces.iter().enumerate() {
                assert!(
                    p.x + p.width <= stock.w + 1e-9,
                    "panel {si}, piece {pi} ({}) exceeds panel width: x={} + width={} > {}",
                    p.rect(), p.x, p.width, stock.w
                );
                assert!(
                    p.y + p.height <= stock.h + 1e-9,
                    "panel {si}, piece {pi} ({}) exceeds panel height: y={} + height={} > {}",
                    p.rect(), p.y, p.height, stock.h
                );
            }

            assert_no_overlaps(si, kerf, &panel.pieces);
        }
    }

    fn assert_no_overlaps(panel_idx: usize, kerf: f64, placements: &[PlacedPiece]) {
        for i in 0..placements.len() {
            for j in (i + 1)..placements.len() {
                let a = &placements[i];
                let b = &placements[j];

                let a_x_end = a.x + a.width + kerf;
                let a_y_end = a.y + a.height + kerf;
                let b_x_end = b.x + b.width + kerf;
                let b_y_end = b.y + b.height + kerf;

                let eps = 1e-9;
                let overlaps = a.x + eps < b_x_end
                    && b.x + eps < a_x_end
                    && a.y + eps < b_y_end
                    && b.y + eps < a_y_end;

                assert!(
                    !overlaps,
                    "panel {panel_idx}: piece {i} ({} @ ({},{})) overlaps piece {j} ({} @ ({},{}))",
                    a.rect(), a.x, a.y, b.rect(), b.x, b.y
                );
            }
        }
    }

    fn pieces(rows: &[(f64, f64, usize, Rotation)]) -> Vec<Piece> {
        let mut out = Vec::new();
        for (t, &(w, h, qty, rotation)) in rows.iter().enumerate() {
            for n in 0..qty {
                out.push(Piece::new(format!("{t}-{n}"), w, h).with_rotation(rotation));
            }
        }
        out
    }

    #[test]
    fn test_single_piece() {
        let sol = optimize(&pieces(&[(50.0, 50.0, 1, Rotation::Allowed)]), 100.0, 100.0, 0.0)
            .unwrap();
        assert_solution_valid(&sol, 0.0, 1);
        assert_eq!(sol.panel_count(), 1);
        assert!(sol.is_complete());
    }

    #[test]
    fn test_exact_fit_four_pieces() {
        let sol = optimize(&pieces(&[(50.0, 50.0, 4, Rotation::None)]), 100.0, 100.0, 0.0)
            .unwrap();
        assert_solution_valid(&sol, 0.0, 4);
        assert_eq!(sol.panel_count(), 1);
        assert!(sol.panels[0].offcuts.is_empty());
    }

    #[test]
    fn test_needs_four_panels() {
        let sol = optimize(&pieces(&[(60.0, 60.0, 4, Rotation::None)]), 100.0, 100.0, 0.0)
            .unwrap();
        assert_solution_valid(&sol, 0.0, 4);
        assert_eq!(sol.panel_count(), 4);
    }

    #[test]
    fn test_largest_area_placed_first() {
        let input = vec![
            Piece::new("small", 10.0, 10.0).with_rotation(Rotation::None),
            Piece::new("big", 80.0, 80.0).with_rotation(Rotation::None),
        ];
        let sol = optimize(&input, 100.0, 100.0, 0.0).unwrap();
        assert_eq!(sol.panels[0].pieces[0].id, "big");
        assert_eq!((sol.panels[0].pieces[0].x, sol.panels[0].pieces[0].y), (0.0, 0.0));
    }

    #[test]
    fn test_equal_areas_keep_input_order() {
        let input = vec![
            Piece::new("first", 20.0, 10.0).with_rotation(Rotation::None),
            Piece::new("second", 10.0, 20.0).with_rotation(Rotation::None),
        ];
        let sol = optimize(&input, 100.0, 100.0, 0.0).unwrap();
        let ids: Vec<&str> = sol.panels[0].pieces.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_scan_skips_piece_that_does_not_fit() {
        // After the 70x100 piece only a 30x100 column is left; the 40x40 piece
        // is passed over and the 30x30 piece placed in the same scan.
        let input = vec![
            Piece::new("a", 70.0, 100.0).with_rotation(Rotation::None),
            Piece::new("b", 40.0, 40.0).with_rotation(Rotation::None),
            Piece::new("c", 30.0, 30.0).with_rotation(Rotation::None),
        ];
        let sol = optimize(&input, 100.0, 100.0, 0.0).unwrap();
        assert_eq!(sol.panel_count(), 2);
        let first: Vec<&str> = sol.panels[0].pieces.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(first, vec!["a", "c"]);
        assert_eq!(sol.panels[1].pieces[0].id, "b");
    }

    #[test]
    fn test_oversized_piece_stops_allocation() {
        let input = vec![
            Piece::new("fits", 50.0, 50.0).with_rotation(Rotation::None),
            Piece::new("huge", 400.0, 50.0).with_rotation(Rotation::None),
        ];
        let sol = optimize(&input, 300.0, 200.0, 0.3).unwrap();
        assert_eq!(sol.panel_count(), 1);
        assert_eq!(sol.unplaced_ids(), vec!["huge"]);
    }

    #[test]
    fn test_rotation_helps() {
        let sol = optimize(&pieces(&[(50.0, 100.0, 1, Rotation::Allowed)]), 100.0, 50.0, 0.0)
            .unwrap();
        assert_solution_valid(&sol, 0.0, 1);
        assert!(sol.panels[0].pieces[0].rotated);
    }

    #[test]
    fn test_no_pieces() {
        let sol = optimize(&[], 100.0, 100.0, 0.0).unwrap();
        assert_solution_valid(&sol, 0.0, 0);
        assert_eq!(sol.panel_count(), 0);
        assert!(sol.is_complete());
    }

    #[test]
    fn test_kerf_reduces_capacity() {
        let input = pieces(&[(50.0, 100.0, 2, Rotation::None)]);
        let sol_no_kerf = optimize(&input, 100.0, 100.0, 0.0).unwrap();
        assert_solution_valid(&sol_no_kerf, 0.0, 2);
        assert_eq!(sol_no_kerf.panel_count(), 1);

        // 50 + 5 + 50 = 105 > 100, needs 2 panels
        let sol_kerf = optimize(&input, 100.0, 100.0, 5.0).unwrap();
        assert_solution_valid(&sol_kerf, 5.0, 2);
        assert_eq!(sol_kerf.panel_count(), 2);
    }

    #[test]
    fn test_invalid_input_rejected() {
        assert!(matches!(
            optimize(&[], 0.0, 100.0, 0.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            optimize(&[], 100.0, 100.0, -1.0),
            Err(Error::InvalidInput(_))
        ));
        let bad = vec![Piece::new("a", 0.0, 10.0)];
        assert!(matches!(
            optimize(&bad, 100.0, 100.0, 0.0),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_waste_percent() {
        let sol = optimize(&pieces(&[(100.0, 100.0, 1, Rotation::None)]), 100.0, 100.0, 0.0)
            .unwrap();
        assert_solution_valid(&sol, 0.0, 1);
        assert!(sol.total_waste_percent().abs() < 0.01);
    }

    /// 30 pieces, 6 different sizes, standard board 244x183, 0.3 kerf.
    #[test]
    fn test_complex_mixed_sizes_with_kerf() {
        let input = pieces(&[
            (80.0, 60.0, 5, Rotation::Allowed),
            (40.0, 30.0, 8, Rotation::Allowed),
            (60.0, 40.0, 4, Rotation::None),
            (120.0, 60.0, 3, Rotation::Forced),
            (30.0, 20.0, 6, Rotation::Allowed),
            (50.0, 50.0, 4, Rotation::None),
        ]);
        assert_eq!(input.len(), 30);

        let sol = optimize(&input, 244.0, 183.0, 0.3).unwrap();
        assert_solution_valid(&sol, 0.3, 30);
        assert!(sol.is_complete());

        for p in sol.placed_pieces() {
            match p.rotation {
                Rotation::None => assert!(!p.rotated),
                Rotation::Forced => assert!(p.rotated),
                Rotation::Allowed => {}
            }
        }

        let total_area: f64 = input.iter().map(Piece::area).sum();
        let min_panels = (total_area / (244.0 * 183.0)).ceil() as usize;
        assert!(sol.panel_count() >= min_panels);
    }

    #[test]
    fn test_long_single_row_of_pieces() {
        // Every placement nests one level deeper in the free-space tree.
        let input = pieces(&[(1.0, 1.0, 20_000, Rotation::None)]);
        let sol = optimize(&input, 20_000.0, 1.0, 0.0).unwrap();
        assert_eq!(sol.panel_count(), 1);
        assert_eq!(sol.panels[0].pieces.len(), 20_000);
        assert!(sol.is_complete());
        assert!(sol.panels[0].offcuts.is_empty());
        assert!(sol.panels[0].kerf_loss.abs() < 1e-9);
    }

    /// 32 pieces on a small panel, forcing many panels.
    #[test]
    fn test_complex_small_stock_many_panels() {
        let input = pieces(&[
            (20.0, 15.0, 8, Rotation::Allowed),
            (30.0, 20.0, 6, Rotation::Allowed),
            (15.0, 10.0, 7, Rotation::Allowed),
            (25.0, 18.0, 5, Rotation::Allowed),
            (40.0, 30.0, 6, Rotation::Allowed),
        ]);
        let sol = optimize(&input, 50.0, 40.0, 0.0).unwrap();
        assert_solution_valid(&sol, 0.0, 32);
        assert!(sol.panel_count() >= 6);
    }
}
