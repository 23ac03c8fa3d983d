use serde::{Deserialize, Serialize};

/// Tolerance used for every geometric comparison.
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w + EPSILON && self.h <= other.h + EPSILON
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeBanding {
    #[default]
    None,
    Single,
    Double,
}

impl EdgeBanding {
    /// Number of edges of this dimension that receive banding.
    pub fn edges(self) -> u32 {
        match self {
            EdgeBanding::None => 0,
            EdgeBanding::Single => 1,
            EdgeBanding::Double => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    None,
    #[default]
    Allowed,
    Forced,
}

impl Rotation {
    /// Orientations to try, in order. `true` means the piece is placed rotated.
    pub fn attempts(self) -> &'static [bool] {
        match self {
            Rotation::None => &[false],
            Rotation::Allowed => &[false, true],
            Rotation::Forced => &[true],
        }
    }
}

impl std::str::FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Rotation::None),
            "allowed" => Ok(Rotation::Allowed),
            "forced" => Ok(Rotation::Forced),
            _ => Err(format!(
                "invalid rotation '{}', expected: none, allowed, or forced",
                s
            )),
        }
    }
}

/// One physical piece to be cut. A requested quantity expands into one
/// `Piece` per unit, each with its own id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub id: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub width_banding: EdgeBanding,
    #[serde(default)]
    pub height_banding: EdgeBanding,
    #[serde(default)]
    pub rotation: Rotation,
}

impl Piece {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            width_banding: EdgeBanding::None,
            height_banding: EdgeBanding::None,
            rotation: Rotation::Allowed,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_banding(mut self, width_banding: EdgeBanding, height_banding: EdgeBanding) -> Self {
        self.width_banding = width_banding;
        self.height_banding = height_banding;
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True if the piece fits an empty `panel` in any orientation its rotation policy permits.
    pub fn fits_panel(&self, panel: Rect) -> bool {
        self.rotation.attempts().iter().any(|&rotated| {
            let rect = if rotated { self.rect().rotated() } else { self.rect() };
            rect.fits_in(&panel)
        })
    }
}

/// A piece positioned on a panel. `width`/`height` are the placed dimensions,
/// swapped relative to the original piece when `rotated` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedPiece {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub width_banding: EdgeBanding,
    pub height_banding: EdgeBanding,
    pub rotation: Rotation,
    pub x: f64,
    pub y: f64,
    pub rotated: bool,
}

impl PlacedPiece {
    pub fn new(piece: &Piece, x: f64, y: f64, rotated: bool) -> Self {
        let rect = if rotated {
            piece.rect().rotated()
        } else {
            piece.rect()
        };
        Self {
            id: piece.id.clone(),
            width: rect.w,
            height: rect.h,
            width_banding: piece.width_banding,
            height_banding: piece.height_banding,
            rotation: piece.rotation,
            x,
            y,
            rotated,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn original_width(&self) -> f64 {
        if self.rotated { self.height } else { self.width }
    }

    pub fn original_height(&self) -> f64 {
        if self.rotated { self.width } else { self.height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offcut {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Offcut {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub width: f64,
    pub height: f64,
    pub pieces: Vec<PlacedPiece>,
    pub offcuts: Vec<Offcut>,
    /// Area removed by the saw blade, including slivers thinner than the kerf.
    #[serde(default)]
    pub kerf_loss: f64,
}

impl Panel {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn used_area(&self) -> f64 {
        self.pieces.iter().map(PlacedPiece::area).sum()
    }

    pub fn offcut_area(&self) -> f64 {
        self.offcuts.iter().map(Offcut::area).sum()
    }

    /// Percentage of the panel covered by pieces.
    pub fn efficiency(&self) -> f64 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        self.used_area() / area * 100.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub panels: Vec<Panel>,
    /// Pieces that could not be placed on any panel, in pending order.
    pub unplaced: Vec<Piece>,
    pub stock: Rect,
}

impl Solution {
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    pub fn unplaced_ids(&self) -> Vec<&str> {
        self.unplaced.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn placed_pieces(&self) -> impl Iterator<Item = &PlacedPiece> {
        self.panels.iter().flat_map(|p| &p.pieces)
    }

    pub fn total_waste_percent(&self) -> f64 {
        let total_stock_area = self.stock.area() * self.panels.len() as f64;
        if total_stock_area <= 0.0 {
            return 0.0;
        }
        let total_used: f64 = self.placed_pieces().map(PlacedPiece::area).sum();
        (total_stock_area - total_used) / total_stock_area * 100.0
    }
}
