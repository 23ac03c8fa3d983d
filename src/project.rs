//! Saved projects: a piece list serialized as a JSON array.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{EdgeBanding, Piece, Rotation};

/// A row of the cut list as entered by a user: one size, many units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceRequest {
    pub width: f64,
    pub height: f64,
    pub quantity: u32,
    #[serde(default)]
    pub width_banding: EdgeBanding,
    #[serde(default)]
    pub height_banding: EdgeBanding,
    #[serde(default)]
    pub rotation: Rotation,
}

impl PieceRequest {
    pub fn new(width: f64, height: f64, quantity: u32) -> Self {
        Self {
            width,
            height,
            quantity,
            width_banding: EdgeBanding::None,
            height_banding: EdgeBanding::None,
            rotation: Rotation::Allowed,
        }
    }

    /// One piece per unit, each with a fresh identity.
    pub fn expand(&self) -> Vec<Piece> {
        (0..self.quantity)
            .map(|_| {
                Piece::new(Uuid::new_v4().to_string(), self.width, self.height)
                    .with_banding(self.width_banding, self.height_banding)
                    .with_rotation(self.rotation)
            })
            .collect()
    }
}

pub fn load_pieces<R: Read>(reader: R) -> Result<Vec<Piece>> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    if !value.is_array() {
        return Err(Error::InvalidProject(
            "expected a JSON array of pieces".to_string(),
        ));
    }
    let pieces: Vec<Piece> = serde_json::from_value(value)?;
    if let Some(piece) = pieces.iter().find(|p| p.id.is_empty()) {
        return Err(Error::InvalidProject(format!(
            "piece {}x{} has an empty id",
            piece.width, piece.height
        )));
    }
    Ok(pieces)
}

pub fn save_pieces<W: Write>(writer: W, pieces: &[Piece]) -> Result<()> {
    serde_json::to_writer_pretty(writer, pieces)?;
    Ok(())
}

pub fn read_project(path: impl AsRef<Path>) -> Result<Vec<Piece>> {
    let file = File::open(path)?;
    load_pieces(BufReader::new(file))
}

pub fn write_project(path: impl AsRef<Path>, pieces: &[Piece]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    save_pieces(&mut writer, pieces)?;
    writer.flush()?;
    Ok(())
}
