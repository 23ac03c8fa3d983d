use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Rect;

pub const DEFAULT_PANEL_WIDTH: f64 = 244.0;
pub const DEFAULT_PANEL_HEIGHT: f64 = 183.0;
/// A 3 mm blade, in centimetres.
pub const DEFAULT_KERF: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizerConfig {
    pub panel_width: f64,
    pub panel_height: f64,
    pub kerf: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            panel_width: DEFAULT_PANEL_WIDTH,
            panel_height: DEFAULT_PANEL_HEIGHT,
            kerf: DEFAULT_KERF,
        }
    }
}

impl OptimizerConfig {
    pub fn new(panel_width: f64, panel_height: f64, kerf: f64) -> Self {
        Self {
            panel_width,
            panel_height,
            kerf,
        }
    }

    pub fn stock(&self) -> Rect {
        Rect::new(self.panel_width, self.panel_height)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.panel_width.is_finite() && self.panel_width > 0.0)
            || !(self.panel_height.is_finite() && self.panel_height > 0.0)
        {
            return Err(Error::InvalidInput(format!(
                "panel dimensions must be positive, got {}x{}",
                self.panel_width, self.panel_height
            )));
        }
        if !(self.kerf.is_finite() && self.kerf >= 0.0) {
            return Err(Error::InvalidInput(format!(
                "kerf must be zero or positive, got {}",
                self.kerf
            )));
        }
        Ok(())
    }
}

/// Unit prices used by the cost summary. Banding is priced per metre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostRates {
    pub panel_cost: f64,
    pub banding_cost_per_m: f64,
}
