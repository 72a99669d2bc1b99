//! QR symbol encoding

use qrcode::{Color as ModuleColor, EcLevel, QrCode};
use tracing::trace;

use crate::Result;

/// A square grid of QR modules, without quiet zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    dark: Vec<bool>,
}

/// A horizontal run of dark modules within one matrix row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleRun {
    pub row: usize,
    pub start: usize,
    pub len: usize,
}

impl QrMatrix {
    /// Encode a payload with error correction level L. Any string is
    /// accepted as long as it fits the largest symbol version.
    pub fn encode(payload: &str) -> Result<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)?;
        let width = code.width();
        let dark: Vec<bool> = code
            .to_colors()
            .into_iter()
            .map(|c| c == ModuleColor::Dark)
            .collect();
        trace!(
            "Encoded {} byte payload into {}x{} modules",
            payload.len(),
            width,
            width
        );
        Ok(Self { width, dark })
    }

    /// Modules per side
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }

    pub fn dark_count(&self) -> usize {
        self.dark.iter().filter(|d| **d).count()
    }

    /// Dark modules merged into horizontal runs, row by row
    pub fn dark_runs(&self) -> Vec<ModuleRun> {
        let mut runs = Vec::new();
        for row in 0..self.width {
            let mut column = 0;
            while column < self.width {
                if !self.is_dark(column, row) {
                    column += 1;
                    continue;
                }
                let start = column;
                while column < self.width && self.is_dark(column, row) {
                    column += 1;
                }
                runs.push(ModuleRun {
                    row,
                    start,
                    len: column - start,
                });
            }
        }
        runs
    }
}
