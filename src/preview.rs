//! Fixed-size image thumbnails for the search screen. Images are decoded with
//! the `image` crate, resized to a small pixel grid, and drawn with upper-half
//! block characters so each terminal cell carries two vertically stacked pixels.

use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use thiserror::Error;

/// Preview width in terminal cells (one pixel per cell horizontally).
pub const PREVIEW_COLUMNS: u16 = 24;
/// Preview height in terminal cells (two pixels per cell vertically).
pub const PREVIEW_ROWS: u16 = 12;

const UPPER_HALF_BLOCK: &str = "\u{2580}";

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("preview size must be at least one cell")]
    EmptySize,
}

/// Decoded and resized RGB pixels, row-major, `columns` wide and
/// `rows * 2` tall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    columns: u16,
    rows: u16,
    pixels: Vec<[u8; 3]>,
}

impl ImagePreview {
    /// Load `path` at the standard preview size.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreviewError> {
        Self::load_sized(path, PREVIEW_COLUMNS, PREVIEW_ROWS)
    }

    pub fn load_sized(
        path: impl AsRef<Path>,
        columns: u16,
        rows: u16,
    ) -> Result<Self, PreviewError> {
        if columns == 0 || rows == 0 {
            return Err(PreviewError::EmptySize);
        }
        let image = image::open(path)?;
        Ok(Self::from_image(&image, columns, rows))
    }

    /// Resize an already decoded image. The aspect ratio is not preserved; the
    /// preview slot always has the same footprint.
    pub fn from_image(image: &DynamicImage, columns: u16, rows: u16) -> Self {
        let width = u32::from(columns.max(1));
        let height = u32::from(rows.max(1)) * 2;
        let resized = image
            .resize_exact(width, height, FilterType::Lanczos3)
            .to_rgb8();

        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            pixels: resized.pixels().map(|pixel| pixel.0).collect(),
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// RGB value at pixel coordinates, where `y` counts half-cells.
    pub fn pixel(&self, x: u16, y: u16) -> Option<[u8; 3]> {
        if x >= self.columns || y >= self.rows * 2 {
            return None;
        }
        let index = usize::from(y) * usize::from(self.columns) + usize::from(x);
        self.pixels.get(index).copied()
    }

    /// One styled line per terminal row.
    pub fn lines(&self) -> Vec<Line<'static>> {
        (0..self.rows)
            .map(|row| {
                let spans: Vec<Span<'static>> = (0..self.columns)
                    .map(|col| {
                        let top = self.pixel(col, row * 2).unwrap_or_default();
                        let bottom = self.pixel(col, row * 2 + 1).unwrap_or_default();
                        Span::styled(
                            UPPER_HALF_BLOCK,
                            Style::default().fg(rgb(top)).bg(rgb(bottom)),
                        )
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}
