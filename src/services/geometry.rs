//! Key size computation from viewport geometry.
//!
//! Keys are square. Their size is the largest that lets the widest row fit
//! the viewport width and every row fit the height left over after the
//! header, the optional text area and padding, never dropping below a
//! minimum size.

/// Available drawing area and the space reserved around the keyboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Total width
    pub width: f64,
    /// Total height
    pub height: f64,
    /// Height of the header bar
    pub header_height: f64,
    /// Height of the text area (0 when hidden)
    pub text_area_height: f64,
    /// Horizontal padding subtracted from the width
    pub horizontal_padding: f64,
    /// Vertical padding subtracted from the height
    pub vertical_padding: f64,
    /// Bottom safe-area inset (notches, home indicators)
    pub safe_area_bottom: f64,
}

impl Viewport {
    /// Width left for keys.
    #[must_use]
    pub fn available_width(&self) -> f64 {
        (self.width - self.horizontal_padding).max(0.0)
    }

    /// Height left for keys.
    #[must_use]
    pub fn available_height(&self) -> f64 {
        (self.height
            - self.header_height
            - self.text_area_height
            - self.vertical_padding
            - self.safe_area_bottom)
            .max(0.0)
    }
}

/// Shape of a packed grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    /// Number of rows
    pub rows: usize,
    /// Length of the longest row
    pub max_columns: usize,
}

impl From<&crate::models::KeyGrid> for GridShape {
    fn from(grid: &crate::models::KeyGrid) -> Self {
        Self {
            rows: grid.row_count(),
            max_columns: grid.max_row_len(),
        }
    }
}

/// Spacing and clamping parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingParams {
    /// Gap between adjacent keys
    pub gap: f64,
    /// Smallest key size ever returned
    pub min_size: f64,
    /// Fraction of the computed size actually used
    pub fill_ratio: f64,
}

/// Computes the side length of a square key.
#[must_use]
pub fn compute_key_size(viewport: &Viewport, shape: &GridShape, params: &SpacingParams) -> f64 {
    if shape.rows == 0 || shape.max_columns == 0 {
        return params.min_size;
    }

    let rows = shape.rows as f64;
    let columns = shape.max_columns as f64;
    let available_width = viewport.available_width();
    let available_height = viewport.available_height();

    let key_width = (available_width - (columns - 1.0) * params.gap) / columns;
    let key_height = (available_height - (rows - 1.0) * params.gap) / rows;

    let size = key_width.min(key_height).min(available_height / rows) * params.fill_ratio;
    size.max(params.min_size)
}
