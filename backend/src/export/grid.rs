//! Page tiling. All lengths are millimetres with the origin at the bottom
//! left of the page, as PDF expects.

use crate::error::{BadgeError, BadgeResult};
use badge_common::model::badge::BadgeConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub spacing: f64,
    pub columns: u32,
    pub rows: u32,
    per_page: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    /// Badge size on paper after fitting it into a cell.
    pub badge_width: f64,
    pub badge_height: f64,
}

/// Where one badge lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub page: usize,
    pub column: u32,
    pub row: u32,
    pub x: f64,
    pub y: f64,
}

impl GridLayout {
    pub fn new(config: &BadgeConfig) -> BadgeResult<Self> {
        if config.badges_per_row == 0 || config.badges_per_col == 0 {
            return Err(BadgeError::InvalidInput(
                "badges_per_row and badges_per_col must be at least 1".to_string(),
            ));
        }
        if config.badge_width == 0 || config.badge_height == 0 {
            return Err(BadgeError::InvalidInput("badge size must be positive".to_string()));
        }

        let (page_width, page_height) = config.page_size.dimensions_mm();
        let columns = config.badges_per_row;
        let rows = config.badges_per_col;
        let per_page = (columns as usize)
            .checked_mul(rows as usize)
            .ok_or_else(|| {
                BadgeError::InvalidInput(format!("a {}x{} grid is too large", columns, rows))
            })?;
        let margin = config.margin_mm;
        let spacing = config.spacing_mm;

        let cell_width =
            (page_width - 2.0 * margin - f64::from(columns - 1) * spacing) / f64::from(columns);
        let cell_height =
            (page_height - 2.0 * margin - f64::from(rows - 1) * spacing) / f64::from(rows);
        if !(cell_width > 0.0 && cell_height > 0.0) {
            return Err(BadgeError::InvalidInput(format!(
                "margin and spacing leave no room for a {}x{} grid",
                columns, rows
            )));
        }

        let aspect = f64::from(config.badge_width) / f64::from(config.badge_height);
        let (badge_width, badge_height) = if cell_width / cell_height > aspect {
            (cell_height * aspect, cell_height)
        } else {
            (cell_width, cell_width / aspect)
        };

        Ok(Self {
            page_width,
            page_height,
            margin,
            spacing,
            columns,
            rows,
            per_page,
            cell_width,
            cell_height,
            badge_width,
            badge_height,
        })
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Pages needed for `total` badges; an empty export still has one page.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.per_page()).max(1)
    }

    /// Bottom-left corner of badge `index`, filling rows left to right and
    /// pages top to bottom.
    pub fn slot(&self, index: usize) -> Slot {
        let per_page = self.per_page();
        let page = index / per_page;
        let within = index % per_page;
        let column = (within % self.columns as usize) as u32;
        let row = (within / self.columns as usize) as u32;

        let col_f = f64::from(column);
        let row_f = f64::from(row);
        let x = self.margin
            + col_f * (self.cell_width + self.spacing)
            + (self.cell_width - self.badge_width) / 2.0;
        let y = self.page_height
            - self.margin
            - (row_f + 1.0) * self.cell_height
            - row_f * self.spacing
            + (self.cell_height - self.badge_height) / 2.0;

        Slot {
            page,
            column,
            row,
            x,
            y,
        }
    }
}
