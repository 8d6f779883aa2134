//! Grid construction options, visual theme and per-field edit modes.
//!
//! Both [`GridOptions`] and [`Theme`] are plain values handed to the grid at
//! construction; nothing reads global style state.

use serde::Deserialize;

use crate::error::{GridError, Result};
use crate::render::colors::{CssColor, Rgb};

/// Edit mode of a bound field (a grid column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldMode {
    /// Cells can be edited in place.
    #[default]
    Editable,
    /// Cells render normally but reject edits.
    ReadOnly,
    /// Cells render dimmed and reject edits.
    Disabled,
}

impl FieldMode {
    pub fn is_editable(self) -> bool {
        self == Self::Editable
    }
}

/// Horizontal text alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Options recognised by `create_grid`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridOptions {
    /// Uniform row height in pixels.
    pub row_height: f64,
    pub min_col_width: f64,
    pub max_col_width: f64,
    /// Width given to columns that have not been resized.
    pub default_col_width: f64,
    /// Float precision; 0 renders the shortest round-trip form.
    pub precision: u8,
    /// Start every column in [`FieldMode::ReadOnly`].
    pub read_only: bool,
    pub row_header_width: f64,
    pub col_header_height: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            row_height: 20.0,
            min_col_width: 30.0,
            max_col_width: 300.0,
            default_col_width: 60.0,
            precision: 0,
            read_only: false,
            row_header_width: 50.0,
            col_header_height: 25.0,
        }
    }
}

/// Largest precision accepted (significant digits of an f64).
pub const MAX_PRECISION: u8 = 17;

impl GridOptions {
    /// Reject option sets the layouts cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(GridError::Config(format!(
                "rowHeight must be positive, got {}",
                self.row_height
            )));
        }
        if !(self.min_col_width.is_finite() && self.min_col_width > 0.0) {
            return Err(GridError::Config(format!(
                "minColWidth must be positive, got {}",
                self.min_col_width
            )));
        }
        if !self.max_col_width.is_finite() || self.max_col_width < self.min_col_width {
            return Err(GridError::Config(format!(
                "maxColWidth {} is below minColWidth {}",
                self.max_col_width, self.min_col_width
            )));
        }
        if !self.default_col_width.is_finite() {
            return Err(GridError::Config("defaultColWidth must be finite".into()));
        }
        if self.precision > MAX_PRECISION {
            return Err(GridError::Config(format!(
                "precision {} exceeds {MAX_PRECISION}",
                self.precision
            )));
        }
        for (name, value) in [
            ("rowHeaderWidth", self.row_header_width),
            ("colHeaderHeight", self.col_header_height),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GridError::Config(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Initial mode for every column.
    pub fn default_field_mode(&self) -> FieldMode {
        if self.read_only {
            FieldMode::ReadOnly
        } else {
            FieldMode::Editable
        }
    }
}

/// Immutable colours and fonts used by the renderer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    /// Surface background outside the table.
    pub background: CssColor,
    pub cell_background: CssColor,
    /// Background of the inline editor.
    pub entry_background: CssColor,
    pub grid_color: CssColor,
    pub text_color: CssColor,
    pub disabled_text_color: CssColor,
    pub row_selected_color: CssColor,
    pub col_selected_color: CssColor,
    pub multiple_selection_color: CssColor,
    pub box_outline_color: CssColor,
    pub header_background: CssColor,
    pub header_text_color: CssColor,
    pub header_border_color: CssColor,
    pub header_selected_background: CssColor,
    pub header_selected_text_color: CssColor,
    pub font: String,
    pub header_font: String,
    pub line_width: f64,
    pub outline_width: f64,
    /// Horizontal padding inside a cell.
    pub cell_inset: f64,
    pub text_align: TextAlign,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            cell_background: "#F4F4F3".to_string(),
            entry_background: "#FFFFFF".to_string(),
            grid_color: "#ABB1AD".to_string(),
            text_color: "#000000".to_string(),
            disabled_text_color: "#8A8A8A".to_string(),
            row_selected_color: "#E4DED4".to_string(),
            col_selected_color: "#E4E3E4".to_string(),
            multiple_selection_color: "#E0F2F7".to_string(),
            box_outline_color: "#084B8A".to_string(),
            header_background: "#E6E6E6".to_string(),
            header_text_color: "#333333".to_string(),
            header_border_color: "#C6C6C6".to_string(),
            header_selected_background: "#D3F0E0".to_string(),
            header_selected_text_color: "#1B5D39".to_string(),
            font: "12px Arial".to_string(),
            header_font: "bold 12px Arial".to_string(),
            line_width: 1.0,
            outline_width: 2.0,
            cell_inset: 2.0,
            text_align: TextAlign::Left,
        }
    }
}

impl Theme {
    /// Every colour must be `#RRGGBB`.
    pub fn validate(&self) -> Result<()> {
        let colors = [
            ("background", &self.background),
            ("cellBackground", &self.cell_background),
            ("entryBackground", &self.entry_background),
            ("gridColor", &self.grid_color),
            ("textColor", &self.text_color),
            ("disabledTextColor", &self.disabled_text_color),
            ("rowSelectedColor", &self.row_selected_color),
            ("colSelectedColor", &self.col_selected_color),
            ("multipleSelectionColor", &self.multiple_selection_color),
            ("boxOutlineColor", &self.box_outline_color),
            ("headerBackground", &self.header_background),
            ("headerTextColor", &self.header_text_color),
            ("headerBorderColor", &self.header_border_color),
            ("headerSelectedBackground", &self.header_selected_background),
            ("headerSelectedTextColor", &self.header_selected_text_color),
        ];
        for (name, value) in colors {
            if Rgb::from_hex(value).is_none() {
                return Err(GridError::Config(format!(
                    "{name} must be a #RRGGBB colour, got {value:?}"
                )));
            }
        }
        if !(self.line_width > 0.0 && self.outline_width > 0.0 && self.cell_inset >= 0.0) {
            return Err(GridError::Config(
                "lineWidth/outlineWidth must be positive and cellInset non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// A complete grid configuration document: `{"options": {...}, "theme": {...}}`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub options: GridOptions,
    pub theme: Theme,
}

impl GridConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.options.validate()?;
        config.theme.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GridOptions::default().validate().is_ok());
        assert!(Theme::default().validate().is_ok());
    }

    #[test]
    fn test_config_from_json_camel_case() {
        let config = GridConfig::from_json(
            r##"{"options": {"rowHeight": 24, "readOnly": true, "precision": 3},
                 "theme": {"gridColor": "#101010"}}"##,
        )
        .unwrap();
        assert_eq!(config.options.row_height, 24.0);
        assert_eq!(config.options.precision, 3);
        assert_eq!(config.options.default_field_mode(), FieldMode::ReadOnly);
        assert_eq!(config.options.min_col_width, 30.0);
        assert_eq!(config.theme.grid_color, "#101010");
        assert_eq!(config.theme.cell_background, "#F4F4F3");
    }

    #[test]
    fn test_invalid_options_rejected() {
        let opts = GridOptions {
            min_col_width: 100.0,
            max_col_width: 50.0,
            ..GridOptions::default()
        };
        assert!(matches!(opts.validate(), Err(GridError::Config(_))));

        let opts = GridOptions {
            row_height: 0.0,
            ..GridOptions::default()
        };
        assert!(opts.validate().is_err());

        let err = GridConfig::from_json(r#"{"theme": {"textColor": "blue"}}"#);
        assert!(matches!(err, Err(GridError::Config(_))));
    }
}
