//! Size presets shared by the field and the data table.

/// Density preset.
///
/// Each component maps the preset to its own spacing: the field changes its
/// padding, the table changes the gaps around the header and between rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Size {
    Small,
    #[default]
    Medium,
    Large,
}

impl Size {
    /// Horizontal padding, in cells, inside a component's chrome.
    pub fn horizontal_padding(self) -> u16 {
        match self {
            Size::Small => 0,
            Size::Medium => 1,
            Size::Large => 2,
        }
    }

    /// Vertical padding, in rows, above and below single-line content.
    pub fn vertical_padding(self) -> u16 {
        match self {
            Size::Small | Size::Medium => 0,
            Size::Large => 1,
        }
    }
}
