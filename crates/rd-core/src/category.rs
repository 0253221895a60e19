//! Marker color categories derived from cuisine text

use serde::{Deserialize, Serialize};

/// Fixed marker palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCategory {
    DarkBlue,
    Orange,
    Green,
    DarkGreen,
    Purple,
    DarkPurple,
    CadetBlue,
    LightRed,
    Beige,
    DarkRed,
    Red,
    Blue,
    Pink,
    Gray,
    LightGray,
    LightBlue,
}

/// Ordered keyword rules, first match wins
const RULES: &[(&[&str], ColorCategory)] = &[
    (&["pizza"], ColorCategory::DarkBlue),
    (&["burger"], ColorCategory::Orange),
    (&["sandwich"], ColorCategory::LightBlue),
    (&["sushi", "japonais"], ColorCategory::Green),
    (&["chinois", "asiatique", "thaï"], ColorCategory::DarkGreen),
    (&["indien"], ColorCategory::DarkPurple),
    (&["italien"], ColorCategory::Purple),
    (&["français", "crêpes"], ColorCategory::CadetBlue),
    (&["grec"], ColorCategory::LightRed),
    (&["libanais", "kebab"], ColorCategory::Beige),
    (&["mexicain"], ColorCategory::DarkRed),
    (&["américain"], ColorCategory::Blue),
    (&["steakhouse", "poulet"], ColorCategory::Red),
    (&["déjeuner"], ColorCategory::Pink),
    (&["terroir"], ColorCategory::Gray),
];

impl ColorCategory {
    pub const ALL: [ColorCategory; 16] = [
        ColorCategory::DarkBlue,
        ColorCategory::Orange,
        ColorCategory::Green,
        ColorCategory::DarkGreen,
        ColorCategory::Purple,
        ColorCategory::DarkPurple,
        ColorCategory::CadetBlue,
        ColorCategory::LightRed,
        ColorCategory::Beige,
        ColorCategory::DarkRed,
        ColorCategory::Red,
        ColorCategory::Blue,
        ColorCategory::Pink,
        ColorCategory::Gray,
        ColorCategory::LightGray,
        ColorCategory::LightBlue,
    ];

    /// Category for cuisines no rule recognizes
    pub const UNCATEGORIZED: ColorCategory = ColorCategory::LightGray;

    /// Override used for the highlighted marker
    pub const ALERT: ColorCategory = ColorCategory::Red;

    pub fn name(self) -> &'static str {
        match self {
            ColorCategory::DarkBlue => "darkblue",
            ColorCategory::Orange => "orange",
            ColorCategory::Green => "green",
            ColorCategory::DarkGreen => "darkgreen",
            ColorCategory::Purple => "purple",
            ColorCategory::DarkPurple => "darkpurple",
            ColorCategory::CadetBlue => "cadetblue",
            ColorCategory::LightRed => "lightred",
            ColorCategory::Beige => "beige",
            ColorCategory::DarkRed => "darkred",
            ColorCategory::Red => "red",
            ColorCategory::Blue => "blue",
            ColorCategory::Pink => "pink",
            ColorCategory::Gray => "gray",
            ColorCategory::LightGray => "lightgray",
            ColorCategory::LightBlue => "lightblue",
        }
    }

    /// Marker fill as `[r, g, b]`
    pub fn rgb(self) -> [u8; 3] {
        match self {
            ColorCategory::DarkBlue => [0x00, 0x66, 0xA2],
            ColorCategory::Orange => [0xF6, 0x97, 0x30],
            ColorCategory::Green => [0x72, 0xB0, 0x26],
            ColorCategory::DarkGreen => [0x72, 0x82, 0x24],
            ColorCategory::Purple => [0xD2, 0x52, 0xB9],
            ColorCategory::DarkPurple => [0x5B, 0x39, 0x6B],
            ColorCategory::CadetBlue => [0x43, 0x69, 0x78],
            ColorCategory::LightRed => [0xFF, 0x8E, 0x7F],
            ColorCategory::Beige => [0xFF, 0xCB, 0x92],
            ColorCategory::DarkRed => [0xA2, 0x33, 0x36],
            ColorCategory::Red => [0xD6, 0x3E, 0x2A],
            ColorCategory::Blue => [0x38, 0xAA, 0xDD],
            ColorCategory::Pink => [0xFF, 0x91, 0xEA],
            ColorCategory::Gray => [0x57, 0x57, 0x57],
            ColorCategory::LightGray => [0xA3, 0xA3, 0xA3],
            ColorCategory::LightBlue => [0x8A, 0xDA, 0xFF],
        }
    }

    /// Marker fill as `#RRGGBB`
    pub fn hex(self) -> String {
        let [r, g, b] = self.rgb();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Color for text drawn in this category's color
    ///
    /// Beige is unreadable on white, so it gets a brown substitute.
    pub fn text_rgb(self) -> [u8; 3] {
        match self {
            ColorCategory::Beige => [0x8B, 0x45, 0x13],
            other => other.rgb(),
        }
    }

    pub fn text_hex(self) -> String {
        let [r, g, b] = self.text_rgb();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl std::fmt::Display for ColorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Map cuisine text to its marker category
///
/// Matching is a lowercase substring test against the ordered rules.
/// A missing cuisine reads as `"none"`, which no rule matches.
pub fn classify(cuisine: Option<&str>) -> ColorCategory {
    let text = cuisine.unwrap_or("none").to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(_, category)| *category)
        .unwrap_or(ColorCategory::UNCATEGORIZED)
}
