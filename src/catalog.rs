//! # Paper and Card Catalog
//!
//! Fixed lookup tables for the supported paper sheets and card formats.
//!
//! ## Paper Sizes
//!
//! | Name | Width | Height |
//! |------|-------|--------|
//! | A4 | 210mm | 297mm |
//! | A3 | 297mm | 420mm |
//! | SuperA3 | 325mm | 475mm |
//!
//! ## Card Sizes
//!
//! | Name | Width | Height | Typical use |
//! |------|-------|--------|-------------|
//! | mini | 41mm | 63mm | Mini USA |
//! | minieuro | 45mm | 68mm | Mini Euro |
//! | bridge | 57mm | 87mm | Bridge |
//! | euro | 59mm | 92mm | Euro |
//! | poker | 63mm | 88mm | Poker / TCG |
//! | square | 60mm | 70mm | Square-ish tiles |
//!
//! ## Usage
//!
//! ```
//! use printard::catalog::{CardSize, PaperSize};
//!
//! let paper = PaperSize::by_name("a4").unwrap();
//! let card = CardSize::by_name("Poker").unwrap();
//! assert_eq!(paper.dimensions().width, 210.0);
//! assert_eq!(card.label(), "Poker (63×88mm)");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PrintardError;
use crate::geometry::Dimensions;

/// Paper sheet formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    SuperA3,
}

impl PaperSize {
    pub const ALL: [PaperSize; 3] = [PaperSize::A4, PaperSize::A3, PaperSize::SuperA3];

    /// Catalog name (also the serialized form).
    pub fn name(&self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::A3 => "A3",
            PaperSize::SuperA3 => "SuperA3",
        }
    }

    /// Portrait dimensions in millimeters.
    pub fn dimensions(&self) -> Dimensions {
        match self {
            PaperSize::A4 => Dimensions::new(210.0, 297.0),
            PaperSize::A3 => Dimensions::new(297.0, 420.0),
            PaperSize::SuperA3 => Dimensions::new(325.0, 475.0),
        }
    }

    /// Human-readable label for pickers.
    pub fn label(&self) -> String {
        let d = self.dimensions();
        format!("{} ({}×{}mm)", self.name(), d.width, d.height)
    }

    /// Case-insensitive lookup.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "a4" => Some(PaperSize::A4),
            "a3" => Some(PaperSize::A3),
            "supera3" | "super-a3" | "super_a3" | "a3+" => Some(PaperSize::SuperA3),
            _ => None,
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaperSize {
    type Err = PrintardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::by_name(s).ok_or_else(|| PrintardError::UnknownSize(format!("paper '{}'", s)))
    }
}

/// Card formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSize {
    Mini,
    MiniEuro,
    Bridge,
    Euro,
    #[default]
    Poker,
    Square,
}

impl CardSize {
    pub const ALL: [CardSize; 6] = [
        CardSize::Mini,
        CardSize::MiniEuro,
        CardSize::Bridge,
        CardSize::Euro,
        CardSize::Poker,
        CardSize::Square,
    ];

    /// Catalog name (also the serialized form).
    pub fn name(&self) -> &'static str {
        match self {
            CardSize::Mini => "mini",
            CardSize::MiniEuro => "minieuro",
            CardSize::Bridge => "bridge",
            CardSize::Euro => "euro",
            CardSize::Poker => "poker",
            CardSize::Square => "square",
        }
    }

    /// Card dimensions in millimeters.
    pub fn dimensions(&self) -> Dimensions {
        match self {
            CardSize::Mini => Dimensions::new(41.0, 63.0),
            CardSize::MiniEuro => Dimensions::new(45.0, 68.0),
            CardSize::Bridge => Dimensions::new(57.0, 87.0),
            CardSize::Euro => Dimensions::new(59.0, 92.0),
            CardSize::Poker => Dimensions::new(63.0, 88.0),
            CardSize::Square => Dimensions::new(60.0, 70.0),
        }
    }

    /// Human-readable label for pickers.
    pub fn label(&self) -> &'static str {
        match self {
            CardSize::Mini => "Mini USA (41×63mm)",
            CardSize::MiniEuro => "Mini Euro (45×68mm)",
            CardSize::Bridge => "Bridge (57×87mm)",
            CardSize::Euro => "Euro (59×92mm)",
            CardSize::Poker => "Poker (63×88mm)",
            CardSize::Square => "Square (60×70mm)",
        }
    }

    /// Case-insensitive lookup.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "mini" => Some(CardSize::Mini),
            "minieuro" | "mini-euro" | "mini_euro" => Some(CardSize::MiniEuro),
            "bridge" => Some(CardSize::Bridge),
            "euro" => Some(CardSize::Euro),
            "poker" => Some(CardSize::Poker),
            "square" => Some(CardSize::Square),
            _ => None,
        }
    }
}

impl fmt::Display for CardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CardSize {
    type Err = PrintardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::by_name(s).ok_or_else(|| PrintardError::UnknownSize(format!("card '{}'", s)))
    }
}

/// All paper sizes in catalog order.
pub fn list_papers() -> &'static [PaperSize] {
    &PaperSize::ALL
}

/// All card sizes in catalog order.
pub fn list_cards() -> &'static [CardSize] {
    &CardSize::ALL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_by_name() {
        assert_eq!(PaperSize::by_name("A4"), Some(PaperSize::A4));
        assert_eq!(PaperSize::by_name("a3"), Some(PaperSize::A3));
        assert_eq!(PaperSize::by_name("SUPERA3"), Some(PaperSize::SuperA3));
        assert_eq!(PaperSize::by_name("letter"), None);
    }

    #[test]
    fn test_card_by_name() {
        assert_eq!(CardSize::by_name("poker"), Some(CardSize::Poker));
        assert_eq!(CardSize::by_name("Mini-Euro"), Some(CardSize::MiniEuro));
        assert_eq!(CardSize::by_name(" bridge "), Some(CardSize::Bridge));
        assert_eq!(CardSize::by_name("tarot"), None);
    }

    #[test]
    fn test_names_round_trip_through_lookup() {
        for paper in PaperSize::ALL {
            assert_eq!(PaperSize::by_name(paper.name()), Some(paper));
        }
        for card in CardSize::ALL {
            assert_eq!(CardSize::by_name(card.name()), Some(card));
        }
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "tarot".parse::<CardSize>().unwrap_err();
        assert!(matches!(err, PrintardError::UnknownSize(_)));
    }

    #[test]
    fn test_all_dimensions_valid() {
        for paper in PaperSize::ALL {
            assert!(paper.dimensions().is_valid());
        }
        for card in CardSize::ALL {
            assert!(card.dimensions().is_valid());
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&PaperSize::SuperA3).unwrap(), "\"SuperA3\"");
        assert_eq!(serde_json::to_string(&CardSize::MiniEuro).unwrap(), "\"minieuro\"");
        let card: CardSize = serde_json::from_str("\"square\"").unwrap();
        assert_eq!(card, CardSize::Square);
    }

    #[test]
    fn test_lists() {
        let papers: Vec<&str> = list_papers().iter().map(|p| p.name()).collect();
        assert_eq!(papers, vec!["A4", "A3", "SuperA3"]);
        assert_eq!(list_cards().len(), 6);
        assert!(list_cards().contains(&CardSize::Poker));
    }
}
