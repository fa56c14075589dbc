use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Semantic category of a stored document, derived once at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Image,
    Pdf,
    Word,
    Excel,
    Powerpoint,
    Text,
    Zip,
    Video,
    Audio,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Image,
        Category::Pdf,
        Category::Word,
        Category::Excel,
        Category::Powerpoint,
        Category::Text,
        Category::Zip,
        Category::Video,
        Category::Audio,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Pdf => "pdf",
            Category::Word => "word",
            Category::Excel => "excel",
            Category::Powerpoint => "powerpoint",
            Category::Text => "text",
            Category::Zip => "zip",
            Category::Video => "video",
            Category::Audio => "audio",
            Category::Other => "other",
        }
    }

    /// Parse a stored category tag; anything unknown reads back as `Other`.
    pub fn from_stored(value: &str) -> Category {
        value.parse().unwrap_or(Category::Other)
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| anyhow::anyhow!("Invalid category: {}", s))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_tag() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_stored_tag_reads_as_other() {
        assert_eq!(Category::from_stored("spreadsheet"), Category::Other);
        assert_eq!(Category::from_stored("PDF"), Category::Pdf);
    }
}
