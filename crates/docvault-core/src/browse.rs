//! Browse engine
//!
//! Produces the filtered, ordered view of the caller's record list for a given
//! query. Pure and deterministic; re-run on every query change. Filtering happens
//! before sorting and the full result set is returned (no pagination here).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::{Category, FileRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    CreatedAt,
    SizeBytes,
    Category,
}

impl FromStr for SortField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "created_at" | "createdat" | "date" => Ok(SortField::CreatedAt),
            "size_bytes" | "sizebytes" | "size" => Ok(SortField::SizeBytes),
            "category" | "type" => Ok(SortField::Category),
            _ => Err(anyhow::anyhow!("Invalid sort field: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    /// Newest first.
    fn default() -> Self {
        SortSpec {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Selecting the current field flips the direction; a new field starts ascending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            SortSpec::new(field, self.direction.flipped())
        } else {
            SortSpec::new(field, SortDirection::Asc)
        }
    }
}

/// Category filter; `All` lets every record through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    fn accepts(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(s.parse()?))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseQuery {
    /// Free text matched against name, description and tags.
    pub text: String,
    pub category: CategoryFilter,
    pub sort: SortSpec,
}

impl BrowseQuery {
    pub fn is_filtered(&self) -> bool {
        !self.text.trim().is_empty() || self.category != CategoryFilter::All
    }
}

/// Apply `query` to `records`, returning the matching records in display order.
pub fn view(records: &[FileRecord], query: &BrowseQuery) -> Vec<FileRecord> {
    let needle = query.text.trim().to_lowercase();

    let mut visible: Vec<FileRecord> = records
        .iter()
        .filter(|r| needle.is_empty() || matches_text(r, &needle))
        .filter(|r| query.category.accepts(r.category))
        .cloned()
        .collect();

    // sort_by is stable, so equal keys keep their incoming order
    visible.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort.field);
        match query.sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    visible
}

fn matches_text(record: &FileRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
        || record
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(needle))
}

fn compare(a: &FileRecord, b: &FileRecord, field: SortField) -> Ordering {
    match field {
        SortField::Name => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::SizeBytes => a.size_bytes.cmp(&b.size_bytes),
        SortField::Category => a.category.as_str().cmp(b.category.as_str()),
    }
}
