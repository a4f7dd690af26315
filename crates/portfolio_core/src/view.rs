//! Read-only projections used by the public site.
//!
//! # Invariants
//! - Hidden projects never appear in any projection.
//! - Tag matching is exact and case-sensitive.

use crate::model::project::Project;

/// Synthetic filter tag selecting every visible project.
pub const ALL_TAG: &str = "All";

/// Active project filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProjectFilter {
    #[default]
    All,
    Tag(String),
}

impl ProjectFilter {
    /// Maps a selected tag label to a filter; `"All"` is the synthetic tag.
    pub fn parse(label: &str) -> Self {
        if label == ALL_TAG {
            Self::All
        } else {
            Self::Tag(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_TAG,
            Self::Tag(tag) => tag,
        }
    }
}

/// Visible projects in document order.
pub fn visible_projects(projects: &[Project]) -> Vec<&Project> {
    projects.iter().filter(|project| project.visible).collect()
}

/// `"All"` followed by distinct tags of visible projects, first appearance first.
pub fn project_tags(projects: &[Project]) -> Vec<String> {
    let mut tags = vec![ALL_TAG.to_string()];
    for tag in visible_projects(projects)
        .into_iter()
        .flat_map(|project| project.tags.iter())
    {
        if !tags.iter().any(|seen| seen == tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Visible projects matching `filter`, in document order.
pub fn filter_projects<'a>(projects: &'a [Project], filter: &ProjectFilter) -> Vec<&'a Project> {
    match filter {
        ProjectFilter::All => visible_projects(projects),
        ProjectFilter::Tag(tag) => visible_projects(projects)
            .into_iter()
            .filter(|project| project.has_tag(tag))
            .collect(),
    }
}

/// Splits free text into paragraphs on blank-line breaks.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .collect()
}
