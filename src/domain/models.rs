// Domain models mapped from Open Library records, independent of any UI

use serde::{Deserialize, Serialize};

/// One row of a search result list. `work_id` is the stable key for
/// deduplication and favorites membership; a later fetch of the same id
/// overwrites rather than merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub work_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub cover_id: Option<i64>,
    pub first_publish_year: Option<i64>,
    pub edition_count: Option<i64>,
}

impl BookSummary {
    pub fn author_line(&self) -> String {
        if self.authors.is_empty() {
            "Unknown Author".to_string()
        } else {
            self.authors.join(", ")
        }
    }
}

/// Full record behind a single work, fetched independently of the list
/// and not cached.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    pub work_id: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_ids: Vec<i64>,
    pub first_publish_date: Option<String>,
    pub subjects: Vec<String>,
}

impl BookDetail {
    pub fn description_text(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or("No description available")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_line_joins_or_falls_back() {
        let mut b = BookSummary {
            work_id: "OL45883W".into(),
            title: "Fantastic Mr Fox".into(),
            authors: vec!["Roald Dahl".into(), "Quentin Blake".into()],
            cover_id: None,
            first_publish_year: Some(1970),
            edition_count: None,
        };
        assert_eq!(b.author_line(), "Roald Dahl, Quentin Blake");

        b.authors.clear();
        assert_eq!(b.author_line(), "Unknown Author");
    }

    #[test]
    fn description_text_placeholder() {
        let d = BookDetail {
            work_id: "OL1W".into(),
            title: "Untitled".into(),
            description: None,
            cover_ids: vec![],
            first_publish_date: None,
            subjects: vec![],
        };
        assert_eq!(d.description_text(), "No description available");
    }
}
