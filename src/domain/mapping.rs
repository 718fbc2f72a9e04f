// Mapping from Open Library DTOs to domain models

use super::models::{BookDetail, BookSummary};
use crate::ol_client::{SearchDoc, WorkResponse};

/// Catalog keys are path-shaped ("/works/OL45883W"); the segment after
/// the last slash is the stable identifier. A bare key passes through.
pub fn work_id_from_key(key: &str) -> String {
    match key.rsplit_once('/') {
        Some((_, id)) => id.to_string(),
        None => key.to_string(),
    }
}

pub fn summary_from_doc(doc: &SearchDoc) -> BookSummary {
    BookSummary {
        work_id: work_id_from_key(&doc.key),
        title: doc.title.clone(),
        authors: doc.author_name.clone().unwrap_or_default(),
        cover_id: doc.cover_i,
        first_publish_year: doc.first_publish_year,
        edition_count: doc.edition_count,
    }
}

pub fn detail_from_work(work_id: &str, work: &WorkResponse) -> BookDetail {
    BookDetail {
        work_id: work
            .key
            .as_deref()
            .map(work_id_from_key)
            .unwrap_or_else(|| work_id.to_string()),
        title: work.title.clone().unwrap_or_else(|| "Untitled".into()),
        description: work.description.clone(),
        cover_ids: work.covers.clone(),
        first_publish_date: work.first_publish_date.clone(),
        subjects: work.subjects.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_id_strips_path_prefix() {
        assert_eq!(work_id_from_key("/works/OL45883W"), "OL45883W");
        assert_eq!(work_id_from_key("OL45883W"), "OL45883W");
    }

    #[test]
    fn summary_from_doc_maps_fields() {
        let doc = SearchDoc {
            key: "/works/OL893415W".into(),
            title: "Dune".into(),
            author_name: Some(vec!["Frank Herbert".into()]),
            cover_i: Some(11481354),
            first_publish_year: Some(1965),
            edition_count: Some(120),
            number_of_pages_median: Some(604),
        };
        let s = summary_from_doc(&doc);
        assert_eq!(s.work_id, "OL893415W");
        assert_eq!(s.title, "Dune");
        assert_eq!(s.authors, vec!["Frank Herbert".to_string()]);
        assert_eq!(s.cover_id, Some(11481354));
        assert_eq!(s.first_publish_year, Some(1965));
        assert_eq!(s.edition_count, Some(120));
    }

    #[test]
    fn detail_falls_back_to_requested_id_and_untitled() {
        let work = WorkResponse {
            key: None,
            title: None,
            description: None,
            covers: vec![],
            first_publish_date: None,
            subjects: vec![],
        };
        let d = detail_from_work("OL893415W", &work);
        assert_eq!(d.work_id, "OL893415W");
        assert_eq!(d.title, "Untitled");
    }
}
