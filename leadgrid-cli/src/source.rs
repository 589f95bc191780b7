//! In-memory prospect list endpoint.
//!
//! Answers [`FetchRequest`]s the way a remote list API would: filter, sort,
//! then cut one page.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use chrono::NaiveDate;
use leadgrid_lib::filter::split_csv;
use leadgrid_lib::grid::SortDirection;
use leadgrid_lib::host::FetchRequest;
use leadgrid_lib::host::FetchResponse;
use leadgrid_lib::model::Query;
use leadgrid_lib::model::QueryValue;

use crate::error::Result;
use crate::prospect::Prospect;

const SEED: &str = include_str!("../data/prospects.json");

/// Shared handle on the stored prospects. Clones see the same rows.
#[derive(Debug, Clone)]
pub struct ProspectSource {
    rows: Rc<RefCell<Vec<Prospect>>>,
}

impl ProspectSource {
    /// Loads the bundled seed data.
    pub fn seeded() -> Result<Self> {
        Self::from_json(SEED)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<Prospect> = serde_json::from_str(json)?;
        log::info!("[source] loaded {} prospects", rows.len());
        Ok(Self {
            rows: Rc::new(RefCell::new(rows)),
        })
    }

    pub fn fetch(&self, request: &FetchRequest, first_page: usize) -> FetchResponse<Prospect> {
        let rows = self.rows.borrow();
        let mut matching: Vec<Prospect> = rows
            .iter()
            .filter(|p| matches_filters(p, &request.filters))
            .cloned()
            .collect();

        if let Some(sort) = &request.sort {
            matching.sort_by(|a, b| {
                let ordering = compare(a, b, &sort.column_id);
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let total = matching.len();
        let data: Vec<Prospect> = matching
            .into_iter()
            .skip(request.page_index(first_page) * request.page_size)
            .take(request.page_size)
            .collect();
        log::debug!(
            "[source] page {} -> {} of {} rows",
            request.page,
            data.len(),
            total
        );
        FetchResponse { data, total }
    }

    /// Sets the status of the given prospects. Returns how many were found.
    pub fn set_status(&self, ids: &[String], status: &str) -> usize {
        let mut rows = self.rows.borrow_mut();
        let mut updated = 0;
        for row in rows.iter_mut().filter(|p| ids.contains(&p.id)) {
            row.status = status.to_string();
            updated += 1;
        }
        updated
    }
}

fn text<'q>(filters: &'q Query, key: &str) -> Option<&'q str> {
    filters.get(key).and_then(QueryValue::as_text).filter(|s| !s.is_empty())
}

fn date(filters: &Query, key: &str) -> Option<NaiveDate> {
    text(filters, key).and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

fn matches_filters(prospect: &Prospect, filters: &Query) -> bool {
    if let Some(q) = text(filters, "q") {
        let needle = q.to_lowercase();
        if !prospect.name.to_lowercase().contains(&needle) && !prospect.company.to_lowercase().contains(&needle) {
            return false;
        }
    }
    if let Some(status) = text(filters, "status")
        && prospect.status != status
    {
        return false;
    }
    if let Some(in_group) = text(filters, "in_group")
        && prospect.in_group != (in_group == "yes")
    {
        return false;
    }
    if let Some(tags) = text(filters, "tags") {
        let wanted = split_csv(tags);
        if !wanted.iter().any(|tag| prospect.tags.contains(tag)) {
            return false;
        }
    }
    if let Some(company_id) = text(filters, "company_id")
        && prospect.company_id != company_id
    {
        return false;
    }
    date(filters, "created_from").is_none_or(|from| prospect.created_at >= from)
        && date(filters, "created_to").is_none_or(|to| prospect.created_at <= to)
}

fn compare(a: &Prospect, b: &Prospect, column_id: &str) -> Ordering {
    match column_id {
        "name" => a.name.cmp(&b.name),
        "company" => a.company.cmp(&b.company),
        "status" => a.status.cmp(&b.status),
        "score" => a.score.cmp(&b.score),
        "created_at" => a.created_at.cmp(&b.created_at),
        other => {
            log::warn!("[source] cannot sort by '{}'", other);
            Ordering::Equal
        }
    }
}

#[cfg(test)]
mod tests {
    use leadgrid_lib::config::GridConfig;
    use leadgrid_lib::grid::SortState;

    use super::*;

    const ROWS: &str = r#"[
        { "id": "a", "name": "Ada", "company_id": "c-1", "company": "Acme", "status": "new",
          "in_group": true, "tags": ["hot"], "score": 10, "created_at": "2024-01-05" },
        { "id": "b", "name": "Bo", "company_id": "c-2", "company": "Globex", "status": "lost",
          "in_group": false, "tags": [], "score": 30, "created_at": "2024-03-01" },
        { "id": "c", "name": "Cy", "company_id": "c-1", "company": "Acme", "status": "new",
          "in_group": false, "tags": ["warm", "smb"], "score": 20, "created_at": "2024-06-12" }
    ]"#;

    fn request(filters: Query) -> FetchRequest {
        FetchRequest {
            page: 1,
            page_size: 10,
            sort: None,
            filters,
        }
    }

    fn ids(response: &FetchResponse<Prospect>) -> Vec<&str> {
        response.data.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_seed_parses() {
        let source = ProspectSource::seeded().unwrap();
        let response = source.fetch(&request(Query::new()), 1);
        assert!(response.total > 0);
    }

    #[test]
    fn test_filters() {
        let source = ProspectSource::from_json(ROWS).unwrap();

        let response = source.fetch(&request(Query::new().with("status", "new").with("tags", "warm,cold")), 1);
        assert_eq!(ids(&response), vec!["c"]);

        let response = source.fetch(&request(Query::new().with("q", "acme").with("in_group", "yes")), 1);
        assert_eq!(ids(&response), vec!["a"]);

        let response = source.fetch(&request(Query::new().with("created_from", "2024-02-01")), 1);
        assert_eq!(response.total, 2);
    }

    #[test]
    fn test_sort_and_page() {
        let source = ProspectSource::from_json(ROWS).unwrap();
        let config = GridConfig::default();
        let mut request = request(Query::new());
        request.sort = Some(SortState::desc("score"));
        request.page = 2;
        request.page_size = 2;

        let response = source.fetch(&request, config.first_page);
        assert_eq!(ids(&response), vec!["a"]);
        assert_eq!(response.total, 3);
    }

    #[test]
    fn test_set_status() {
        let source = ProspectSource::from_json(ROWS).unwrap();
        assert_eq!(source.set_status(&["a".to_string(), "zz".to_string()], "contacted"), 1);
        let response = source.fetch(&request(Query::new().with("status", "contacted")), 1);
        assert_eq!(ids(&response), vec!["a"]);
    }
}
