use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

use crate::record::JobRecord;

pub const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Substituted for a missing or unparsable `publishedAt`.
pub fn epoch_fallback() -> NaiveDateTime {
    NaiveDateTime::default()
}

/// Parses the source timestamp format. Anything else becomes the epoch, which
/// keeps the record out of any realistic window without raising an error.
pub fn parse_published_at(text: Option<&str>) -> NaiveDateTime {
    let Some(text) = text else {
        debug!("Job without publishedAt, using epoch");
        return epoch_fallback();
    };
    match NaiveDateTime::parse_from_str(text, PUBLISHED_AT_FORMAT) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Could not parse publishedAt '{}' ({}), using epoch", text, e);
            epoch_fallback()
        }
    }
}

/// Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        DateWindow { start, end }
    }

    /// Both bounds at midnight of the given day.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow::new(start.and_time(Default::default()), end.and_time(Default::default()))
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

pub fn location_matches(record: &JobRecord, city: &str) -> bool {
    record.location_names().any(|name| name == city)
}

pub fn company_matches(record: &JobRecord, company: &str) -> bool {
    record.company_name() == Some(company)
}

/// Both must hold; there is no "either" mode.
pub fn location_and_company_match(record: &JobRecord, city: &str, company: &str) -> bool {
    location_matches(record, city) && company_matches(record, company)
}

/// Every skill must appear, case-insensitively, in the body or the title.
pub fn skills_match<S: AsRef<str>>(record: &JobRecord, skills: &[S]) -> bool {
    if skills.is_empty() {
        return true;
    }
    let body = record.body_text().to_lowercase();
    let title = record.title_text().to_lowercase();

    skills.iter().all(|skill| {
        let skill = skill.as_ref().to_lowercase();
        body.contains(&skill) || title.contains(&skill)
    })
}

pub fn published_within(record: &JobRecord, window: &DateWindow) -> bool {
    window.contains(parse_published_at(record.published_at.as_deref()))
}

/// Optional predicates ANDed together. An unset predicate always passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub location: Option<String>,
    pub company: Option<String>,
    pub skills: Vec<String>,
    pub window: Option<DateWindow>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        FilterCriteria::default()
    }

    pub fn location(mut self, city: impl Into<String>) -> Self {
        self.location = Some(city.into());
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn window(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.company.is_none() && self.skills.is_empty() && self.window.is_none()
    }

    pub fn matches(&self, record: &JobRecord) -> bool {
        if let Some(city) = &self.location {
            if !location_matches(record, city) {
                return false;
            }
        }
        if let Some(company) = &self.company {
            if !company_matches(record, company) {
                return false;
            }
        }
        if let Some(window) = &self.window {
            if !published_within(record, window) {
                return false;
            }
        }
        skills_match(record, &self.skills)
    }

    pub fn apply(&self, records: Vec<JobRecord>) -> Vec<JobRecord> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Company, Location};

    fn job(title: &str, body: &str, company: &str, cities: &[&str], published: &str) -> JobRecord {
        JobRecord {
            id: 1,
            title: Some(title.to_string()),
            body: Some(body.to_string()),
            company: Some(Company { name: Some(company.to_string()) }),
            published_at: Some(published.to_string()),
            description: None,
            wage: None,
            locations: cities.iter().map(|c| Location { name: Some(c.to_string()) }).collect(),
        }
    }

    fn year_2024() -> DateWindow {
        DateWindow::from_dates(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[test]
    fn location_and_company_both_required() {
        let record = job("Dev", "", "Acme", &["Lisbon"], "2024-03-01 10:00:00");
        assert!(location_and_company_match(&record, "Lisbon", "Acme"));
        assert!(!location_and_company_match(&record, "Porto", "Acme"));
        assert!(!location_and_company_match(&record, "Lisbon", "Other"));
        // exact, case-sensitive
        assert!(!location_and_company_match(&record, "lisbon", "Acme"));
    }

    #[test]
    fn skill_found_in_either_field() {
        let record = job("Python Engineer", "must know SQL and AWS", "Acme", &[], "");
        assert!(skills_match(&record, &["python", "sql"]));
        assert!(!skills_match(&record, &["python", "go"]));
    }

    #[test]
    fn adding_a_skill_never_adds_matches() {
        let records = vec![
            job("Rust Dev", "tokio and sql", "A", &[], ""),
            job("Python Dev", "django, sql", "B", &[], ""),
            job("Go Dev", "kubernetes", "C", &[], ""),
        ];
        let base = ["sql"];
        let narrowed = ["sql", "rust"];
        let base_hits = records.iter().filter(|r| skills_match(r, &base)).count();
        let narrow_hits = records.iter().filter(|r| skills_match(r, &narrowed)).count();
        assert_eq!(base_hits, 2);
        assert_eq!(narrow_hits, 1);
    }

    #[test]
    fn malformed_date_falls_back_to_epoch() {
        assert_eq!(epoch_fallback().to_string(), "1970-01-01 00:00:00");
        assert_eq!(parse_published_at(Some("2024-13-40 00:00:00")), epoch_fallback());
        assert_eq!(parse_published_at(Some("2024-05-01")), epoch_fallback());
        assert_eq!(parse_published_at(None), epoch_fallback());

        let record = job("Dev", "", "Acme", &[], "2024-13-40 00:00:00");
        assert!(!published_within(&record, &year_2024()));
    }

    #[test]
    fn window_is_inclusive() {
        let window = year_2024();
        assert!(published_within(&job("", "", "", &[], "2024-01-01 00:00:00"), &window));
        assert!(published_within(&job("", "", "", &[], "2024-12-31 00:00:00"), &window));
        assert!(!published_within(&job("", "", "", &[], "2024-12-31 00:00:01"), &window));
        assert!(!published_within(&job("", "", "", &[], "2023-12-31 23:59:59"), &window));
    }

    #[test]
    fn window_covering_epoch_admits_malformed_dates() {
        let window = DateWindow::from_dates(
            NaiveDate::from_ymd_opt(1960, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        );
        assert!(published_within(&job("", "", "", &[], "garbage"), &window));
    }

    #[test]
    fn criteria_combines_with_and() {
        let records = vec![
            job("Rust Dev", "sql", "Acme", &["Lisbon"], "2024-03-01 10:00:00"),
            job("Rust Dev", "sql", "Acme", &["Porto"], "2024-03-01 10:00:00"),
            job("Rust Dev", "sql", "Acme", &["Lisbon"], "2022-03-01 10:00:00"),
            job("Java Dev", "sql", "Acme", &["Lisbon"], "2024-03-01 10:00:00"),
        ];
        let criteria = FilterCriteria::new()
            .location("Lisbon")
            .company("Acme")
            .skills(["rust"])
            .window(year_2024());
        let kept = criteria.apply(records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].location_names().next(), Some("Lisbon"));
    }

    #[test]
    fn empty_criteria_keeps_everything() {
        let records = vec![job("a", "", "", &[], "bad"), job("b", "", "", &[], "bad")];
        assert_eq!(FilterCriteria::new().apply(records).len(), 2);
    }
}
