//! Endpoints of the remote store. The transport itself lives in the shell;
//! the core only builds requests against these URLs and interprets the
//! responses it is handed back.

use crate::model::RecordId;

pub const API_BASE: &str = "https://685013d7e7c42cfd17974a33.mockapi.io";

#[must_use]
pub fn records_url() -> String {
    format!("{API_BASE}/taxes")
}

#[must_use]
pub fn categories_url() -> String {
    format!("{API_BASE}/countries")
}

#[must_use]
pub fn record_url(id: &RecordId) -> String {
    format!("{API_BASE}/taxes/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(
            records_url(),
            "https://685013d7e7c42cfd17974a33.mockapi.io/taxes"
        );
        assert_eq!(
            categories_url(),
            "https://685013d7e7c42cfd17974a33.mockapi.io/countries"
        );
        assert_eq!(
            record_url(&RecordId::new("17")),
            "https://685013d7e7c42cfd17974a33.mockapi.io/taxes/17"
        );
    }
}
