//! JSON export (spec §4.2, §6): an array of publications in canonical shape.

use bibscope_common::types::Publication;
use bibscope_common::{BibscopeError, Result};

pub fn render(records: &[Publication]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|e| BibscopeError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_serde_json() {
        let records = vec![Publication::new("AI in Education", "fixture")];
        let rendered = render(&records).unwrap();
        let parsed: Vec<Publication> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "AI in Education");
    }
}
