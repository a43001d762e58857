//! CSV export (spec §4.2, §6): flattened, nested fields (authors, keywords)
//! joined with `; `, RFC-4180 quoting.

use bibscope_common::types::Publication;

const HEADER: &[&str] = &[
    "id", "title", "abstract", "authors", "keywords", "year", "journal", "source", "url",
    "citation_count", "doi", "source_native_id", "publication_type",
];

/// RFC-4180 quoting: a field is quoted when it contains a comma, quote, or
/// newline; embedded quotes are doubled.
fn quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn row(record: &Publication) -> String {
    let authors = record
        .authors
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    let keywords = record.keywords.join("; ");

    let fields = [
        record.id.to_string(),
        record.title.clone(),
        record.abstract_text.clone().unwrap_or_default(),
        authors,
        keywords,
        record.year.map(|y| y.to_string()).unwrap_or_default(),
        record.journal.clone().unwrap_or_default(),
        record.source.clone(),
        record.url.clone().unwrap_or_default(),
        record.citation_count.to_string(),
        record.doi.clone().unwrap_or_default(),
        record.source_native_id.clone().unwrap_or_default(),
        record.publication_type.bibtex_tag().to_string(),
    ];

    fields.iter().map(|f| quote(f)).collect::<Vec<_>>().join(",")
}

pub fn render(records: &[Publication]) -> String {
    let mut lines = vec![HEADER.join(",")];
    lines.extend(records.iter().map(row));
    lines.join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_fields_containing_commas() {
        let mut record = Publication::new("Title, with a comma", "fixture");
        record.abstract_text = Some("plain text".into());
        let rendered = render(&[record]);
        assert!(rendered.contains("\"Title, with a comma\""));
    }

    #[test]
    fn doubles_embedded_quotes() {
        let record = Publication::new("He said \"hello\"", "fixture");
        let rendered = render(&[record]);
        assert!(rendered.contains("\"He said \"\"hello\"\"\""));
    }

    #[test]
    fn joins_nested_authors_and_keywords_with_semicolon() {
        let mut record = Publication::new("Title", "fixture");
        record.authors.push(bibscope_common::types::Author { name: "Ada".into(), ..Default::default() });
        record.authors.push(bibscope_common::types::Author { name: "Grace".into(), ..Default::default() });
        record.keywords = vec!["ai".into(), "ml".into()];
        let rendered = render(&[record]);
        assert!(rendered.contains("Ada; Grace"));
        assert!(rendered.contains("ai; ml"));
    }

    #[test]
    fn header_row_is_first() {
        let rendered = render(&[]);
        assert!(rendered.starts_with("id,title,abstract"));
    }
}
