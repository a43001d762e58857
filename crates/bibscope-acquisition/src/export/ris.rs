//! RIS export (spec §4.2, §6): tag-per-line records, CRLF line endings,
//! tags in column 1, each record terminated by `ER  - `.

use bibscope_common::types::Publication;

const CRLF: &str = "\r\n";

fn push_tag(out: &mut String, tag: &str, value: &str) {
    out.push_str(tag);
    out.push_str("  - ");
    out.push_str(value);
    out.push_str(CRLF);
}

fn render_entry(record: &Publication) -> String {
    let mut out = String::new();
    push_tag(&mut out, "TY", record.publication_type.ris_tag());
    push_tag(&mut out, "TI", &record.title);

    for author in &record.authors {
        push_tag(&mut out, "AU", &author.name);
    }
    if let Some(year) = record.year {
        push_tag(&mut out, "PY", &year.to_string());
    }
    if let Some(journal) = &record.journal {
        push_tag(&mut out, "JO", journal);
    }
    for keyword in &record.keywords {
        push_tag(&mut out, "KW", keyword);
    }
    if let Some(doi) = &record.doi {
        push_tag(&mut out, "DO", doi);
    }
    if let Some(url) = &record.url {
        push_tag(&mut out, "UR", url);
    }
    if let Some(abstract_text) = &record.abstract_text {
        push_tag(&mut out, "AB", abstract_text);
    }

    out.push_str("ER  - ");
    out.push_str(CRLF);
    out
}

pub fn render(records: &[Publication]) -> String {
    records.iter().map(render_entry).collect::<Vec<_>>().join(CRLF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_record_is_terminated_by_er() {
        let record = Publication::new("A Title", "fixture");
        let rendered = render(&[record]);
        assert!(rendered.contains("ER  - \r\n"));
    }

    #[test]
    fn uses_crlf_line_endings() {
        let record = Publication::new("A Title", "fixture");
        let rendered = render(&[record]);
        assert!(rendered.contains("TY  - GEN\r\n"));
    }

    #[test]
    fn repeats_au_tag_per_author() {
        let mut record = Publication::new("A Title", "fixture");
        record.authors.push(bibscope_common::types::Author { name: "Ada".into(), ..Default::default() });
        record.authors.push(bibscope_common::types::Author { name: "Grace".into(), ..Default::default() });
        let rendered = render(&[record]);
        assert_eq!(rendered.matches("AU  - ").count(), 2);
    }
}
