use super::work::{Work, present};

/// Short meta line: year and medium.
pub fn meta_line(work: &Work) -> String {
    join_meta(&[work.year.to_string().as_str(), work.medium.trim()])
}

/// Meta line for the lightbox, with dimensions appended when known.
pub fn full_meta_line(work: &Work) -> String {
    join_meta(&[
        work.year.to_string().as_str(),
        work.medium.trim(),
        work.dimensions.trim(),
    ])
}

fn join_meta(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" \u{2022} ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub label: Option<&'static str>,
    pub text: String,
}

/// Rows of the expanded info panel, in display order. Absent fields are skipped.
pub fn detail_rows(work: &Work) -> Vec<DetailRow> {
    let fields: [(Option<&'static str>, &Option<String>); 6] = [
        (None, &work.description),
        (Some("Technique"), &work.technique),
        (Some("Inspiration"), &work.inspiration),
        (Some("Series"), &work.series),
        (None, &work.dimensions_note),
        (Some("Artist statement"), &work.artist_statement),
    ];
    fields
        .into_iter()
        .filter_map(|(label, value)| {
            present(value).map(|text| DetailRow {
                label,
                text: text.to_string(),
            })
        })
        .collect()
}

pub fn hero_announcement(work: &Work) -> String {
    format!("Now viewing {}, {}", work.title, work.year)
}

pub fn lightbox_announcement(work: &Work) -> String {
    format!(
        "Viewing {}. Use arrow keys to navigate, escape to close.",
        work.title
    )
}

#[cfg(test)]
mod tests {
    use crate::catalog::work::sample_work;

    use super::{detail_rows, full_meta_line, hero_announcement, meta_line};

    #[test]
    fn meta_lines_skip_empty_parts() {
        let mut work = sample_work("a", "Ocean Depths", 2024);
        assert_eq!(meta_line(&work), "2024 \u{2022} Oil on canvas");
        assert_eq!(
            full_meta_line(&work),
            "2024 \u{2022} Oil on canvas \u{2022} 24 x 36 in"
        );

        work.dimensions = "  ".to_string();
        assert_eq!(full_meta_line(&work), "2024 \u{2022} Oil on canvas");
    }

    #[test]
    fn detail_rows_keep_order_and_omit_blank_fields() {
        let mut work = sample_work("a", "Ocean Depths", 2024);
        work.description = Some("Tidal study".to_string());
        work.technique = Some("   ".to_string());
        work.series = Some("Coastlines".to_string());
        work.dimensions_note = Some("Framed".to_string());

        let rows = detail_rows(&work);
        let rendered = rows
            .iter()
            .map(|row| match row.label {
                Some(label) => format!("{label}: {}", row.text),
                None => row.text.clone(),
            })
            .collect::<Vec<_>>();
        assert_eq!(
            rendered,
            vec!["Tidal study", "Series: Coastlines", "Framed"]
        );
    }

    #[test]
    fn hero_announcement_names_title_and_year() {
        let work = sample_work("a", "Ocean Depths", 2024);
        assert_eq!(hero_announcement(&work), "Now viewing Ocean Depths, 2024");
    }
}
