use serde::{Deserialize, Deserializer};

/// Sale status shown as a badge and used to pick the outbound action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Available,
    Sold,
    PrintsAvailable,
    PrivateCollection,
}

impl Availability {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Available" | "available" => Some(Self::Available),
            "Sold" | "sold" => Some(Self::Sold),
            "Prints Available" | "PrintsAvailable" | "prints-available" => {
                Some(Self::PrintsAvailable)
            }
            "Private Collection" | "PrivateCollection" | "private-collection" => {
                Some(Self::PrivateCollection)
            }
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Sold => "Sold",
            Self::PrintsAvailable => "Prints Available",
            Self::PrivateCollection => "Private Collection",
        }
    }
}

/// One portfolio artwork. Never mutated after the dataset loads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Work {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    pub year: i32,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub dimensions: String,
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    #[serde(default, alias = "thumbnailUrl")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technique: Option<String>,
    #[serde(default)]
    pub inspiration: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default, alias = "dimensionsNote")]
    pub dimensions_note: Option<String>,
    #[serde(default, alias = "artistStatement")]
    pub artist_statement: Option<String>,
    #[serde(default, deserialize_with = "deserialize_availability")]
    pub availability: Option<Availability>,
    #[serde(default, alias = "isForSale")]
    pub is_for_sale: bool,
    #[serde(default, alias = "printUrl")]
    pub print_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl Work {
    /// Explicit availability, or the legacy `is_for_sale` flag when absent.
    pub fn effective_availability(&self) -> Availability {
        self.availability.unwrap_or(if self.is_for_sale {
            Availability::Available
        } else {
            Availability::Sold
        })
    }

    /// Case-insensitive substring match over title, medium, year and description.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_term(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle)
            || self.medium.to_lowercase().contains(needle)
            || self.year.to_string().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(needle))
    }

    pub fn thumbnail_or_image(&self) -> &str {
        present(&self.thumbnail_url).unwrap_or(&self.image_url)
    }
}

/// Normalizes a search term the way every search surface expects it.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Treats empty and whitespace-only optional strings as absent.
pub fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

fn deserialize_availability<'de, D>(deserializer: D) -> Result<Option<Availability>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Availability::parse))
}

#[cfg(test)]
pub(crate) fn sample_work(id: &str, title: &str, year: i32) -> Work {
    Work {
        id: id.to_string(),
        title: title.to_string(),
        year,
        medium: "Oil on canvas".to_string(),
        dimensions: "24 x 36 in".to_string(),
        image_url: format!("images/{id}.jpg"),
        thumbnail_url: None,
        description: None,
        technique: None,
        inspiration: None,
        series: None,
        dimensions_note: None,
        artist_statement: None,
        availability: None,
        is_for_sale: false,
        print_url: None,
        featured: false,
    }
}

#[cfg(test)]
mod tests {
    use super::{Availability, Work, normalize_term, sample_work};

    #[test]
    fn deserializes_camel_case_legacy_fields_and_numeric_ids() {
        let work: Work = serde_json::from_str(
            r#"{
                "id": 7,
                "title": "Ocean Depths",
                "year": 2024,
                "medium": "Acrylic",
                "imageUrl": "img/ocean.jpg",
                "thumbnailUrl": "img/ocean-thumb.jpg",
                "isForSale": true,
                "printUrl": "https://prints.example.com/ocean",
                "dimensionsNote": "framed"
            }"#,
        )
        .expect("work should deserialize");

        assert_eq!(work.id, "7");
        assert_eq!(work.image_url, "img/ocean.jpg");
        assert_eq!(work.thumbnail_or_image(), "img/ocean-thumb.jpg");
        assert!(work.is_for_sale);
        assert_eq!(work.dimensions_note.as_deref(), Some("framed"));
        assert_eq!(work.effective_availability(), Availability::Available);
        assert!(!work.featured);
    }

    #[test]
    fn unknown_availability_falls_back_to_legacy_flag() {
        let work: Work = serde_json::from_str(
            r#"{"id":"a","title":"A","year":2020,"image_url":"a.jpg","availability":"On Loan"}"#,
        )
        .expect("work should deserialize");
        assert_eq!(work.availability, None);
        assert_eq!(work.effective_availability(), Availability::Sold);

        let work: Work = serde_json::from_str(
            r#"{"id":"b","title":"B","year":2020,"image_url":"b.jpg","availability":"Prints Available"}"#,
        )
        .expect("work should deserialize");
        assert_eq!(work.availability, Some(Availability::PrintsAvailable));
    }

    #[test]
    fn matches_term_covers_title_medium_year_and_description() {
        let mut work = sample_work("a", "Ocean Depths", 2024);
        work.description = Some("Tidal study in blue".to_string());

        assert!(work.matches_term(&normalize_term("OCEAN")));
        assert!(work.matches_term(&normalize_term("oil on")));
        assert!(work.matches_term(&normalize_term("2024")));
        assert!(work.matches_term(&normalize_term(" tidal ")));
        assert!(!work.matches_term(&normalize_term("mirage")));
        assert!(work.matches_term(""));
    }
}
