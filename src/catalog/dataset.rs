use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, AppResult};

use super::source::ImageSource;
use super::work::Work;

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    List(Vec<Work>),
    Wrapped { works: Vec<Work> },
}

/// The ordered, immutable work list every view derives from.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    works: Vec<Work>,
    base_dir: PathBuf,
}

impl Dataset {
    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|source| AppError::dataset_load(path, source.to_string()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_json_str(&raw, base_dir).map_err(|err| match err {
            AppError::InvalidArgument(message) => AppError::dataset_load(path, message),
            other => other,
        })
    }

    pub fn from_json_str(raw: &str, base_dir: impl Into<PathBuf>) -> AppResult<Self> {
        let parsed = serde_json::from_str::<DatasetFile>(raw)
            .map_err(|source| AppError::invalid_argument(format!("invalid dataset: {source}")))?;
        let works = match parsed {
            DatasetFile::List(works) | DatasetFile::Wrapped { works } => works,
        };
        if works.is_empty() {
            return Err(AppError::invalid_argument("dataset contains no works"));
        }
        Ok(Self {
            works,
            base_dir: base_dir.into(),
        })
    }

    pub fn from_works(works: Vec<Work>) -> Self {
        Self {
            works,
            base_dir: PathBuf::from("."),
        }
    }

    pub fn len(&self) -> usize {
        self.works.len()
    }

    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Work> {
        self.works.get(index)
    }

    pub fn works(&self) -> &[Work] {
        &self.works
    }

    pub fn all_indices(&self) -> Vec<usize> {
        (0..self.works.len()).collect()
    }

    /// Featured works in dataset order.
    pub fn featured_indices(&self) -> Vec<usize> {
        self.works
            .iter()
            .enumerate()
            .filter_map(|(idx, work)| work.featured.then_some(idx))
            .collect()
    }

    /// Distinct years, newest first.
    pub fn years_desc(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.works.iter().map(|work| work.year).collect();
        years.into_iter().rev().collect()
    }

    pub fn image_source(&self, index: usize) -> Option<ImageSource> {
        self.get(index)
            .map(|work| ImageSource::resolve(&work.image_url, &self.base_dir))
    }

    pub fn thumbnail_source(&self, index: usize) -> Option<ImageSource> {
        self.get(index)
            .map(|work| ImageSource::resolve(work.thumbnail_or_image(), &self.base_dir))
    }
}

#[cfg(test)]
pub(crate) fn sample_dataset() -> Dataset {
    use super::work::sample_work;
    use super::Availability;

    let mut dawn = sample_work("dawn", "Dawn Harbor", 2024);
    dawn.featured = true;
    dawn.availability = Some(Availability::Available);
    let mut ocean = sample_work("ocean", "Ocean Depths", 2024);
    ocean.description = Some("Layered blues of the deep sea".to_string());
    ocean.print_url = Some("https://prints.example.com/ocean".to_string());
    let mut field = sample_work("field", "Field Study", 2023);
    field.featured = true;
    field.availability = Some(Availability::Sold);
    let forest = sample_work("forest", "Forest Ocean", 2023);
    let mut quiet = sample_work("quiet", "Quiet Room", 2022);
    quiet.is_for_sale = true;
    Dataset::from_works(vec![dawn, ocean, field, forest, quiet])
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::catalog::ImageSource;
    use crate::error::AppError;

    use super::Dataset;

    const SAMPLE: &str = r#"[
        {"id":"a","title":"A","year":2023,"image_url":"img/a.jpg","featured":true},
        {"id":"b","title":"B","year":2024,"image_url":"img/b.jpg"},
        {"id":"c","title":"C","year":2023,"image_url":"https://cdn.example.com/c.jpg","featured":true}
    ]"#;

    #[test]
    fn featured_indices_keep_dataset_order() {
        let dataset = Dataset::from_json_str(SAMPLE, "/data").expect("dataset should parse");
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.featured_indices(), vec![0, 2]);
        assert_eq!(dataset.years_desc(), vec![2024, 2023]);
    }

    #[test]
    fn accepts_wrapped_object_form() {
        let wrapped = format!(r#"{{"works": {SAMPLE}}}"#);
        let dataset = Dataset::from_json_str(&wrapped, "/data").expect("dataset should parse");
        assert_eq!(dataset.all_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn image_sources_resolve_against_dataset_dir() {
        let dataset = Dataset::from_json_str(SAMPLE, "/data").expect("dataset should parse");
        assert_eq!(
            dataset.image_source(0),
            Some(ImageSource::File(PathBuf::from("/data/img/a.jpg")))
        );
        assert_eq!(
            dataset.thumbnail_source(2),
            Some(ImageSource::Remote(
                "https://cdn.example.com/c.jpg".to_string()
            ))
        );
        assert_eq!(dataset.image_source(9), None);
    }

    #[test]
    fn empty_or_malformed_dataset_is_rejected() {
        assert!(Dataset::from_json_str("[]", ".").is_err());
        assert!(Dataset::from_json_str("{not json", ".").is_err());
    }

    #[test]
    fn load_from_missing_path_reports_dataset_error() {
        let err = Dataset::load_from_path("/definitely/missing/portfolio.json")
            .expect_err("missing dataset should fail");
        assert!(matches!(err, AppError::DatasetLoad { .. }));
    }
}
