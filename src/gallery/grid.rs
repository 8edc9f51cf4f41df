use crate::catalog::Dataset;
use crate::catalog::work::normalize_term;
use crate::config::GridConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    All,
    Year(i32),
}

impl FilterKey {
    pub fn label(self) -> String {
        match self {
            Self::All => "All".to_string(),
            Self::Year(year) => year.to_string(),
        }
    }

    pub fn admits(self, year: i32) -> bool {
        match self {
            Self::All => true,
            Self::Year(wanted) => wanted == year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEntry {
    Page(usize),
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMove {
    Left,
    Right,
    Up,
    Down,
}

/// Filtered, searched and paginated view over the dataset.
#[derive(Debug, Clone)]
pub struct GridView {
    filter: FilterKey,
    term: String,
    items: Vec<usize>,
    page: usize,
    page_size: usize,
    columns: usize,
    max_visible_pages: usize,
    selection: usize,
    current: Option<usize>,
}

impl GridView {
    pub fn new(dataset: &Dataset, config: &GridConfig) -> Self {
        let mut view = Self {
            filter: FilterKey::All,
            term: String::new(),
            items: Vec::new(),
            page: 1,
            page_size: config.page_size.max(1),
            columns: config.columns.max(1),
            max_visible_pages: config.max_visible_pages.max(1),
            selection: 0,
            current: None,
        };
        view.recompute(dataset);
        view
    }

    pub fn set_filter(&mut self, dataset: &Dataset, key: FilterKey) {
        self.filter = key;
        self.recompute(dataset);
    }

    /// Narrows the active filter set. An empty term restores the whole filter set.
    pub fn search(&mut self, dataset: &Dataset, term: &str) {
        self.term = normalize_term(term);
        self.recompute(dataset);
    }

    pub fn set_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.page_count() || page == self.page {
            return false;
        }
        self.page = page;
        self.selection = 0;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.page > 1 && self.set_page(self.page - 1)
    }

    /// Never less than one, even for an empty result.
    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size).max(1)
    }

    pub fn page_items(&self) -> &[usize] {
        let start = (self.page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.items.len());
        self.items.get(start..end).unwrap_or(&[])
    }

    pub fn move_selection(&mut self, direction: GridMove) {
        let visible = self.page_items().len();
        if visible == 0 {
            return;
        }
        let current = self.selection.min(visible - 1);
        self.selection = match direction {
            GridMove::Left => current.saturating_sub(1),
            GridMove::Right => (current + 1).min(visible - 1),
            GridMove::Up => current.checked_sub(self.columns).unwrap_or(current),
            GridMove::Down => {
                let below = current + self.columns;
                if below < visible { below } else { current }
            }
        };
    }

    pub fn select(&mut self, offset: usize) -> bool {
        if offset >= self.page_items().len() {
            return false;
        }
        self.selection = offset;
        true
    }

    pub fn selected_work(&self) -> Option<usize> {
        self.page_items().get(self.selection).copied()
    }

    /// The full filtered list plus the absolute index of the selected tile.
    pub fn open_selected(&self) -> Option<(Vec<usize>, usize)> {
        self.open_at(self.selection)
    }

    pub fn open_at(&self, offset: usize) -> Option<(Vec<usize>, usize)> {
        if offset >= self.page_items().len() {
            return None;
        }
        let index = (self.page - 1) * self.page_size + offset;
        Some((self.items.clone(), index))
    }

    pub fn page_window(&self) -> Vec<PageEntry> {
        page_window(self.page, self.page_count(), self.max_visible_pages)
    }

    pub fn filter(&self) -> FilterKey {
        self.filter
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn items(&self) -> &[usize] {
        &self.items
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn selection(&self) -> usize {
        self.selection
    }

    /// Remembers the work last shown by the hero or the lightbox.
    pub fn mark_current(&mut self, work: usize) {
        self.current = Some(work);
    }

    pub fn is_current(&self, work: usize) -> bool {
        self.current == Some(work)
    }

    fn recompute(&mut self, dataset: &Dataset) {
        let filter = self.filter;
        let term = self.term.as_str();
        self.items = dataset
            .works()
            .iter()
            .enumerate()
            .filter(|(_, work)| filter.admits(work.year) && work.matches_term(term))
            .map(|(idx, _)| idx)
            .collect();
        self.page = 1;
        self.selection = 0;
    }
}

/// Filter keys: "All" followed by distinct years, newest first.
pub fn filter_keys(dataset: &Dataset) -> Vec<FilterKey> {
    std::iter::once(FilterKey::All)
        .chain(dataset.years_desc().into_iter().map(FilterKey::Year))
        .collect()
}

/// Page buttons around `current`, with first/last pages and ellipses for gaps.
pub fn page_window(current: usize, total: usize, max_visible: usize) -> Vec<PageEntry> {
    if total <= 1 {
        return Vec::new();
    }
    let max_visible = max_visible.max(1);
    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = (start + max_visible - 1).min(total);
    if end - start < max_visible - 1 {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }

    let mut entries = Vec::with_capacity(max_visible + 4);
    if start > 1 {
        entries.push(PageEntry::Page(1));
        if start > 2 {
            entries.push(PageEntry::Ellipsis);
        }
    }
    entries.extend((start..=end).map(PageEntry::Page));
    if end < total {
        if end < total - 1 {
            entries.push(PageEntry::Ellipsis);
        }
        entries.push(PageEntry::Page(total));
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::{FilterKey, GridMove, GridView, PageEntry, filter_keys, page_window};
    use crate::catalog::Dataset;
    use crate::catalog::work::sample_work;
    use crate::config::GridConfig;

    fn dataset() -> Dataset {
        let mut works = Vec::new();
        for idx in 0..5 {
            works.push(sample_work(&format!("w23-{idx}"), &format!("Study {idx}"), 2023));
        }
        let mut ocean = sample_work("ocean", "Ocean Depths", 2024);
        ocean.medium = "Acrylic".to_string();
        works.push(ocean);
        let mut coast = sample_work("coast", "Coastline", 2024);
        coast.description = Some("Salt breeze".to_string());
        works.push(coast);
        let mut old_ocean = sample_work("old-ocean", "Ocean Morning", 2022);
        old_ocean.medium = "Ink".to_string();
        works.push(old_ocean);
        Dataset::from_works(works)
    }

    fn small_pages() -> GridConfig {
        GridConfig {
            page_size: 2,
            columns: 2,
            max_visible_pages: 5,
        }
    }

    #[test]
    fn search_composes_with_year_filter() {
        let dataset = dataset();
        let mut grid = GridView::new(&dataset, &GridConfig::default());
        grid.set_filter(&dataset, FilterKey::Year(2024));
        grid.search(&dataset, "ocean");

        let titles = grid
            .items()
            .iter()
            .filter_map(|idx| dataset.get(*idx))
            .map(|work| work.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Ocean Depths"]);

        grid.search(&dataset, " BREEZE");
        assert_eq!(grid.items(), &[6]);

        grid.search(&dataset, "");
        assert_eq!(grid.items(), &[5, 6]);
    }

    #[test]
    fn filter_change_reapplies_term_and_resets_page() {
        let dataset = dataset();
        let mut grid = GridView::new(&dataset, &small_pages());
        assert!(grid.set_page(3));
        grid.search(&dataset, "ocean");
        assert_eq!(grid.page(), 1);

        grid.set_filter(&dataset, FilterKey::Year(2022));
        assert_eq!(grid.items(), &[7]);
        assert_eq!(grid.page(), 1);
        assert_eq!(grid.term(), "ocean");
    }

    #[test]
    fn set_page_ignores_out_of_range() {
        let dataset = dataset();
        let mut grid = GridView::new(&dataset, &small_pages());
        assert_eq!(grid.page_count(), 4);
        assert!(!grid.set_page(0));
        assert!(!grid.set_page(5));
        assert!(grid.set_page(4));
        assert_eq!(grid.page_items(), &[6, 7]);
        assert!(!grid.next_page());
        assert!(grid.prev_page());
        assert_eq!(grid.page(), 3);
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let dataset = dataset();
        let mut grid = GridView::new(&dataset, &small_pages());
        grid.search(&dataset, "nothing matches this");
        assert_eq!(grid.page_count(), 1);
        assert!(grid.page_items().is_empty());
        assert_eq!(grid.open_selected(), None);
    }

    #[test]
    fn open_selected_passes_filtered_list_and_absolute_index() {
        let dataset = dataset();
        let mut grid = GridView::new(&dataset, &small_pages());
        grid.set_filter(&dataset, FilterKey::Year(2023));
        assert!(grid.set_page(2));
        grid.move_selection(GridMove::Right);

        let (items, index) = grid.open_selected().expect("selection should open");
        assert_eq!(items, vec![0, 1, 2, 3, 4]);
        assert_eq!(index, 3);
        assert_eq!(grid.selected_work(), Some(3));
    }

    #[test]
    fn selection_moves_over_column_layout() {
        let dataset = dataset();
        let config = GridConfig {
            page_size: 12,
            columns: 3,
            max_visible_pages: 5,
        };
        let mut grid = GridView::new(&dataset, &config);
        grid.move_selection(GridMove::Down);
        assert_eq!(grid.selection(), 3);
        grid.move_selection(GridMove::Down);
        assert_eq!(grid.selection(), 6);
        grid.move_selection(GridMove::Down);
        assert_eq!(grid.selection(), 6);
        grid.move_selection(GridMove::Right);
        grid.move_selection(GridMove::Right);
        assert_eq!(grid.selection(), 7);
        grid.move_selection(GridMove::Up);
        assert_eq!(grid.selection(), 4);
    }

    #[test]
    fn filter_keys_list_years_newest_first() {
        assert_eq!(
            filter_keys(&dataset()),
            vec![
                FilterKey::All,
                FilterKey::Year(2024),
                FilterKey::Year(2023),
                FilterKey::Year(2022)
            ]
        );
    }

    #[test]
    fn page_window_adds_edges_and_ellipses() {
        use PageEntry::{Ellipsis, Page};

        assert!(page_window(1, 1, 5).is_empty());
        assert_eq!(
            page_window(1, 3, 5),
            vec![Page(1), Page(2), Page(3)]
        );
        assert_eq!(
            page_window(1, 10, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_window(6, 10, 5),
            vec![
                Page(1),
                Ellipsis,
                Page(4),
                Page(5),
                Page(6),
                Page(7),
                Page(8),
                Ellipsis,
                Page(10)
            ]
        );
        assert_eq!(
            page_window(10, 10, 5),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
        assert_eq!(
            page_window(3, 6, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6)]
        );
    }
}
