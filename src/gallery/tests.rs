use std::time::{Duration, Instant};

use super::frame::solid_frame;
use super::grid::{FilterKey, GridView};
use super::hero::HeroCarousel;
use super::lightbox::Lightbox;
use super::navigator::{LoadRequest, Navigator};
use crate::catalog::Dataset;
use crate::catalog::work::sample_work;
use crate::config::{GridConfig, NavigationConfig, ZoomConfig};

fn settle(navigator: &mut Navigator, request: Option<LoadRequest>) -> usize {
    let request = request.expect("navigation should be accepted");
    navigator.complete(request.attempt, Ok(solid_frame(1, 1, 0)), Instant::now());
    navigator.current_work().expect("a work should be current")
}

fn lightbox() -> Lightbox {
    Lightbox::new(Duration::from_millis(400), ZoomConfig::default())
}

#[test]
fn hero_and_lightbox_contexts_do_not_interfere() {
    let mut a = sample_work("a", "A", 2023);
    a.featured = true;
    let b = sample_work("b", "B", 2023);
    let mut c = sample_work("c", "C", 2023);
    c.featured = true;
    let dataset = Dataset::from_works(vec![a, b, c]);
    let now = Instant::now();

    let mut hero = HeroCarousel::new(&dataset, &NavigationConfig::default(), now);
    let request = hero.start(0, now);
    assert_eq!(settle(hero.navigator_mut(), request), 0);

    let mut lightbox = lightbox();
    let request = lightbox.open(dataset.all_indices(), 1);
    assert_eq!(settle(lightbox.navigator_mut(), request), 1);

    let request = hero.next();
    assert_eq!(settle(hero.navigator_mut(), request), 2);

    let request = lightbox.navigator_mut().next();
    assert_eq!(settle(lightbox.navigator_mut(), request), 2);
    let request = lightbox.navigator_mut().previous();
    assert_eq!(settle(lightbox.navigator_mut(), request), 1);
    let request = lightbox.navigator_mut().previous();
    assert_eq!(settle(lightbox.navigator_mut(), request), 0);

    let request = hero.next();
    assert_eq!(settle(hero.navigator_mut(), request), 0);
    assert_eq!(lightbox.navigator().current_work(), Some(0));
    assert_eq!(hero.navigator().counter(), "1 / 2");
    assert_eq!(lightbox.navigator().counter(), "1 / 3");
}

#[test]
fn lightbox_opened_from_filtered_grid_stays_in_filter() {
    let mut works = Vec::new();
    for idx in 0..4 {
        works.push(sample_work(&format!("old-{idx}"), "Old", 2021));
    }
    for idx in 0..5 {
        works.push(sample_work(&format!("w-{idx}"), "Current", 2023));
    }
    works.push(sample_work("new", "New", 2024));
    let dataset = Dataset::from_works(works);

    let mut grid = GridView::new(&dataset, &GridConfig::default());
    grid.set_filter(&dataset, FilterKey::Year(2023));
    let (items, index) = grid.open_selected().expect("grid should open a work");
    assert_eq!(items.len(), 5);

    let mut lightbox = lightbox();
    let request = lightbox.open(items, index);
    let first = settle(lightbox.navigator_mut(), request);
    assert_eq!(first, 4);

    let mut seen = vec![first];
    for _ in 0..5 {
        let request = lightbox.navigator_mut().next();
        seen.push(settle(lightbox.navigator_mut(), request));
    }
    assert_eq!(seen, vec![4, 5, 6, 7, 8, 4]);
}
