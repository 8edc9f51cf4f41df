mod pointer;
mod terminal_surface;

use std::convert::Infallible;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Size;

use crate::app::App;
use crate::catalog::Dataset;
use crate::config::Config;
use crate::gallery::LoadResultEvent;
use crate::gallery::loader::tests::StubFetcher;
use crate::prefs::PreferenceStore;
use crate::presenter::PresenterKind;

use super::terminal_session::TerminalSurface;

fn quiet_config() -> Config {
    let mut config = Config::default();
    config.navigation.preload_neighbors = false;
    config
}

async fn next_result(app: &mut App) -> LoadResultEvent {
    tokio::time::timeout(Duration::from_secs(2), app.loads.worker.recv_result())
        .await
        .expect("load result should arrive in time")
        .expect("load worker should stay open")
}

fn stub_app(dataset: Dataset, config: Config) -> App {
    App::with_fetcher(
        dataset,
        config,
        PreferenceStore::in_memory(),
        Arc::new(StubFetcher::default()),
        PresenterKind::RatatuiImage,
    )
    .expect("app should initialize with stub fetcher")
}

/// Terminal surface over ratatui's in-memory backend.
struct Headless(Terminal<TestBackend>);

impl Headless {
    fn new(width: u16, height: u16) -> io::Result<Self> {
        never(Terminal::new(TestBackend::new(width, height))).map(Self)
    }

    /// Screen contents, one line per row.
    fn text(&self) -> String {
        let buffer = self.0.backend().buffer();
        let width = usize::from(buffer.area.width.max(1));
        let mut text = String::new();
        for (i, cell) in buffer.content().iter().enumerate() {
            if i > 0 && i % width == 0 {
                text.push('\n');
            }
            text.push_str(cell.symbol());
        }
        text
    }
}

impl TerminalSurface for Headless {
    fn size(&self) -> io::Result<Size> {
        never(self.0.size())
    }

    fn clear(&mut self) -> io::Result<()> {
        never(self.0.clear())
    }

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        never(self.0.draw(render)).map(drop)
    }
}

fn never<T>(result: Result<T, Infallible>) -> io::Result<T> {
    result.map_err(|unreachable| match unreachable {})
}
