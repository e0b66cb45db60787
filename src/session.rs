use crate::config::AnalyzerConfig;
use crate::dataset::SessionDataset;
use crate::panel::{Notice, Panel};
use crate::parsers::{Parser, ParserError};
use crate::present::{DisplayModel, Presenter};
use crate::results::PageSnapshot;
use crate::sources::{PageSource, SourceError};
use crate::stats::{StatisticsSummary, summarize};
use crate::store::{self, SessionStore};
use crate::watch::Ticker;
use thiserror::Error;
use tokio::sync::mpsc;

/// Where the coordinator is in the page lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    IdleWatching,
    AutoUpdate,
    ManualReset,
    Stopped,
}

/// User actions delivered to a running coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Discard the session and analyze the current page only
    Reset,
    /// New raw value of the area quantity input
    SetArea(String),
    /// Stop watching
    Stop,
}

/// What one watch tick or update pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Page identifier did not change
    Unchanged,
    /// No listings on the page yet; retried on the next check
    Deferred,
    /// Every listing on the page was already known
    NoNewListings,
    Updated { added: usize },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no listings found on this page")]
    NoListings,

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Drives extraction, merging, statistics and presentation for one page lifecycle
pub struct Coordinator<P: PageSource, S: SessionStore, D: Panel> {
    config: AnalyzerConfig,
    parser: Parser,
    presenter: Presenter,
    source: P,
    store: S,
    panel: D,
    dataset: SessionDataset,
    summary: Option<StatisticsSummary>,
    /// Current panel content; `None` until the panel has been shown
    model: Option<DisplayModel>,
    watched_page_id: Option<String>,
    phase: Phase,
}

impl<P: PageSource, S: SessionStore, D: Panel> Coordinator<P, S, D> {
    pub fn new(config: AnalyzerConfig, source: P, store: S, panel: D) -> Result<Self, ParserError> {
        Ok(Self {
            parser: Parser::new(&config)?,
            presenter: Presenter::new(&config),
            config,
            source,
            store,
            panel,
            dataset: SessionDataset::new(),
            summary: None,
            model: None,
            watched_page_id: None,
            phase: Phase::Init,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dataset(&self) -> &SessionDataset {
        &self.dataset
    }

    pub fn summary(&self) -> Option<&StatisticsSummary> {
        self.summary.as_ref()
    }

    pub fn model(&self) -> Option<&DisplayModel> {
        self.model.as_ref()
    }

    pub fn panel(&self) -> &D {
        &self.panel
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source_mut(&mut self) -> &mut P {
        &mut self.source
    }

    /// Give back the page source, e.g. to close a browser session
    pub fn into_source(self) -> P {
        self.source
    }

    /// Analyze the current page and show the panel.
    ///
    /// With the panel already shown this is an update pass instead. Failures are
    /// reported on the panel before being returned.
    pub async fn initialize(&mut self) -> Result<PassOutcome, SessionError> {
        if self.model.is_some() {
            ::log::info!("Panel already shown, updating data");
            return Ok(self.auto_update().await?);
        }

        let result = self.first_pass().await;
        match &result {
            Err(SessionError::NoListings) => {
                self.panel.alert(
                    "No listings found on this page. Make sure you are on a search results page.",
                );
            }
            Err(e) => {
                self.panel.alert(&format!("Error analyzing the page: {}", e));
            }
            Ok(_) => {}
        }
        result
    }

    async fn first_pass(&mut self) -> Result<PassOutcome, SessionError> {
        self.phase = Phase::Init;

        self.dataset = store::load_dataset(&self.store, &self.config.storage_key);
        ::log::info!("Loaded stored data: {} listings", self.dataset.len());

        let snapshot = self.snapshot().await?;
        let records = self.parser.extract_records(&snapshot);
        ::log::info!("Scraping complete. Found {} listings", records.len());

        if records.is_empty() {
            ::log::error!(
                "No listings found ({} cards on page)",
                snapshot.fragments.len()
            );
            return Err(SessionError::NoListings);
        }

        let outcome = self.dataset.merge(records);
        self.record_page(&snapshot);
        store::save_dataset(&mut self.store, &self.config.storage_key, &self.dataset);

        self.refresh();
        self.watched_page_id = Some(snapshot.page_id);
        self.phase = Phase::IdleWatching;

        Ok(PassOutcome::Updated {
            added: outcome.added,
        })
    }

    /// Extract the current page and merge anything new into the session
    pub async fn auto_update(&mut self) -> Result<PassOutcome, SourceError> {
        self.phase = Phase::AutoUpdate;
        let snapshot = match self.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.phase = Phase::IdleWatching;
                return Err(e);
            }
        };
        Ok(self.apply_update(snapshot))
    }

    fn apply_update(&mut self, snapshot: PageSnapshot) -> PassOutcome {
        self.phase = Phase::AutoUpdate;
        let records = self.parser.extract_records(&snapshot);

        if records.is_empty() {
            ::log::info!("No listings found on page");
            self.phase = Phase::IdleWatching;
            return PassOutcome::Deferred;
        }

        ::log::info!("Already have {} listing ids", self.dataset.len());
        let outcome = self.dataset.merge(records);
        ::log::info!("Found {} new unique listings", outcome.added);

        if outcome.is_noop() {
            ::log::info!("All listings already exist");
            self.phase = Phase::IdleWatching;
            return PassOutcome::NoNewListings;
        }

        self.record_page(&snapshot);
        store::save_dataset(&mut self.store, &self.config.storage_key, &self.dataset);
        self.refresh();
        self.panel.notify(Notice::new(
            format!("✓ {} listings added", outcome.added),
            self.config.notification_duration(),
        ));

        self.phase = Phase::IdleWatching;
        PassOutcome::Updated {
            added: outcome.added,
        }
    }

    /// Compare the page identifier with the last processed one and update on change.
    ///
    /// The new identifier is only committed once listings were found, so a page
    /// that is still loading is retried on the next check.
    pub async fn check_navigation(&mut self) -> Result<PassOutcome, SourceError> {
        let current = self.source.page_id().await?;
        if self.watched_page_id.as_deref() == Some(current.as_str()) {
            return Ok(PassOutcome::Unchanged);
        }

        ::log::info!(
            "Page change detected: {:?} -> {}",
            self.watched_page_id,
            current
        );

        // Let the host page finish loading
        tokio::time::sleep(self.config.settle_delay()).await;

        let snapshot = self.snapshot().await?;
        ::log::info!("Found {} listing cards", snapshot.fragments.len());
        if snapshot.fragments.is_empty() {
            ::log::info!("No listings found yet, will retry on next interval");
            return Ok(PassOutcome::Deferred);
        }

        self.watched_page_id = Some(snapshot.page_id.clone());
        self.panel.notify(Notice::new(
            "New page detected, updating...",
            self.config.notification_duration(),
        ));
        Ok(self.apply_update(snapshot))
    }

    /// Discard the session and analyze the current page only
    pub async fn reset(&mut self) -> PassOutcome {
        self.phase = Phase::ManualReset;
        store::clear_dataset(&mut self.store, &self.config.storage_key);
        self.dataset = SessionDataset::new();

        let snapshot = match self.snapshot().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                ::log::error!("Could not read page during reset: {}", e);
                None
            }
        };

        let mut added = 0;
        if let Some(snapshot) = snapshot {
            let records = self.parser.extract_records(&snapshot);
            added = self.dataset.merge(records).added;
            if added > 0 {
                self.record_page(&snapshot);
                store::save_dataset(&mut self.store, &self.config.storage_key, &self.dataset);
            }
            self.watched_page_id = Some(snapshot.page_id);
        }

        self.refresh();
        ::log::info!("Reset complete. Found {} listings on current page", added);

        self.phase = Phase::IdleWatching;
        if added > 0 {
            PassOutcome::Updated { added }
        } else {
            PassOutcome::Deferred
        }
    }

    /// Apply a new raw value from the area quantity input
    pub fn set_area_input(&mut self, input: &str) {
        let Some(calculator) = self.model.as_mut().and_then(|m| m.calculator_mut()) else {
            ::log::debug!("No calculator shown, ignoring area input {:?}", input);
            return;
        };
        let total = calculator.set_quantity_input(input);
        let quantity = calculator.quantity();
        self.panel.update_total(quantity, &total);
    }

    /// Show the panel, then watch for navigation and handle user commands until stopped
    pub async fn run(&mut self, mut commands: mpsc::Receiver<Command>) -> Result<(), SessionError> {
        self.initialize().await?;

        let (mut ticker, mut ticks) = Ticker::start(self.config.poll_interval());
        ::log::info!(
            "Auto-detection started, checking every {:?}",
            self.config.poll_interval()
        );

        let mut commands_open = true;
        loop {
            tokio::select! {
                tick = ticks.recv() => {
                    if tick.is_none() {
                        break;
                    }
                    if let Err(e) = self.check_navigation().await {
                        ::log::warn!("Navigation check failed: {}", e);
                    }
                }
                command = commands.recv(), if commands_open => match command {
                    Some(Command::Reset) => {
                        self.reset().await;
                    }
                    Some(Command::SetArea(input)) => self.set_area_input(&input),
                    Some(Command::Stop) => break,
                    None => {
                        ::log::debug!("Command channel closed, watching without input");
                        commands_open = false;
                    }
                },
            }
        }

        ticker.cancel();
        self.phase = Phase::Stopped;
        ::log::info!("Stopped watching");
        Ok(())
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, SourceError> {
        let page_id = self.source.page_id().await?;
        let html = self.source.html().await?;
        Ok(self.parser.parse_page(&html, &page_id))
    }

    fn record_page(&mut self, snapshot: &PageSnapshot) {
        let category = snapshot
            .category
            .as_deref()
            .unwrap_or(&self.config.default_category);
        self.dataset.set_category_label(category);
        self.dataset.set_last_page_id(&snapshot.page_id);
    }

    /// Recompute statistics from the full dataset and redraw the panel
    fn refresh(&mut self) {
        self.summary = summarize(self.dataset.records(), self.config.histogram_bins);
        let model = self.presenter.present(self.summary.as_ref());

        let category = if self.dataset.category_label().is_empty() {
            self.config.default_category.as_str()
        } else {
            self.dataset.category_label()
        };
        self.panel.render(category, &model);
        self.model = Some(model);
    }
}
