//! Catalog session driver.
//!
//! A [`Session`] owns one [`AppState`], the [`CatalogWorker`] that performs its
//! I/O, and the receiving end of the worker's response channel. Host signals go
//! in through [`Session::dispatch`], worker results through
//! [`Session::next_update`] or [`Session::drain_ready`]; both paths end in
//! [`handle_event`], so state is only ever touched from the session's owner.
//!
//! Ending a session drops the receiver. Tasks still running (a page fetch or
//! the bulk run) finish on their own and their results are discarded.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scrolldex::source::{HttpCatalogSource, HttpNameDecorator};
//! use scrolldex::{Config, Event, Session};
//!
//! # async fn run() -> scrolldex::Result<()> {
//! let config = Config::default();
//! let http = reqwest::Client::new();
//! let source = Arc::new(HttpCatalogSource::from_config(http.clone(), &config));
//! let names = Arc::new(HttpNameDecorator::from_config(http, &config));
//!
//! let mut session = Session::start(&config, source, names)?;
//! session.next_update().await?;
//! session.dispatch(&Event::NearEnd)?;
//! let view = session.view();
//! println!("{} entries", view.items.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};

use crate::app::{handle_event, Action, AppState, Event};
use crate::catalog::{BulkStatus, CatalogFetcher};
use crate::config::Config;
use crate::domain::error::{CatalogError, Result};
use crate::source::{CatalogSource, NameDecorator};
use crate::ui::viewmodel::CatalogViewModel;
use crate::worker::{CatalogWorker, WorkerResponse};

/// One mounted catalog view.
#[derive(Debug)]
pub struct Session {
    state: AppState,
    worker: CatalogWorker,
    responses: UnboundedReceiver<WorkerResponse>,
}

impl Session {
    /// Builds the session and mounts it: the first page and the one-shot bulk
    /// prefetch are requested immediately.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Worker`] when called outside a tokio runtime.
    pub fn start(
        config: &Config,
        source: Arc<dyn CatalogSource>,
        decorator: Arc<dyn NameDecorator>,
    ) -> Result<Self> {
        let config = config.clone().normalized();
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = CatalogWorker::new(CatalogFetcher::new(source, decorator), tx);

        let mut session = Self {
            state: AppState::new(&config),
            worker,
            responses: rx,
        };

        tracing::info!(
            page_size = config.page_size,
            bulk_batch_size = config.bulk_batch_size,
            bulk_max_total = config.bulk_max_total,
            "catalog session started"
        );

        session.dispatch(&Event::Mount)?;
        Ok(session)
    }

    /// Applies a host event and executes the worker side effects it produced.
    ///
    /// Returns the actions meant for the presentation layer, such as
    /// [`Action::ScrollToTop`].
    ///
    /// # Errors
    ///
    /// Propagates handler errors and worker posting failures.
    pub fn dispatch(&mut self, event: &Event) -> Result<Vec<Action>> {
        let (_, actions) = handle_event(&mut self.state, event)?;
        self.execute(actions)
    }

    fn execute(&mut self, actions: Vec<Action>) -> Result<Vec<Action>> {
        let mut presentation = Vec::new();
        for action in actions {
            match action {
                Action::PostToWorker(message) => self.worker.post(message)?,
                other => presentation.push(other),
            }
        }
        Ok(presentation)
    }

    /// Waits for the next worker response and applies it.
    ///
    /// Returns whether the view changed. The session keeps the worker, and
    /// with it the sending half of the channel, so this stays pending while
    /// no page fetch or bulk batch is outstanding. Idle hosts should race it
    /// against their own signals or a timeout.
    ///
    /// # Errors
    ///
    /// Returns the handler's error for a bulk batch that arrives out of
    /// sequence.
    pub async fn next_update(&mut self) -> Result<bool> {
        let response = self
            .responses
            .recv()
            .await
            .ok_or_else(|| CatalogError::Worker("worker response channel closed".to_string()))?;
        self.apply(response)
    }

    /// Applies every response that is already queued without waiting.
    ///
    /// Returns whether any of them changed the view.
    ///
    /// # Errors
    ///
    /// Stops at the first response the handler rejects.
    pub fn drain_ready(&mut self) -> Result<bool> {
        let mut rerender = false;
        loop {
            match self.responses.try_recv() {
                Ok(response) => rerender |= self.apply(response)?,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return Ok(rerender),
            }
        }
    }

    /// Applies responses until the bulk run has completed or aborted.
    ///
    /// # Errors
    ///
    /// Same as [`Session::next_update`].
    pub async fn wait_for_bulk(&mut self) -> Result<BulkStatus> {
        while self.state.bulk().status() == BulkStatus::Running {
            self.next_update().await?;
        }
        Ok(self.state.bulk().status())
    }

    fn apply(&mut self, response: WorkerResponse) -> Result<bool> {
        let (rerender, actions) = handle_event(&mut self.state, &Event::WorkerResponse(response))?;
        self.execute(actions)?;
        Ok(rerender)
    }

    /// Current view model.
    #[must_use]
    pub fn view(&self) -> CatalogViewModel {
        self.state.compute_viewmodel()
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Reports an aborted bulk run.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BulkIncomplete`] once the bulk run has aborted.
    /// Search still works over the partial dataset.
    pub fn bulk_outcome(&self) -> Result<()> {
        self.state.bulk().outcome()
    }

    /// Ends the session. Outstanding worker results are discarded.
    pub fn end(self) {
        tracing::info!(
            pages = self.state.paged().pages().len(),
            bulk_fetched = self.state.bulk().len(),
            bulk_status = ?self.state.bulk().status(),
            "catalog session ended"
        );
    }
}
