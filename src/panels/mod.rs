//! Per-entity management panels.
//!
//! A panel owns a cached copy of one collection and patches it only
//! after the resource client confirms a mutation. Failures leave the
//! cached rows and the user's draft input alone and raise a banner.
//! Every pending call is registered with the panel's `Lifecycle`; once
//! the panel is unmounted those calls are aborted and late results are
//! dropped as `PanelError::Cancelled`.

pub mod deliveries;
pub mod diet_charts;
pub mod patients;
pub mod personnel;
pub mod preparation;

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use futures_util::future::{AbortHandle, Abortable};
use thiserror::Error;

use crate::client::ClientError;
use crate::models::{EntityId, Identified};

pub use deliveries::{DeliveryOverviewPanel, DeliveryRoundPanel, DeliveryTrackingPanel};
pub use diet_charts::{DietChartForm, DietChartPanel};
pub use patients::{PatientForm, PatientPanel};
pub use personnel::{PersonnelForm, PersonnelPanel};
pub use preparation::PreparationPanel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Inline alert shown above a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Error(String),
    Success(String),
}

impl Banner {
    pub fn message(&self) -> &str {
        match self {
            Self::Error(m) | Self::Success(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} {1} not found")]
    NotFound(&'static str, EntityId),

    #[error(transparent)]
    Request(#[from] ClientError),

    #[error("Panel was unmounted before the call finished")]
    Cancelled,
}

// ═══════════════════════════════════════════════════════════
// Lifecycle
// ═══════════════════════════════════════════════════════════

/// Mount state plus the abort handles of every call still in flight.
#[derive(Debug)]
pub struct Lifecycle {
    mounted: AtomicBool,
    next_call: AtomicU64,
    pending: Mutex<HashMap<u64, AbortHandle>>,
}

impl Lifecycle {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            mounted: AtomicBool::new(true),
            next_call: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
        })
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn pending_calls(&self) -> usize {
        self.pending().len()
    }

    /// Drive `call` to completion unless the panel is unmounted first.
    pub async fn run<F: Future>(&self, call: F) -> Result<F::Output, PanelError> {
        if !self.is_mounted() {
            return Err(PanelError::Cancelled);
        }

        let (handle, registration) = AbortHandle::new_pair();
        let call_id = self.next_call.fetch_add(1, Ordering::SeqCst);
        self.pending().insert(call_id, handle);

        let outcome = Abortable::new(call, registration).await;
        self.pending().remove(&call_id);

        // A call registered while unmount() was draining is not aborted,
        // so the mount flag is checked again.
        match outcome {
            Ok(value) if self.is_mounted() => Ok(value),
            _ => Err(PanelError::Cancelled),
        }
    }

    /// Abort every pending call. Idempotent.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        let aborted: Vec<AbortHandle> = self.pending().drain().map(|(_, h)| h).collect();
        if !aborted.is_empty() {
            tracing::debug!(count = aborted.len(), "Aborting pending panel calls");
        }
        for handle in aborted {
            handle.abort();
        }
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<u64, AbortHandle>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ═══════════════════════════════════════════════════════════
// Shared panel state
// ═══════════════════════════════════════════════════════════

/// Loading flag, banner and lifecycle shared by every panel.
#[derive(Debug)]
pub struct PanelState {
    load: LoadState,
    banner: Option<Banner>,
    busy: bool,
    last_loaded: Option<DateTime<Utc>>,
    lifecycle: Arc<Lifecycle>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            load: LoadState::Idle,
            banner: None,
            busy: false,
            last_loaded: None,
            lifecycle: Lifecycle::new(),
        }
    }
}

impl PanelState {
    /// State for a panel whose rows were handed over by a dashboard.
    pub(crate) fn ready() -> Self {
        let mut state = Self::default();
        state.mark_loaded();
        state
    }

    /// State whose calls are cancelled together with `lifecycle`.
    pub(crate) fn sharing(lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            lifecycle,
            ..Self::default()
        }
    }

    /// Record rows fetched elsewhere. Banner and lifecycle are untouched.
    pub(crate) fn mark_loaded(&mut self) {
        self.load = LoadState::Ready;
        self.last_loaded = Some(Utc::now());
    }

    pub fn load_state(&self) -> LoadState {
        self.load
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| b.is_error())
            .map(Banner::message)
    }

    pub fn last_loaded(&self) -> Option<DateTime<Utc>> {
        self.last_loaded
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.lifecycle.clone()
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.banner = Some(Banner::Error(message.into()));
    }

    pub(crate) fn succeed(&mut self, message: impl Into<String>) {
        self.banner = Some(Banner::Success(message.into()));
    }

    /// Run a mutation. On failure the banner shows `failure`.
    pub(crate) async fn call<T, F>(&mut self, failure: &str, call: F) -> Result<T, PanelError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        self.busy = true;
        self.banner = None;
        let outcome = self.lifecycle.run(call).await;
        self.busy = false;
        outcome?.map_err(|err| {
            tracing::warn!(error = %err, "{failure}");
            self.fail(failure);
            PanelError::Request(err)
        })
    }

    /// Run a collection fetch, tracking the load state.
    pub(crate) async fn fetch<T, F>(&mut self, failure: &str, call: F) -> Result<T, PanelError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        self.load = LoadState::Loading;
        self.banner = None;
        let outcome = self.lifecycle.run(call).await?;
        match outcome {
            Ok(rows) => {
                self.load = LoadState::Ready;
                self.last_loaded = Some(Utc::now());
                Ok(rows)
            }
            Err(err) => {
                tracing::warn!(error = %err, "{failure}");
                self.load = LoadState::Failed;
                self.fail(failure);
                Err(PanelError::Request(err))
            }
        }
    }

    /// Turn a store-side "absent" answer into `NotFound` with a banner.
    pub(crate) fn found<T>(
        &mut self,
        value: Option<T>,
        entity: &'static str,
        id: EntityId,
        failure: &str,
    ) -> Result<T, PanelError> {
        value.ok_or_else(|| {
            tracing::warn!(entity, id, "Target no longer exists");
            self.fail(failure);
            PanelError::NotFound(entity, id)
        })
    }

    pub(crate) fn reject(&mut self, message: impl Into<String>) -> PanelError {
        let message = message.into();
        self.fail(message.clone());
        PanelError::Validation(message)
    }
}

/// Swap the row with `updated`'s id for the confirmed entity.
pub(crate) fn replace_row<T: Identified>(rows: &mut [T], updated: T) {
    if let Some(row) = rows.iter_mut().find(|row| row.id() == updated.id()) {
        *row = updated;
    }
}

/// Split a comma-separated field into trimmed, non-empty entries.
pub(crate) fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

pub(crate) fn require(value: &str, label: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{label} is required"))
    } else {
        Ok(trimmed.to_string())
    }
}
