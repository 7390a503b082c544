//! Thread-local context tracking for crash reports.
//!
//! Records which phase of the analysis is running, which graph export is
//! being analyzed and which package is being aggregated, plus global package
//! progress counters.
//!
//! Context guards use RAII and restore the previous context on drop.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static PACKAGES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static PACKAGES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<AnalysisContext> = const { RefCell::new(AnalysisContext::new()) };
}

/// Snapshot of what layermap was doing
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    pub phase: Option<AnalysisPhase>,
    /// Graph export being analyzed
    pub current_graph: Option<PathBuf>,
    /// Package node currently being aggregated
    pub current_package: Option<String>,
}

impl AnalysisContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_graph: None,
            current_package: None,
        }
    }
}

/// Major stages of a layermap run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    LoadingConfig,
    LoadingGraph,
    BuildingLayerTable,
    AggregatingPackages,
    AnnotatingGraph,
    Bucketing,
    OutputGeneration,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadingConfig => write!(f, "loading_config"),
            Self::LoadingGraph => write!(f, "loading_graph"),
            Self::BuildingLayerTable => write!(f, "building_layer_table"),
            Self::AggregatingPackages => write!(f, "aggregating_packages"),
            Self::AnnotatingGraph => write!(f, "annotating_graph"),
            Self::Bucketing => write!(f, "bucketing"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// Restores the previous context when dropped
pub struct ContextGuard {
    previous: AnalysisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update_context(apply: impl FnOnce(&mut AnalysisContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut *ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Set the current analysis phase.
///
/// Returns a guard that restores the previous phase on drop.
///
/// ```ignore
/// let _phase = set_phase(AnalysisPhase::Bucketing);
/// // phase restored when _phase drops
/// ```
#[must_use]
pub fn set_phase(phase: AnalysisPhase) -> ContextGuard {
    update_context(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_current_graph(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update_context(|ctx| ctx.current_graph = Some(path))
}

#[must_use]
pub fn set_current_package(id: impl Into<String>) -> ContextGuard {
    let id = id.into();
    update_context(|ctx| ctx.current_package = Some(id))
}

pub fn set_progress(processed: usize, total: usize) {
    PACKAGES_PROCESSED.store(processed, Ordering::Relaxed);
    PACKAGES_TOTAL.store(total, Ordering::Relaxed);
}

pub fn increment_processed() {
    PACKAGES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

/// Called by the panic hook
#[must_use]
pub fn get_current_context() -> AnalysisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (processed, total) packages
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        PACKAGES_PROCESSED.load(Ordering::Relaxed),
        PACKAGES_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = AnalysisContext::new();
    });
}
