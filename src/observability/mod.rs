//! Observability infrastructure for crash reports and debugging.
//!
//! - **Tracing**: `tracing-subscriber` setup driven by `-v` and `RUST_LOG`
//! - **Context tracking**: thread-local phase, graph and package
//! - **Panic hook**: structured crash report built from that context
//!
//! Install the hook and subscriber at startup:
//!
//! ```ignore
//! use layermap::observability::{init_tracing, install_panic_hook};
//!
//! fn main() {
//!     install_panic_hook();
//!     init_tracing(verbosity);
//! }
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_graph,
    set_current_package, set_phase, set_progress, AnalysisContext, AnalysisPhase, ContextGuard,
};
pub use panic_hook::install_panic_hook;
pub use self::tracing::{init_tracing, level_for_verbosity};
