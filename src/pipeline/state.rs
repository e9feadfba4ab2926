//! Pipeline lifecycle state.
//!
//! The prosody pipeline is a two-state machine:
//!
//! ```text
//! Idle ──start()──▶ Active
//! Active ──stop() / source closed──▶ Idle
//! ```
//!
//! `stop()` is idempotent from either state, and a source error or close
//! always lands back in `Idle` — the pipeline never wedges in a half-open
//! state.

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// Lifecycle phase of a [`ProsodyPipeline`](crate::pipeline::ProsodyPipeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// No source attached; `process_chunk` emits nothing.
    #[default]
    Idle,

    /// Chunks are being framed and analysed.
    Active,
}

impl PipelineState {
    /// `true` while the pipeline is consuming chunks.
    pub fn is_active(&self) -> bool {
        matches!(self, PipelineState::Active)
    }

    /// Short label for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Active => "Active",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
