// screen-lens/src/runtime.rs

// ============================================================================
// THREADS DE BACKGROUND
// ============================================================================

pub mod hotkeys;
