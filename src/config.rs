/// Output buffer size that triggers a flush
pub const DEFAULT_OUTPUT_THRESHOLD: usize = 8192;

/// Cells shown on each side of the data pointer by the debugger
pub const DEFAULT_DEBUG_RADIUS: usize = 2;

/// Knobs for a single execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    /// Flush buffered output once it holds this many bytes
    pub output_threshold: usize,
    /// Total tape cells allowed, counting the always-present cell 0; `None` is unbounded
    pub tape_limit: Option<usize>,
    /// Radius of the debugger's `print` window
    pub debug_radius: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            output_threshold: DEFAULT_OUTPUT_THRESHOLD,
            tape_limit: None,
            debug_radius: DEFAULT_DEBUG_RADIUS,
        }
    }
}
