//! Default values for codeviz configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Pipeline Defaults
// ============================================================================

/// Deepest AST level whose children are still visited (root = 0).
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Maximum label length in characters before truncation with `...`.
pub const DEFAULT_MAX_LABEL_LEN: usize = 30;

// ============================================================================
// Layout Defaults
// ============================================================================

/// Force-directed placement iterations.
pub const DEFAULT_LAYOUT_ITERATIONS: usize = 50;

/// Half-width of the square positions are rescaled into.
pub const DEFAULT_LAYOUT_SCALE: f64 = 1.0;

/// Initial temperature (maximum step) of the force simulation.
pub const DEFAULT_LAYOUT_TEMPERATURE: f64 = 0.1;

// ============================================================================
// Server Defaults
// ============================================================================

/// Default port for the HTTP API.
pub const DEFAULT_SERVER_PORT: u16 = 3333;

/// Default bind address for the HTTP API.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Largest accepted source submission (16 MB).
pub const DEFAULT_MAX_SOURCE_BYTES: usize = 16 * 1024 * 1024;

/// Wall-clock budget for one visualization request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// File Locations
// ============================================================================

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "codeviz.toml";

/// Directory under the user config dir (`~/.config/codeviz`).
pub const USER_CONFIG_DIR: &str = "codeviz";

/// User config file name.
pub const USER_CONFIG_FILE: &str = "config.toml";
