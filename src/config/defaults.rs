//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Connection Defaults
// =============================================================================

pub fn default_port() -> u16 {
    6667
}

pub fn default_read_buffer_size() -> usize {
    4096
}

pub fn default_encoding() -> String {
    "utf-8".to_string()
}

pub fn default_connect_timeout_secs() -> u64 {
    30
}

// =============================================================================
// Event Bus Defaults
// =============================================================================

pub fn default_max_listeners() -> usize {
    1000
}
