//! CLI exit codes.
//!
//! Scripts rely on these; treat them as part of the interface.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (server failed while running)          |
//! | 2    | Usage error (bad arguments, invalid settings)        |
//! | 3    | I/O error (register file unreadable, bind failure)   |
//! | 4    | Register document could not be parsed                |
//! | 60   | `sync --strict` got the fallback dataset             |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments or settings that fail validation.
pub const EXIT_USAGE: u8 = 2;

/// A file could not be read or a socket could not be bound.
pub const EXIT_IO: u8 = 3;

/// The register document is empty or lacks required columns.
pub const EXIT_PARSE: u8 = 4;

// =============================================================================
// Sync (60-69)
// =============================================================================

/// Live ingestion failed and the fallback dataset was substituted
/// (only with `--strict`; otherwise a fallback sync exits 0).
pub const EXIT_SYNC_FALLBACK: u8 = 60;
