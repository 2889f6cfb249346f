//! # Postbridge Test Suite
//!
//! Tests that wire a caller context and a callee context together over
//! `bridge-channel` windows, the way an embedding page and its iframe talk.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs     # Contract and two-context wiring
//!     ├── round_trip.rs   # Calls that resolve or reject
//!     ├── concurrency.rs  # Interleaved calls and shared windows
//!     ├── failures.rs     # Timeouts, unknown operations, panics
//!     └── lifecycle.rs    # Unsubscribe and detach
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p bridge-tests
//!
//! # By category
//! cargo test -p bridge-tests integration::failures
//!
//! # Benchmarks
//! cargo bench -p bridge-tests
//! ```

#![allow(dead_code)]

pub mod integration;
