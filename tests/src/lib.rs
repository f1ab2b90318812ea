//! # Formwork Test Suite
//!
//! Unified test crate exercising the whole engine across crate seams.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/          # Cross-crate choreography
//!     ├── form_lifecycle.rs # Registry, edits, sync validation
//!     ├── async_validation.rs
//!     └── submission_flow.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p formwork-tests
//!
//! # By category
//! cargo test -p formwork-tests integration::
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
