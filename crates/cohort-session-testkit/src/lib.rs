//! # Cohort Session Testkit
//!
//! Testing utilities for the cohort session manager.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a wired [`TestFixture`] plus the doubles it is built
//!   from - [`CountingStorage`], [`StubLookup`], [`RecordingHooks`] - and
//!   sample-value builders
//! - **Generators**: proptest strategies for identities and plaintexts
//!
//! ## Test Fixtures
//!
//! Quickly set up a manager with observable collaborators:
//!
//! ```rust
//! use cohort_session_testkit::fixtures::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! let state = fixture.sign_in("coordinator@example.org").await;
//! assert!(state.user.is_some());
//! assert_eq!(fixture.hooks.sign_outs(), 0);
//! # }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{
    sample_metadata, sample_participant, sample_stats, sample_user, CountingStorage,
    RecordingHooks, StubLookup, StubOutcome, TestFixture,
};
pub use generators::{identity, plaintext};
