#![allow(
    clippy::cast_possible_truncation, // intentional: directive values are read as i64 and narrowed per width
    clippy::cast_possible_wrap, // intentional: `.long` words are reinterpreted between signed and unsigned
    clippy::cast_sign_loss, // intentional: masked directive values are narrowed to unsigned fields
    clippy::missing_errors_doc // every fallible entry point returns the single crate `Error`
)]

pub mod abi;
pub mod error;
pub mod label;
pub mod stackmap;
pub mod translate;

/// Test harness module for writing unit and integration tests.
///
/// This module is only available when running tests or when the
/// `test-harness` feature is enabled.
#[cfg(any(test, feature = "test-harness"))]
pub mod test_harness;

pub use error::{Error, Result};
pub use label::{Label, SourceLine, sanitize, split_labels};
pub use stackmap::{Location, LocationKind, Patchpoint, PatchpointMap};
pub use translate::{Processor, TranslateOptions, translate, translate_with_options};
