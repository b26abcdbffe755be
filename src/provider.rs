//! Provider-facing configuration.
//!
//! `descriptor` exposes validated metadata ([`ProviderDescriptor`]) covering the API root,
//! endpoint paths, the versioned `Accept` media type, and provider quirks (scope
//! delimiters). [`ProviderDescriptor::vimeo`] is the default used across the crate.

pub mod descriptor;

pub use descriptor::*;
