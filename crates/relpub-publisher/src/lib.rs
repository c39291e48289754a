//! Relpub Publisher
//!
//! Publishes a fixed, ordered set of local release artifacts to an object
//! store under deterministic `{platform}/{version}/{file name}` keys.
//!
//! Uploads run one at a time in input order. The first failure aborts the
//! run; nothing is retried or rolled back.

pub mod error;
pub mod publisher;
pub mod report;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use error::PublishError;
pub use publisher::{plan, publish, PublishOptions, Publisher};
pub use report::{PublishReport, PublishedArtifact};
