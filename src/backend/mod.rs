//! Analytics backend - runs a report template against an analytics service
//!
//! - ReportBackend trait so the pipeline never sees a vendor payload
//! - RawReportResult as the backend-neutral positional result
//! - GA4 Data API client (service-account or bearer-token auth)
//! - Fixture backend serving a recorded result from disk

pub mod auth;
pub mod engine;
pub mod fixture;
pub mod ga4;
pub mod result;

pub use auth::{Credentials, ServiceAccountKey};
pub use engine::ReportBackend;
pub use fixture::FixtureBackend;
pub use ga4::Ga4Client;
pub use result::{RawReportResult, RawRow};
