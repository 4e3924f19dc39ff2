//! Agency Analytics - back-office analytics for an insurance agency
//!
//! This library provides:
//! - Typed policy, customer and document records with boundary validation
//! - Pure aggregations for the admin charts (policy growth, revenue mix,
//!   age/gender/region demographics, headline summary)
//! - A REST client for the agency backend behind the `AgencyApi` trait
//! - Dashboard orchestration with per-view state and user-facing notices

pub mod error;
pub mod config;
pub mod records;
pub mod analytics;
pub mod api;
pub mod dashboard;

// Re-export commonly used types
pub use error::{DashboardError, Result};
pub use config::ClientConfig;
pub use records::{PolicyRecord, CustomerRecord, DocumentRecord, RenewalStatus};
pub use analytics::{AnalyticsReport, MonthlyGrowthPoint, RevenueDistributionEntry, DistributionEntry};
pub use api::{AgencyApi, ApiClient, Session};
pub use dashboard::{Dashboard, DashboardState, Notice, NoticeLevel};
