//! Data layer for the HK IPO calendar.
//!
//! This crate provides:
//! - The normalization pipeline turning the provider's loosely labeled table
//!   into stable [`IpoRecord`]s
//! - An AKTools HTTP client implementing [`hk_ipo_core::IpoTableSource`]
//! - [`IpoCalendar`], the TTL cache in front of the upstream fetch

pub mod calendar;
pub mod models;
pub mod normalize;
pub mod provider;

pub use calendar::{CalendarPayload, IpoCalendar};
pub use models::{IpoEvent, IpoRecord, IpoStatus};
pub use normalize::{normalize_table, ColumnRole, ColumnRoleMap};
pub use provider::{AkToolsClient, AkToolsConfig, ProviderError};
