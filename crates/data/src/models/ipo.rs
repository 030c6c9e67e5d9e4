//! Normalized IPO calendar record.
//!
//! This is the stable output contract: every field is always present and
//! never null. Absence in the provider table is turned into placeholder text
//! during synthesis.

use serde::{Deserialize, Serialize};

/// Machine-readable subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpoStatus {
    /// Subscription window is open today.
    Open,
    /// Subscription starts in the future.
    Upcoming,
    /// Already trading.
    Listed,
    /// Not enough dates to tell.
    Pending,
}

impl IpoStatus {
    /// Display label shown to users.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "招股中",
            Self::Upcoming => "即将开启",
            Self::Listed => "已上市",
            Self::Pending => "待定",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Upcoming => "upcoming",
            Self::Listed => "listed",
            Self::Pending => "pending",
        }
    }
}

impl std::fmt::Display for IpoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which milestone the headline `date` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpoEvent {
    SubscriptionStart,
    SubscriptionEnd,
    Listing,
    Undetermined,
}

impl IpoEvent {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SubscriptionStart => "招股开始",
            Self::SubscriptionEnd => "招股截止",
            Self::Listing => "上市日",
            Self::Undetermined => "待定",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub core: String,
    pub position: String,
    pub revenue: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreData {
    pub price_market_cap: String,
    pub sponsor_stabilizer: String,
    pub cornerstone: String,
    pub oversubscription: String,
}

/// Neutral scores; not derived from any input yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub up: f64,
    pub hit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logic {
    pub up: String,
    pub hit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub action: String,
    pub risk: String,
}

/// One normalized calendar entry, serialized with the field names the
/// browser front end expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpoRecord {
    /// `<code|name|ipo>-<row index>`; only stable while upstream row order is.
    pub id: String,
    pub name: String,
    pub code: String,
    /// Headline date (`YYYY-MM-DD`) or empty when no milestone is known.
    pub date: String,
    pub event: String,
    pub window: String,
    pub status: String,
    pub status_type: IpoStatus,
    pub sector: String,
    pub business: Business,
    pub core_data: CoreData,
    pub scores: Scores,
    pub logic: Logic,
    pub strategy: Strategy,
    /// The untouched provider row, kept for debugging.
    pub raw: serde_json::Value,
}
