use crate::table::RawTable;
use anyhow::Result;
use async_trait::async_trait;

/// The upstream collaborator that produces the IPO calendar table.
///
/// `Ok(None)` means the provider answered with no table at all, which is
/// treated the same as an empty one.
#[async_trait]
pub trait IpoTableSource: Send + Sync {
    async fn fetch_table(&self) -> Result<Option<RawTable>>;

    fn name(&self) -> &str;
}
