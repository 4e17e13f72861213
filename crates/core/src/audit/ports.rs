//! Remote mirror of the audit trail

use agencydesk_domain::{ActivityLog, ChangeLog, ErrorLog, Result};
use async_trait::async_trait;

/// Optional best-effort forwarding of audit entries.
///
/// The local trail stays authoritative: failures are logged by the caller
/// and never roll back the entry.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record_activity(&self, entry: &ActivityLog) -> Result<()>;

    async fn record_error(&self, entry: &ErrorLog) -> Result<()>;

    async fn record_change(&self, entry: &ChangeLog) -> Result<()>;
}
