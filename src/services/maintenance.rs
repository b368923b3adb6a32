use crate::domain::integrity::IntegrityReport;
use crate::repository::IntegrityChecker;
use crate::services::ServiceResult;

/// Checks the referential invariants of the whole database.
pub fn integrity_report<R>(repo: &R) -> ServiceResult<IntegrityReport>
where
    R: IntegrityChecker + ?Sized,
{
    let report = repo.check_integrity()?;
    if !report.is_clean() {
        log::warn!(
            "Integrity check found {} dangling references, {} duplicate keys, {} staff in \
             manager cycles",
            report.dangling_references.len(),
            report.duplicate_keys.len(),
            report.manager_cycles.len()
        );
    }
    Ok(report)
}
