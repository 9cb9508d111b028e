//! Job completion: recognize COGS and relieve work-in-progress.

use chrono::NaiveDate;
use fieldledger_shared::types::JobId;
use rust_decimal::Decimal;

use super::{JOB_STATUS_COMPLETED, round_to_cents};
use crate::accounts::{AccountCodeResolver, SemanticRole};
use crate::ledger::{JournalLineInput, LedgerError, NewJournalEntry, SourceKey};

/// A job's status and aggregated costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCostSummary {
    /// The job.
    pub job_id: JobId,
    /// Human-facing job number, used as the entry reference.
    pub job_number: Option<String>,
    /// Current job status.
    pub status: String,
    /// Completion date, if recorded.
    pub completed_on: Option<NaiveDate>,
    /// Sum of labor cost rows.
    pub labor: Decimal,
    /// Sum of material cost rows.
    pub material: Decimal,
    /// Sum of equipment cost rows.
    pub equipment: Decimal,
}

/// Builds the COGS entry for a completed job.
///
/// Debits labor expense, material COGS and equipment expense for each
/// non-zero component and credits work-in-progress for the total. Dated on
/// the completion date, or `today` if none was recorded.
///
/// # Errors
///
/// - `JobNotCompleted` if the job is in any other status
/// - `NegativeAmount` if a component sums below zero
/// - `NothingToPost` if every component is zero
/// - `MissingAccountMapping` if a needed role is unmapped
pub fn build_job_completion_entry(
    job: &JobCostSummary,
    resolver: &AccountCodeResolver,
    today: NaiveDate,
) -> Result<NewJournalEntry, LedgerError> {
    if job.status != JOB_STATUS_COMPLETED {
        return Err(LedgerError::JobNotCompleted {
            job_id: job.job_id.into_inner(),
            status: job.status.clone(),
        });
    }

    let components = [
        ("Labor", SemanticRole::LaborExpense, round_to_cents(job.labor)),
        ("Material", SemanticRole::MaterialCogs, round_to_cents(job.material)),
        ("Equipment", SemanticRole::EquipmentExpense, round_to_cents(job.equipment)),
    ];

    for (component, _, amount) in components {
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount { component, amount });
        }
    }

    let total: Decimal = components.iter().map(|(_, _, amount)| *amount).sum();
    let label = job
        .job_number
        .clone()
        .unwrap_or_else(|| job.job_id.to_string());

    if total.is_zero() {
        return Err(LedgerError::NothingToPost(format!(
            "job {label} has no recorded costs"
        )));
    }

    let mut lines = Vec::with_capacity(components.len() + 1);
    for (component, role, amount) in components {
        if amount.is_zero() {
            continue;
        }
        lines.push(JournalLineInput::debit(
            resolver.resolve(role)?,
            amount,
            format!("{component} cost - job {label}"),
        ));
    }
    lines.push(JournalLineInput::credit(
        resolver.resolve(SemanticRole::WorkInProgress)?,
        total,
        format!("Relieve work in progress - job {label}"),
    ));

    Ok(NewJournalEntry {
        source: Some(SourceKey::job_completion(job.job_id)),
        entry_date: job.completed_on.unwrap_or(today),
        description: format!("Job completion COGS - job {label}"),
        reference: job.job_number.clone(),
        lines,
    })
}
