use crate::errors::PortalError;
use crate::id::generate_id;
use crate::models::{Complaint, Dashboard, Status, StatusCounts, TIMESTAMP_FORMAT};
use crate::storage::ComplaintStore;
use chrono::Local;
use tracing::{info, warn};

const ID_ATTEMPTS: usize = 32;

/// Excel refuses longer cell strings.
pub const MAX_TEXT_CHARS: usize = 32_767;

pub async fn submit(store: &ComplaintStore, text: &str) -> Result<Complaint, PortalError> {
    if text.trim().is_empty() {
        return Err(PortalError::Validation("Complaint cannot be empty.".to_string()));
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(PortalError::Validation(format!(
            "Complaint is too long (at most {MAX_TEXT_CHARS} characters)."
        )));
    }

    let complaint = store
        .modify(|complaints| {
            let id = unique_id(complaints, generate_id);
            let complaint = Complaint {
                id,
                text: text.to_string(),
                status: Status::Pending,
                created_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            };
            complaints.push(complaint.clone());
            Ok(complaint)
        })
        .await?;

    info!(id = %complaint.id, "complaint submitted");
    Ok(complaint)
}

fn unique_id(existing: &[Complaint], mut next: impl FnMut() -> String) -> String {
    let mut candidate = next();
    for _ in 1..ID_ATTEMPTS {
        if !existing.iter().any(|complaint| complaint.id == candidate) {
            return candidate;
        }
        candidate = next();
    }
    if existing.iter().any(|complaint| complaint.id == candidate) {
        warn!(id = %candidate, "no free complaint id found, reusing a taken one");
    }
    candidate
}

pub async fn lookup(store: &ComplaintStore, id: &str) -> Result<Complaint, PortalError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(PortalError::NotFound(String::new()));
    }
    store
        .load()
        .await?
        .into_iter()
        .find(|complaint| complaint.id == id)
        .ok_or_else(|| PortalError::NotFound(id.to_string()))
}

pub async fn dashboard(store: &ComplaintStore) -> Result<Dashboard, PortalError> {
    let complaints = store.load().await?;
    Ok(Dashboard {
        counts: StatusCounts::tally(&complaints),
        complaints,
    })
}

pub async fn update_status(
    store: &ComplaintStore,
    id: &str,
    status: Status,
) -> Result<Complaint, PortalError> {
    let (previous, complaint) = store.update_status(id, status).await?;
    info!(%id, from = %previous, to = %status, "complaint status updated");
    Ok(complaint)
}
