use crate::errors::PortalError;
use crate::models::{COLUMNS, Complaint, Status};
use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Workbook, XlsxError};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

const SHEET_NAME: &str = "Complaints";

/// Spreadsheet-backed complaint table. Every operation reads the whole
/// file and every mutation rewrites it.
#[derive(Debug, Clone)]
pub struct ComplaintStore {
    path: PathBuf,
    cycle: Arc<Mutex<()>>,
}

#[derive(Debug)]
enum ReadError {
    Missing,
    Malformed(String),
}

impl ComplaintStore {
    /// Opens the store, creating the parent directory and an empty table
    /// when nothing usable is on disk yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, PortalError> {
        let store = Self {
            path: path.into(),
            cycle: Arc::new(Mutex::new(())),
        };
        if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(storage_error)?;
        }
        let complaints = store.load().await?;
        info!(
            path = %store.path.display(),
            complaints = complaints.len(),
            "complaint store ready"
        );
        Ok(store)
    }

    /// Serialises read-modify-write cycles within this process.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.cycle.lock().await
    }

    pub async fn load(&self) -> Result<Vec<Complaint>, PortalError> {
        let path = self.path.clone();
        let outcome = blocking(move || Ok(read_table(&path))).await?;
        match outcome {
            Ok(complaints) => Ok(complaints),
            Err(ReadError::Missing) => {
                info!(path = %self.path.display(), "complaint file missing, creating an empty table");
                self.save(&[]).await?;
                Ok(Vec::new())
            }
            Err(ReadError::Malformed(reason)) => {
                warn!(
                    path = %self.path.display(),
                    %reason,
                    "complaint file unreadable, discarding its content and reinitialising"
                );
                self.save(&[]).await?;
                Ok(Vec::new())
            }
        }
    }

    pub async fn save(&self, complaints: &[Complaint]) -> Result<(), PortalError> {
        let path = self.path.clone();
        let rows = complaints.to_vec();
        blocking(move || write_table(&path, &rows)).await
    }

    /// Loads the table, applies `change`, and saves it when `change`
    /// succeeds. The whole cycle holds the store lock.
    pub async fn modify<T>(
        &self,
        change: impl FnOnce(&mut Vec<Complaint>) -> Result<T, PortalError>,
    ) -> Result<T, PortalError> {
        let _guard = self.lock().await;
        let mut complaints = self.load().await?;
        let value = change(&mut complaints)?;
        self.save(&complaints).await?;
        Ok(value)
    }

    pub async fn append(&self, complaint: Complaint) -> Result<(), PortalError> {
        self.modify(|complaints| {
            complaints.push(complaint);
            Ok(())
        })
        .await
    }

    /// Sets the status of the first record with `id`, returning the status
    /// it had before together with the updated record.
    pub async fn update_status(
        &self,
        id: &str,
        status: Status,
    ) -> Result<(Status, Complaint), PortalError> {
        self.modify(|complaints| {
            let complaint = complaints
                .iter_mut()
                .find(|complaint| complaint.id == id)
                .ok_or_else(|| PortalError::NotFound(id.to_string()))?;
            let previous = std::mem::replace(&mut complaint.status, status);
            Ok((previous, complaint.clone()))
        })
        .await
    }
}

async fn blocking<T: Send + 'static>(
    work: impl FnOnce() -> Result<T, PortalError> + Send + 'static,
) -> Result<T, PortalError> {
    tokio::task::spawn_blocking(work)
        .await
        .map_err(storage_error)?
}

fn read_table(path: &Path) -> Result<Vec<Complaint>, ReadError> {
    if !path.exists() {
        return Err(ReadError::Missing);
    }

    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|err| ReadError::Malformed(format!("{err}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReadError::Malformed("workbook has no worksheet".to_string()))?
        .map_err(|err| ReadError::Malformed(format!("{err}")))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| ReadError::Malformed("missing header row".to_string()))?;
    let names: Vec<String> = header.iter().map(cell_text).collect();

    let mut positions = [0usize; 4];
    for (slot, column) in positions.iter_mut().zip(COLUMNS) {
        *slot = names
            .iter()
            .position(|name| name.trim() == column)
            .ok_or_else(|| ReadError::Malformed(format!("missing column {column}")))?;
    }
    let [id_col, text_col, status_col, time_col] = positions;

    let mut complaints = Vec::new();
    for row in rows {
        if row.iter().all(|cell| cell_text(cell).is_empty()) {
            continue;
        }
        let field = |col: usize| row.get(col).map(cell_text).unwrap_or_default();
        let id = field(id_col);
        let raw_status = field(status_col);
        let status = raw_status.parse::<Status>().unwrap_or_else(|_| {
            warn!(%id, status = %raw_status, "unrecognised status, treating as Pending");
            Status::Pending
        });
        complaints.push(Complaint {
            id,
            text: field(text_col),
            status,
            created_at: field(time_col),
        });
    }

    Ok(complaints)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => decode_escapes(value),
        other => other.to_string(),
    }
}

/// Undoes the `_xHHHH_` escaping the writer applies to carriage returns,
/// control characters and literal `_xHHHH_` runs (`_x005F_` is `_`).
fn decode_escapes(value: &str) -> String {
    if !value.contains("_x") {
        return value.to_string();
    }

    let mut decoded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("_x") {
        decoded.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let escaped = candidate
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match escaped {
            Some(ch) => {
                decoded.push(ch);
                rest = &candidate[7..];
            }
            None => {
                decoded.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

fn write_table(path: &Path, complaints: &[Complaint]) -> Result<(), PortalError> {
    let mut workbook = build_workbook(complaints).map_err(storage_error)?;

    // Write beside the target and rename so a crash never leaves a torn file.
    let staging = path.with_extension("xlsx.tmp");
    workbook.save(&staging).map_err(storage_error)?;
    fs::rename(&staging, path).map_err(storage_error)?;
    Ok(())
}

fn build_workbook(complaints: &[Complaint]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }
    for (index, complaint) in complaints.iter().enumerate() {
        let row = index as u32 + 1;
        worksheet.write_string(row, 0, complaint.id.as_str())?;
        worksheet.write_string(row, 1, complaint.text.as_str())?;
        worksheet.write_string(row, 2, complaint.status.as_str())?;
        worksheet.write_string(row, 3, complaint.created_at.as_str())?;
    }
    Ok(workbook)
}

fn storage_error(err: impl std::error::Error) -> PortalError {
    PortalError::Storage(err.to_string())
}
