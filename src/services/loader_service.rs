//! services/loader_service.rs
//! Carga de los CSV de destinatarios y remitentes.

use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::recipient_model::{
    RecipientTable, Row, SenderCredential, SourceData, APP_PASSWORD_COLUMN, EMAIL_COLUMN,
};

/// Fallo al cargar un archivo; aborta todo antes de enviar nada.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: line {line} has {found} fields, header has {expected}")]
    TooManyFields {
        path: PathBuf,
        line: u64,
        found: usize,
        expected: usize,
    },

    #[error("{0} has no header row")]
    Empty(PathBuf),

    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
}

/// Lee un CSV con encabezados y devuelve las filas en orden.
pub fn load_table(path: &Path) -> Result<RecipientTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    // Filas cortas se completan con celdas vacías; filas largas son un error.
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if record.len() > headers.len() {
            return Err(LoadError::TooManyFields {
                path: path.to_path_buf(),
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                found: record.len(),
                expected: headers.len(),
            });
        }
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    Ok(RecipientTable { headers, rows })
}

pub fn load_receivers(path: &Path) -> Result<RecipientTable, LoadError> {
    load_table(path)
}

pub fn load_senders(path: &Path) -> Result<Vec<SenderCredential>, LoadError> {
    let table = load_table(path)?;
    for column in [EMAIL_COLUMN, APP_PASSWORD_COLUMN] {
        if !table.has_column(column) {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    Ok(table
        .rows
        .into_iter()
        .map(|mut row| SenderCredential {
            email: row.remove(EMAIL_COLUMN).unwrap_or_default(),
            app_password: row.remove(APP_PASSWORD_COLUMN).unwrap_or_default(),
        })
        .collect())
}

/// Carga ambos archivos. Cualquier error es fatal para la corrida.
pub fn load_sources(receivers_path: &Path, senders_path: &Path) -> Result<SourceData, LoadError> {
    let receivers = load_receivers(receivers_path)?;
    let senders = load_senders(senders_path)?;

    log::info!(
        "(load_sources) Receivers loaded: {} | Senders loaded: {}",
        receivers.len(),
        senders.len()
    );
    if receivers.is_empty() {
        log::warn!("(load_sources) {} no tiene destinatarios", receivers_path.display());
    }

    Ok(SourceData { receivers, senders })
}
