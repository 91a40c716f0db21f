//! models/recipient_model.rs
//! Filas cargadas de los CSV: destinatarios y cuentas remitentes.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::models::broadcast_model::SendMethod;
use crate::services::template_service;

pub const NAME_COLUMN: &str = "name";
pub const EMAIL_COLUMN: &str = "email";
pub const NUMBER_COLUMN: &str = "number";
pub const DEPT_COLUMN: &str = "dept";
pub const APP_PASSWORD_COLUMN: &str = "app_password";

/// Una fila del CSV: columna -> valor.
pub type Row = HashMap<String, String>;

/// Tabla de destinatarios tal cual viene del archivo (orden preservado).
#[derive(Debug, Clone, Default)]
pub struct RecipientTable {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl RecipientTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Departamentos distintos y ordenados, `None` si no hay columna `dept`.
    pub fn departments(&self) -> Option<Vec<String>> {
        if !self.has_column(DEPT_COLUMN) {
            return None;
        }
        let set: BTreeSet<&str> = self
            .rows
            .iter()
            .filter_map(|row| row.get(DEPT_COLUMN))
            .map(String::as_str)
            .filter(|dept| !dept.is_empty())
            .collect();
        Some(set.into_iter().map(str::to_string).collect())
    }

    /// Filas activas para una selección de departamentos.
    ///
    /// Una selección vacía (o una tabla sin `dept`) significa "todos".
    pub fn select(&self, departments: &[String]) -> Vec<&Row> {
        if departments.is_empty() || !self.has_column(DEPT_COLUMN) {
            return self.rows.iter().collect();
        }
        self.rows
            .iter()
            .filter(|row| {
                row.get(DEPT_COLUMN)
                    .map(|dept| departments.iter().any(|d| d == dept))
                    .unwrap_or(false)
            })
            .collect()
    }
}

fn non_empty(row: &Row, column: &str) -> Option<String> {
    row.get(column)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub name: Option<String>,
    /// Email o número, según el método de envío.
    pub contact: Option<String>,
    pub department: Option<String>,
}

impl Recipient {
    pub fn from_row(row: &Row, method: SendMethod) -> Self {
        let contact_column = match method {
            SendMethod::Email => EMAIL_COLUMN,
            SendMethod::WhatsApp => NUMBER_COLUMN,
        };
        Recipient {
            name: non_empty(row, NAME_COLUMN),
            contact: non_empty(row, contact_column),
            department: non_empty(row, DEPT_COLUMN),
        }
    }

    /// Nombre para los reportes de error.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(template_service::NAME_FALLBACK)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SenderCredential {
    pub email: String,
    pub app_password: String,
}

impl std::fmt::Debug for SenderCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderCredential")
            .field("email", &self.email)
            .field("app_password", &"***")
            .finish()
    }
}

/// Todo lo que se carga al arrancar.
#[derive(Debug, Clone, Default)]
pub struct SourceData {
    pub receivers: RecipientTable,
    pub senders: Vec<SenderCredential>,
}
