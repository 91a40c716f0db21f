//! config/secrets.rs
//! Resolución de secretos por prioridad: archivo de secretos, luego
//! variables de entorno, y por último un literal por defecto.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

/// Una fuente de valores de configuración.
pub trait SecretSource: Send + Sync {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Archivo `KEY=VALUE` (mismo formato que `.env`), leído una sola vez.
#[derive(Debug, Clone, Default)]
pub struct SecretsFile {
    values: HashMap<String, String>,
}

impl SecretsFile {
    /// Si el archivo no existe se devuelve una fuente vacía.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!(
                "(SecretsFile::load) No existe {}, se usará solo el entorno.",
                path.display()
            );
            return Ok(Self::default());
        }

        let mut values = HashMap::new();
        let iter = dotenv::from_path_iter(path)
            .with_context(|| format!("Failed to open secrets file {}", path.display()))?;
        for item in iter {
            let (key, value) =
                item.with_context(|| format!("Invalid line in secrets file {}", path.display()))?;
            values.insert(key, value);
        }

        log::info!(
            "(SecretsFile::load) {} claves cargadas desde {}",
            values.len(),
            path.display()
        );
        Ok(Self { values })
    }

    #[cfg(test)]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl SecretSource for SecretsFile {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Variables de entorno del proceso.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl SecretSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

pub struct SecretChain {
    sources: Vec<Box<dyn SecretSource>>,
}

impl SecretChain {
    pub fn new(sources: Vec<Box<dyn SecretSource>>) -> Self {
        Self { sources }
    }

    /// Archivo de secretos primero, entorno después.
    pub fn standard(secrets_file: SecretsFile) -> Self {
        Self::new(vec![Box::new(secrets_file), Box::new(ProcessEnv)])
    }

    /// Primer valor no vacío de la cadena.
    pub fn get(&self, key: &str) -> Option<String> {
        self.sources
            .iter()
            .filter_map(|source| source.lookup(key))
            .find(|value| !value.is_empty())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}
