//! Parser del archivo `.env` de credenciales.
//!
//! Formato aceptado (una entrada por línea):
//!
//! ```text
//! # comentario
//! DB_HOST=localhost
//! DB_NAME="clinica"
//! DB_PASS='s3cr=to'
//! ```
//!
//! Reglas:
//! - Líneas vacías y líneas que (tras `trim`) empiezan por `#` se ignoran.
//! - Líneas sin `=` se ignoran en silencio.
//! - Sólo el PRIMER `=` separa clave y valor; el valor puede contener `=`.
//! - Clave y valor se recortan de espacios.
//! - Se elimina una sola capa de comillas (`"` o `'`) alrededor del valor.
//! - Claves desconocidas no alteran la configuración.

use log::debug;

/// Claves reconocidas del archivo `.env`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Host,
    Database,
    User,
    Password,
}

impl ConfigKey {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DB_HOST" => Some(Self::Host),
            "DB_NAME" => Some(Self::Database),
            "DB_USER" => Some(Self::User),
            "DB_PASS" => Some(Self::Password),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Host => "DB_HOST",
            Self::Database => "DB_NAME",
            Self::User => "DB_USER",
            Self::Password => "DB_PASS",
        }
    }
}

/// Elimina una capa de comillas simples o dobles en los extremos del valor.
///
/// Cada extremo se trata por separado: `"'nested'"` queda en `'nested'`.
pub fn strip_quotes(value: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let value = value.strip_prefix(is_quote).unwrap_or(value);
    value.strip_suffix(is_quote).unwrap_or(value)
}

/// Separa una línea en `(clave, valor)` ya recortados y sin comillas.
/// Devuelve `None` para comentarios, líneas vacías y líneas sin `=`.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (key, value) = trimmed.split_once('=')?;
    Some((key.trim(), strip_quotes(value.trim())))
}

/// Recorre el contenido completo y devuelve las entradas reconocidas en orden
/// de aparición (una clave repetida aparece varias veces; gana la última al
/// aplicarlas).
pub fn parse_entries(content: &str) -> Vec<(ConfigKey, String)> {
    let mut entries = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let Some((key, value)) = parse_line(line) else {
            if !line.trim().is_empty() && !line.trim().starts_with('#') {
                debug!("env line {} skipped: no '=' delimiter", idx + 1);
            }
            continue;
        };
        match ConfigKey::from_name(key) {
            Some(k) => entries.push((k, value.to_string())),
            None => debug!("env line {} skipped: unrecognized key {key}", idx + 1),
        }
    }
    entries
}
