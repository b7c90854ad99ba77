//! Pruebas del `EnvironmentLoader` contra archivos `.env` reales en un
//! directorio temporal.

use std::fs;

use clinica_persistence::{ConfigSource, ConnectionConfig, EnvironmentLoader};
use tempfile::TempDir;

fn write_env(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(".env");
    fs::write(&path, content).expect("write .env");
    path
}

#[test]
fn parses_recognized_keys_and_skips_noise() {
    let dir = TempDir::new().unwrap();
    let path = write_env(&dir, "DB_HOST=foo\nDB_NAME=\"bar\"\n# comment\nmalformedline\nDB_USER='baz'\n");
    let loader = EnvironmentLoader::new(&path);
    let cfg = loader.load();
    assert_eq!(cfg.host, "foo");
    assert_eq!(cfg.database, "bar");
    assert_eq!(cfg.user, "baz");
    // DB_PASS ausente: conserva el valor por defecto
    assert_eq!(cfg.password, ConnectionConfig::default().password);
    assert_eq!(loader.source(), &ConfigSource::File(path));
}

#[test]
fn only_first_equals_splits() {
    let dir = TempDir::new().unwrap();
    let path = write_env(&dir, "DB_PASS=a=b=c\n");
    assert_eq!(EnvironmentLoader::new(path).load().password, "a=b=c");
}

#[test]
fn quote_stripping_is_single_layer() {
    let dir = TempDir::new().unwrap();
    let path = write_env(&dir, "DB_PASS=\"'nested'\"\n");
    assert_eq!(EnvironmentLoader::new(path).load().password, "'nested'");
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let loader = EnvironmentLoader::new(dir.path().join(".env"));
    let cfg = loader.load();
    assert_eq!(cfg.host, "localhost");
    assert_eq!(cfg.database, "clinica");
    assert_eq!(cfg.user, "root");
    assert_eq!(cfg.password, "");
    assert_eq!(loader.source(), &ConfigSource::Defaults);
}

#[test]
fn unknown_key_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_env(&dir, "FOO=bar\n");
    assert_eq!(EnvironmentLoader::new(path).load(), &ConnectionConfig::default());
}

#[test]
fn second_load_does_not_reread_deleted_file() {
    let dir = TempDir::new().unwrap();
    let path = write_env(&dir, "DB_HOST=first\nDB_PASS=secret\n");
    let loader = EnvironmentLoader::new(&path);
    assert!(!loader.is_loaded());
    let first = loader.load().clone();
    assert!(loader.is_loaded());

    fs::remove_file(&path).unwrap();
    let second = loader.load();
    assert_eq!(&first, second);
    assert_eq!(second.host, "first");
}

#[test]
fn second_load_ignores_mutated_file() {
    let dir = TempDir::new().unwrap();
    let path = write_env(&dir, "DB_USER=alice\n");
    let loader = EnvironmentLoader::new(&path);
    assert_eq!(loader.load().user, "alice");

    fs::write(&path, "DB_USER=mallory\n").unwrap();
    assert_eq!(loader.load().user, "alice");
}

#[test]
fn unreadable_file_falls_back_to_defaults() {
    // Un directorio con el nombre del archivo existe pero no se puede leer como texto.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".env");
    fs::create_dir(&path).unwrap();
    let loader = EnvironmentLoader::new(&path);
    assert_eq!(loader.load(), &ConnectionConfig::default());
    assert_eq!(loader.source(), &ConfigSource::Defaults);
}

#[test]
fn full_file_with_spacing_and_comments() {
    let dir = TempDir::new().unwrap();
    let content = "\
# Configuración de la clínica
   # comentario indentado

DB_HOST = 10.0.0.7
DB_NAME= clinica_prod
DB_USER =\"clinic_app\"
DB_PASS = 'p=ss word'
APP_DEBUG=true
";
    let path = write_env(&dir, content);
    let cfg = EnvironmentLoader::new(path).load().clone();
    assert_eq!(cfg, ConnectionConfig {
        host: "10.0.0.7".into(),
        database: "clinica_prod".into(),
        user: "clinic_app".into(),
        password: "p=ss word".into(),
    });
}

#[test]
fn invalid_utf8_only_spoils_its_own_line() {
    // comentario guardado en Latin-1
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, b"# Configuraci\xf3n\nDB_HOST=foo\nDB_PASS=clave\n").unwrap();
    let loader = EnvironmentLoader::new(&path);
    assert_eq!(loader.load().host, "foo");
    assert_eq!(loader.load().password, "clave");
    assert_eq!(loader.source(), &ConfigSource::File(path));
}
