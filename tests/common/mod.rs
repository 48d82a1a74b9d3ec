use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Build an SSE body from `data:` payloads, one line each
#[allow(dead_code)]
pub fn sse_body(payloads: &[&str]) -> String {
    payloads
        .iter()
        .map(|p| format!("data: {}\n\n", p))
        .collect()
}
