use std::fs;
use std::path::Path;
use chrono::Utc;
use uuid::Uuid;

/// Create a run directory and return it
pub fn create_run_dir(base: &Path) -> anyhow::Result<std::path::PathBuf> {
    let run_id = Uuid::new_v4().to_string();
    let dir = base.join("runs").join(run_id);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn write_artifact(dir: &Path, name: &str, content: &[u8]) -> anyhow::Result<()> {
    let path = dir.join(name);
    fs::write(path, content)?;
    Ok(())
}

pub fn timestamp() -> String {
    // Format: YYYY-MM-DD_HH-MM-SS
    Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}
