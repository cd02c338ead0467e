//! Pairings file persistence
//!
//! The final pairing is written as a TOML map (`giver = "recipient"`), one
//! pair per line. Writes go to a sibling temp file which is renamed into
//! place, so readers never observe a partial file.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::Pairing;

/// Store for the pairings file
pub struct PairingStore {
    path: PathBuf,
}

impl PairingStore {
    /// Creates a store for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the pairings file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically writes the pairing
    pub fn write(&self, pairing: &Pairing) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = {
            let mut name = self.path.as_os_str().to_os_string();
            name.push(".tmp");
            PathBuf::from(name)
        };

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            let mut writer = BufWriter::new(&file);
            let content =
                toml::to_string(pairing).context("Failed to serialize pairings")?;
            writer
                .write_all(content.as_bytes())
                .context("Failed to write pairings")?;
            writer.flush().context("Failed to flush pairings file")?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                file.set_permissions(fs::Permissions::from_mode(0o644))
                    .context("Failed to set pairings file permissions")?;
            }
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Reads a previously written pairing back
    pub fn read(&self) -> Result<Pairing> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read pairings file: {}", self.path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse pairings file: {}", self.path.display()))
    }
}
