//! Payload file I/O
//!
//! Payloads are written to a sibling `.tmp` file and renamed into place, so a
//! reader never sees a half-written payload even if the process dies mid-write.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{Error, Result};

/// File name for the payload of the `count`-th drawing ever inserted
pub fn payload_file_name(count: i64) -> String {
    format!("drawing_{count}.json")
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub async fn write_payload(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, contents.as_bytes())
        .await
        .map_err(|e| Error::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(Error::io(path, e));
    }

    log::debug!("Wrote payload: {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

pub async fn read_payload(path: &Path) -> Result<String> {
    fs::read_to_string(path).await.map_err(|e| Error::io(path, e))
}
