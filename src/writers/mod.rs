// Writers Module
//
// Turns an extracted source model into proto3 files on disk.

mod proto;

pub use proto::{proto_file_path, proto_scalar, ProtoFile, SchemaWriter};

use crate::error::{ModelError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write rendered files under `out_dir`, creating directories as needed
///
/// Returns the written paths in input order.
pub fn write_proto_files(out_dir: &Path, files: &[ProtoFile]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let target = crate::utils::paths::to_absolute_native(&file.path, out_dir);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ModelError::io(parent, e))?;
        }
        fs::write(&target, file.render()).map_err(|e| ModelError::io(&target, e))?;
        debug!("Wrote {}", target.display());
        written.push(target);
    }

    Ok(written)
}
