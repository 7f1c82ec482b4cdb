use crate::error::GenerateError;
use std::path::Path;
use tokio::fs;

/// Writes `content` to `output_dir/filename` and returns the size on disk.
///
/// The output directory is created (recursively) when it does not exist yet,
/// and an existing file of the same name is overwritten. The size is read
/// back from the file's metadata once the write finished; it confirms that
/// the file landed, it does not compare the bytes against `content`.
///
/// # Errors
///
/// Returns [`GenerateError::Io`] for the path that failed when the directory
/// cannot be created, the file cannot be written, or its metadata cannot be
/// read.
pub async fn write_document(
    output_dir: &Path,
    filename: &str,
    content: &str,
) -> Result<u64, GenerateError> {
    fs::create_dir_all(output_dir)
        .await
        .map_err(|e| GenerateError::io(output_dir, e))?;

    let target_path = output_dir.join(filename);
    fs::write(&target_path, content)
        .await
        .map_err(|e| GenerateError::io(&target_path, e))?;

    let metadata = fs::metadata(&target_path)
        .await
        .map_err(|e| GenerateError::io(&target_path, e))?;
    Ok(metadata.len())
}
