use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path next to the input, with the extension swapped
    // @params: input_file, extension
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, extension: &str) -> PathBuf {
        input_file
            .as_ref()
            .with_extension(extension.trim_start_matches('.'))
    }

    /// Find files with any of the given extensions under a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    let ext = ext.to_string_lossy();
                    if extensions
                        .iter()
                        .any(|wanted| ext.eq_ignore_ascii_case(wanted.trim_start_matches('.')))
                    {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Read a file to a string without blocking the runtime
    pub async fn read_to_string_async<P: AsRef<Path>>(path: P) -> Result<String> {
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file without blocking the runtime
    pub async fn write_to_file_async<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }
}
