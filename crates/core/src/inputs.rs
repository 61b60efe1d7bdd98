//! Discovery and reading of movie payload files.

use std::{
    fmt, fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use tracing::warn;
use walkdir::WalkDir;

/// Argument that stands for standard input.
pub const STDIN_ARG: &str = "-";

/// A single payload to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Read the body from standard input.
    Stdin,
    /// Read the body from a file.
    File(PathBuf),
}

impl InputSource {
    /// Read the whole payload into memory.
    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            Self::Stdin => {
                let mut body = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut body)
                    .context("failed to read standard input")?;
                Ok(body)
            }
            Self::File(path) => {
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Expand command-line arguments into payload sources.
///
/// No arguments means standard input. Directories are walked recursively for
/// `*.json` files in path order; unreadable directory entries are skipped.
pub fn collect_inputs(args: &[PathBuf]) -> Result<Vec<InputSource>> {
    if args.is_empty() {
        return Ok(vec![InputSource::Stdin]);
    }

    let mut inputs = Vec::new();
    for arg in args {
        if arg.as_os_str() == STDIN_ARG {
            inputs.push(InputSource::Stdin);
        } else if arg.is_dir() {
            inputs.extend(json_files(arg).into_iter().map(InputSource::File));
        } else if arg.is_file() {
            inputs.push(InputSource::File(arg.clone()));
        } else {
            return Err(anyhow!("input {} does not exist", arg.display()));
        }
    }
    Ok(inputs)
}

fn json_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry under {}: {err}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        files.push(entry.into_path());
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn no_arguments_means_stdin() -> Result<()> {
        assert_eq!(collect_inputs(&[])?, vec![InputSource::Stdin]);
        assert_eq!(
            collect_inputs(&[PathBuf::from(STDIN_ARG)])?,
            vec![InputSource::Stdin]
        );
        Ok(())
    }

    #[test]
    fn walks_directories_for_json_files() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path();
        fs::create_dir_all(root.join("nested"))?;
        fs::write(root.join("b.json"), "{}")?;
        fs::write(root.join("a.json"), "{}")?;
        fs::write(root.join("notes.txt"), "skip")?;
        fs::write(root.join("nested/c.json"), "{}")?;

        let inputs = collect_inputs(&[root.to_path_buf()])?;
        assert_eq!(
            inputs,
            vec![
                InputSource::File(root.join("a.json")),
                InputSource::File(root.join("b.json")),
                InputSource::File(root.join("nested/c.json")),
            ]
        );
        Ok(())
    }

    #[test]
    fn reads_explicit_files() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("movie.txt");
        fs::write(&path, r#"{"title":"Up"}"#)?;

        let inputs = collect_inputs(&[path.clone()])?;
        assert_eq!(inputs, vec![InputSource::File(path.clone())]);
        assert_eq!(inputs[0].read()?, br#"{"title":"Up"}"#.to_vec());
        assert_eq!(inputs[0].to_string(), path.display().to_string());
        Ok(())
    }

    #[test]
    fn missing_path_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        assert!(collect_inputs(&[dir.path().join("absent.json")]).is_err());
        Ok(())
    }
}
