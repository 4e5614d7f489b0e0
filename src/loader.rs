//! This module provides the `MachineLoader` struct, responsible for moving
//! machine descriptions between the filesystem and [`Machine`] values.

use crate::encoder::encode;
use crate::machine::Machine;
use crate::parser::parse;
use crate::types::MachineError;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension for machine description files.
const MACHINE_EXTENSION: &str = "tm";

/// `MachineLoader` is a utility struct for loading and saving machine
/// descriptions. It can load a single `.tm` file, parse in-memory content,
/// save a machine back to disk, and discover all `.tm` files in a
/// directory.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a machine description from the specified file path.
    ///
    /// # Errors
    ///
    /// * [`MachineError::FileError`] if the file cannot be read.
    /// * [`MachineError::ParseError`] if the content is not a valid
    ///   description.
    pub fn load_machine(path: &Path) -> Result<Machine, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        parse(&content)
    }

    /// Loads a machine description from in-memory content, e.g. user input.
    pub fn load_machine_from_string(content: &str) -> Result<Machine, MachineError> {
        parse(content)
    }

    /// Writes a machine description to the specified file path, in the
    /// textual format produced by [`encode`].
    pub fn save_machine(path: &Path, machine: &Machine) -> Result<(), MachineError> {
        fs::write(path, encode(machine)).map_err(|e| {
            MachineError::FileError(format!("Failed to write file {}: {}", path.display(), e))
        })
    }

    /// Loads all machine description files (`.tm` extension) from a given
    /// directory. Directories and files with other extensions are skipped;
    /// each result carries either the path and parsed machine or the error
    /// encountered for that entry.
    pub fn load_machines(directory: &Path) -> Vec<Result<(PathBuf, Machine), MachineError>> {
        if !directory.exists() {
            return vec![Err(MachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(MachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(MachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != MACHINE_EXTENSION) {
                    return None;
                }

                match Self::load_machine(&path) {
                    Ok(machine) => Some(Ok((path, machine))),
                    Err(e) => Some(Err(MachineError::FileError(format!(
                        "Failed to load machine from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect()
    }
}
