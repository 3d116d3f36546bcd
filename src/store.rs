use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::model::{ArgEdit, CommandSpec, StoredEntry};

const SCHEMA_VERSION: u32 = 1;
const COMMAND_FILE: &str = "command.json";
const ARGS_FILE: &str = "args.json";

/// String-keyed JSON store for the panel's command state. The base
/// command and the argument list are separate entries so a rename and
/// an argument edit stay independent writes (last-write-wins per
/// entry, no transactional grouping).
#[derive(Clone)]
pub struct CommandStore {
    root: PathBuf,
}

impl CommandStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("create store dir {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Hydrate the command spec. Missing or unreadable entries degrade
    /// to the built-in default per entry; hydration never fails.
    pub fn load(&self) -> CommandSpec {
        let default = CommandSpec::default();
        let base = self
            .read_entry::<String>(COMMAND_FILE)
            .unwrap_or(default.base);
        let args = self
            .read_entry::<Vec<String>>(ARGS_FILE)
            .unwrap_or(default.args);
        CommandSpec { base, args }
    }

    /// Replace the base command unconditionally (empty permitted, no
    /// validation) and persist the command entry.
    pub fn set_base(&self, base: &str) -> Result<()> {
        self.write_entry(COMMAND_FILE, &base)
    }

    /// Apply one argument mutation and persist the args entry. An
    /// out-of-range index is a caller bug and reports an error without
    /// touching the stored list.
    pub fn apply(&self, edit: ArgEdit) -> Result<Vec<String>> {
        let mut args = self.load().args;
        match edit {
            ArgEdit::ReplaceAll(next) => args = next,
            ArgEdit::SetAt { index, value } => {
                let slot = args
                    .get_mut(index)
                    .ok_or_else(|| anyhow!("argument index {} out of range", index))?;
                *slot = value;
            }
            ArgEdit::RemoveAt(index) => {
                if index >= args.len() {
                    return Err(anyhow!("argument index {} out of range", index));
                }
                args.remove(index);
            }
            ArgEdit::Append(value) => args.push(value),
        }
        self.write_entry(ARGS_FILE, &args)?;
        Ok(args)
    }

    fn read_entry<T: serde::de::DeserializeOwned>(&self, file: &str) -> Option<T> {
        let bytes = fs::read(self.root.join(file)).ok()?;
        let entry: StoredEntry<T> = serde_json::from_slice(&bytes).ok()?;
        (entry.version == SCHEMA_VERSION).then_some(entry.value)
    }

    fn write_entry<T: serde::Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let entry = StoredEntry {
            version: SCHEMA_VERSION,
            value,
        };
        let bytes = serde_json::to_vec_pretty(&entry).context("serialize store entry")?;
        write_atomic(&self.root.join(file), &bytes).with_context(|| format!("write {}", file))
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
