use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use centrality_data::container;

pub fn read_container<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    container::read_json(path)
        .with_context(|| format!("Failed to read {} file: {}", file_kind, path.display()))
}

pub fn write_container<T>(file_kind: &str, path: &Path, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    container::write_json(path, value)
        .with_context(|| format!("Failed to write {} file: {}", file_kind, path.display()))
}

/// Finds the event database of a results folder: `<root>/<name>.json` or
/// `<root>/<name>.json.zst`, where `<name>` is the folder's own name.
pub fn database_path(root: &Path) -> anyhow::Result<PathBuf> {
    let root = std::path::absolute(root)
        .with_context(|| format!("Failed to resolve results folder: {}", root.display()))?;
    let Some(name) = root.file_name().and_then(|name| name.to_str()) else {
        anyhow::bail!("Results folder has no usable name: {}", root.display());
    };
    let candidates = [
        root.join(format!("{name}.json")),
        root.join(format!("{name}.json.zst")),
    ];
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Event database not found; expected {} or {}",
                candidates[0].display(),
                candidates[1].display()
            )
        })
}

/// Asks whether an existing output file may be replaced. Only `y` accepts.
pub fn confirm_overwrite<R, W>(path: &Path, mut input: R, mut prompt: W) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    write!(
        prompt,
        "Output file '{}' exists. Overwrite? (y/n): ",
        path.display()
    )?;
    prompt.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
