use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::shared::constants;

/// Frame indices present on disk for `<base>_<index>.bmp`, sorted ascending.
pub fn list_frame_indices(base_path: &str) -> Result<Vec<u32>> {
    let base = Path::new(base_path);
    let dir = match base.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = match base.file_name().and_then(|n| n.to_str()) {
        Some(name) => format!("{}_", name),
        None => anyhow::bail!("invalid frame base path: {}", base_path),
    };

    let mut indices: Vec<u32> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map_or(false, |ext| ext == constants::FRAME_EXTENSION)
        })
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?;
            stem.strip_prefix(prefix.as_str())?.parse::<u32>().ok()
        })
        .collect();

    // Numeric sort: frame_10 comes after frame_9
    indices.sort_unstable();
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, remove_dir_all, File};

    #[test]
    fn test_list_frame_indices_sorts_numerically() {
        let dir = std::env::temp_dir().join(format!("bad_apple_grid_list_{}", std::process::id()));
        let _ = remove_dir_all(&dir);
        create_dir_all(&dir).unwrap();
        for name in ["frame_10.bmp", "frame_2.bmp", "frame_1.bmp", "frame_x.bmp", "other_3.bmp", "frame_4.png"] {
            File::create(dir.join(name)).unwrap();
        }

        let base = dir.join("frame").to_string_lossy().to_string();
        assert_eq!(list_frame_indices(&base).unwrap(), vec![1, 2, 10]);
    }

    #[test]
    fn test_list_frame_indices_missing_dir_is_error() {
        assert!(list_frame_indices("no/such/dir/frame").is_err());
    }
}
