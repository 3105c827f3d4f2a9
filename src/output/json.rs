use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write records to `<dir>/<file_name>` as a pretty-printed JSON array
///
/// The directory is created if missing and an existing file is truncated.
/// Output is UTF-8 with two-space indentation; non-ASCII text is written
/// as-is rather than `\u` escaped. Not atomic: a failure mid-write leaves
/// a partial file.
///
/// # Returns
/// * The path that was written
pub fn write_records<T: Serialize>(
    dir: &Path,
    file_name: &str,
    records: &[T],
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let path = dir.join(file_name);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, records)
        .with_context(|| format!("Failed to serialize records to {}", path.display()))?;
    writer.flush()?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, Tags};
    use serde_json::Number;
    use tempfile::tempdir;

    fn record(id: &str, name: &str) -> Record {
        Record {
            id: id.to_string(),
            type_: "wisata".to_string(),
            name: name.to_string(),
            category: "general".to_string(),
            lat: Number::from_f64(-6.9).unwrap(),
            lon: Number::from_f64(107.6).unwrap(),
            address: "Jl. Braga No. 10".to_string(),
            phone: "+62811111111".to_string(),
            website: String::new(),
            opening_hours: "08:00-20:00".to_string(),
            description: "Data hasil scraping wisata dari OpenStreetMap".to_string(),
            tags: Tags::from([("name:ja".to_string(), name.to_string())]),
        }
    }

    #[test]
    fn test_creates_directory_and_writes_pretty_json() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("lib").join("data");

        let path =
            write_records(&out_dir, "wisata.json", &[record("wisata-1", "バンドン")]).unwrap();

        assert_eq!(path, out_dir.join("wisata.json"));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("[\n  {\n    \"id\": \"wisata-1\","));
        assert!(contents.contains("\"name\": \"バンドン\""));
        assert!(!contents.contains("\\u"));

        let parsed: Vec<Record> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, vec![record("wisata-1", "バンドン")]);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let records = [record("wisata-1", "A"), record("wisata-2", "B")];

        write_records(dir.path(), "wisata.json", &records).unwrap();
        write_records(dir.path(), "wisata.json", &records[..1]).unwrap();

        let contents = fs::read_to_string(dir.path().join("wisata.json")).unwrap();
        let parsed: Vec<Record> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_empty_list() {
        let dir = tempdir().unwrap();
        let path = write_records::<Record>(dir.path(), "umkm.json", &[]).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }
}
