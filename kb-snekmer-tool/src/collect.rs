//! Collection of the tool's output files: CSV discovery, single-header
//! concatenation, zip bundling, and the summary counts that feed the report.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::ZipWriter;

use kb_snekmer_core::{SnekmerError, SnekmerResult};

/// Find every CSV the tool wrote under `output_dir`, sorted for stable
/// ordering across runs.
pub fn find_result_csvs(output_dir: &Path) -> SnekmerResult<Vec<PathBuf>> {
    let pattern = format!("{}/**/*.csv", output_dir.display());
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| SnekmerError::Other(format!("bad glob pattern: {}", e)))?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Serialized family models produced by the model subcommand.
pub fn find_model_files(output_dir: &Path) -> SnekmerResult<Vec<PathBuf>> {
    let pattern = format!("{}/**/*.model", output_dir.display());
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| SnekmerError::Other(format!("bad glob pattern: {}", e)))?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Concatenate result tables into one CSV with a single header row.
/// All inputs are expected to share a schema; the first file's header wins
/// and later headers are dropped. Returns the number of data rows written.
pub fn concatenate_csvs(files: &[PathBuf], dest: &Path) -> SnekmerResult<usize> {
    if files.is_empty() {
        return Err(SnekmerError::Tool(
            "no result CSV files to concatenate".to_string(),
        ));
    }

    let mut writer = csv::Writer::from_path(dest)
        .map_err(|e| SnekmerError::Other(format!("cannot write {}: {}", dest.display(), e)))?;

    let mut header_written = false;
    let mut rows = 0usize;

    for file in files {
        let mut reader = csv::Reader::from_path(file)
            .map_err(|e| SnekmerError::Other(format!("cannot read {}: {}", file.display(), e)))?;

        if !header_written {
            let headers = reader
                .headers()
                .map_err(|e| SnekmerError::Other(e.to_string()))?;
            writer
                .write_record(headers)
                .map_err(|e| SnekmerError::Other(e.to_string()))?;
            header_written = true;
        }

        for record in reader.records() {
            let record = record.map_err(|e| {
                SnekmerError::Other(format!("bad row in {}: {}", file.display(), e))
            })?;
            writer
                .write_record(&record)
                .map_err(|e| SnekmerError::Other(e.to_string()))?;
            rows += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| SnekmerError::Other(e.to_string()))?;
    Ok(rows)
}

/// Bundle files into a zip archive, stored under their paths relative to
/// `base_dir`. Returns the number of entries written.
pub fn zip_files(files: &[PathBuf], base_dir: &Path, dest: &Path) -> SnekmerResult<usize> {
    let archive = File::create(dest)?;
    let mut zip = ZipWriter::new(archive);
    let options: FileOptions = FileOptions::default();

    let mut entries = 0usize;
    let mut buffer = Vec::new();

    for file in files {
        let name = file
            .strip_prefix(base_dir)
            .unwrap_or(file)
            .to_string_lossy()
            .into_owned();

        zip.start_file(name.as_str(), options)
            .map_err(|e| SnekmerError::Other(format!("zip entry {} failed: {}", name, e)))?;

        buffer.clear();
        File::open(file)?.read_to_end(&mut buffer)?;
        zip.write_all(&buffer)?;
        entries += 1;
    }

    zip.finish()
        .map_err(|e| SnekmerError::Other(format!("failed to finish zip: {}", e)))?;

    tracing::debug!(dest = %dest.display(), entries, "wrote results archive");
    Ok(entries)
}

/// Count the distinct values of a named column in a CSV, if the column
/// exists. The search tables carry a family column; its cardinality is the
/// "families hit" figure in the report.
pub fn count_distinct_column(csv_path: &Path, column: &str) -> SnekmerResult<Option<usize>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .map_err(|e| SnekmerError::Other(format!("cannot read {}: {}", csv_path.display(), e)))?;

    let headers = reader
        .headers()
        .map_err(|e| SnekmerError::Other(e.to_string()))?;
    let Some(index) = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(column))
    else {
        return Ok(None);
    };

    let mut seen = std::collections::HashSet::new();
    for record in reader.records() {
        let record = record.map_err(|e| SnekmerError::Other(e.to_string()))?;
        if let Some(value) = record.get(index) {
            if !value.is_empty() {
                seen.insert(value.to_string());
            }
        }
    }
    Ok(Some(seen.len()))
}

/// Best-family assignment per sequence, read from the combined search table.
/// Expects `sequence_id` and `family` columns; when a numeric `score` column
/// is present the highest-scoring row per sequence wins, otherwise the first
/// row does. Returns an empty map when the table lacks the needed columns.
pub fn read_family_assignments(
    csv_path: &Path,
) -> SnekmerResult<std::collections::HashMap<String, String>> {
    use std::collections::HashMap;

    let mut reader = csv::Reader::from_path(csv_path)
        .map_err(|e| SnekmerError::Other(format!("cannot read {}: {}", csv_path.display(), e)))?;

    let headers = reader
        .headers()
        .map_err(|e| SnekmerError::Other(e.to_string()))?;
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    };
    let (Some(id_col), Some(family_col)) = (find("sequence_id"), find("family")) else {
        tracing::warn!(
            path = %csv_path.display(),
            "search table lacks sequence_id/family columns; skipping annotation"
        );
        return Ok(HashMap::new());
    };
    let score_col = find("score");

    let mut best: HashMap<String, (String, f64)> = HashMap::new();
    for record in reader.records() {
        let record = record.map_err(|e| SnekmerError::Other(e.to_string()))?;
        let (Some(id), Some(family)) = (record.get(id_col), record.get(family_col)) else {
            continue;
        };
        if id.is_empty() || family.is_empty() {
            continue;
        }
        let score = score_col
            .and_then(|c| record.get(c))
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(f64::NEG_INFINITY);

        match best.get(id) {
            Some((_, existing)) if *existing >= score => {}
            _ => {
                best.insert(id.to_string(), (family.to_string(), score));
            }
        }
    }

    Ok(best
        .into_iter()
        .map(|(id, (family, _))| (id, family))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_find_result_csvs_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "search/b_genome.csv", "h\n1\n");
        write_file(dir.path(), "search/a_genome.csv", "h\n1\n");
        write_file(dir.path(), "kmerize/features.csv", "h\n1\n");
        write_file(dir.path(), "model/family.model", "binary");

        let files = find_result_csvs(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "kmerize/features.csv".to_string(),
                "search/a_genome.csv".to_string(),
                "search/b_genome.csv".to_string(),
            ]
        );
    }

    #[test]
    fn test_find_model_files() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "model/famA.model", "x");
        write_file(dir.path(), "model/famB.model", "x");
        write_file(dir.path(), "model/scores.csv", "h\n");

        let files = find_model_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_concatenate_keeps_single_header() {
        let dir = TempDir::new().unwrap();
        let a = write_file(
            dir.path(),
            "a.csv",
            "sequence_id,family,score\np1,famA,0.9\np2,famB,0.7\n",
        );
        let b = write_file(
            dir.path(),
            "b.csv",
            "sequence_id,family,score\np3,famA,0.8\n",
        );
        let dest = dir.path().join("combined.csv");

        let rows = concatenate_csvs(&[a, b], &dest).unwrap();
        assert_eq!(rows, 3);

        let combined = fs::read_to_string(&dest).unwrap();
        let lines: Vec<&str> = combined.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "sequence_id,family,score");
        assert!(lines[1..].iter().all(|l| !l.starts_with("sequence_id")));
    }

    #[test]
    fn test_concatenate_empty_input_is_error() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("combined.csv");
        assert!(concatenate_csvs(&[], &dest).is_err());
    }

    #[test]
    fn test_zip_files_relative_names() {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "search/a.csv", "h\n1\n");
        let b = write_file(dir.path(), "search/deep/b.csv", "h\n2\n");
        let dest = dir.path().join("results.zip");

        let entries = zip_files(&[a, b], dir.path(), &dest).unwrap();
        assert_eq!(entries, 2);

        let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec!["search/a.csv".to_string(), "search/deep/b.csv".to_string()]
        );

        let mut contents = String::new();
        archive
            .by_name("search/a.csv")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "h\n1\n");
    }

    #[test]
    fn test_count_distinct_column() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(
            dir.path(),
            "combined.csv",
            "sequence_id,family,score\np1,famA,0.9\np2,famB,0.7\np3,famA,0.8\n",
        );

        assert_eq!(count_distinct_column(&csv, "family").unwrap(), Some(2));
        assert_eq!(count_distinct_column(&csv, "Family").unwrap(), Some(2));
        assert_eq!(count_distinct_column(&csv, "nope").unwrap(), None);
    }

    #[test]
    fn test_read_family_assignments_best_score_wins() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(
            dir.path(),
            "combined.csv",
            "sequence_id,family,score\n\
             p1,famA,0.4\n\
             p1,famB,0.9\n\
             p2,famC,0.5\n",
        );

        let assignments = read_family_assignments(&csv).unwrap();
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments["p1"], "famB");
        assert_eq!(assignments["p2"], "famC");
    }

    #[test]
    fn test_read_family_assignments_without_score_column() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(
            dir.path(),
            "combined.csv",
            "sequence_id,family\np1,famA\np1,famB\n",
        );

        let assignments = read_family_assignments(&csv).unwrap();
        assert_eq!(assignments["p1"], "famA");
    }

    #[test]
    fn test_read_family_assignments_missing_columns() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(dir.path(), "combined.csv", "a,b\n1,2\n");

        let assignments = read_family_assignments(&csv).unwrap();
        assert!(assignments.is_empty());
    }

    #[test]
    fn test_count_distinct_column_skips_empty_values() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(
            dir.path(),
            "combined.csv",
            "sequence_id,family\np1,famA\np2,\n",
        );
        assert_eq!(count_distinct_column(&csv, "family").unwrap(), Some(1));
    }
}
