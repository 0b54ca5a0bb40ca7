//! Deletion request lists
//!
//! Plain-text files with one identifier (WWN, zone or object name) per line.
//! Surrounding whitespace is trimmed and blank lines are ignored.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use indexmap::IndexSet;

use fczone_core::Result;

/// Identifiers in file order, duplicates dropped
pub fn parse_identifiers(content: &str) -> IndexSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read an ordered identifier list, e.g. objects to delete one after another
pub fn read_identifier_list<P: AsRef<Path>>(path: P) -> Result<IndexSet<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let identifiers = parse_identifiers(&content);
    log::debug!("Read {} identifiers from {}", identifiers.len(), path.display());
    Ok(identifiers)
}

/// Read an identifier set, e.g. WWNs or zones to delete
pub fn read_identifier_set<P: AsRef<Path>>(path: P) -> Result<BTreeSet<String>> {
    Ok(read_identifier_list(path)?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_identifiers_skips_blank_lines() {
        let ids = parse_identifiers("zoneB\n\n  zoneA  \r\n\t\nzoneB\n");
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec!["zoneB", "zoneA"]);
    }

    #[test]
    fn test_read_identifier_set_sorted() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "10:00:00:00:00:00:00:02").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "10:00:00:00:00:00:00:01").unwrap();

        let set = read_identifier_set(file.path()).unwrap();
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec!["10:00:00:00:00:00:00:01", "10:00:00:00:00:00:00:02"]
        );
    }

    #[test]
    fn test_read_missing_file() {
        assert!(read_identifier_list("/nonexistent/delete-list.txt").is_err());
    }
}
