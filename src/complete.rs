use std::fs;
use std::path::Path;

/// Completion candidates from a directory's current contents: entry names
/// starting with `partial`, sorted. The directory is re-read on every call;
/// contents can change between tab presses and stale candidates would
/// mislead the user. An unreadable directory yields no candidates.
pub fn complete_from_directory(dir: &Path, partial: &str) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(partial))
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn filters_by_prefix_and_sorts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("beta.txt"), "").unwrap();
        fs::write(dir.path().join("alpha.txt"), "").unwrap();
        fs::write(dir.path().join("alpine.txt"), "").unwrap();
        fs::create_dir(dir.path().join("album")).unwrap();

        assert_eq!(
            complete_from_directory(dir.path(), "al"),
            vec!["album", "alpha.txt", "alpine.txt"]
        );
        assert_eq!(
            complete_from_directory(dir.path(), "z"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn rereads_the_directory_on_every_call() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a1"), "").unwrap();
        assert_eq!(complete_from_directory(dir.path(), "a"), vec!["a1"]);

        fs::write(dir.path().join("a2"), "").unwrap();
        assert_eq!(complete_from_directory(dir.path(), "a"), vec!["a1", "a2"]);
    }

    #[test]
    fn unreadable_directory_yields_nothing() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("missing");
        assert!(complete_from_directory(&gone, "").is_empty());
    }
}
