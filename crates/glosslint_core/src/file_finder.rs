//! Document discovery.

use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::GlossError;

/// Walks a documentation tree and selects the documents to scan.
///
/// Include and exclude globs are matched against paths relative to the walk
/// root. Whole directories can be skipped either by path (the glossary
/// directory) or by any path component name (tooling folders such as `scripts`).
/// Single files (the generated report) can be skipped by path.
pub struct FileFinder {
    include_globs: Option<GlobSet>,
    exclude_globs: Option<GlobSet>,
    skip_segments: Vec<String>,
    skip_dirs: Vec<PathBuf>,
    skip_files: Vec<PathBuf>,
}

impl FileFinder {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, GlossError> {
        let include_globs = Self::build_globset(include)?;
        let exclude_globs = Self::build_globset(exclude)?;

        Ok(Self {
            include_globs,
            exclude_globs,
            skip_segments: Vec::new(),
            skip_dirs: Vec::new(),
            skip_files: Vec::new(),
        })
    }

    /// Skips every path that has a component named like one of `segments`.
    pub fn skip_segments(mut self, segments: &[String]) -> Self {
        self.skip_segments.extend(segments.iter().cloned());
        self
    }

    /// Skips everything below `dir`.
    pub fn skip_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.skip_dirs.push(dir.into());
        self
    }

    /// Skips the file at `path`.
    pub fn skip_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip_files.push(path.into());
        self
    }

    fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, GlossError> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| GlossError::config(format!("Invalid glob pattern: {}", e)))?;
            builder.add(glob);
        }

        let globset = builder
            .build()
            .map_err(|e| GlossError::config(format!("Failed to build globset: {}", e)))?;

        Ok(Some(globset))
    }

    /// Checks if a path relative to the walk root should be ignored based on
    /// include/exclude patterns and skipped segments.
    pub fn should_ignore(&self, relative: &Path) -> bool {
        if self.has_skipped_segment(relative) {
            return true;
        }

        if self
            .exclude_globs
            .as_ref()
            .is_some_and(|excludes| excludes.is_match(relative))
        {
            return true;
        }

        if self
            .include_globs
            .as_ref()
            .is_some_and(|includes| !includes.is_match(relative))
        {
            return true;
        }

        false
    }

    fn has_skipped_segment(&self, relative: &Path) -> bool {
        relative.components().any(|component| match component {
            Component::Normal(name) => self.skip_segments.iter().any(|s| name == s.as_str()),
            _ => false,
        })
    }

    fn is_skipped_dir(&self, path: &Path) -> bool {
        self.skip_dirs.iter().any(|dir| path.starts_with(dir))
    }

    /// Returns the documents under `root` in sorted traversal order.
    pub fn discover_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let path = entry.path();
                if self.is_skipped_dir(path) {
                    debug!("Skipping {}", path.display());
                    return false;
                }
                let relative = path.strip_prefix(root).unwrap_or(path);
                !self.has_skipped_segment(relative)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to walk {}: {}", root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if self.skip_files.iter().any(|file| file == path) {
                debug!("Skipping {}", path.display());
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            if self.should_ignore(relative) {
                continue;
            }

            files.push(path.to_path_buf());
        }

        info!("Discovered {} documents to scan", files.len());
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn md() -> Vec<String> {
        vec!["**/*.md".to_string()]
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# Doc").unwrap();
    }

    #[test]
    fn test_build_globset() {
        let patterns = vec!["**/*.md".to_string(), "*.txt".to_string()];
        let result = FileFinder::build_globset(&patterns);
        assert!(result.is_ok());
        assert!(result.unwrap().is_some());
    }

    #[test]
    fn test_build_globset_empty() {
        let patterns: Vec<String> = vec![];
        let result = FileFinder::build_globset(&patterns);
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_build_globset_invalid_pattern() {
        let patterns = vec!["[invalid".to_string()];
        let result = FileFinder::build_globset(&patterns);
        assert!(matches!(result, Err(GlossError::Config(_))));
    }

    #[test]
    fn test_should_ignore_segments() {
        let finder = FileFinder::new(&md(), &[])
            .unwrap()
            .skip_segments(&["scripts".to_string()]);

        assert!(finder.should_ignore(Path::new("scripts/report.md")));
        assert!(finder.should_ignore(Path::new("guides/scripts/notes.md")));
        assert!(!finder.should_ignore(Path::new("guides/scripting.md")));
    }

    #[test]
    fn test_discover_files_respects_include() {
        let temp_dir = tempdir().unwrap();
        touch(&temp_dir.path().join("guide.md"));
        touch(&temp_dir.path().join("notes.txt"));

        let finder = FileFinder::new(&md(), &[]).unwrap();
        let files = finder.discover_files(temp_dir.path());

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("guide.md"));
    }

    #[test]
    fn test_discover_files_respects_exclude() {
        let temp_dir = tempdir().unwrap();
        touch(&temp_dir.path().join("guide.md"));
        touch(&temp_dir.path().join("drafts/wip.md"));

        let finder = FileFinder::new(&md(), &["drafts/**".to_string()]).unwrap();
        let files = finder.discover_files(temp_dir.path());

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("guide.md"));
    }

    #[test]
    fn test_discover_files_skips_glossary_and_scripts() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        touch(&root.join("intro.md"));
        touch(&root.join("glossary/index.md"));
        touch(&root.join("glossary/terms/tdd.md"));
        touch(&root.join("scripts/linking-report.md"));

        let finder = FileFinder::new(&md(), &[])
            .unwrap()
            .skip_segments(&["scripts".to_string()])
            .skip_dir(root.join("glossary/terms"));
        let files = finder.discover_files(root);

        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("glossary/index.md"), PathBuf::from("intro.md")]
        );
    }

    #[test]
    fn test_discover_files_skips_single_file() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        touch(&root.join("reports/links.md"));
        touch(&root.join("reports/archive.md"));

        let finder = FileFinder::new(&md(), &[])
            .unwrap()
            .skip_file(root.join("reports/links.md"));
        let files = finder.discover_files(root);

        assert_eq!(files, vec![root.join("reports/archive.md")]);
    }

    #[test]
    fn test_discover_files_sorted() {
        let temp_dir = tempdir().unwrap();
        touch(&temp_dir.path().join("b.md"));
        touch(&temp_dir.path().join("a/z.md"));
        touch(&temp_dir.path().join("c.md"));

        let finder = FileFinder::new(&md(), &[]).unwrap();
        let files = finder.discover_files(temp_dir.path());

        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(temp_dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a/z.md"),
                PathBuf::from("b.md"),
                PathBuf::from("c.md")
            ]
        );
    }

    #[test]
    fn test_discover_files_missing_root() {
        let temp_dir = tempdir().unwrap();
        let finder = FileFinder::new(&md(), &[]).unwrap();

        let files = finder.discover_files(&temp_dir.path().join("missing"));

        assert!(files.is_empty());
    }
}
