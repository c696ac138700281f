//! [`TestInstall`] builder for installer test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Shipped base layer, relative to the fixture root
pub const SOURCE_DIR: &str = "source";
/// Team layer, relative to the fixture root
pub const TEAM_DIR: &str = "team";
/// User-level installation, relative to the fixture root
pub const HOME_DIR: &str = "home";
/// Project directory, relative to the fixture root
pub const PROJECT_DIR: &str = "project";
/// Project installation, relative to the fixture root
pub const PROJECT_TARGET: &str = "project/.agent-os";
/// Project-local layer, relative to the fixture root
pub const PROJECT_LAYER: &str = "project/.agent-os.local";

/// A temporary directory laid out as layer sources and install targets.
///
/// ```text
/// <root>/source                    base layer
/// <root>/team                      team layer
/// <root>/home                      user-level installation
/// <root>/project/.agent-os.local   project layer
/// <root>/project/.agent-os         project installation
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use aos_test_utils::TestInstall;
///
/// let fixture = TestInstall::new();
/// fixture.write_source("standards/code-style.md", "# Style");
/// fixture.assert_file_contains("source/standards/code-style.md", "Style");
/// ```
pub struct TestInstall {
    temp_dir: TempDir,
}

impl Default for TestInstall {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInstall {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn source(&self) -> PathBuf {
        self.path(SOURCE_DIR)
    }

    pub fn team(&self) -> PathBuf {
        self.path(TEAM_DIR)
    }

    pub fn home(&self) -> PathBuf {
        self.path(HOME_DIR)
    }

    pub fn project(&self) -> PathBuf {
        self.path(PROJECT_DIR)
    }

    pub fn project_target(&self) -> PathBuf {
        self.path(PROJECT_TARGET)
    }

    /// Write `content` to `rel` (relative to the root), creating parents.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {}", path.display(), e));
    }

    /// Write a file into the base layer.
    pub fn write_source(&self, logical_path: &str, content: &str) {
        self.write(&format!("{}/{}", SOURCE_DIR, logical_path), content);
    }

    /// Write a file into the team layer.
    pub fn write_team(&self, logical_path: &str, content: &str) {
        self.write(&format!("{}/{}", TEAM_DIR, logical_path), content);
    }

    /// Write a file into the project-local layer.
    pub fn write_project_layer(&self, logical_path: &str, content: &str) {
        self.write(&format!("{}/{}", PROJECT_LAYER, logical_path), content);
    }

    /// Read `rel` (relative to the root) as text.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, rel: &str) -> String {
        let path = self.path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Could not read {}: {}", path.display(), e))
    }

    /// Remove the file at `rel` (relative to the root).
    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.path(rel)).unwrap();
    }

    /// File names in the directory `rel` (relative to the root), sorted.
    pub fn list(&self, rel: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(rel))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            self.path(path).display(),
            content,
            file_content
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_layers_under_their_directories() {
        let fixture = TestInstall::new();
        fixture.write_source("standards/a.md", "base");
        fixture.write_team("standards/a.md", "team");
        fixture.write_project_layer("standards/a.md", "project");

        fixture.assert_file_contains("source/standards/a.md", "base");
        fixture.assert_file_contains("team/standards/a.md", "team");
        fixture.assert_file_contains("project/.agent-os.local/standards/a.md", "project");
        fixture.assert_file_not_exists("home/standards/a.md");
    }

    #[test]
    fn list_is_sorted() {
        let fixture = TestInstall::new();
        fixture.write("dir/b.md", "");
        fixture.write("dir/a.md", "");
        assert_eq!(fixture.list("dir"), vec!["a.md", "b.md"]);
    }
}
