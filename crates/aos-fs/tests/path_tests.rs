use aos_fs::{NormalizedPath, validate_logical_path};
use proptest::prelude::*;

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("foo\\bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("foo/bar");
    assert_eq!(base.join("baz").as_str(), "foo/bar/baz");
    assert_eq!(NormalizedPath::new("foo/").join("baz").as_str(), "foo/baz");
}

#[test]
fn test_parent_and_file_name() {
    let path = NormalizedPath::new("standards/code-style.md");
    assert_eq!(path.parent().unwrap().as_str(), "standards");
    assert_eq!(path.file_name(), Some("code-style.md"));
    assert_eq!(path.extension(), Some("md"));
}

#[test]
fn test_dotfile_has_no_extension() {
    let path = NormalizedPath::new("root/.install-state");
    assert_eq!(path.extension(), None);
}

proptest! {
    #[test]
    fn test_normalization_has_no_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
    }

    #[test]
    fn test_valid_logical_paths_never_traverse(segments in prop::collection::vec("[a-z0-9_.-]{1,12}", 1..5)) {
        let joined = segments.join("/");
        if validate_logical_path(&joined).is_ok() {
            prop_assert!(joined.split('/').all(|s| s != ".." && s != "." && !s.is_empty()));
        }
    }
}
