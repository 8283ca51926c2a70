use camino::{Utf8Path, Utf8PathBuf};
use lazy_static::lazy_static;
use regex::Regex;

/// Marker the build tool puts in front of every source path that lives
/// inside the project directory, e.g. `project:/contracts/Token.sol`.
pub const PROJECT_PREFIX: &str = "project:";

/// Directory searched for package imports that are not part of the project.
const PACKAGES_DIR: &str = "node_modules";

lazy_static! {
    static ref UNIXIFIED_DRIVE: Result<Regex, regex::Error> = Regex::new(r"^/([A-Za-z])/");
}

/// Removes the project marker, leaving the path as it is keyed in the
/// compiler input: `project:/contracts/A.sol` becomes `/contracts/A.sol`.
#[must_use]
pub fn strip_project_prefix(path: &str) -> &str {
    path.strip_prefix(PROJECT_PREFIX).unwrap_or(path)
}

/// Substitutes the project marker with `project_dir`. Paths without the
/// marker are returned as they are.
#[must_use]
pub fn resolve_project_path(path: &str, project_dir: &Utf8Path) -> Utf8PathBuf {
    match path.strip_prefix(PROJECT_PREFIX) {
        Some(rest) => project_dir.join(rest.trim_start_matches('/')),
        None => Utf8PathBuf::from(path),
    }
}

/// Rewrites a unixified Windows path (`/D/Hello/World.sol`) into its drive
/// letter form (`D:/Hello/World.sol`). Returns `None` when `path` does not
/// start with a single letter root segment.
#[must_use]
pub fn unixified_to_drive_path(path: &str) -> Option<String> {
    let drive = UNIXIFIED_DRIVE.as_ref().ok()?;
    drive
        .is_match(path)
        .then(|| drive.replace(path, "$1:/").into_owned())
}

/// Turns a source path recorded in artifact metadata into a path the local
/// filesystem can open.
///
/// Outside of Windows this only resolves the project marker.
#[must_use]
pub fn normalize_source_path(path: &str, project_dir: &Utf8Path) -> Utf8PathBuf {
    let resolved = resolve_project_path(path, project_dir);
    if cfg!(windows) {
        normalize_windows_path(resolved)
    } else {
        resolved
    }
}

fn normalize_windows_path(path: Utf8PathBuf) -> Utf8PathBuf {
    let Some(drive_path) = unixified_to_drive_path(path.as_str()) else {
        return path;
    };

    std::path::absolute(&drive_path)
        .ok()
        .and_then(|absolute| Utf8PathBuf::try_from(absolute).ok())
        .unwrap_or_else(|| Utf8PathBuf::from(drive_path))
}

/// Finds the file backing a normalized source path. Package imports such as
/// `@scope/lib/contracts/Lib.sol` are looked up in the project's package
/// directory when they don't exist as given.
#[must_use]
pub fn locate_source(path: &Utf8Path, project_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    if path.is_relative() {
        let candidate = project_dir.join(PACKAGES_DIR).join(path);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_strip_project_prefix() {
        assert_eq!(
            strip_project_prefix("project:/contracts/Token.sol"),
            "/contracts/Token.sol"
        );
        assert_eq!(
            strip_project_prefix("@openzeppelin/contracts/token/ERC20/ERC20.sol"),
            "@openzeppelin/contracts/token/ERC20/ERC20.sol"
        );
    }

    #[test]
    fn test_resolve_project_path_substitutes_project_dir() {
        let resolved = resolve_project_path(
            "project:/contracts/Token.sol",
            Utf8Path::new("/home/dev/project"),
        );
        assert_eq!(resolved, Utf8PathBuf::from("/home/dev/project/contracts/Token.sol"));
    }

    #[test]
    fn test_resolve_project_path_keeps_foreign_paths() {
        let resolved = resolve_project_path("/D/Hello/World.sol", Utf8Path::new("/project"));
        assert_eq!(resolved, Utf8PathBuf::from("/D/Hello/World.sol"));
    }

    #[test]
    fn test_unixified_drive_paths() {
        assert_eq!(
            unixified_to_drive_path("/D/Foo/Bar.sol").as_deref(),
            Some("D:/Foo/Bar.sol")
        );
        assert_eq!(
            unixified_to_drive_path("/c/Users/dev/A.sol").as_deref(),
            Some("c:/Users/dev/A.sol")
        );
        assert_eq!(unixified_to_drive_path("/home/dev/A.sol"), None);
        assert_eq!(unixified_to_drive_path("/1/A.sol"), None);
        assert_eq!(unixified_to_drive_path("contracts/A.sol"), None);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_normalize_is_prefix_resolution_only() {
        let project = Utf8Path::new("/project");
        assert_eq!(
            normalize_source_path("/D/Foo/Bar.sol", project),
            Utf8PathBuf::from("/D/Foo/Bar.sol")
        );
        assert_eq!(
            normalize_source_path("project:/contracts/A.sol", project),
            Utf8PathBuf::from("/project/contracts/A.sol")
        );
    }

    #[cfg(windows)]
    #[test]
    fn test_normalize_rewrites_drive_letter() {
        let normalized = normalize_source_path("/D/Foo/Bar.sol", Utf8Path::new("C:/project"));
        assert_eq!(normalized, Utf8PathBuf::from(r"D:\Foo\Bar.sol"));
    }

    #[test]
    fn test_locate_source_in_packages_dir() {
        let temp_dir = TempDir::new().unwrap();
        let project = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let package_file = project.join("node_modules/@scope/lib/Lib.sol");
        fs::create_dir_all(package_file.parent().unwrap()).unwrap();
        fs::write(&package_file, "library Lib {}").unwrap();

        let located = locate_source(Utf8Path::new("@scope/lib/Lib.sol"), &project);
        assert_eq!(located, Some(package_file));
        assert_eq!(locate_source(Utf8Path::new("@scope/lib/Missing.sol"), &project), None);
    }
}
