//! Image name derivation
//!
//! `services/Billing_API.txt` + python 3.12 → `billing_api:py3.12`

use std::path::Path;

/// Fallback repository name when the file name yields nothing usable
const FALLBACK_NAME: &str = "pylayer";

/// Derive an image repository name from the requirements file name.
///
/// Lowercases the file stem and replaces characters an image name cannot
/// hold with `-`.
pub fn derive_image_name(requirements: &Path) -> String {
    let stem = requirements
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mapped: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    let trimmed = mapped.trim_matches(|c| matches!(c, '.' | '_' | '-'));
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Full image reference for a build: `<name>:py<version>`, unless the
/// caller supplied one.
pub fn image_reference(requirements: &Path, runtime_version: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) => tag.to_string(),
        None => format!("{}:py{}", derive_image_name(requirements), runtime_version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_from_stem() {
        assert_eq!(derive_image_name(Path::new("requirements.txt")), "requirements");
        assert_eq!(derive_image_name(Path::new("deps/api.txt")), "api");
    }

    #[test]
    fn name_is_lowercased_and_sanitized() {
        assert_eq!(derive_image_name(Path::new("Billing API.txt")), "billing-api");
        assert_eq!(derive_image_name(Path::new("ml_stack.v2.txt")), "ml_stack.v2");
    }

    #[test]
    fn name_trims_separators() {
        assert_eq!(derive_image_name(Path::new("_worker_.txt")), "worker");
    }

    #[test]
    fn name_falls_back() {
        assert_eq!(derive_image_name(Path::new("Ωμέγα.txt")), "pylayer");
        assert_eq!(derive_image_name(Path::new("")), "pylayer");
    }

    #[test]
    fn reference_default_and_override() {
        let path = Path::new("web.txt");
        assert_eq!(image_reference(path, "3.12", None), "web:py3.12");
        assert_eq!(
            image_reference(path, "3.12", Some("registry.local/web:dev")),
            "registry.local/web:dev"
        );
    }
}
