//! Dockerfile generation
//!
//! Every dependency gets its own `RUN` instruction so the builder caches one
//! layer per install step. Anything that varies between builds goes after the
//! install steps, otherwise it would invalidate every layer below it.

use crate::config::schema::BuilderConfig;
use sha2::{Digest, Sha256};

/// Label carrying the Python version of the image
pub const LABEL_PYTHON: &str = "io.pylayer.python";
/// Label carrying the plan digest of the image
pub const LABEL_PLAN: &str = "io.pylayer.plan";

/// Base image reference for a runtime version (e.g. `python:3.12`)
pub fn base_image(config: &BuilderConfig, runtime_version: &str) -> String {
    format!("{}:{}", config.base_image, runtime_version)
}

/// Short content digest identifying a runtime version + install order
pub fn plan_digest(runtime_version: &str, steps: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(runtime_version.as_bytes());
    for step in steps {
        hasher.update(b"\n");
        hasher.update(step.as_bytes());
    }
    let hash = hex::encode(hasher.finalize());
    hash[..12].to_string()
}

/// Generate a Dockerfile installing `steps` in order on top of the
/// Python base image.
pub fn generate_dockerfile(config: &BuilderConfig, runtime_version: &str, steps: &[String]) -> String {
    let mut lines = Vec::new();

    lines.push(format!("FROM {}", base_image(config, runtime_version)));
    lines.push(format!("WORKDIR {}", config.workdir));
    lines.push(String::new());

    for step in steps {
        lines.push(format!("RUN {} {}", config.installer, shell_quote(step)));
    }
    if !steps.is_empty() {
        lines.push(String::new());
    }

    lines.push(format!(
        "LABEL {}={} {}={}",
        LABEL_PYTHON,
        dockerfile_quote(runtime_version),
        LABEL_PLAN,
        plan_digest(runtime_version, steps)
    ));
    lines.push(String::new());

    lines.join("\n")
}

/// Quote a dependency token for the `RUN` shell.
///
/// Plain `name==version` tokens pass through; anything with shell
/// metacharacters (`>`, `<`, `;`, spaces, glob brackets) is single-quoted.
fn shell_quote(token: &str) -> String {
    let safe = token.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '=' | '.' | '-' | '_' | '+' | '/' | ':' | '@' | ',')
    });
    if safe && !token.is_empty() {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', "'\\''"))
    }
}

/// Quote a value for a Dockerfile LABEL instruction.
fn dockerfile_quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dockerfile_structure() {
        let config = BuilderConfig::default();
        let dockerfile = generate_dockerfile(&config, "3.12", &steps(&["flask==3.0.2", "gunicorn"]));

        assert!(dockerfile.starts_with("FROM python:3.12\n"));
        assert!(dockerfile.contains("WORKDIR /app"));
        assert!(dockerfile.contains("RUN pip install --no-cache-dir flask==3.0.2"));
        assert!(dockerfile.contains("RUN pip install --no-cache-dir gunicorn"));
        assert!(dockerfile.contains("LABEL io.pylayer.python=\"3.12\" io.pylayer.plan="));

        // Install order follows the step order
        let flask = dockerfile.find("flask").unwrap();
        let gunicorn = dockerfile.find("gunicorn").unwrap();
        assert!(flask < gunicorn);
    }

    #[test]
    fn one_run_per_step() {
        let config = BuilderConfig::default();
        let dockerfile = generate_dockerfile(&config, "3.11", &steps(&["a", "b", "c"]));
        assert_eq!(dockerfile.lines().filter(|l| l.starts_with("RUN ")).count(), 3);
    }

    #[test]
    fn label_follows_install_steps() {
        let config = BuilderConfig::default();
        let dockerfile = generate_dockerfile(&config, "3.12", &steps(&["a"]));
        let run = dockerfile.find("RUN ").unwrap();
        let label = dockerfile.find("LABEL ").unwrap();
        assert!(run < label);
    }

    #[test]
    fn custom_builder_settings() {
        let config = BuilderConfig {
            base_image: "registry.local/python".to_string(),
            installer: "uv pip install --system".to_string(),
            workdir: "/srv".to_string(),
            ..BuilderConfig::default()
        };
        let dockerfile = generate_dockerfile(&config, "3.13", &steps(&["httpx"]));
        assert!(dockerfile.contains("FROM registry.local/python:3.13"));
        assert!(dockerfile.contains("WORKDIR /srv"));
        assert!(dockerfile.contains("RUN uv pip install --system httpx"));
    }

    #[test]
    fn empty_plan_has_no_run() {
        let config = BuilderConfig::default();
        let dockerfile = generate_dockerfile(&config, "3.12", &[]);
        assert!(!dockerfile.contains("RUN "));
        assert!(dockerfile.contains("FROM python:3.12"));
    }

    #[test]
    fn plan_digest_depends_on_order() {
        let ab = plan_digest("3.12", &steps(&["a", "b"]));
        let ba = plan_digest("3.12", &steps(&["b", "a"]));
        assert_ne!(ab, ba);
        assert_eq!(ab, plan_digest("3.12", &steps(&["a", "b"])));
        assert_eq!(ab.len(), 12);
    }

    #[test]
    fn plan_digest_depends_on_version() {
        assert_ne!(
            plan_digest("3.11", &steps(&["a"])),
            plan_digest("3.12", &steps(&["a"]))
        );
    }

    #[test]
    fn shell_quote_plain_tokens() {
        assert_eq!(shell_quote("flask==3.0.2"), "flask==3.0.2");
        assert_eq!(shell_quote("git+https://example.com/pkg.git@v1"), "git+https://example.com/pkg.git@v1");
    }

    #[test]
    fn shell_quote_extras_are_not_globs() {
        assert_eq!(shell_quote("uvicorn[standard]"), "'uvicorn[standard]'");

        let config = BuilderConfig::default();
        let dockerfile = generate_dockerfile(&config, "3.12", &steps(&["uvicorn[standard]==0.29.0"]));
        assert!(dockerfile.contains("RUN pip install --no-cache-dir 'uvicorn[standard]==0.29.0'"));
    }

    #[test]
    fn shell_quote_specifiers() {
        assert_eq!(shell_quote("django>=4.2,<5"), "'django>=4.2,<5'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }
}
