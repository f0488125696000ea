// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

use crate::ingest::keywords::DEFAULT_KEYWORDS;

/// Load a keyword list from an explicit path. Supports TOML or JSON formats.
pub fn load_keywords_from(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading keywords from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let list = parse_keywords(&content, ext.as_str())
        .with_context(|| format!("parsing keywords from {}", path.display()))?;
    if list.is_empty() {
        return Err(anyhow!("{} holds no keywords", path.display()));
    }
    Ok(list)
}

/// Keyword list from `KEYWORDS_PATH` if given, else the built-in list.
pub fn load_keywords(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(p) => load_keywords_from(p),
        None => Ok(DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect()),
    }
}

fn parse_keywords(s: &str, hint_ext: &str) -> Result<Vec<String>> {
    let try_toml = hint_ext == "toml" || s.contains("keywords");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported keyword list format"))
}

fn parse_toml(s: &str) -> Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct TomlKw {
        keywords: Vec<String>,
    }
    let v: TomlKw = toml::from_str(s)?;
    Ok(clean_list(v.keywords))
}

fn parse_json(s: &str) -> Result<Vec<String>> {
    let v: Vec<String> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

/// Lowercase, trim, drop blanks and repeats; first occurrence wins.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn dedup_trim_and_formats_work() {
        let toml = r#"keywords = [" Rust ", "", "Go", "go"]"#;
        let json = r#"["Python", "  react  ", ""]"#;
        assert_eq!(parse_toml(toml).unwrap(), vec!["rust", "go"]);
        assert_eq!(parse_json(json).unwrap(), vec!["python", "react"]);
    }

    #[test]
    fn file_loading_by_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let p_json = tmp.path().join("kw.json");
        fs::write(&p_json, r#"["Kafka"]"#).unwrap();
        assert_eq!(load_keywords(Some(&p_json)).unwrap(), vec!["kafka"]);

        let p_toml = tmp.path().join("kw.toml");
        fs::write(&p_toml, "keywords = [\"terraform\"]\n").unwrap();
        assert_eq!(load_keywords_from(&p_toml).unwrap(), vec!["terraform"]);
    }

    #[test]
    fn empty_or_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("empty.json");
        fs::write(&p, "[]").unwrap();
        assert!(load_keywords_from(&p).is_err());
        assert!(load_keywords_from(&tmp.path().join("nope.toml")).is_err());
    }

    #[test]
    fn none_falls_back_to_builtin() {
        let v = load_keywords(None).unwrap();
        assert_eq!(v.len(), DEFAULT_KEYWORDS.len());
        assert!(v.iter().any(|k| k == "python"));
    }
}
