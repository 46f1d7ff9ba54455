use std::path::Path;

use anyhow::bail;
use nondestructive::yaml;

/// Load a YAML file, apply edits via a closure, and write it back. The
/// closure receives a mutable reference to the parsed document. A missing
/// file is created, starting from an empty mapping.
pub(crate) fn edit(
    path: &Path,
    f: impl FnOnce(&mut yaml::Document) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let mut doc = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        yaml::from_slice(&content)?
    } else {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let mut doc = yaml::from_slice("")?;
        doc.as_mut().make_mapping();
        doc
    };

    f(&mut doc)?;

    std::fs::write(path, doc.to_string())?;
    Ok(())
}

/// Navigate into a nested YAML mapping by key path, creating any missing
/// intermediate mappings along the way. Returns a `MappingMut` pointing at
/// the innermost mapping.
///
/// `path` must be non-empty. For example, `&["profiles", "default"]`
/// returns a `MappingMut` for the `default` profile.
pub(crate) fn mapping_at_path<'a>(
    doc: &'a mut yaml::Document,
    path: &[&str],
) -> anyhow::Result<yaml::MappingMut<'a>> {
    assert!(!path.is_empty());

    let Some(mut current) = doc.as_mut().into_mapping_mut() else {
        bail!("invalid file: not a dictionary");
    };

    for &key in path {
        if current.as_ref().get(key).is_none() {
            let _ = current.insert(key, yaml::Separator::Auto).make_mapping();
        }

        let Some(next) = current.get_into_mut(key).and_then(|v| v.into_mapping_mut()) else {
            bail!("key {key:?} exists, but is not a dictionary");
        };

        current = next
    }

    Ok(current)
}

pub(crate) fn upsert_str(m: &mut yaml::MappingMut<'_>, key: &str, value: &str) {
    if let Some(mut v) = m.get_mut(key) {
        v.set_string(value);
    } else {
        m.insert_str(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_at_path_create() -> anyhow::Result<()> {
        let mut doc = yaml::from_slice("root: 1\n")?;
        let mut m = mapping_at_path(&mut doc, &["profiles", "default"])?;
        m.insert_str("api_endpoint", "http://localhost:9090");

        let output = doc.to_string();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&output)?;
        assert_eq!(
            parsed["profiles"]["default"]["api_endpoint"].as_str(),
            Some("http://localhost:9090")
        );
        assert_eq!(parsed["root"].as_i64(), Some(1));

        Ok(())
    }

    #[test]
    fn upsert_keeps_comments() -> anyhow::Result<()> {
        let input = "\
# my profiles
profiles:
  default:
    # local service
    api_endpoint: http://localhost:8080
";
        let mut doc = yaml::from_slice(input)?;
        let mut m = mapping_at_path(&mut doc, &["profiles", "default"])?;
        upsert_str(&mut m, "api_endpoint", "http://localhost:9090");
        upsert_str(&mut m, "api_key", "secret");

        let output = doc.to_string();
        assert!(output.contains("# local service"));
        assert!(output.contains("api_endpoint: http://localhost:9090"));
        assert!(output.contains("api_key: secret"));

        Ok(())
    }
}
