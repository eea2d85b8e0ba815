//! Subcommand implementations over snapshot files

use anyhow::Context;
use fishbone_core::{BatchReport, Document, FishboneConfig};
use fishbone_model::InvariantViolation;
use std::path::{Path, PathBuf};

pub(crate) fn load_config(path: Option<&PathBuf>) -> anyhow::Result<FishboneConfig> {
    match path {
        Some(path) => FishboneConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(FishboneConfig::default()),
    }
}

pub(crate) fn init(problem: &str, out: &Path, config: FishboneConfig) -> anyhow::Result<()> {
    let doc = Document::with_config(problem, config)?;
    write_snapshot(&doc, out)
}

pub(crate) fn apply(
    doc_path: &Path,
    commands_path: &Path,
    out: &Path,
    config: FishboneConfig,
) -> anyhow::Result<BatchReport> {
    let doc = open(doc_path, config)?;
    let text = std::fs::read_to_string(commands_path)
        .with_context(|| format!("reading {}", commands_path.display()))?;
    let batch: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", commands_path.display()))?;

    let report = doc.apply_json(&batch)?;
    write_snapshot(&doc, out)?;
    Ok(report)
}

pub(crate) fn context(doc_path: &Path, config: FishboneConfig) -> anyhow::Result<String> {
    let doc = open(doc_path, config)?;
    Ok(serde_json::to_string_pretty(&doc.context())?)
}

pub(crate) fn check(doc_path: &Path, config: FishboneConfig) -> anyhow::Result<Vec<InvariantViolation>> {
    Ok(open(doc_path, config)?.validate())
}

fn open(path: &Path, config: FishboneConfig) -> anyhow::Result<Document> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let doc = Document::empty(config)?;
    doc.import_json(&json)
        .with_context(|| format!("importing {}", path.display()))?;
    Ok(doc)
}

fn write_snapshot(doc: &Document, out: &Path) -> anyhow::Result<()> {
    std::fs::write(out, doc.export_json()?).with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(path = %out.display(), "wrote snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fishbone_test_utils::{cause, commands_json, PROBLEM_TITLE};
    use fishbone_core::Command;
    use pretty_assertions::assert_eq;

    fn write_commands(dir: &Path, commands: &[Command]) -> PathBuf {
        let path = dir.join("commands.json");
        std::fs::write(&path, commands_json(commands).to_string()).unwrap();
        path
    }

    #[test]
    fn init_then_check_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.json");

        init(PROBLEM_TITLE, &doc, FishboneConfig::default()).unwrap();

        assert!(check(&doc, FishboneConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn apply_rewrites_document_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.json");
        init(PROBLEM_TITLE, &doc, FishboneConfig::default()).unwrap();
        let commands = write_commands(
            dir.path(),
            &[Command::add_node_with_id("People", "people"), cause("people", "Fatigue")],
        );

        let report = apply(&doc, &commands, &doc, FishboneConfig::default()).unwrap();

        assert_eq!(report.log.len(), 2);
        let projection = context(&doc, FishboneConfig::default()).unwrap();
        assert!(projection.contains("Fatigue"));
    }

    #[test]
    fn apply_to_separate_output_keeps_input() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.json");
        let out = dir.path().join("out.json");
        init(PROBLEM_TITLE, &doc, FishboneConfig::default()).unwrap();
        let original = std::fs::read_to_string(&doc).unwrap();
        let commands = write_commands(dir.path(), &[Command::add_node("People")]);

        apply(&doc, &commands, &out, FishboneConfig::default()).unwrap();

        assert_eq!(std::fs::read_to_string(&doc).unwrap(), original);
        assert!(std::fs::read_to_string(&out).unwrap().contains("People"));
    }

    #[test]
    fn check_reports_broken_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.json");
        let broken = serde_json::json!({
            "nodes": [
                { "id": "c", "type": "category", "title": "Orphan", "position": { "x": 0.0, "y": 0.0 } }
            ],
            "edges": []
        });
        std::fs::write(&doc, broken.to_string()).unwrap();

        let violations = check(&doc, FishboneConfig::default()).unwrap();

        assert!(violations.contains(&InvariantViolation::ProblemCount(0)));
    }

    #[test]
    fn missing_document_has_context() {
        let err = check(Path::new("/nonexistent/doc.json"), FishboneConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/doc.json"));
    }
}
