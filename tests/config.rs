use context_tree::config::{load_config, ConfigError, ConflictPolicy, TreeConfig};
use context_tree::TreeError;

use std::io::Write;
use std::time::Duration;

const SITE: &str = r#"
max-path-len = 1024
stale-after-secs = 30
root-location = "/var/www/html/"

[root]
doc-root = "/var/www/html"
handler = "static"
index-files = ["index.html", "index.php"]

[root.access]
allow = ["ALL"]

[[context]]
uri = "/app"
location = "/var/www/html/app/"
handler = "lsphp"

[[context]]
uri = "/app/admin"
auto-index = true

[context.access]
deny = ["ALL"]

[[context]]
uri = '\.cgi$'
regex = true
handler = "cgi"

[[context]]
uri = "/legacy"
parent = '\.cgi$'
"#;

fn text(setting: &context_tree::Setting<String>) -> Option<String> {
    setting.get().map(|v| (*v).clone())
}

#[test]
fn parses_and_builds() {
    let cfg = TreeConfig::from_toml_str(SITE).unwrap();
    assert_eq!(cfg.max_path_len, 1024);
    assert_eq!(cfg.stale_after(), Duration::from_secs(30));
    assert_eq!(cfg.on_conflict, ConflictPolicy::Reject);
    assert_eq!(cfg.contexts.len(), 4);

    let tree = cfg.build_tree().unwrap();
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.max_path_len(), 1024);
    assert_eq!(tree.root_location(), Some("/var/www/html/"));

    let admin = tree.best_match("/app/admin/users").unwrap().unwrap();
    assert_eq!(admin.uri_pattern(), "/app/admin");
    let settings = admin.payload();
    assert_eq!(text(&settings.handler).as_deref(), Some("lsphp"));
    assert_eq!(text(&settings.doc_root).as_deref(), Some("/var/www/html"));
    assert_eq!(settings.auto_index.get().as_deref(), Some(&true));
    assert_eq!(settings.access.get().unwrap().deny, ["ALL"]);
    assert_eq!(
        settings.index_files.get().as_deref().map(Vec::len),
        Some(2)
    );

    let cgi = tree.best_match("/x/run.cgi").unwrap().unwrap();
    assert_eq!(text(&cgi.payload().handler).as_deref(), Some("cgi"));

    let legacy = tree.lookup("/legacy", false).unwrap();
    assert_eq!(text(&legacy.payload().handler).as_deref(), Some("cgi"));

    let located = tree.match_location("/var/www/html/app/x.php").unwrap();
    assert_eq!(located.uri_pattern(), "/app");

    let root = tree.best_match("/nothing").unwrap().unwrap();
    assert_eq!(root.uri_pattern(), "/");
}

#[test]
fn defaults_for_a_minimal_file() {
    let cfg = TreeConfig::from_toml_str("[[context]]\nuri = \"/a\"\n").unwrap();
    assert_eq!(cfg.max_path_len, context_tree::DEFAULT_MAX_PATH_LEN);
    assert_eq!(cfg.stale_after(), context_tree::DEFAULT_STALE_AFTER);
    assert!(cfg.root.is_none());

    let tree = cfg.build_tree().unwrap();
    assert!(tree.root_context().is_none());
    assert!(tree.best_match("/b").unwrap().is_none());
    assert!(!tree.lookup("/a", false).unwrap().payload().handler.is_set());
}

const DUPLICATE: &str = r#"
[[context]]
uri = "/a"
handler = "first"

[[context]]
uri = "/a/"
handler = "second"
"#;

#[test]
fn duplicates_are_rejected_by_default() {
    let cfg = TreeConfig::from_toml_str(DUPLICATE).unwrap();
    match cfg.build_tree() {
        Err(ConfigError::Tree(e)) => assert!(e.is_conflict()),
        other => panic!("unexpected: {:?}", other.map(|t| t.len())),
    }
}

#[test]
fn keep_first_on_conflict() {
    let src = format!("on-conflict = \"keep-first\"\n{}", DUPLICATE);
    let cfg = TreeConfig::from_toml_str(&src).unwrap();
    let tree = cfg.build_tree().unwrap();
    assert_eq!(tree.len(), 1);
    let a = tree.lookup("/a", false).unwrap();
    assert_eq!(text(&a.payload().handler).as_deref(), Some("first"));
}

#[test]
fn invalid_entries() {
    let cfg = TreeConfig::from_toml_str("[[context]]\nuri = \"/a/../b\"\n").unwrap();
    assert!(matches!(
        cfg.build_tree(),
        Err(ConfigError::Tree(TreeError::InvalidPath(_)))
    ));

    let cfg = TreeConfig::from_toml_str("[[context]]\nuri = \"(\"\nregex = true\n").unwrap();
    assert!(matches!(
        cfg.build_tree(),
        Err(ConfigError::Tree(TreeError::InvalidRegex { .. }))
    ));

    assert!(matches!(
        TreeConfig::from_toml_str("max-path-len = \"long\""),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn load_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SITE.as_bytes()).unwrap();

    let cfg = load_config(file.path()).unwrap();
    let shared = cfg.build_shared().unwrap();
    assert_eq!(shared.stale_after(), Duration::from_secs(30));
    assert_eq!(shared.snapshot().len(), 4);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    match load_config(&path) {
        Err(ConfigError::Io { path: p, .. }) => assert_eq!(p, path),
        other => panic!("unexpected: {:?}", other.map(|c| c.contexts.len())),
    }
}
