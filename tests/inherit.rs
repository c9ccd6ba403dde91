use context_tree::config::{AccessRules, ContextSettings};
use context_tree::{Context, ContextTree, Setting};

fn settings(doc_root: Option<&str>, handler: Option<&str>) -> ContextSettings {
    ContextSettings {
        doc_root: doc_root.map_or_else(Setting::unset, |v| Setting::new(v.to_owned())),
        handler: handler.map_or_else(Setting::unset, |v| Setting::new(v.to_owned())),
        ..ContextSettings::default()
    }
}

fn text(setting: &Setting<String>) -> Option<String> {
    setting.get().map(|v| (*v).clone())
}

#[test]
fn unset_fields_come_from_nearest_ancestor() {
    let mut tree: ContextTree<ContextSettings> = ContextTree::new();
    tree.set_root_context(Context::literal("/", settings(Some("/srv/www"), Some("static"))));
    tree.insert(Context::literal("/app", settings(None, Some("fcgi")))).unwrap();
    tree.insert(Context::literal("/app/admin/panel", settings(None, None)))
        .unwrap();
    tree.resolve_inheritance().unwrap();

    let panel = tree.lookup("/app/admin/panel", false).unwrap();
    assert_eq!(text(&panel.payload().doc_root).as_deref(), Some("/srv/www"));
    assert_eq!(text(&panel.payload().handler).as_deref(), Some("fcgi"));
    assert!(panel.payload().handler.is_inherited());
    assert_eq!(panel.parent(), Some("/app"));

    let app = tree.lookup("/app", false).unwrap();
    assert!(app.payload().handler.is_explicit());
    assert_eq!(app.parent(), Some("/"));
    assert_eq!(
        tree.parent_of(panel).map(|p| p.uri_pattern()),
        Some("/app")
    );
    assert!(std::ptr::eq(&**tree.parent_of(app).unwrap(), &**tree.root_context().unwrap()));
}

#[test]
fn inherited_values_are_links() {
    let mut tree: ContextTree<ContextSettings> = ContextTree::new();
    let mut root = settings(None, None);
    root.access = Setting::new(AccessRules {
        allow: vec!["ALL".into()],
        deny: vec![],
    });
    tree.set_root_context(Context::literal("/", root));
    tree.insert(Context::literal("/private", settings(None, None)))
        .unwrap();
    tree.resolve_inheritance().unwrap();

    let child = tree.lookup("/private", false).unwrap();
    let root = tree.root_context().unwrap();
    assert!(child.payload().access.shares_cell(&root.payload().access));

    assert!(root.payload().access.store(AccessRules {
        allow: vec![],
        deny: vec!["ALL".into()],
    }));
    let seen = child.payload().access.get().unwrap();
    assert_eq!(seen.deny, ["ALL"]);
    assert!(seen.allow.is_empty());
}

#[test]
fn pinned_parent_overrides_trie_ancestor() {
    let mut tree: ContextTree<ContextSettings> = ContextTree::new();
    tree.insert(Context::literal("/", settings(Some("/srv/www"), Some("static"))))
        .unwrap();
    tree.insert(Context::literal("/shared", settings(Some("/srv/shared"), Some("proxy"))))
        .unwrap();

    // /a/b is resolved before /shared in trie order and still gets its values
    let mut pinned = Context::literal("/a/b", settings(None, None));
    pinned.set_parent("/shared");
    tree.insert(pinned).unwrap();
    tree.insert(Context::literal("/a/b/c", settings(None, None))).unwrap();
    tree.resolve_inheritance().unwrap();

    let b = tree.lookup("/a/b", false).unwrap();
    assert_eq!(text(&b.payload().doc_root).as_deref(), Some("/srv/shared"));
    assert_eq!(b.parent(), Some("/shared"));
    assert!(b.has_explicit_parent());

    let c = tree.lookup("/a/b/c", false).unwrap();
    assert_eq!(text(&c.payload().handler).as_deref(), Some("proxy"));
    assert_eq!(c.parent(), Some("/a/b"));
}

#[test]
fn regex_contexts_inherit_from_root() {
    let mut tree: ContextTree<ContextSettings> = ContextTree::new();
    tree.set_root_context(Context::literal("/", settings(Some("/srv/www"), Some("static"))));
    tree.insert(Context::regex(r"\.php$", settings(None, Some("lsphp"))).unwrap())
        .unwrap();
    tree.resolve_inheritance().unwrap();

    let php = tree.best_match("/x/index.php").unwrap().unwrap();
    assert_eq!(text(&php.payload().doc_root).as_deref(), Some("/srv/www"));
    assert_eq!(text(&php.payload().handler).as_deref(), Some("lsphp"));
    assert_eq!(php.parent(), Some("/"));
}

#[test]
fn resolving_twice_changes_nothing() {
    let mut tree: ContextTree<ContextSettings> = ContextTree::new();
    tree.set_root_context(Context::literal("/", settings(Some("/srv/www"), None)));
    tree.insert(Context::literal("/a", settings(None, Some("h")))).unwrap();
    tree.resolve_inheritance().unwrap();
    tree.resolve_inheritance().unwrap();

    let a = tree.lookup("/a", false).unwrap();
    assert_eq!(text(&a.payload().doc_root).as_deref(), Some("/srv/www"));
    assert!(a.payload().handler.is_explicit());
    assert!(!a.payload().auto_index.is_set());
}
