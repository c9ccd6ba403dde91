use super::schema::{AccessConfig, RewriteConfig, SettingsConfig};
use crate::context::{Inherit, Setting};

/// Allow and deny lists of a context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRules {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteRules {
    pub enabled: bool,
    pub rules: Vec<String>,
}

/// The stock context payload built from configuration files.
///
/// Every field is a [`Setting`]: unset fields are linked to the nearest
/// ancestor's value once inheritance is resolved.
#[derive(Debug, Clone, Default)]
pub struct ContextSettings {
    pub doc_root: Setting<String>,
    pub handler: Setting<String>,
    pub access: Setting<AccessRules>,
    pub rewrite: Setting<RewriteRules>,
    pub auto_index: Setting<bool>,
    pub index_files: Setting<Vec<String>>,
}

impl Inherit for ContextSettings {
    fn inherit_from(&mut self, parent: &Self) -> bool {
        let mut changed = false;
        changed |= self.doc_root.inherit_from(&parent.doc_root);
        changed |= self.handler.inherit_from(&parent.handler);
        changed |= self.access.inherit_from(&parent.access);
        changed |= self.rewrite.inherit_from(&parent.rewrite);
        changed |= self.auto_index.inherit_from(&parent.auto_index);
        changed |= self.index_files.inherit_from(&parent.index_files);
        changed
    }
}

fn setting<T>(value: Option<T>) -> Setting<T> {
    value.map_or_else(Setting::unset, Setting::new)
}

impl From<SettingsConfig> for ContextSettings {
    fn from(cfg: SettingsConfig) -> Self {
        Self {
            doc_root: setting(cfg.doc_root),
            handler: setting(cfg.handler),
            access: setting(cfg.access.map(|AccessConfig { allow, deny }| AccessRules {
                allow,
                deny,
            })),
            rewrite: setting(
                cfg.rewrite
                    .map(|RewriteConfig { enabled, rules }| RewriteRules { enabled, rules }),
            ),
            auto_index: setting(cfg.auto_index),
            index_files: setting(cfg.index_files),
        }
    }
}
