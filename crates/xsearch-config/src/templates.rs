//! Configuration templates for `xsearch init`.
//!
//! The templates are kept as valid TOML so tests can parse them, and handed out commented out:
//! a freshly written file changes nothing until the user uncomments what they need.

use crate::discovery::CONFIG_FILENAME;

/// Project template: field registry and labels.
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Global template: labels and settings shared by all projects.
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// Returns the project configuration template, commented out.
pub fn local_template() -> String {
    render(LOCAL_TEMPLATE, "project")
}

/// Returns the global configuration template, commented out.
pub fn global_template() -> String {
    render(GLOBAL_TEMPLATE, "global")
}

/// Prefixes a title line and comments out every TOML line of `template`.
fn render(template: &str, scope: &str) -> String {
    let mut out = format!("# xsearch {scope} configuration ({CONFIG_FILENAME})\n#\n");
    out.reserve(template.len() + template.lines().count() * 2);
    for line in template.lines() {
        if !line.is_empty() && !line.starts_with('#') {
            out.push_str("# ");
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        merge::{ParsedConfig, merge_configs},
        parse::parse_config,
    };

    #[test]
    fn templates_are_valid_configs() {
        for template in [LOCAL_TEMPLATE, GLOBAL_TEMPLATE] {
            let result = parse_config(template);
            assert!(result.is_ok(), "template failed to parse: {result:?}");
        }
    }

    #[test]
    fn local_template_defines_fields() {
        let config = parse_config(LOCAL_TEMPLATE).unwrap();
        assert!(config.field.is_some_and(|fields| !fields.is_empty()));
    }

    #[test]
    fn local_template_validates_cleanly() {
        let parsed = ParsedConfig {
            path: PathBuf::from(CONFIG_FILENAME),
            config: parse_config(LOCAL_TEMPLATE).unwrap(),
        };
        let config = merge_configs(&[parsed]);
        assert_eq!(config.default_field(), "settlement-search");
        assert!(config.validate().is_empty(), "{:?}", config.validate());
    }

    #[test]
    fn rendered_templates_are_inert() {
        for rendered in [local_template(), global_template()] {
            let config = parse_config(&rendered).unwrap();
            assert!(config.field.is_none());
            assert!(config.settings.is_none());
            assert!(config.labels.is_none());
        }
    }

    #[test]
    fn render_comments_every_toml_line() {
        let rendered = render("# note\n[labels]\n\nand = \"UND\"\n", "test");
        assert_eq!(
            rendered,
            "# xsearch test configuration (.xsearch.toml)\n#\n# note\n# [labels]\n\n# and = \"UND\"\n"
        );
    }
}
