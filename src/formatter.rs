//! Grouping of rules with identical declarations and CSS text output.

use crate::config::GenerateOptions;
use crate::generator::{CssRule, RuleMetadata};
use crate::parser::Breakpoint;
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;

/// Rules that share declarations and context, emitted under one selector list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedRule {
    pub selectors: Vec<String>,
    pub declarations: IndexMap<String, String>,
    pub declaration_string: String,
    pub class_names: Vec<String>,
    pub metadata: RuleMetadata,
}

impl GroupedRule {
    fn from_rule(rule: &CssRule) -> Self {
        Self {
            selectors: vec![rule.selector.clone()],
            declarations: rule.declarations.clone(),
            declaration_string: rule.declaration_string.clone(),
            class_names: vec![rule.class_name.clone()],
            metadata: rule.metadata.clone(),
        }
    }

    fn absorb(&mut self, rule: &CssRule) {
        if !self.selectors.contains(&rule.selector) {
            self.selectors.push(rule.selector.clone());
        }
        if !self.class_names.contains(&rule.class_name) {
            self.class_names.push(rule.class_name.clone());
        }
    }
}

/// Key under which two rules may share a selector list
pub fn group_key(rule: &CssRule) -> String {
    format!(
        "{}|responsive:{}|pseudo:{}",
        rule.declaration_string,
        rule.metadata.responsive.map(|bp| bp.name()).unwrap_or_default(),
        rule.metadata.pseudo_class.as_deref().unwrap_or_default()
    )
}

/// Merge rules by [`group_key`], keeping first-seen order after a stable
/// sort by specificity.
pub fn group_rules(rules: &[CssRule], group_selectors: bool) -> Vec<GroupedRule> {
    let mut ordered: Vec<&CssRule> = rules.iter().collect();
    ordered.sort_by_key(|rule| rule.specificity);

    if !group_selectors {
        return ordered.into_iter().map(GroupedRule::from_rule).collect();
    }

    let mut groups: IndexMap<String, GroupedRule> = IndexMap::new();
    for rule in ordered {
        groups
            .entry(group_key(rule))
            .and_modify(|group| group.absorb(rule))
            .or_insert_with(|| GroupedRule::from_rule(rule));
    }
    groups.into_values().collect()
}

/// Header comment written when comments are enabled
pub fn generate_css_header(empty: bool, minified: bool) -> String {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    if minified {
        if empty {
            "/* bracket-css: No classes generated */".to_string()
        } else {
            format!("/* Generated by bracket-css v{} at {} */", env!("CARGO_PKG_VERSION"), timestamp)
        }
    } else if empty {
        format!(
            "/**\n * Generated by bracket-css v{}\n * Generation time: {}\n *\n * No valid classes found\n */\n",
            env!("CARGO_PKG_VERSION"),
            timestamp
        )
    } else {
        format!(
            "/**\n * Generated by bracket-css v{}\n * Generation time: {}\n */\n",
            env!("CARGO_PKG_VERSION"),
            timestamp
        )
    }
}

fn render_group(group: &GroupedRule, indent: &str, minify: bool) -> String {
    if minify {
        let declarations = group
            .declarations
            .iter()
            .map(|(property, value)| format!("{}:{}", property, value))
            .collect::<Vec<_>>()
            .join(";");
        return format!("{}{{{}}}", group.selectors.join(","), declarations);
    }

    let mut out = String::new();
    let selector_separator = format!(",\n{}", indent);
    out.push_str(indent);
    out.push_str(&group.selectors.join(&selector_separator));
    out.push_str(" {\n");
    for (property, value) in &group.declarations {
        out.push_str(&format!("{}  {}: {};\n", indent, property, value));
    }
    out.push_str(indent);
    out.push('}');
    out
}

fn render_media_block(breakpoint: Breakpoint, groups: &[&GroupedRule], options: &GenerateOptions) -> String {
    let mut out = String::new();
    if options.include_comments {
        out.push_str(&format!("/* {} */", breakpoint.name()));
        if !options.minify {
            out.push('\n');
        }
    }

    if options.minify {
        out.push_str(&format!("@media {}{{", breakpoint.media_query()));
        for group in groups {
            out.push_str(&render_group(group, "", true));
        }
        out.push('}');
    } else {
        let body = groups
            .iter()
            .map(|group| render_group(group, "  ", false))
            .collect::<Vec<_>>()
            .join("\n\n");
        out.push_str(&format!("@media {} {{\n{}\n}}", breakpoint.media_query(), body));
    }
    out
}

/// Render grouped rules: base rules first, then one media block per
/// breakpoint in [`Breakpoint::ALL`] order.
pub fn format_css(groups: &[GroupedRule], options: &GenerateOptions) -> String {
    let mut blocks: Vec<String> = groups
        .iter()
        .filter(|group| group.metadata.responsive.is_none())
        .map(|group| render_group(group, "", options.minify))
        .collect();

    for breakpoint in Breakpoint::ALL {
        let members: Vec<&GroupedRule> = groups
            .iter()
            .filter(|group| group.metadata.responsive == Some(breakpoint))
            .collect();
        if !members.is_empty() {
            blocks.push(render_media_block(breakpoint, &members, options));
        }
    }

    let body = if options.minify {
        blocks.concat()
    } else if blocks.is_empty() {
        String::new()
    } else {
        format!("{}\n", blocks.join("\n\n"))
    };

    if !options.include_comments {
        return body;
    }

    let header = generate_css_header(blocks.is_empty(), options.minify);
    if options.minify || body.is_empty() {
        format!("{}{}", header, body)
    } else {
        format!("{}\n{}", header, body)
    }
}
