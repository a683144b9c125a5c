// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reference manual generated from schema metadata.
//!
//! Both renderers walk a node's help text, dimension, default, options and
//! data type, then recurse into attributes, fields and dynamic templates.
//! Recursion stops below `stop_level` when one is given.

use crate::error::Result;
use crate::input::{Node, INDENT};
use crate::xml::escape;

fn latex_escape(text: &str) -> String {
    text.replace('_', "\\_").replace("...", "\\ldots ")
}

fn latex_default(node: &dyn Node) -> Option<String> {
    let text = node.default_text()?;
    Some(if node.type_name() == Some("string") {
        format!("'{text}'")
    } else {
        text
    })
}

fn below_stop(level: usize, stop_level: Option<usize>) -> bool {
    stop_level.is_some_and(|stop| level > stop)
}

fn at_stop(level: usize, stop_level: Option<usize>) -> bool {
    stop_level == Some(level)
}

/// LaTeX manual of `node`.
///
/// At level 0 a stand-alone document is produced, unless `cross_ref` is
/// set: then labeled nodes open their own `\section` and fields pointing at
/// labeled nodes become `\hyperref` entries.
pub fn help_latex(
    node: &dyn Node,
    level: usize,
    stop_level: Option<usize>,
    cross_ref: bool,
) -> Result<String> {
    if below_stop(level, stop_level) {
        return Ok(String::new());
    }

    let mut out = String::new();
    if level == 0 {
        let label = node.meta().label();
        if !cross_ref {
            out.push_str("\\documentclass[12pt,fleqn]{report}\n\\begin{document}\n");
        } else if !label.is_empty() {
            out.push_str(&format!("\\section{{{label}}}\n\\label{{{label}}}\n"));
        }
    }

    out.push_str(&latex_body(node, level, stop_level, cross_ref)?);

    if level == 0 && !cross_ref {
        out.push_str("\\end{document}");
    }
    Ok(out)
}

fn latex_body(
    node: &dyn Node,
    level: usize,
    stop_level: Option<usize>,
    cross_ref: bool,
) -> Result<String> {
    let meta = node.meta();
    let mut out = latex_escape(meta.help());
    out.push('\n');
    if meta.has_dimension() {
        out.push_str(&format!("{{\\\\ \\bf DIMENSION: }}{}\n", meta.dimension()));
    }
    if let Some(default) = latex_default(node) {
        out.push_str(&format!("{{\\\\ \\bf DEFAULT: }}{}\n", latex_escape(&default)));
    }
    if let Some(options) = node.options_text() {
        let quoted: Vec<String> = options
            .iter()
            .map(|o| format!("'{}'", latex_escape(o)))
            .collect();
        out.push_str(&format!("{{\\\\ \\bf OPTIONS: }}{}\n", quoted.join(", ")));
    }
    if let Some(type_name) = node.type_name() {
        out.push_str(&format!("{{\\\\ \\bf DATA TYPE: }}{type_name}\n"));
    }

    let attribs = node.attribs();
    if !attribs.is_empty() {
        out.push_str("\\paragraph{Attributes}\n \\begin{itemize}\n");
        for (name, attr) in attribs {
            out.push_str(&format!("\\item {{\\bf {}}}:\n ", latex_escape(name)));
            out.push_str(&latex_body(attr, level, stop_level, cross_ref)?);
        }
        out.push_str("\\end{itemize}\n \n");
    }

    if !at_stop(level, stop_level) {
        let fields = node.fields();
        if !fields.is_empty() {
            out.push_str("\\paragraph{Fields}\n \\begin{itemize}\n");
            for (name, field) in fields {
                out.push_str(&latex_item(name, field, level, stop_level, cross_ref)?);
            }
            out.push_str("\\end{itemize}\n \n");
        }

        let templates = node.templates()?;
        if !templates.is_empty() {
            out.push_str("\\paragraph{Dynamic attributes}\n \\begin{itemize}\n");
            for (name, template) in templates {
                out.push_str(&latex_item(name, template.as_ref(), level, stop_level, cross_ref)?);
            }
            out.push_str("\\end{itemize}\n \n");
        }
    }
    Ok(out)
}

fn latex_item(
    name: &str,
    child: &dyn Node,
    level: usize,
    stop_level: Option<usize>,
    cross_ref: bool,
) -> Result<String> {
    let label = child.meta().label();
    let title = if cross_ref && !label.is_empty() {
        format!("\\hyperref[{label}]{{{}}} ", latex_escape(name))
    } else {
        latex_escape(name)
    };
    Ok(format!(
        "\\item {{\\bf {title}}}:\n {}",
        help_latex(child, level + 1, stop_level, cross_ref)?
    ))
}

fn xml_default(node: &dyn Node) -> Option<String> {
    node.default_text().map(|text| {
        if node.type_name() == Some("string") {
            format!(" {text} ")
        } else {
            text
        }
    })
}

fn xml_options(options: &[String]) -> String {
    let quoted: Vec<String> = options.iter().map(|o| format!("'{o}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// XML manual of `node`, written as tag `name`.
pub fn help_xml(
    node: &dyn Node,
    name: &str,
    indent: &str,
    level: usize,
    stop_level: Option<usize>,
) -> Result<String> {
    if below_stop(level, stop_level) {
        return Ok(String::new());
    }

    let meta = node.meta();
    let attribs = node.attribs();
    let inner = format!("{indent}{INDENT}");

    let mut out = format!("{indent}<{name}");
    for (attr, _) in &attribs {
        out.push_str(&format!(" {attr}=''"));
    }
    out.push_str(">\n");

    out.push_str(&format!("{inner}<help>{}</help>\n", escape(meta.help())));
    for (attr, a) in &attribs {
        out.push_str(&format!(
            "{inner}<{attr}_help>{}</{attr}_help>\n",
            escape(a.meta().help())
        ));
    }

    if meta.has_dimension() {
        out.push_str(&format!("{inner}<dimension>{}</dimension>\n", meta.dimension()));
    }

    if let Some(default) = xml_default(node) {
        out.push_str(&format!("{inner}<default>{}</default>\n", escape(&default)));
    }
    for (attr, a) in &attribs {
        if let Some(default) = xml_default(*a) {
            out.push_str(&format!(
                "{inner}<{attr}_default>{}</{attr}_default>\n",
                escape(&default)
            ));
        }
    }

    if let Some(options) = node.options_text() {
        out.push_str(&format!("{inner}<options>{}</options>\n", escape(&xml_options(&options))));
    }
    for (attr, a) in &attribs {
        if let Some(options) = a.options_text() {
            out.push_str(&format!(
                "{inner}<{attr}_options>{}</{attr}_options>\n",
                escape(&xml_options(&options))
            ));
        }
    }

    if let Some(type_name) = node.type_name() {
        out.push_str(&format!("{inner}<dtype>{type_name}</dtype>\n"));
    }
    for (attr, a) in &attribs {
        if let Some(type_name) = a.type_name() {
            out.push_str(&format!("{inner}<{attr}_dtype>{type_name}</{attr}_dtype>\n"));
        }
    }

    if !at_stop(level, stop_level) {
        for (field, child) in node.fields() {
            out.push_str(&help_xml(child, field, &inner, level + 1, stop_level)?);
        }
        for (tag, template) in node.templates()? {
            out.push_str(&help_xml(template.as_ref(), tag, &inner, level + 1, stop_level)?);
        }
    }

    out.push_str(&format!("{indent}</{name}>\n"));
    Ok(out)
}
