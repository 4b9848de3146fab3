//! Built-in page templates.
//!
//! A template is a ready-made tree installed wholesale as the new page.
//! Template nodes carry fixed ids (unique within the template) and the
//! registry defaults underneath their explicit attributes.

use crate::node::{AttrValue, Attributes, Node, NodeId, Tree};
use crate::registry::{attr, backfill_defaults};

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub category: String,
    pub nodes: Tree,
}

fn block(id: &str, kind: &str, content: &str, attrs: Vec<(&str, AttrValue)>) -> Node {
    let mut attributes: Attributes = attrs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    backfill_defaults(kind, &mut attributes);
    Node {
        id: NodeId::new(id),
        kind: kind.to_string(),
        content: Some(content.to_string()),
        attributes,
        children: vec![],
    }
}

fn template(id: &str, name: &str, category: &str, nodes: Vec<Node>) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        nodes: Tree::from_nodes(nodes),
    }
}

/// All built-in templates, in gallery order
pub fn builtin() -> Vec<Template> {
    vec![
        template(
            "landing-1",
            "Simple Landing Page",
            "Landing Page",
            vec![
                block(
                    "hero-heading",
                    "heading",
                    "Welcome to Our Product",
                    vec![
                        (attr::LEVEL, AttrValue::Number(1.0)),
                        (attr::FONT_SIZE, "3xl".into()),
                        (attr::COLOR, "#1f2937".into()),
                        (attr::MARGIN_BOTTOM, AttrValue::Number(16.0)),
                    ],
                ),
                block(
                    "hero-text",
                    "text",
                    "An innovative solution for your needs. Discover how we can help you reach your goals.",
                    vec![
                        (attr::FONT_SIZE, "lg".into()),
                        (attr::COLOR, "#6b7280".into()),
                        (attr::MARGIN_BOTTOM, AttrValue::Number(24.0)),
                    ],
                ),
                block(
                    "hero-button",
                    "button",
                    "Get Started",
                    vec![
                        (attr::VARIANT, "default".into()),
                        (attr::SIZE, "lg".into()),
                        (attr::BACKGROUND_COLOR, "#3b82f6".into()),
                        (attr::MARGIN_BOTTOM, AttrValue::Number(48.0)),
                    ],
                ),
            ],
        ),
        template(
            "about-1",
            "About Section",
            "Sections",
            vec![
                block(
                    "about-heading",
                    "heading",
                    "About Us",
                    vec![
                        (attr::LEVEL, AttrValue::Number(2.0)),
                        (attr::FONT_SIZE, "2xl".into()),
                        (attr::COLOR, "#1f2937".into()),
                        (attr::MARGIN_BOTTOM, AttrValue::Number(16.0)),
                    ],
                ),
                block(
                    "about-columns",
                    "columns",
                    "",
                    vec![
                        (attr::COLUMNS, AttrValue::Number(2.0)),
                        (attr::MARGIN_BOTTOM, AttrValue::Number(32.0)),
                    ],
                ),
                block(
                    "about-text",
                    "text",
                    "Our company is committed to delivering high quality solutions to our customers.",
                    vec![(attr::FONT_SIZE, "base".into()), (attr::COLOR, "#4b5563".into())],
                ),
            ],
        ),
        template(
            "contact-1",
            "Contact Form",
            "Forms",
            vec![
                block(
                    "contact-heading",
                    "heading",
                    "Get in Touch",
                    vec![
                        (attr::LEVEL, AttrValue::Number(2.0)),
                        (attr::FONT_SIZE, "2xl".into()),
                        (attr::COLOR, "#1f2937".into()),
                        (attr::MARGIN_BOTTOM, AttrValue::Number(16.0)),
                    ],
                ),
                block(
                    "contact-form",
                    "form",
                    "",
                    vec![(attr::MARGIN_BOTTOM, AttrValue::Number(32.0))],
                ),
            ],
        ),
    ]
}

pub fn find(id: &str) -> Option<Template> {
    builtin().into_iter().find(|t| t.id == id)
}

/// Distinct categories in first-seen order
pub fn categories() -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for template in builtin() {
        if !categories.contains(&template.category) {
            categories.push(template.category);
        }
    }
    categories
}
