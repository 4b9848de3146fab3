//! # Block Registry
//!
//! Static table of content-block kinds: default payload, default attributes
//! and human-readable label for each. Every lookup is total; a type name the
//! registry does not know gets an empty payload, the universal spacing keys
//! and its own name as label.

use crate::node::{AttrValue, Attributes, Node};

/// Attribute names used by the registry and the HTML compiler
pub mod attr {
    pub const MARGIN_TOP: &str = "marginTop";
    pub const MARGIN_BOTTOM: &str = "marginBottom";
    pub const PADDING_TOP: &str = "paddingTop";
    pub const PADDING_BOTTOM: &str = "paddingBottom";
    pub const COLOR: &str = "color";
    pub const FONT_SIZE: &str = "fontSize";
    pub const BACKGROUND_COLOR: &str = "backgroundColor";
    pub const LEVEL: &str = "level";
    pub const VARIANT: &str = "variant";
    pub const SIZE: &str = "size";
    pub const ALT: &str = "alt";
    pub const WIDTH: &str = "width";
    pub const AUTOPLAY: &str = "autoplay";
    pub const CONTROLS: &str = "controls";
    pub const COLUMNS: &str = "columns";
    pub const NAV_ITEMS: &str = "navItems";
    pub const IMAGES: &str = "images";

    /// Keys every node carries regardless of type
    pub const SPACING: [&str; 4] = [MARGIN_TOP, MARGIN_BOTTOM, PADDING_TOP, PADDING_BOTTOM];
}

pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Known content-block kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading,
    Text,
    Button,
    Image,
    Video,
    List,
    Section,
    Columns,
    Navigation,
    Form,
    Gallery,
    Map,
    CustomHtml,
}

impl BlockKind {
    pub const ALL: [BlockKind; 13] = [
        BlockKind::Heading,
        BlockKind::Text,
        BlockKind::Button,
        BlockKind::Image,
        BlockKind::Video,
        BlockKind::List,
        BlockKind::Section,
        BlockKind::Columns,
        BlockKind::Navigation,
        BlockKind::Form,
        BlockKind::Gallery,
        BlockKind::Map,
        BlockKind::CustomHtml,
    ];

    /// Type name as stored in [`crate::Node::kind`]
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Text => "text",
            BlockKind::Button => "button",
            BlockKind::Image => "image",
            BlockKind::Video => "video",
            BlockKind::List => "list",
            BlockKind::Section => "section",
            BlockKind::Columns => "columns",
            BlockKind::Navigation => "navigation",
            BlockKind::Form => "form",
            BlockKind::Gallery => "gallery",
            BlockKind::Map => "map",
            BlockKind::CustomHtml => "custom-html",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        BlockKind::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Kinds that may hold children
    pub fn is_container(self) -> bool {
        matches!(self, BlockKind::Section | BlockKind::Columns)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BlockKind::Heading => "Heading",
            BlockKind::Text => "Text",
            BlockKind::Button => "Button",
            BlockKind::Image => "Image",
            BlockKind::Video => "Video",
            BlockKind::List => "List",
            BlockKind::Section => "Section",
            BlockKind::Columns => "Columns",
            BlockKind::Navigation => "Navigation",
            BlockKind::Form => "Form",
            BlockKind::Gallery => "Gallery",
            BlockKind::Map => "Map",
            BlockKind::CustomHtml => "Custom HTML",
        }
    }

    pub fn default_content(self) -> &'static str {
        match self {
            BlockKind::Heading => "Section Title",
            BlockKind::Text => "Type your text here. You can edit this content by clicking on it.",
            BlockKind::Button => "Click Here",
            BlockKind::Image => PLACEHOLDER_IMAGE,
            BlockKind::Video => "https://www.youtube.com/embed/dQw4w9WgXcQ",
            BlockKind::List => "Item 1\nItem 2\nItem 3",
            BlockKind::CustomHtml => "<div>Your custom HTML here</div>",
            BlockKind::Section
            | BlockKind::Columns
            | BlockKind::Navigation
            | BlockKind::Form
            | BlockKind::Gallery
            | BlockKind::Map => "",
        }
    }

    /// Type-specific defaults, without the spacing keys
    fn specific_attributes(self) -> Vec<(&'static str, AttrValue)> {
        match self {
            BlockKind::Heading => vec![
                (attr::LEVEL, AttrValue::Number(1.0)),
                (attr::COLOR, "#1f2937".into()),
                (attr::FONT_SIZE, "2xl".into()),
            ],
            BlockKind::Text | BlockKind::List => vec![
                (attr::COLOR, "#4b5563".into()),
                (attr::FONT_SIZE, "base".into()),
            ],
            BlockKind::Button => vec![
                (attr::VARIANT, "default".into()),
                (attr::SIZE, "default".into()),
                (attr::BACKGROUND_COLOR, "#4338ca".into()),
            ],
            BlockKind::Image => vec![(attr::ALT, "Image".into()), (attr::WIDTH, "full".into())],
            BlockKind::Video => vec![(attr::AUTOPLAY, false.into()), (attr::CONTROLS, true.into())],
            BlockKind::Section => vec![(attr::BACKGROUND_COLOR, "#ffffff".into())],
            BlockKind::Columns => vec![(attr::COLUMNS, AttrValue::Number(2.0))],
            BlockKind::Navigation => vec![(
                attr::NAV_ITEMS,
                vec!["Home", "About", "Services", "Contact"].into(),
            )],
            BlockKind::Gallery => vec![(
                attr::IMAGES,
                vec![PLACEHOLDER_IMAGE, PLACEHOLDER_IMAGE, PLACEHOLDER_IMAGE].into(),
            )],
            BlockKind::Form | BlockKind::Map | BlockKind::CustomHtml => vec![],
        }
    }
}

/// Default payload for a type name; empty for unknown types
pub fn default_content(kind: &str) -> String {
    BlockKind::parse(kind)
        .map(|k| k.default_content().to_string())
        .unwrap_or_default()
}

/// Default attributes for a type name. Always contains the spacing keys.
pub fn default_attributes(kind: &str) -> Attributes {
    let mut attributes: Attributes = attr::SPACING
        .iter()
        .map(|key| (key.to_string(), AttrValue::Number(0.0)))
        .collect();
    if let Some(kind) = BlockKind::parse(kind) {
        for (key, value) in kind.specific_attributes() {
            attributes.insert(key.to_string(), value);
        }
    }
    attributes
}

/// Label shown to users; the type name itself for unknown types
pub fn display_name(kind: &str) -> String {
    BlockKind::parse(kind)
        .map(|k| k.display_name().to_string())
        .unwrap_or_else(|| kind.to_string())
}

pub fn is_container(kind: &str) -> bool {
    BlockKind::parse(kind).map(BlockKind::is_container).unwrap_or(false)
}

/// Insert every default key of `kind` that `attributes` lacks.
/// Keys already present are left alone.
pub fn backfill_defaults(kind: &str, attributes: &mut Attributes) {
    for (key, value) in default_attributes(kind) {
        attributes.entry(key).or_insert(value);
    }
}

/// The attributes consumers should read for `node`: its type's defaults
/// with the node's own values laid over them
pub fn effective_attributes(node: &Node) -> Attributes {
    let mut attributes = node.attributes.clone();
    backfill_defaults(&node.kind, &mut attributes);
    attributes
}
