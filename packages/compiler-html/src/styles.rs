//! Inline style generation for exported nodes.
//!
//! Declarations are emitted in a fixed order: spacing, typography,
//! background, then rules specific to the block kind.

use pagesmith_model::registry::attr;
use pagesmith_model::{effective_attributes, AttrValue, Attributes, BlockKind, Node};

/// Pixel size for a `fontSize` keyword; unknown keywords fall back to 16px
pub fn font_size_px(keyword: &str) -> &'static str {
    match keyword {
        "xs" => "12px",
        "sm" => "14px",
        "base" => "16px",
        "lg" => "18px",
        "xl" => "20px",
        "2xl" => "24px",
        "3xl" => "30px",
        "4xl" => "36px",
        _ => "16px",
    }
}

/// CSS declarations for `node`, joined with `"; "`. Unescaped.
///
/// Recognized attributes the node lacks take their registry default.
pub fn inline_styles(node: &Node) -> String {
    style_declarations(node.block_kind(), &effective_attributes(node))
}

/// Declarations from already-resolved attributes
pub(crate) fn style_declarations(kind: Option<BlockKind>, attributes: &Attributes) -> String {
    let mut declarations: Vec<String> = Vec::new();

    for (key, property) in [
        (attr::MARGIN_TOP, "margin-top"),
        (attr::MARGIN_BOTTOM, "margin-bottom"),
        (attr::PADDING_TOP, "padding-top"),
        (attr::PADDING_BOTTOM, "padding-bottom"),
    ] {
        if let Some(px) = attributes.get(key).and_then(non_zero) {
            declarations.push(format!("{}: {}px", property, px));
        }
    }

    if let Some(color) = attributes.get(attr::COLOR).filter(|v| v.is_truthy()) {
        declarations.push(format!("color: {}", color));
    }
    if let Some(size) = attributes.get(attr::FONT_SIZE).filter(|v| v.is_truthy()) {
        let keyword = size.to_string();
        declarations.push(format!("font-size: {}", font_size_px(&keyword)));
    }

    if let Some(background) = attributes.get(attr::BACKGROUND_COLOR).filter(|v| v.is_truthy()) {
        declarations.push(format!("background-color: {}", background));
    }

    match kind {
        Some(BlockKind::Button) => declarations.extend(
            ["padding: 8px 16px", "border: none", "border-radius: 4px", "cursor: pointer"]
                .map(String::from),
        ),
        Some(BlockKind::Columns) => declarations.push("overflow: hidden".to_string()),
        _ => {}
    }

    declarations.join("; ")
}

/// Numeric spacing value, skipped when zero or unparseable
fn non_zero(value: &AttrValue) -> Option<String> {
    let n = value.as_f64()?;
    if n == 0.0 || !n.is_finite() {
        return None;
    }
    Some(AttrValue::Number(n).to_string())
}
