use crate::{compile_node_to_string, compile_to_html, serialize, CompileOptions};
use pagesmith_model::{templates, AttrValue, Attributes, Node, NodeId, Tree};
use proptest::prelude::*;
use std::sync::Arc;

fn node(kind: &str, content: &str, attrs: &[(&str, AttrValue)], children: Vec<Node>) -> Node {
    Node {
        id: NodeId::new(format!("{}-1", kind)),
        kind: kind.to_string(),
        content: Some(content.to_string()),
        attributes: attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
        children: children.into_iter().map(Arc::new).collect(),
    }
}

const HEADING_STYLE: &str = "color: #1f2937; font-size: 24px";
const TEXT_STYLE: &str = "color: #4b5563; font-size: 16px";

fn render(node: &Node) -> String {
    compile_node_to_string(
        node,
        &CompileOptions {
            pretty: false,
            ..CompileOptions::default()
        },
    )
}

#[test]
fn test_empty_page_is_a_shell() {
    let html = serialize(&Tree::new(), "Empty");

    println!("Generated HTML:\n{}", html);

    assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
    assert!(html.contains("<title>Empty</title>"));
    assert!(html.contains("box-sizing: border-box;"));
    assert!(html.contains("<body>\n</body>"));
    assert!(html.ends_with("</html>\n"));
}

#[test]
fn test_heading_with_defaults() {
    let tree = Tree::from_nodes(vec![Node {
        id: NodeId::new("h"),
        kind: "heading".to_string(),
        content: Some("Welcome".to_string()),
        attributes: pagesmith_model::default_attributes("heading"),
        children: vec![],
    }]);

    let html = serialize(&tree, "Home");

    assert!(html.contains("<body>\n  <h1 style=\"color: #1f2937; font-size: 24px\">Welcome</h1>\n</body>"));
}

#[test]
fn test_heading_level_is_clamped() {
    let high = node("heading", "x", &[("level", AttrValue::Number(9.0))], vec![]);
    let low = node("heading", "x", &[("level", AttrValue::Number(0.0))], vec![]);
    let text = node("heading", "x", &[("level", "3".into())], vec![]);

    assert_eq!(render(&high), format!("<h6 style=\"{}\">x</h6>\n", HEADING_STYLE));
    assert_eq!(render(&low), format!("<h1 style=\"{}\">x</h1>\n", HEADING_STYLE));
    assert_eq!(render(&text), format!("<h3 style=\"{}\">x</h3>\n", HEADING_STYLE));
}

#[test]
fn test_text_content_is_escaped() {
    let text = node("text", "<script>alert('x')</script> & more", &[], vec![]);
    assert_eq!(
        render(&text),
        format!(
            "<p style=\"{}\">&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more</p>\n",
            TEXT_STYLE
        )
    );
}

#[test]
fn test_attribute_values_are_escaped() {
    let image = node("image", "a.png\" onerror=\"x", &[("alt", "\"quoted\"".into())], vec![]);
    assert_eq!(
        render(&image),
        "<img src=\"a.png&quot; onerror=&quot;x\" alt=\"&quot;quoted&quot;\" />\n"
    );
}

#[test]
fn test_custom_html_is_passed_through() {
    let custom = node("custom-html", "<marquee>hi</marquee>", &[], vec![]);
    assert_eq!(render(&custom), "<marquee>hi</marquee>\n");

    let empty = node("custom-html", "", &[], vec![]);
    assert_eq!(render(&empty), "");
}

#[test]
fn test_unknown_type_falls_back_to_div() {
    let unknown = node("carousel", "slides <here>", &[("marginTop", AttrValue::Number(10.0))], vec![]);
    assert_eq!(
        render(&unknown),
        "<div style=\"margin-top: 10px\">slides &lt;here&gt;</div>\n"
    );

    let map = node("map", "Lisbon", &[], vec![]);
    assert_eq!(render(&map), "<div>Lisbon</div>\n");
}

#[test]
fn test_image_placeholder() {
    let image = node("image", "", &[("alt", "Logo".into())], vec![]);
    assert_eq!(render(&image), "<img src=\"/placeholder.svg\" alt=\"Logo\" />\n");
}

#[test]
fn test_video_embeds() {
    let youtube = node("video", "https://www.youtube.com/embed/abc", &[], vec![]);
    assert_eq!(
        render(&youtube),
        "<iframe src=\"https://www.youtube.com/embed/abc\" frameborder=\"0\" allowfullscreen></iframe>\n"
    );

    let local = node("video", "clip.mp4", &[], vec![]);
    assert_eq!(render(&local), "<div>Video: clip.mp4</div>\n");
}

#[test]
fn test_list_skips_blank_lines() {
    let list = node("list", "  One \n\n   \nTwo\n", &[], vec![]);
    assert_eq!(
        render(&list),
        format!("<ul style=\"{}\">\n<li>One</li>\n<li>Two</li>\n</ul>\n", TEXT_STYLE)
    );

    let empty = node("list", "\n  \n", &[], vec![]);
    assert_eq!(render(&empty), format!("<ul style=\"{}\"></ul>\n", TEXT_STYLE));
}

#[test]
fn test_section_renders_children_in_order() {
    let section = node(
        "section",
        "",
        &[("backgroundColor", "#fff".into())],
        vec![node("heading", "A", &[], vec![]), node("text", "B", &[], vec![])],
    );
    let tree = Tree::from_nodes(vec![section]);

    let html = serialize(&tree, "Sections");

    println!("Generated HTML:\n{}", html);

    assert!(html.contains(&format!(
        "  <section style=\"background-color: #fff\">\n    <h1 style=\"{}\">A</h1>\n    <p style=\"{}\">B</p>\n  </section>\n",
        HEADING_STYLE, TEXT_STYLE
    )));
}

#[test]
fn test_empty_section_collapses() {
    let section = node("section", "", &[], vec![]);
    assert_eq!(render(&section), "<section style=\"background-color: #ffffff\"></section>\n");
}

#[test]
fn test_columns_pad_to_configured_count() {
    let columns = node(
        "columns",
        "",
        &[("columns", AttrValue::Number(3.0))],
        vec![node("text", "left", &[], vec![])],
    );

    let html = render(&columns);

    assert_eq!(
        html,
        concat!(
            "<div style=\"overflow: hidden\">\n",
            "<div style=\"width: 33%; float: left; padding: 10px;\">\n",
            "<p style=\"color: #4b5563; font-size: 16px\">left</p>\n",
            "</div>\n",
            "<div style=\"width: 33%; float: left; padding: 10px;\"></div>\n",
            "<div style=\"width: 33%; float: left; padding: 10px;\"></div>\n",
            "</div>\n",
        )
    );
}

#[test]
fn test_columns_grow_with_children() {
    let children = (0..4).map(|i| node("text", &i.to_string(), &[], vec![])).collect();
    let columns = node("columns", "", &[("columns", AttrValue::Number(2.0))], children);

    let html = render(&columns);

    assert_eq!(html.matches("width: 25%").count(), 4);
    let order: Vec<usize> = [">0</p>", ">1</p>", ">2</p>", ">3</p>"]
        .iter()
        .map(|p| html.find(p).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_columns_with_invalid_count_use_default() {
    let columns = node("columns", "", &[("columns", AttrValue::Number(0.0))], vec![]);
    assert_eq!(render(&columns).matches("width: 50%").count(), 2);
}

#[test]
fn test_columns_count_is_capped() {
    let columns = node("columns", "", &[("columns", AttrValue::Number(1e12))], vec![]);
    assert_eq!(render(&columns).matches("width: 8%").count(), 12);
}

#[test]
fn test_navigation_items() {
    let default = node("navigation", "", &[], vec![]);
    let html = render(&default);
    for item in ["Home", "About", "Services", "Contact"] {
        assert!(html.contains(&format!("<a href=\"#\" style=\"margin-right: 20px;\">{}</a>", item)));
    }

    let custom = node("navigation", "", &[("navItems", vec!["Blog & News"].into())], vec![]);
    assert!(render(&custom).contains(">Blog &amp; News</a>"));

    let empty = node("navigation", "", &[("navItems", AttrValue::List(vec![]))], vec![]);
    assert_eq!(render(&empty), "<nav></nav>\n");
}

#[test]
fn test_form_has_fixed_fields() {
    let form = node("form", "", &[], vec![]);
    let html = render(&form);

    assert!(html.starts_with("<form>\n"));
    assert!(html.contains("<label>Name:</label>"));
    assert!(html.contains("<input type=\"email\""));
    assert!(html.contains("<textarea"));
    assert!(html.contains("<button type=\"submit\">Send</button>"));
}

#[test]
fn test_gallery_images() {
    let default = node("gallery", "", &[], vec![]);
    assert_eq!(render(&default).matches("<img src=\"/placeholder.svg\"").count(), 3);

    let three = node("gallery", "", &[("images", vec!["a.png", "b.png", "c.png"].into())], vec![]);
    assert_eq!(render(&three).matches("<img").count(), 3);
}

#[test]
fn test_button_styles() {
    let button = node("button", "Go", &[("backgroundColor", "#4338ca".into())], vec![]);
    assert_eq!(
        render(&button),
        "<button style=\"background-color: #4338ca; padding: 8px 16px; border: none; border-radius: 4px; cursor: pointer\">Go</button>\n"
    );
}

#[test]
fn test_title_and_lang_are_escaped() {
    let html = compile_to_html(
        &Tree::new(),
        &CompileOptions {
            title: "Tom & Jerry's <page>".to_string(),
            lang: "pt-BR".to_string(),
            ..CompileOptions::default()
        },
    );
    assert!(html.contains("<title>Tom &amp; Jerry&#39;s &lt;page&gt;</title>"));
    assert!(html.contains("<html lang=\"pt-BR\">"));
}

#[test]
fn test_compact_output_has_no_indentation() {
    let tree = Tree::from_nodes(vec![node(
        "section",
        "",
        &[],
        vec![node("text", "inner", &[], vec![])],
    )]);
    let html = compile_to_html(
        &tree,
        &CompileOptions {
            pretty: false,
            ..CompileOptions::default()
        },
    );
    assert!(html.contains(&format!(
        "<body>\n<section style=\"background-color: #ffffff\">\n<p style=\"{}\">inner</p>\n</section>\n</body>",
        TEXT_STYLE
    )));
}

#[test]
fn test_templates_compile() {
    for template in templates::builtin() {
        let html = serialize(&template.nodes, &template.name);
        assert!(html.contains("</body>"), "{}", template.id);
    }

    let landing = templates::find("landing-1").unwrap();
    let html = serialize(&landing.nodes, "Landing");
    assert!(html.contains(">Welcome to Our Product</h1>"));
    assert!(html.contains("font-size: 30px"));
}

#[test]
fn test_page_json_compiles() {
    let json = r#"[
        {"id": "s", "type": "section", "attributes": {"paddingTop": "12"}, "children": [
            {"id": "t", "type": "text", "content": "Hi", "attributes": {"fontSize": "sm"}}
        ]}
    ]"#;
    let tree: Tree = serde_json::from_str(json).unwrap();
    let html = serialize(&tree, "Json");
    assert!(html.contains("<section style=\"padding-top: 12px; background-color: #ffffff\">"));
    assert!(html.contains("<p style=\"color: #4b5563; font-size: 14px\">Hi</p>"));
}

#[test]
fn test_missing_attributes_render_with_type_defaults() {
    let json = r#"[
        {"id": "t", "type": "text", "content": "Hi"},
        {"id": "b", "type": "button", "content": "Go"},
        {"id": "i", "type": "image"}
    ]"#;
    let tree = Tree::from_json(json).unwrap();
    let html = compile_to_html(
        &tree,
        &CompileOptions {
            pretty: false,
            ..CompileOptions::default()
        },
    );

    assert!(html.contains("\n<p style=\"color: #4b5563; font-size: 16px\">Hi</p>\n"));
    assert!(html.contains(
        "\n<button style=\"background-color: #4338ca; padding: 8px 16px; border: none; border-radius: 4px; cursor: pointer\">Go</button>\n"
    ));
    assert!(html.contains("\n<img src=\"/placeholder.svg\" alt=\"Image\" />\n"));
}

#[test]
fn test_explicit_values_beat_defaults() {
    let text = node("text", "Hi", &[("color", "#111".into()), ("fontSize", "xs".into())], vec![]);
    assert_eq!(render(&text), "<p style=\"color: #111; font-size: 12px\">Hi</p>\n");
}

/// `depth` nested sections around a single text node
fn nested_sections(depth: usize) -> Node {
    let mut current = node("text", "core", &[], vec![]);
    for i in 0..depth {
        let mut section = node("section", "", &[], vec![current]);
        section.id = NodeId::new(format!("s-{}", i));
        current = section;
    }
    current
}

#[test]
fn test_deep_nesting_renders() {
    let depth = 20_000;
    let tree = Tree::from_nodes(vec![nested_sections(depth)]);

    let html = compile_to_html(
        &tree,
        &CompileOptions {
            pretty: false,
            ..CompileOptions::default()
        },
    );

    assert_eq!(html.matches("<section").count(), depth);
    assert_eq!(html.matches("</section>").count(), depth);
    assert!(html.contains(">core</p>\n</section>\n"));
}

#[test]
fn test_deep_columns_render() {
    let mut current = node("text", "core", &[], vec![]);
    for _ in 0..5_000 {
        current = node("columns", "", &[("columns", AttrValue::Number(1.0))], vec![current]);
    }

    let html = render(&current);

    assert_eq!(html.matches("width: 100%").count(), 5_000);
    assert!(html.ends_with("</div>\n</div>\n"));
}

fn kind_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("heading".to_string()),
        Just("text".to_string()),
        Just("button".to_string()),
        Just("image".to_string()),
        Just("video".to_string()),
        Just("list".to_string()),
        Just("navigation".to_string()),
        Just("form".to_string()),
        Just("gallery".to_string()),
        Just("map".to_string()),
        Just("custom-html".to_string()),
        "[a-z]{1,8}",
    ]
}

fn attr_strategy() -> impl Strategy<Value = AttrValue> {
    prop_oneof![
        any::<bool>().prop_map(AttrValue::Bool),
        any::<f64>().prop_map(AttrValue::Number),
        ".{0,8}".prop_map(AttrValue::Text),
        proptest::collection::vec(".{0,5}", 0..3).prop_map(AttrValue::List),
    ]
}

fn leaf_strategy() -> impl Strategy<Value = Node> {
    (
        kind_strategy(),
        proptest::option::of(".{0,20}"),
        proptest::collection::btree_map(
            prop_oneof![
                Just("level".to_string()),
                Just("columns".to_string()),
                Just("marginTop".to_string()),
                Just("fontSize".to_string()),
                Just("navItems".to_string()),
                Just("images".to_string()),
                Just("color".to_string()),
            ],
            attr_strategy(),
            0..4,
        ),
    )
        .prop_map(|(kind, content, attributes): (String, Option<String>, Attributes)| Node {
            id: NodeId::new("n"),
            kind,
            content,
            attributes,
            children: vec![],
        })
}

fn node_strategy() -> impl Strategy<Value = Node> {
    leaf_strategy().prop_recursive(4, 32, 4, |inner| {
        (
            prop_oneof![Just("section"), Just("columns")],
            proptest::collection::vec(inner, 0..4),
            attr_strategy(),
        )
            .prop_map(|(kind, children, columns)| {
                let mut attributes = Attributes::new();
                attributes.insert("columns".to_string(), columns);
                Node {
                    id: NodeId::new("c"),
                    kind: kind.to_string(),
                    content: None,
                    attributes,
                    children: children.into_iter().map(Arc::new).collect(),
                }
            })
    })
}

proptest! {
    #[test]
    fn serialization_is_total(nodes in proptest::collection::vec(node_strategy(), 0..5)) {
        let html = serialize(&Tree::from_nodes(nodes), "Any");
        prop_assert!(html.starts_with("<!DOCTYPE html>"));
        prop_assert!(html.ends_with("</html>\n"));
    }
}
