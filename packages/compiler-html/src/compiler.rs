use crate::styles::style_declarations;
use pagesmith_model::registry::{attr, PLACEHOLDER_IMAGE};
use pagesmith_model::{effective_attributes, BlockKind, Node, Tree};
use std::sync::Arc;
use tracing::{debug, instrument};

const DEFAULT_COLUMNS: usize = 2;
const MAX_COLUMNS: usize = 12;

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Document `<title>`
    pub title: String,
    /// `lang` attribute of the root element
    pub lang: String,
    /// Indent nested markup
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            title: "My Page".to_string(),
            lang: "en".to_string(),
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context<'a> {
    options: &'a CompileOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        self.add("\n");
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Serialize a page into a standalone HTML document titled `title`
pub fn serialize(tree: &Tree, title: &str) -> String {
    compile_to_html(
        tree,
        &CompileOptions {
            title: title.to_string(),
            ..CompileOptions::default()
        },
    )
}

/// Compile a page to a standalone HTML document. Never fails: every tree,
/// including an empty or arbitrarily deep one, has a rendering.
#[instrument(skip_all, fields(nodes = tree.node_count(), title = %options.title))]
pub fn compile_to_html(tree: &Tree, options: &CompileOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line(&format!("<html lang=\"{}\">", escape_html(&options.lang)));
    compile_head(&mut ctx);

    ctx.add_line("<body>");
    ctx.indent();
    compile_nodes(tree.roots(), &mut ctx);
    ctx.dedent();
    ctx.add_line("</body>");
    ctx.add_line("</html>");

    let html = ctx.get_output();
    debug!(bytes = html.len(), "Compiled page");
    html
}

fn compile_head(ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let title = format!("<title>{}</title>", escape_html(&ctx.options.title));
    ctx.add_line(&title);

    ctx.add_line("<style>");
    ctx.indent();
    for line in [
        "body {",
        "  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",
        "  margin: 0;",
        "  padding: 20px;",
        "  line-height: 1.6;",
        "}",
        "* {",
        "  box-sizing: border-box;",
        "}",
    ] {
        ctx.add_line(line);
    }
    ctx.dedent();
    ctx.add_line("</style>");

    ctx.dedent();
    ctx.add_line("</head>");
}

/// Render one node (and, for containers, its subtree)
pub fn compile_node_to_string(node: &Node, options: &CompileOptions) -> String {
    let mut ctx = Context::new(options);
    drain(vec![Work::Node(node)], &mut ctx);
    ctx.get_output()
}

/// Pending output. Containers push their children instead of recursing,
/// so nesting depth never grows the call stack.
enum Work<'n> {
    Node(&'n Node),
    Line(String),
    /// Line, then one level deeper
    Enter(String),
    /// One level shallower, then line
    Leave(&'static str),
    Close(Wrapper),
}

/// An opened wrapper element waiting for its closing tag
struct Wrapper {
    tag: &'static str,
    open: String,
    start: usize,
    after_open: usize,
}

impl Wrapper {
    fn open(tag: &'static str, style: &str, ctx: &mut Context) -> Self {
        let open = open_tag(tag, &[("style", style)], &[]);
        let start = ctx.buffer.len();
        ctx.add_line(&open);
        let after_open = ctx.buffer.len();
        ctx.indent();
        Self {
            tag,
            open,
            start,
            after_open,
        }
    }

    /// Collapses to a single line when nothing was written inside
    fn close(self, ctx: &mut Context) {
        ctx.dedent();
        if ctx.buffer.len() == self.after_open {
            ctx.buffer.truncate(self.start);
            ctx.add_line(&format!("{}</{}>", self.open, self.tag));
        } else {
            ctx.add_line(&format!("</{}>", self.tag));
        }
    }
}

fn compile_nodes(nodes: &[Arc<Node>], ctx: &mut Context) {
    let mut pending = Vec::with_capacity(nodes.len());
    push_children(&mut pending, nodes);
    drain(pending, ctx);
}

fn drain<'n>(mut pending: Vec<Work<'n>>, ctx: &mut Context) {
    while let Some(work) = pending.pop() {
        match work {
            Work::Node(node) => compile_node(node, ctx, &mut pending),
            Work::Line(line) => ctx.add_line(&line),
            Work::Enter(line) => {
                ctx.add_line(&line);
                ctx.indent();
            }
            Work::Leave(line) => {
                ctx.dedent();
                ctx.add_line(line);
            }
            Work::Close(wrapper) => wrapper.close(ctx),
        }
    }
}

/// Queue `children` so they pop in document order
fn push_children<'n>(pending: &mut Vec<Work<'n>>, children: &'n [Arc<Node>]) {
    pending.extend(children.iter().rev().map(|child| Work::Node(child.as_ref())));
}

fn compile_node<'n>(node: &'n Node, ctx: &mut Context, pending: &mut Vec<Work<'n>>) {
    let Some(kind) = node.block_kind() else {
        let style = style_declarations(None, &effective_attributes(node));
        compile_fallback(node, &style, ctx, pending);
        return;
    };

    let attributes = effective_attributes(node);
    let style = style_declarations(Some(kind), &attributes);
    let content = node.content_or_empty();
    let escaped = escape_html(content);

    match kind {
        BlockKind::Heading => {
            let level = attributes
                .get(attr::LEVEL)
                .and_then(|v| v.as_f64())
                .filter(|n| n.is_finite())
                .map(|n| n.round().clamp(1.0, 6.0) as u8)
                .unwrap_or(1);
            let tag = format!("h{}", level);
            ctx.add_line(&element(&tag, &[("style", style.as_str())], Some(escaped.as_str())));
        }

        BlockKind::Text => {
            ctx.add_line(&element("p", &[("style", style.as_str())], Some(escaped.as_str())));
        }

        BlockKind::Button => {
            ctx.add_line(&element("button", &[("style", style.as_str())], Some(escaped.as_str())));
        }

        BlockKind::Image => {
            let src = if content.is_empty() { PLACEHOLDER_IMAGE } else { content };
            let alt = attributes.get(attr::ALT).map(|v| v.to_string()).unwrap_or_default();
            ctx.add_line(&element(
                "img",
                &[("src", src), ("alt", alt.as_str()), ("style", style.as_str())],
                None,
            ));
        }

        BlockKind::Video => {
            if content.contains("youtube") || content.contains("vimeo") {
                ctx.add_line(&format!(
                    "{}</iframe>",
                    open_tag(
                        "iframe",
                        &[("src", content), ("style", style.as_str()), ("frameborder", "0")],
                        &["allowfullscreen"],
                    )
                ));
            } else {
                let label = format!("Video: {}", escaped);
                ctx.add_line(&element("div", &[("style", style.as_str())], Some(label.as_str())));
            }
        }

        BlockKind::List => {
            let list = Wrapper::open("ul", &style, ctx);
            for item in content.lines().map(str::trim).filter(|line| !line.is_empty()) {
                ctx.add_line(&element("li", &[], Some(escape_html(item).as_str())));
            }
            list.close(ctx);
        }

        BlockKind::Section => {
            pending.push(Work::Close(Wrapper::open("section", &style, ctx)));
            push_children(pending, &node.children);
        }

        BlockKind::Columns => {
            let configured = attributes
                .get(attr::COLUMNS)
                .and_then(|v| v.as_f64())
                .filter(|n| n.is_finite() && *n >= 1.0)
                .map(|n| (n as usize).min(MAX_COLUMNS))
                .unwrap_or(DEFAULT_COLUMNS);
            compile_columns(node, configured, &style, ctx, pending);
        }

        BlockKind::Navigation => {
            let items = attributes
                .get(attr::NAV_ITEMS)
                .and_then(|v| v.as_list())
                .unwrap_or_default();
            let nav = Wrapper::open("nav", &style, ctx);
            for item in items {
                ctx.add_line(&element(
                    "a",
                    &[("href", "#"), ("style", "margin-right: 20px;")],
                    Some(escape_html(item).as_str()),
                ));
            }
            nav.close(ctx);
        }

        BlockKind::Form => {
            let form = Wrapper::open("form", &style, ctx);
            compile_form_fields(ctx);
            form.close(ctx);
        }

        BlockKind::Gallery => {
            let images = attributes
                .get(attr::IMAGES)
                .and_then(|v| v.as_list())
                .unwrap_or_default();
            let gallery = Wrapper::open("div", &style, ctx);
            for src in images {
                ctx.add_line(&element(
                    "img",
                    &[
                        ("src", src.as_str()),
                        ("style", "width: 30%; margin: 1.5%; height: 200px; object-fit: cover;"),
                    ],
                    None,
                ));
            }
            gallery.close(ctx);
        }

        // Trusted pass-through
        BlockKind::CustomHtml => {
            if !content.is_empty() {
                ctx.add_line(content);
            }
        }

        BlockKind::Map => compile_fallback(node, &style, ctx, pending),
    }
}

/// Generic `div` wrapper for kinds without a dedicated rendering
fn compile_fallback<'n>(node: &'n Node, style: &str, ctx: &mut Context, pending: &mut Vec<Work<'n>>) {
    let content = escape_html(node.content_or_empty());
    if node.children.is_empty() {
        ctx.add_line(&element("div", &[("style", style)], Some(content.as_str())));
        return;
    }
    let wrapper = Wrapper::open("div", style, ctx);
    if !content.is_empty() {
        ctx.add_line(&content);
    }
    pending.push(Work::Close(wrapper));
    push_children(pending, &node.children);
}

/// One floated cell per child, padded with empty cells up to the
/// configured column count (at most 12)
fn compile_columns<'n>(
    node: &'n Node,
    configured: usize,
    style: &str,
    ctx: &mut Context,
    pending: &mut Vec<Work<'n>>,
) {
    let cells = configured.max(node.children.len());
    let cell_style = format!("width: {}%; float: left; padding: 10px;", 100 / cells);

    pending.push(Work::Close(Wrapper::open("div", style, ctx)));
    for i in (0..cells).rev() {
        match node.children.get(i) {
            Some(child) => {
                pending.push(Work::Leave("</div>"));
                pending.push(Work::Node(child.as_ref()));
                pending.push(Work::Enter(open_tag("div", &[("style", cell_style.as_str())], &[])));
            }
            None => pending.push(Work::Line(element(
                "div",
                &[("style", cell_style.as_str())],
                Some(""),
            ))),
        }
    }
}

fn compile_form_fields(ctx: &mut Context) {
    let field_style = "width: 100%; padding: 8px; margin-top: 5px;";
    for (label, control) in [
        ("Name:", format!("<input type=\"text\" style=\"{}\" />", field_style)),
        ("Email:", format!("<input type=\"email\" style=\"{}\" />", field_style)),
        (
            "Message:",
            format!("<textarea style=\"{} height: 100px;\"></textarea>", field_style),
        ),
    ] {
        ctx.add_line("<div style=\"margin-bottom: 15px;\">");
        ctx.indent();
        ctx.add_line(&format!("<label>{}</label>", label));
        ctx.add_line(&control);
        ctx.dedent();
        ctx.add_line("</div>");
    }
    ctx.add_line("<button type=\"submit\">Send</button>");
}

/// Opening tag with escaped attribute values. Empty values are skipped.
fn open_tag(name: &str, attributes: &[(&str, &str)], flags: &[&str]) -> String {
    let mut tag = format!("<{}", name);
    for (key, value) in attributes {
        if value.is_empty() && *key != "alt" {
            continue;
        }
        tag.push_str(&format!(" {}=\"{}\"", key, escape_html(value)));
    }
    for flag in flags {
        tag.push(' ');
        tag.push_str(flag);
    }
    if is_self_closing(name) {
        tag.push_str(" />");
    } else {
        tag.push('>');
    }
    tag
}

/// Complete element on one line. `body` must already be escaped.
fn element(name: &str, attributes: &[(&str, &str)], body: Option<&str>) -> String {
    let open = open_tag(name, attributes, &[]);
    match body {
        Some(body) if !is_self_closing(name) => format!("{}{}</{}>", open, body, name),
        _ => open,
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img" | "input" | "br" | "hr" | "meta" | "link" | "source" | "embed" | "wbr"
    )
}
