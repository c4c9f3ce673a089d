//! Generated web documents (meta tags, robots.txt, sitemaps, QR links) and
//! Markdown/HTML conversion.

use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{
    char_prefix, encode_uri_component, fmt_number, iso_date, number, static_regex,
};

const MAX_TITLE_CHARS: usize = 60;
const MAX_DESCRIPTION_CHARS: usize = 160;

static_regex!(MD_H3, r"(?m)^### (.+)$");
static_regex!(MD_H2, r"(?m)^## (.+)$");
static_regex!(MD_H1, r"(?m)^# (.+)$");
static_regex!(MD_STRONG, r"\*\*(.+?)\*\*");
static_regex!(MD_EM, r"\*(.+?)\*");
static_regex!(MD_CODE, r"`(.+?)`");
static_regex!(MD_LINK, r"\[(.+?)\]\((.+?)\)");
static_regex!(MD_ITEM, r"(?m)^- (.+)$");
static_regex!(MD_LIST, r"(<li>.*</li>\n?)+");

static_regex!(HTML_SCRIPT, r"(?is)<script.*?</script>");
static_regex!(HTML_STYLE, r"(?is)<style.*?</style>");
static_regex!(HTML_BREAK, r"(?i)<br\s*/?>");
static_regex!(HTML_BLOCK_END, r"(?i)</p>|</h[1-6]>");
static_regex!(HTML_TAG, r"<[^>]+>");
static_regex!(BLANK_LINES, r"\n{3,}");

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "generate_seo_meta",
            CATEGORY,
            "Generate SEO meta tags for a webpage",
            json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "description": { "type": "string" },
                    "keywords": { "type": "array", "items": { "type": "string" } },
                    "url": { "type": "string" },
                    "image_url": { "type": "string" },
                    "author": { "type": "string" }
                },
                "required": ["title", "description"]
            }),
            generate_seo_meta,
        ),
        ToolDefinition::new(
            "generate_robots_txt",
            CATEGORY,
            "Generate robots.txt content",
            json!({
                "type": "object",
                "properties": {
                    "sitemap_url": { "type": "string" },
                    "disallowed_paths": { "type": "array", "items": { "type": "string" } },
                    "crawl_delay": { "type": "number" },
                    "allow_all": { "type": "boolean", "default": true }
                }
            }),
            generate_robots_txt,
        ),
        ToolDefinition::new(
            "generate_qr_data",
            CATEGORY,
            "Generate QR code URL using public API",
            json!({
                "type": "object",
                "properties": {
                    "data": { "type": "string" },
                    "size": { "type": "number", "default": 200 },
                    "error_correction": { "type": "string", "enum": ["L", "M", "Q", "H"], "default": "M" }
                },
                "required": ["data"]
            }),
            generate_qr_data,
        ),
        ToolDefinition::new(
            "markdown_to_html",
            CATEGORY,
            "Convert Markdown text to HTML",
            json!({
                "type": "object",
                "properties": { "markdown": { "type": "string" } },
                "required": ["markdown"]
            }),
            markdown_to_html,
        ),
        ToolDefinition::new(
            "html_to_text",
            CATEGORY,
            "Strip HTML tags and convert to plain text",
            json!({
                "type": "object",
                "properties": { "html": { "type": "string" } },
                "required": ["html"]
            }),
            html_to_text,
        ),
        ToolDefinition::new(
            "generate_sitemap",
            CATEGORY,
            "Generate XML sitemap for a website",
            json!({
                "type": "object",
                "properties": {
                    "base_url": { "type": "string" },
                    "pages": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of page paths e.g. /about, /contact"
                    },
                    "change_freq": {
                        "type": "string",
                        "enum": ["always", "hourly", "daily", "weekly", "monthly", "yearly", "never"],
                        "default": "weekly"
                    },
                    "priority": { "type": "number", "default": 0.8 }
                },
                "required": ["base_url", "pages"]
            }),
            generate_sitemap,
        ),
    ]
}

fn default_true() -> bool {
    true
}

/// Render `line` only when `value` is present and non-empty.
fn optional_line(value: &Option<String>, line: impl Fn(&str) -> String) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => line(v),
        _ => String::new(),
    }
}

// ============================================================================
// generate_seo_meta
// ============================================================================

#[derive(Debug, Deserialize)]
struct SeoParams {
    title: String,
    description: String,
    #[serde(default)]
    keywords: Vec<String>,
    url: Option<String>,
    image_url: Option<String>,
    author: Option<String>,
}

fn generate_seo_meta(params: SeoParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let title = char_prefix(&params.title, MAX_TITLE_CHARS as f64);
    let description = char_prefix(&params.description, MAX_DESCRIPTION_CHARS as f64);

    let keywords_line = if params.keywords.is_empty() {
        String::new()
    } else {
        format!(r#"<meta name="keywords" content="{}">"#, params.keywords.join(", "))
    };
    let author_line = optional_line(&params.author, |a| format!(r#"<meta name="author" content="{a}">"#));
    let og_url = optional_line(&params.url, |u| format!(r#"<meta property="og:url" content="{u}">"#));
    let og_image = optional_line(&params.image_url, |i| format!(r#"<meta property="og:image" content="{i}">"#));
    let twitter_url = optional_line(&params.url, |u| format!(r#"<meta property="twitter:url" content="{u}">"#));
    let twitter_image =
        optional_line(&params.image_url, |i| format!(r#"<meta property="twitter:image" content="{i}">"#));

    let html = format!(
        r#"<!-- Primary Meta Tags -->
<title>{title}</title>
<meta name="title" content="{title}">
<meta name="description" content="{description}">
{keywords_line}
{author_line}

<!-- Open Graph / Facebook -->
<meta property="og:type" content="website">
{og_url}
<meta property="og:title" content="{title}">
<meta property="og:description" content="{description}">
{og_image}

<!-- Twitter -->
<meta property="twitter:card" content="summary_large_image">
{twitter_url}
<meta property="twitter:title" content="{title}">
<meta property="twitter:description" content="{description}">
{twitter_image}"#
    );

    let title_length = params.title.chars().count();
    let description_length = params.description.chars().count();
    let mut warnings = Vec::new();
    if title_length > MAX_TITLE_CHARS {
        warnings.push("Title too long (max 60 chars)");
    }
    if description_length > MAX_DESCRIPTION_CHARS {
        warnings.push("Description too long (max 160 chars)");
    }
    if params.keywords.is_empty() {
        warnings.push("No keywords provided");
    }

    Ok(json!({
        "html": html,
        "title_length": title_length,
        "title_ok": title_length <= MAX_TITLE_CHARS,
        "description_length": description_length,
        "description_ok": description_length <= MAX_DESCRIPTION_CHARS,
        "warnings": warnings,
    }))
}

// ============================================================================
// generate_robots_txt
// ============================================================================

#[derive(Debug, Deserialize)]
struct RobotsParams {
    sitemap_url: Option<String>,
    #[serde(default)]
    disallowed_paths: Vec<String>,
    crawl_delay: Option<f64>,
    #[serde(default = "default_true")]
    allow_all: bool,
}

fn generate_robots_txt(params: RobotsParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let mut content = String::from("User-agent: *\n");
    if params.allow_all {
        content.push_str("Allow: /\n");
    }
    for path in &params.disallowed_paths {
        content.push_str(&format!("Disallow: {path}\n"));
    }
    if let Some(delay) = params.crawl_delay.filter(|d| *d != 0.0 && !d.is_nan()) {
        content.push_str(&format!("Crawl-delay: {}\n", fmt_number(delay)));
    }
    content.push_str(&optional_line(&params.sitemap_url, |s| format!("\nSitemap: {s}\n")));

    Ok(json!({ "robots_txt": content }))
}

// ============================================================================
// generate_qr_data
// ============================================================================

#[derive(Debug, Deserialize)]
struct QrParams {
    data: String,
    #[serde(default = "default_qr_size")]
    size: f64,
    #[serde(default = "default_error_correction")]
    error_correction: String,
}

fn default_qr_size() -> f64 {
    200.0
}

fn default_error_correction() -> String {
    "M".to_string()
}

/// Builds the image URL only; nothing is fetched.
fn generate_qr_data(params: QrParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let size = fmt_number(params.size);
    let qr_url = format!(
        "https://api.qrserver.com/v1/create-qr-code/?data={}&size={size}x{size}&ecc={}",
        encode_uri_component(&params.data),
        params.error_correction
    );
    let embed_html = format!(r#"<img src="{qr_url}" alt="QR Code" width="{size}" height="{size}">"#);

    Ok(json!({
        "qr_image_url": qr_url,
        "data": params.data,
        "size": number(params.size),
        "error_correction": params.error_correction,
        "embed_html": embed_html,
    }))
}

// ============================================================================
// markdown_to_html
// ============================================================================

#[derive(Debug, Deserialize)]
struct MarkdownParams {
    markdown: String,
}

fn markdown_to_html(params: MarkdownParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let html = render_markdown(&params.markdown);
    let char_count = html.chars().count();
    Ok(json!({ "html": html, "char_count": char_count }))
}

/// Line-oriented Markdown subset: headings, emphasis, code spans, links,
/// flat bullet lists and paragraphs.
fn render_markdown(markdown: &str) -> String {
    let html = MD_H3.replace_all(markdown, "<h3>$1</h3>");
    let html = MD_H2.replace_all(&html, "<h2>$1</h2>");
    let html = MD_H1.replace_all(&html, "<h1>$1</h1>");
    let html = MD_STRONG.replace_all(&html, "<strong>$1</strong>");
    let html = MD_EM.replace_all(&html, "<em>$1</em>");
    let html = MD_CODE.replace_all(&html, "<code>$1</code>");
    let html = MD_LINK.replace_all(&html, r#"<a href="$2">$1</a>"#);
    let html = MD_ITEM.replace_all(&html, "<li>$1</li>");
    let html = MD_LIST.replace_all(&html, "<ul>$0</ul>");
    let html = html.replace("\n\n", "</p><p>");

    // Any remaining line that does not open with a lowercase tag is a paragraph.
    html.split('\n')
        .map(|line| {
            let mut chars = line.chars();
            let opens_tag = chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_lowercase());
            if line.is_empty() || opens_tag {
                line.to_string()
            } else {
                format!("<p>{line}</p>")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// html_to_text
// ============================================================================

#[derive(Debug, Deserialize)]
struct HtmlParams {
    html: String,
}

fn html_to_text(params: HtmlParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let text = HTML_SCRIPT.replace_all(&params.html, "");
    let text = HTML_STYLE.replace_all(&text, "");
    let text = HTML_BREAK.replace_all(&text, "\n");
    let text = HTML_BLOCK_END.replace_all(&text, "\n\n");
    let text = HTML_TAG.replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"");
    let text = BLANK_LINES.replace_all(&text, "\n\n").trim().to_string();

    Ok(json!({
        "original_length": params.html.chars().count(),
        "text_length": text.chars().count(),
        "text": text,
    }))
}

// ============================================================================
// generate_sitemap
// ============================================================================

#[derive(Debug, Deserialize)]
struct SitemapParams {
    base_url: String,
    pages: Vec<String>,
    #[serde(default = "default_change_freq")]
    change_freq: String,
    #[serde(default = "default_priority")]
    priority: f64,
}

fn default_change_freq() -> String {
    "weekly".to_string()
}

fn default_priority() -> f64 {
    0.8
}

fn generate_sitemap(params: SitemapParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let today = iso_date(&ctx.now());
    let priority = fmt_number(params.priority);
    let urls: Vec<String> = params
        .pages
        .iter()
        .map(|page| {
            format!(
                "  <url>\n    <loc>{}{page}</loc>\n    <lastmod>{today}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{priority}</priority>\n  </url>",
                params.base_url, params.change_freq
            )
        })
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}\n</urlset>",
        urls.join("\n")
    );

    Ok(json!({ "xml": xml, "page_count": params.pages.len() }))
}

// ============================================================================
// Tests
// ============================================================================
