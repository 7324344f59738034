use crate::color::Color;
use crate::rich_line::{RichLine, TextFormat};
use regex::Regex;
use std::sync::LazyLock;

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div class="line">(.*?)</div>"#).expect("valid line pattern")
});

static SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<span style="([^"]*)">(.*?)</span>"#).expect("valid span pattern")
});

/// Page styling written into the head of a saved log.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlStyle {
    pub font_family: String,
    pub font_size: u16,
    pub foreground: Color,
    pub background: Color,
}

impl Default for HtmlStyle {
    fn default() -> Self {
        Self {
            font_family: "monospace".to_string(),
            font_size: 10,
            foreground: Color::BLACK,
            background: Color::WHITE,
        }
    }
}

/// Serializes lines into a complete HTML page.
pub fn serialize_document(lines: &[RichLine], style: &HtmlStyle) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"generator\" content=\"lognote\">\n<style>\n");
    html.push_str(&format!(
        "body {{ font-family: {}; font-size: {}pt; color: {}; background-color: {}; }}\n",
        escape(&style.font_family),
        style.font_size,
        style.foreground,
        style.background
    ));
    html.push_str(".line { white-space: pre; min-height: 1em; }\n</style>\n</head>\n<body>\n");
    html.push_str(&serialize_body(lines));
    html.push_str("</body>\n</html>\n");
    html
}

/// Serializes lines as one `<div class="line">` element per line.
pub fn serialize_body(lines: &[RichLine]) -> String {
    let mut body = String::new();
    for line in lines {
        body.push_str("<div class=\"line\">");
        for (piece, format) in line.segments() {
            if format.is_empty() {
                body.push_str(&escape(piece));
            } else {
                body.push_str(&format!(
                    "<span style=\"{}\">{}</span>",
                    style_attribute(format),
                    escape(piece)
                ));
            }
        }
        body.push_str("</div>\n");
    }
    body
}

/// Parses HTML written by [`serialize_document`] or [`serialize_body`].
///
/// Markup other than line divs and styled spans is dropped, its text kept.
pub fn deserialize(html: &str) -> Vec<RichLine> {
    LINE_RE
        .captures_iter(html)
        .map(|caps| parse_line(caps.get(1).map_or("", |m| m.as_str())))
        .collect()
}

fn parse_line(inner: &str) -> RichLine {
    let mut segments: Vec<(String, TextFormat)> = Vec::new();
    let mut cursor = 0;
    for caps in SPAN_RE.captures_iter(inner) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > cursor {
            segments.push((
                unescape(&strip_tags(&inner[cursor..whole.start()])),
                TextFormat::default(),
            ));
        }
        let format = parse_style(caps.get(1).map_or("", |m| m.as_str()));
        let text = unescape(&strip_tags(caps.get(2).map_or("", |m| m.as_str())));
        segments.push((text, format));
        cursor = whole.end();
    }
    if cursor < inner.len() {
        segments.push((
            unescape(&strip_tags(&inner[cursor..])),
            TextFormat::default(),
        ));
    }
    RichLine::from_segments(segments.iter().map(|(text, format)| (text.as_str(), *format)))
}

fn style_attribute(format: TextFormat) -> String {
    let mut declarations = Vec::new();
    if let Some(fg) = format.foreground {
        declarations.push(format!("color:{fg}"));
    }
    if let Some(bg) = format.background {
        declarations.push(format!("background-color:{bg}"));
    }
    declarations.join(";")
}

fn parse_style(style: &str) -> TextFormat {
    let mut format = TextFormat::default();
    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let color = Color::parse(value);
        match property.trim() {
            "color" => format.foreground = color,
            "background-color" => format.background = color,
            _ => {}
        }
    }
    format
}

fn strip_tags(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let entity = rest.find(';').map(|end| (&rest[..=end], end));
        let decoded = entity.and_then(|(name, end)| {
            let c = match name {
                "&amp;" => '&',
                "&lt;" => '<',
                "&gt;" => '>',
                "&quot;" => '"',
                "&#39;" | "&apos;" => '\'',
                "&nbsp;" => ' ',
                _ => return None,
            };
            Some((c, end))
        });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
