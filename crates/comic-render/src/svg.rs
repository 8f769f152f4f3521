//! Document → standalone SVG export.
//!
//! The exported page has the document's own size; there is no cropping to
//! content. Animatable properties are applied as a per-drawable group with
//! a center-anchored scale and an opacity.

use crate::paint::{COMIC_FONT, LINE_HEIGHT, svg_paint};
use comic_core::model::{Document, Drawable, DrawableKind};
use std::fmt::Write;

/// Approximate glyph advance as a fraction of the font size.
const AVG_CHAR_WIDTH: f64 = 0.55;

pub fn render_svg(document: &Document) -> String {
    let (width, height) = (document.width, document.height);
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    );
    let _ = writeln!(svg, "<style>\n  text {{ font-family: {COMIC_FONT}; }}\n</style>");
    let _ = writeln!(
        svg,
        "<rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" fill=\"#FFFFFF\" />"
    );

    if let Some(background) = &document.background {
        let _ = writeln!(
            svg,
            "<image href=\"{}\" x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" preserveAspectRatio=\"xMidYMid slice\" />",
            escape(&background.source)
        );
    }

    for drawable in &document.drawables {
        render_drawable(&mut svg, drawable);
    }

    svg.push_str("</svg>");
    svg
}

fn render_drawable(out: &mut String, d: &Drawable) {
    let b = d.bounds;
    let props = d.props;
    if props.opacity <= 0.0 {
        return;
    }

    let scaled = (props.scale_x - 1.0).abs() > f64::EPSILON
        || (props.scale_y - 1.0).abs() > f64::EPSILON;
    let wrapped = scaled || props.opacity < 1.0;
    if wrapped {
        let c = b.center();
        let _ = writeln!(
            out,
            "<g transform=\"translate({}, {}) scale({}, {}) translate({}, {})\" opacity=\"{}\">",
            c.x, c.y, props.scale_x, props.scale_y, -c.x, -c.y, props.opacity
        );
    }

    let style = &d.style;
    let fill = svg_paint(style.fill.as_ref());
    let stroke = svg_paint(style.stroke.as_ref());
    let stroke_width = style.stroke_width;

    match &d.kind {
        DrawableKind::PanelFrame => {
            if let Some((dx, dy)) = style.shadow {
                let _ = writeln!(
                    out,
                    "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"rgba(0, 0, 0, 0.3)\" />",
                    b.x0 + dx,
                    b.y0 + dy,
                    b.width(),
                    b.height()
                );
            }
            let r = style.corner_radius;
            let _ = writeln!(
                out,
                "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{r}\" ry=\"{r}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\" />",
                b.x0,
                b.y0,
                b.width(),
                b.height()
            );
        }
        DrawableKind::SpeechBubble { path } => {
            let _ = writeln!(
                out,
                "  <path transform=\"translate({}, {})\" d=\"{}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\" />",
                b.x0,
                b.y0,
                escape(path)
            );
        }
        DrawableKind::TextBox { content, font_size } => {
            let x = b.x0 + b.width() / 2.0;
            let mut y = b.y0 + font_size;
            for line in wrap_text(content, b.width(), *font_size) {
                let _ = writeln!(
                    out,
                    "  <text x=\"{x}\" y=\"{y}\" font-size=\"{font_size}\" fill=\"{fill}\" text-anchor=\"middle\">{}</text>",
                    escape(&line)
                );
                y += font_size * LINE_HEIGHT;
            }
        }
        DrawableKind::Image { source } => {
            let _ = writeln!(
                out,
                "  <image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid meet\" />",
                escape(source),
                b.x0,
                b.y0,
                b.width(),
                b.height()
            );
        }
    }

    if wrapped {
        out.push_str("</g>\n");
    }
}

/// Greedy word wrap against an estimated glyph width. Words longer than a
/// line are kept whole.
pub fn wrap_text(content: &str, width: f64, font_size: f64) -> Vec<String> {
    let max_chars = ((width / (font_size * AVG_CHAR_WIDTH)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in content.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{panel_style, text_style};
    use comic_core::model::{Background, VisualProps};
    use kurbo::Rect;

    fn doc_with(drawables: Vec<Drawable>) -> Document {
        let mut doc = Document::new(800.0, 600.0);
        doc.drawables = drawables;
        doc
    }

    #[test]
    fn empty_page_has_document_size() {
        let svg = render_svg(&Document::new(800.0, 600.0));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"800\" height=\"600\""));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn panel_exports_rect_and_shadow() {
        let panel = Drawable::new(
            DrawableKind::PanelFrame,
            Rect::from_origin_size((10.0, 10.0), (380.0, 280.0)),
        )
        .with_style(panel_style());
        let svg = render_svg(&doc_with(vec![panel]));
        assert!(svg.contains("x=\"15\" y=\"15\" width=\"380\" height=\"280\" fill=\"rgba(0, 0, 0, 0.3)\""));
        assert!(svg.contains("fill=\"#FFFFFF\" stroke=\"#000000\" stroke-width=\"2\""));
        assert!(!svg.contains("<g "));
    }

    #[test]
    fn hidden_drawables_are_skipped() {
        let panel = Drawable::new(
            DrawableKind::PanelFrame,
            Rect::from_origin_size((10.0, 10.0), (100.0, 100.0)),
        )
        .with_props(VisualProps::HIDDEN);
        let svg = render_svg(&doc_with(vec![panel]));
        assert!(!svg.contains("stroke-width"));
    }

    #[test]
    fn partial_props_wrap_in_group() {
        let panel = Drawable::new(
            DrawableKind::PanelFrame,
            Rect::from_origin_size((0.0, 0.0), (100.0, 100.0)),
        )
        .with_props(VisualProps {
            opacity: 0.5,
            scale_x: 0.95,
            scale_y: 0.95,
        });
        let svg = render_svg(&doc_with(vec![panel]));
        assert!(svg.contains("scale(0.95, 0.95)"));
        assert!(svg.contains("opacity=\"0.5\""));
    }

    #[test]
    fn text_is_escaped_and_wrapped() {
        let text = Drawable::new(
            DrawableKind::TextBox {
                content: "Tom & Jerry <3 chase each other around the house".into(),
                font_size: 16.0,
            },
            Rect::from_origin_size((0.0, 0.0), (100.0, 60.0)),
        )
        .with_style(text_style());
        let svg = render_svg(&doc_with(vec![text]));
        assert!(svg.contains("Tom &amp; Jerry"));
        assert!(svg.contains("&lt;3"));
        assert!(svg.matches("<text ").count() > 1);
    }

    #[test]
    fn background_is_drawn_first() {
        let mut doc = Document::new(800.0, 600.0);
        doc.background = Some(Background {
            source: "bg.png".into(),
        });
        let svg = render_svg(&doc);
        assert!(svg.contains("<image href=\"bg.png\""));
    }

    #[test]
    fn wrap_keeps_long_words_whole() {
        // 100 / (16 * 0.55) → 11 chars per line
        assert_eq!(
            wrap_text("supercalifragilistic is long", 100.0, 16.0),
            vec!["supercalifragilistic", "is long"]
        );
        assert!(wrap_text("   ", 100.0, 16.0).is_empty());
    }
}
