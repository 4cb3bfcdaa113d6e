use std::fmt::Write as _;

use crate::graph_labels::BranchLabelKind;
use crate::graph_render::{
    GraphScene, HEAD_RING_WIDTH, LINE_WIDTH, PathCommand, ROW_HEIGHT, lanes_crossing_row,
};
use crate::graph_rows::{GraphRow, GraphView, HashCell, LabelChip};
use crate::graph_tree::GraphLayout;

pub const EMPTY_PLACEHOLDER: &str = "No commits to display";

const ROW_TEXT_WIDTH: f32 = 720.0;
const TEXT_PADDING: f32 = 12.0;
const HASH_COLUMN_WIDTH: f32 = 72.0;
const CHIP_CHAR_WIDTH: f32 = 6.5;
const CHIP_PADDING: f32 = 6.0;
const CHIP_GAP: f32 = 4.0;
const FONT_FAMILY: &str = "ui-monospace, SFMono-Regular, Menlo, monospace";

pub fn render_view_svg(view: &GraphView) -> String {
    let scene = view.scene();
    let rows = view.rows();
    render_svg(&scene, &rows, view.graph_width())
}

/// Graph column clipped to `graph_width`, followed by the row list.
pub fn render_svg(scene: &GraphScene, rows: &[GraphRow<'_>], graph_width: f32) -> String {
    let theme = scene.theme;
    let width = graph_width + ROW_TEXT_WIDTH;
    let height = scene.height.max(ROW_HEIGHT);

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.1}\" height=\"{height:.1}\" viewBox=\"0 0 {width:.1} {height:.1}\" font-family=\"{FONT_FAMILY}\" font-size=\"12\">"
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background()
    );

    if scene.is_empty() {
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" dominant-baseline=\"middle\">{}</text></svg>",
            TEXT_PADDING,
            ROW_HEIGHT / 2.0,
            theme.muted_foreground(),
            escape_xml(EMPTY_PLACEHOLDER)
        );
        return svg;
    }

    for band in &scene.bands {
        let _ = write!(
            svg,
            "<rect x=\"0\" y=\"{:.1}\" width=\"{width:.1}\" height=\"{:.1}\" fill=\"{}\"/>",
            band.y, band.height, band.fill
        );
    }

    let _ = write!(
        svg,
        "<defs><clipPath id=\"graph-clip\"><rect x=\"0\" y=\"0\" width=\"{graph_width:.1}\" height=\"{height:.1}\"/></clipPath></defs>"
    );
    svg.push_str("<g class=\"graph\" clip-path=\"url(#graph-clip)\">");
    for edge in &scene.edges {
        let class = if edge.is_dangling() {
            "edge dangling"
        } else {
            "edge"
        };
        let _ = write!(
            svg,
            "<path class=\"{class}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{LINE_WIDTH:.1}\" data-parent=\"{}\"/>",
            path_data(&edge.path),
            edge.color,
            escape_xml(&edge.parent_hash)
        );
    }
    for dot in &scene.dots {
        if dot.is_head {
            let _ = write!(
                svg,
                "<circle class=\"head-ring\" cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{HEAD_RING_WIDTH:.1}\"/>",
                dot.center.x,
                dot.center.y,
                dot.radius + HEAD_RING_WIDTH * 1.5,
                dot.fill
            );
        }
        let _ = write!(
            svg,
            "<circle class=\"dot\" cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{LINE_WIDTH:.1}\"/>",
            dot.center.x, dot.center.y, dot.radius, dot.fill, dot.stroke
        );
    }
    svg.push_str("</g>");

    let _ = write!(
        svg,
        "<line class=\"divider\" x1=\"{graph_width:.1}\" y1=\"0\" x2=\"{graph_width:.1}\" y2=\"{height:.1}\" stroke=\"{}\" stroke-width=\"1\"/>",
        theme.zebra_band()
    );

    for row in rows {
        render_row(&mut svg, scene, row, graph_width);
    }

    svg.push_str("</svg>");
    svg
}

fn render_row(svg: &mut String, scene: &GraphScene, row: &GraphRow<'_>, graph_width: f32) {
    let theme = scene.theme;
    let y = row.row as f32 * ROW_HEIGHT + ROW_HEIGHT / 2.0;
    let mut x = graph_width + TEXT_PADDING;

    let _ = write!(
        svg,
        "<g class=\"row{}\" data-hash=\"{}\">",
        if row.is_head { " head" } else { "" },
        escape_xml(&row.commit.hash)
    );

    let (hash_text, hash_class) = match &row.hash_cell {
        HashCell::Short(short) => (short.as_str(), "hash"),
        HashCell::Copied => ("copied", "hash copied"),
    };
    let _ = write!(
        svg,
        "<text class=\"{hash_class}\" x=\"{x:.1}\" y=\"{y:.1}\" fill=\"{}\" dominant-baseline=\"middle\">{}</text>",
        theme.muted_foreground(),
        escape_xml(hash_text)
    );
    x += HASH_COLUMN_WIDTH;

    for chip in &row.labels {
        x += render_chip(svg, scene, chip, x, y) + CHIP_GAP;
    }

    let _ = write!(
        svg,
        "<text class=\"subject\" x=\"{x:.1}\" y=\"{y:.1}\" fill=\"{}\" dominant-baseline=\"middle\"{}>{}</text>",
        theme.foreground(),
        if row.is_head { " font-weight=\"600\"" } else { "" },
        escape_xml(row.subject())
    );

    let date_x = graph_width + ROW_TEXT_WIDTH - TEXT_PADDING;
    let _ = write!(
        svg,
        "<text class=\"date\" x=\"{date_x:.1}\" y=\"{y:.1}\" fill=\"{}\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>",
        theme.muted_foreground(),
        escape_xml(row.relative_date())
    );
    svg.push_str("</g>");
}

/// Writes one chip and returns its width.
fn render_chip(svg: &mut String, scene: &GraphScene, chip: &LabelChip, x: f32, y: f32) -> f32 {
    let theme = scene.theme;
    let text = chip_text(chip);
    let width = text.chars().count() as f32 * CHIP_CHAR_WIDTH + CHIP_PADDING * 2.0;
    let height = ROW_HEIGHT - 10.0;
    let color = match chip.label.kind {
        BranchLabelKind::Head => theme.lane_color(0),
        BranchLabelKind::Local => theme.lane_color(1),
        BranchLabelKind::Remote => theme.muted_foreground(),
    };
    let fill_opacity = if chip.copied { 0.45 } else { 0.15 };

    let _ = write!(
        svg,
        "<g class=\"label\" data-branch=\"{}\"><rect x=\"{x:.1}\" y=\"{:.1}\" width=\"{width:.1}\" height=\"{height:.1}\" rx=\"4\" fill=\"{color}\" fill-opacity=\"{fill_opacity:.2}\" stroke=\"{color}\"/><text x=\"{:.1}\" y=\"{y:.1}\" fill=\"{}\" dominant-baseline=\"middle\">{}</text></g>",
        escape_xml(&chip.label.name),
        y - height / 2.0,
        x + CHIP_PADDING,
        theme.foreground(),
        escape_xml(&text)
    );
    width
}

fn chip_text(chip: &LabelChip) -> String {
    let mut text = chip.label.name.clone();
    if chip.label.is_in_sync_with_origin {
        text.push_str(" \u{2713}");
    }
    if chip.copied {
        text.push_str(" copied");
    }
    text
}

fn path_data(path: &[PathCommand]) -> String {
    let mut data = String::new();
    for command in path {
        if !data.is_empty() {
            data.push(' ');
        }
        let _ = match command {
            PathCommand::MoveTo(point) => write!(data, "M{:.1} {:.1}", point.x, point.y),
            PathCommand::LineTo(point) => write!(data, "L{:.1} {:.1}", point.x, point.y),
            PathCommand::CubicTo {
                control_a,
                control_b,
                to,
            } => write!(
                data,
                "C{:.1} {:.1} {:.1} {:.1} {:.1} {:.1}",
                control_a.x, control_a.y, control_b.x, control_b.y, to.x, to.y
            ),
        };
    }
    data
}

/// Plain-text rendering in the style of `git log --graph --oneline`.
pub fn render_text(layout: &GraphLayout<'_>, rows: &[GraphRow<'_>]) -> String {
    if layout.is_empty() {
        return format!("{EMPTY_PLACEHOLDER}\n");
    }

    let mut out = String::new();
    for (row_ix, node) in layout.nodes.iter().enumerate() {
        let crossing = lanes_crossing_row(layout, row_ix);
        let mut lanes = (0..layout.lane_count)
            .map(|column| {
                if column == node.column {
                    '*'
                } else if crossing.contains(&column) {
                    '|'
                } else {
                    ' '
                }
            })
            .collect::<String>();
        let trimmed = lanes.trim_end().len();
        lanes.truncate(trimmed);

        let _ = write!(out, "{lanes:<width$} ", width = layout.lane_count);
        if let Some(row) = rows.get(row_ix) {
            match &row.hash_cell {
                HashCell::Short(short) => out.push_str(short),
                HashCell::Copied => out.push_str("copied"),
            }
            if !row.labels.is_empty() {
                let labels = row
                    .labels
                    .iter()
                    .map(|chip| match chip.label.kind {
                        BranchLabelKind::Head => format!("HEAD -> {}", chip_text(chip)),
                        _ => chip_text(chip),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = write!(out, " ({labels})");
            }
            let _ = write!(out, " {}", row.subject());
        }
        out.push('\n');
    }
    out
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_render::Point;

    #[test]
    fn path_data_formats_each_command() {
        let path = [
            PathCommand::MoveTo(Point { x: 13.0, y: 14.0 }),
            PathCommand::CubicTo {
                control_a: Point { x: 13.0, y: 28.0 },
                control_b: Point { x: 29.0, y: 28.0 },
                to: Point { x: 29.0, y: 42.0 },
            },
            PathCommand::LineTo(Point { x: 29.0, y: 112.0 }),
        ];
        assert_eq!(
            path_data(&path),
            "M13.0 14.0 C13.0 28.0 29.0 28.0 29.0 42.0 L29.0 112.0"
        );
    }

    #[test]
    fn xml_special_characters_are_escaped() {
        assert_eq!(
            escape_xml("fix <div> & \"quotes\""),
            "fix &lt;div&gt; &amp; &quot;quotes&quot;"
        );
    }
}
