use tracing::trace;

use crate::config::ThemePreference;
use crate::graph_tree::GraphLayout;

pub const ROW_HEIGHT: f32 = 28.0;
pub const DOT_DIAMETER: f32 = 10.0;
pub const DOT_RADIUS: f32 = DOT_DIAMETER / 2.0;
pub const LINE_WIDTH: f32 = 2.0;
pub const COLUMN_PITCH: f32 = 16.0;
pub const GRAPH_MARGIN: f32 = 8.0;
pub const HEAD_RING_WIDTH: f32 = 2.0;

const LIGHT_PALETTE: [&str; 8] = [
    "#0969da", "#1a7f37", "#bf3989", "#9a6700", "#8250df", "#cf222e", "#1b7c83", "#bc4c00",
];
const DARK_PALETTE: [&str; 8] = [
    "#58a6ff", "#3fb950", "#f778ba", "#d29922", "#bc8cff", "#ff7b72", "#39c5cf", "#ffa657",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GraphTheme {
    #[default]
    Light,
    Dark,
}

impl GraphTheme {
    pub fn from_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Dark => Self::Dark,
            ThemePreference::Light | ThemePreference::System => Self::Light,
        }
    }

    pub fn palette(self) -> &'static [&'static str] {
        match self {
            Self::Light => &LIGHT_PALETTE,
            Self::Dark => &DARK_PALETTE,
        }
    }

    pub fn lane_color(self, column: usize) -> &'static str {
        let palette = self.palette();
        palette[column % palette.len()]
    }

    pub fn background(self) -> &'static str {
        match self {
            Self::Light => "#ffffff",
            Self::Dark => "#0d1117",
        }
    }

    pub fn zebra_band(self) -> &'static str {
        match self {
            Self::Light => "#f6f8fa",
            Self::Dark => "#161b22",
        }
    }

    pub fn foreground(self) -> &'static str {
        match self {
            Self::Light => "#1f2328",
            Self::Dark => "#e6edf3",
        }
    }

    pub fn muted_foreground(self) -> &'static str {
        match self {
            Self::Light => "#656d76",
            Self::Dark => "#8d96a0",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

pub fn column_x(column: usize) -> f32 {
    column as f32 * COLUMN_PITCH + DOT_RADIUS + GRAPH_MARGIN
}

pub fn row_y(row: usize) -> f32 {
    row as f32 * ROW_HEIGHT + ROW_HEIGHT / 2.0
}

pub fn node_position(row: usize, column: usize) -> Point {
    Point {
        x: column_x(column),
        y: row_y(row),
    }
}

/// Width needed to show every lane of a layout without clipping.
pub fn natural_graph_width(lane_count: usize) -> f32 {
    if lane_count == 0 {
        return 0.0;
    }
    column_x(lane_count - 1) + DOT_RADIUS + GRAPH_MARGIN
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        control_a: Point,
        control_b: Point,
        to: Point,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeShape {
    Straight,
    Curved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeTarget {
    Row(usize),
    /// Parent is outside the loaded window; the lane runs off the bottom.
    BottomEdge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub child_row: usize,
    pub child_column: usize,
    pub parent_hash: String,
    pub parent_column: usize,
    pub target: EdgeTarget,
    pub shape: EdgeShape,
    pub color: &'static str,
    pub path: Vec<PathCommand>,
}

impl GraphEdge {
    pub fn is_dangling(&self) -> bool {
        self.target == EdgeTarget::BottomEdge
    }

    pub fn end(&self) -> Option<Point> {
        self.path.last().map(|command| match *command {
            PathCommand::MoveTo(point) | PathCommand::LineTo(point) => point,
            PathCommand::CubicTo { to, .. } => to,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphDot {
    pub row: usize,
    pub column: usize,
    pub center: Point,
    pub radius: f32,
    pub fill: &'static str,
    pub stroke: &'static str,
    pub is_head: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowBand {
    pub row: usize,
    pub y: f32,
    pub height: f32,
    pub fill: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub theme: GraphTheme,
    pub zebra_rows: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: GraphTheme::Light,
            zebra_rows: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphScene {
    pub theme: GraphTheme,
    pub width: f32,
    pub height: f32,
    pub bands: Vec<RowBand>,
    pub edges: Vec<GraphEdge>,
    pub dots: Vec<GraphDot>,
}

impl GraphScene {
    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }
}

/// Edge color: the parent's lane, except a curve fanning out to the right
/// keeps the color of the lane it leaves.
pub fn edge_color(theme: GraphTheme, child_column: usize, parent_column: usize) -> &'static str {
    if parent_column > child_column {
        theme.lane_color(child_column)
    } else {
        theme.lane_color(parent_column)
    }
}

/// Straight drop in one column, or: half a row down, curve over to the
/// parent column, then straight down to `end_y`.
pub fn edge_path(from: Point, to_column: usize, end_y: f32) -> Vec<PathCommand> {
    let to_x = column_x(to_column);
    if (to_x - from.x).abs() < f32::EPSILON {
        return vec![
            PathCommand::MoveTo(from),
            PathCommand::LineTo(Point { x: to_x, y: end_y }),
        ];
    }

    let bend_y = from.y + ROW_HEIGHT / 2.0;
    let curve_end_y = (from.y + ROW_HEIGHT).min(end_y);
    let mut path = vec![
        PathCommand::MoveTo(from),
        PathCommand::CubicTo {
            control_a: Point {
                x: from.x,
                y: bend_y,
            },
            control_b: Point { x: to_x, y: bend_y },
            to: Point {
                x: to_x,
                y: curve_end_y,
            },
        },
    ];
    if end_y > curve_end_y {
        path.push(PathCommand::LineTo(Point { x: to_x, y: end_y }));
    }
    path
}

pub fn render_graph(layout: &GraphLayout<'_>, options: RenderOptions) -> GraphScene {
    let theme = options.theme;
    let rows = layout.len();
    let bottom = rows as f32 * ROW_HEIGHT;

    let bands = if options.zebra_rows {
        (0..rows)
            .filter(|row| row % 2 == 1)
            .map(|row| RowBand {
                row,
                y: row as f32 * ROW_HEIGHT,
                height: ROW_HEIGHT,
                fill: theme.zebra_band(),
            })
            .collect()
    } else {
        Vec::new()
    };

    let mut edges = Vec::new();
    let mut dots = Vec::with_capacity(rows);
    for (row, node) in layout.nodes.iter().enumerate() {
        let from = node_position(row, node.column);
        for lane in &node.child_columns {
            let target = match layout.row_of(&lane.hash) {
                Some(parent_row) if parent_row > row => EdgeTarget::Row(parent_row),
                _ => EdgeTarget::BottomEdge,
            };
            let end_y = match target {
                EdgeTarget::Row(parent_row) => row_y(parent_row),
                EdgeTarget::BottomEdge => bottom,
            };
            let shape = if lane.column == node.column {
                EdgeShape::Straight
            } else {
                EdgeShape::Curved
            };
            edges.push(GraphEdge {
                child_row: row,
                child_column: node.column,
                parent_hash: lane.hash.clone(),
                parent_column: lane.column,
                target,
                shape,
                color: edge_color(theme, node.column, lane.column),
                path: edge_path(from, lane.column, end_y),
            });
        }

        dots.push(GraphDot {
            row,
            column: node.column,
            center: from,
            radius: DOT_RADIUS,
            fill: theme.lane_color(node.column),
            stroke: theme.background(),
            is_head: node.commit.is_head(),
        });
    }

    trace!(edges = edges.len(), dots = dots.len(), "rendered graph scene");

    GraphScene {
        theme,
        width: natural_graph_width(layout.lane_count),
        height: bottom,
        bands,
        edges,
        dots,
    }
}

/// Columns a lane passes through on `row` without a dot of its own there.
pub fn lanes_crossing_row(layout: &GraphLayout<'_>, row: usize) -> Vec<usize> {
    if row == 0 {
        return Vec::new();
    }
    let Some(node) = layout.nodes.get(row) else {
        return Vec::new();
    };
    layout.nodes[row - 1]
        .pending_lanes
        .iter()
        .copied()
        .filter(|column| *column != node.column)
        .collect()
}
