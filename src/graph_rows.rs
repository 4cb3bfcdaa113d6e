use tracing::debug;

use crate::commit::Commit;
use crate::graph_labels::{BranchLabel, derive_branch_labels};
use crate::graph_render::{
    GraphScene, GraphTheme, ROW_HEIGHT, RenderOptions, natural_graph_width, render_graph,
};
use crate::graph_tree::{GraphLayout, build_graph_layout};

/// Transient copy-to-clipboard highlight supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopiedTarget {
    Hash(String),
    Branch(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashCell {
    Short(String),
    Copied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelChip {
    pub label: BranchLabel,
    pub copied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRow<'a> {
    pub row: usize,
    pub commit: &'a Commit,
    pub hash_cell: HashCell,
    pub labels: Vec<LabelChip>,
    pub is_head: bool,
}

impl GraphRow<'_> {
    pub fn subject(&self) -> &str {
        &self.commit.subject
    }

    pub fn relative_date(&self) -> &str {
        &self.commit.relative_date
    }
}

pub fn build_graph_rows<'a>(
    layout: &GraphLayout<'a>,
    copied: Option<&CopiedTarget>,
) -> Vec<GraphRow<'a>> {
    layout
        .nodes
        .iter()
        .enumerate()
        .map(|(row, node)| {
            let commit = node.commit;
            let hash_cell = match copied {
                Some(CopiedTarget::Hash(hash)) if *hash == commit.hash => HashCell::Copied,
                _ => HashCell::Short(commit.short_hash.clone()),
            };
            let labels = derive_branch_labels(&commit.refs)
                .into_iter()
                .map(|label| LabelChip {
                    copied: matches!(copied, Some(CopiedTarget::Branch(name)) if *name == label.name),
                    label,
                })
                .collect();
            GraphRow {
                row,
                commit,
                hash_cell,
                labels,
                is_head: commit.is_head(),
            }
        })
        .collect()
}

pub fn head_row(layout: &GraphLayout<'_>) -> Option<usize> {
    layout.nodes.iter().position(|node| node.commit.is_head())
}

/// Smallest scroll change that puts `row` fully inside the viewport.
pub fn scroll_offset_for_row(row: usize, viewport_height: f32, current_offset: f32) -> f32 {
    let top = row as f32 * ROW_HEIGHT;
    let bottom = top + ROW_HEIGHT;
    if top < current_offset {
        top
    } else if bottom > current_offset + viewport_height {
        (bottom - viewport_height).max(0.0)
    } else {
        current_offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphClickTarget {
    Row(usize),
    Label { row: usize, label: usize },
}

pub trait GraphEvents {
    fn on_commit_click(&mut self, commit: &Commit);
    fn on_branch_label_click(&mut self, branch_name: &str);
}

#[derive(Debug, Default)]
pub struct ClickEvent {
    propagation_stopped: bool,
}

impl ClickEvent {
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Delivers a click to the label first and then bubbles it to the row.
/// Label handlers stop propagation, so a chip click never selects the commit.
pub fn dispatch_click(
    rows: &[GraphRow<'_>],
    target: GraphClickTarget,
    events: &mut impl GraphEvents,
) -> ClickEvent {
    let mut event = ClickEvent::default();
    let row_ix = match target {
        GraphClickTarget::Row(row) => row,
        GraphClickTarget::Label { row, label } => {
            if let Some(chip) = rows.get(row).and_then(|graph_row| graph_row.labels.get(label)) {
                event.stop_propagation();
                events.on_branch_label_click(&chip.label.name);
            }
            row
        }
    };

    if !event.propagation_stopped()
        && let Some(graph_row) = rows.get(row_ix)
    {
        events.on_commit_click(graph_row.commit);
    }
    event
}

/// Registration of the global pointer listeners held for one drag.
pub trait DragListeners {
    fn detach(&mut self);
}

impl<F: FnMut()> DragListeners for F {
    fn detach(&mut self) {
        self()
    }
}

struct DividerDrag {
    start_pointer_x: f32,
    start_width: f32,
    listeners: Box<dyn DragListeners>,
}

impl Drop for DividerDrag {
    fn drop(&mut self) {
        self.listeners.detach();
    }
}

pub struct GraphDivider {
    width: f32,
    min_width: f32,
    max_width: f32,
    user_sized: bool,
    drag: Option<DividerDrag>,
}

impl std::fmt::Debug for GraphDivider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphDivider")
            .field("width", &self.width)
            .field("min_width", &self.min_width)
            .field("max_width", &self.max_width)
            .field("user_sized", &self.user_sized)
            .field("dragging", &self.drag.is_some())
            .finish()
    }
}

impl GraphDivider {
    pub fn new(width: f32, min_width: f32, max_width: f32) -> Self {
        let mut divider = Self {
            width,
            min_width,
            max_width,
            user_sized: false,
            drag: None,
        };
        divider.width = divider.clamp(width);
        divider
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Set once a drag has been completed.
    pub fn is_user_sized(&self) -> bool {
        self.user_sized
    }

    /// The natural width wins when it is narrower than the minimum.
    fn clamp(&self, width: f32) -> f32 {
        let min = self.min_width.min(self.max_width);
        width.clamp(min, self.max_width)
    }

    pub fn set_bounds(&mut self, min_width: f32, max_width: f32) {
        self.min_width = min_width;
        self.max_width = max_width;
        self.width = self.clamp(self.width);
    }

    pub fn set_width(&mut self, width: f32) -> f32 {
        self.width = self.clamp(width);
        self.width
    }

    /// Starts a drag. A drag still in flight is dropped first, which
    /// detaches its listeners.
    pub fn begin_drag(&mut self, pointer_x: f32, listeners: impl DragListeners + 'static) {
        self.drag = None;
        self.drag = Some(DividerDrag {
            start_pointer_x: pointer_x,
            start_width: self.width,
            listeners: Box::new(listeners),
        });
    }

    pub fn drag_to(&mut self, pointer_x: f32) -> f32 {
        let Some(drag) = self.drag.as_ref() else {
            return self.width;
        };
        let proposed = drag.start_width + (pointer_x - drag.start_pointer_x);
        self.width = self.clamp(proposed);
        self.width
    }

    pub fn end_drag(&mut self) -> f32 {
        if self.drag.take().is_some() {
            self.user_sized = true;
        }
        self.width
    }

    pub fn cancel_drag(&mut self) -> f32 {
        if let Some(drag) = self.drag.take() {
            self.width = self.clamp(drag.start_width);
        }
        self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphViewOptions {
    pub theme: GraphTheme,
    pub zebra_rows: bool,
    pub min_graph_width: f32,
    pub preferred_graph_width: Option<f32>,
    pub fullscreen: bool,
    pub viewport_height: f32,
}

impl Default for GraphViewOptions {
    fn default() -> Self {
        Self {
            theme: GraphTheme::Light,
            zebra_rows: true,
            min_graph_width: 48.0,
            preferred_graph_width: None,
            fullscreen: false,
            viewport_height: 600.0,
        }
    }
}

/// Host-side state around the graph: commits, copy highlight, divider and
/// scroll position. Layout is recomputed from the commits on every call.
#[derive(Debug)]
pub struct GraphView {
    commits: Vec<Commit>,
    options: GraphViewOptions,
    copied: Option<CopiedTarget>,
    divider: GraphDivider,
    scroll_offset: f32,
}

impl GraphView {
    pub fn new(options: GraphViewOptions) -> Self {
        Self {
            commits: Vec::new(),
            divider: GraphDivider::new(0.0, options.min_graph_width, 0.0),
            options,
            copied: None,
            scroll_offset: 0.0,
        }
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn theme(&self) -> GraphTheme {
        self.options.theme
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn divider(&self) -> &GraphDivider {
        &self.divider
    }

    pub fn divider_mut(&mut self) -> &mut GraphDivider {
        &mut self.divider
    }

    pub fn graph_width(&self) -> f32 {
        self.divider.width()
    }

    pub fn set_copied(&mut self, copied: Option<CopiedTarget>) {
        self.copied = copied;
    }

    /// Replaces the commit list, re-fits the divider to the new natural
    /// width, and scrolls the checked-out commit into view.
    pub fn set_commits(&mut self, commits: Vec<Commit>) -> f32 {
        self.commits = commits;
        let layout = build_graph_layout(&self.commits);
        let natural = natural_graph_width(layout.lane_count);

        let previous = self.divider.width();
        self.divider.set_bounds(self.options.min_graph_width, natural);
        let wanted = if self.options.fullscreen {
            natural
        } else if self.divider.is_user_sized() {
            previous
        } else {
            self.options.preferred_graph_width.unwrap_or(natural)
        };
        self.divider.set_width(wanted);

        if let Some(row) = head_row(&layout) {
            self.scroll_offset =
                scroll_offset_for_row(row, self.options.viewport_height, self.scroll_offset);
        }
        debug!(
            commits = self.commits.len(),
            graph_width = self.divider.width(),
            scroll_offset = self.scroll_offset,
            "graph view refreshed"
        );
        self.scroll_offset
    }

    pub fn layout(&self) -> GraphLayout<'_> {
        build_graph_layout(&self.commits)
    }

    pub fn scene(&self) -> GraphScene {
        render_graph(
            &self.layout(),
            RenderOptions {
                theme: self.options.theme,
                zebra_rows: self.options.zebra_rows,
            },
        )
    }

    pub fn rows(&self) -> Vec<GraphRow<'_>> {
        build_graph_rows(&self.layout(), self.copied.as_ref())
    }

    pub fn click(&self, target: GraphClickTarget, events: &mut impl GraphEvents) -> ClickEvent {
        dispatch_click(&self.rows(), target, events)
    }

    /// Window lost focus mid-drag: keep the width reached so far.
    pub fn on_window_blur(&mut self) {
        if self.divider.is_dragging() {
            self.divider.end_drag();
        }
    }
}
