use forkline::commit::Commit;
use forkline::graph_render::GraphTheme;
use forkline::graph_rows::{CopiedTarget, GraphView, GraphViewOptions, build_graph_rows};
use forkline::graph_svg::{EMPTY_PLACEHOLDER, render_text, render_view_svg};
use forkline::graph_tree::build_graph_layout;

fn merge_history() -> Vec<Commit> {
    vec![
        Commit::new("merge", &["left", "right"])
            .with_subject("Merge branch 'right'")
            .with_refs(&["HEAD -> main", "origin/main", "tag: v1.0"]),
        Commit::new("left", &["base"]).with_subject("left work"),
        Commit::new("right", &["base"])
            .with_subject("right work")
            .with_refs(&["right"]),
        Commit::new("base", &["root"]).with_subject("base"),
        Commit::new("root", &[]).with_subject("initial"),
    ]
}

#[test]
fn empty_history_renders_placeholder() {
    let mut view = GraphView::new(GraphViewOptions::default());
    view.set_commits(Vec::new());

    let svg = render_view_svg(&view);
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
    assert!(svg.contains(EMPTY_PLACEHOLDER));
    assert!(!svg.contains("class=\"dot\""));

    let text = render_text(&view.layout(), &view.rows());
    assert_eq!(text, format!("{EMPTY_PLACEHOLDER}\n"));
}

#[test]
fn svg_contains_graph_and_row_elements() {
    let mut view = GraphView::new(GraphViewOptions {
        theme: GraphTheme::Dark,
        ..GraphViewOptions::default()
    });
    view.set_commits(merge_history());
    view.set_copied(Some(CopiedTarget::Hash("left".to_string())));

    let svg = render_view_svg(&view);
    assert_eq!(svg.matches("class=\"dot\"").count(), 5);
    assert_eq!(svg.matches("class=\"edge\"").count(), 5);
    assert_eq!(svg.matches("class=\"head-ring\"").count(), 1);
    assert!(svg.contains(GraphTheme::Dark.background()));
    assert!(svg.contains("data-branch=\"main\""));
    assert!(svg.contains("data-branch=\"right\""));
    assert!(!svg.contains("data-branch=\"origin/main\""));
    assert!(svg.contains("Merge branch &apos;right&apos;"));
    assert!(svg.contains("class=\"hash copied\""));
    assert!(!svg.contains("v1.0"));
}

#[test]
fn svg_marks_dangling_edges() {
    let commits = vec![
        Commit::new("C4", &["C3"]),
        Commit::new("C3", &["C2", "M1"]),
        Commit::new("C2", &["C1"]),
        Commit::new("C1", &[]),
    ];
    let mut view = GraphView::new(GraphViewOptions::default());
    view.set_commits(commits);

    let svg = render_view_svg(&view);
    assert_eq!(svg.matches("class=\"edge dangling\"").count(), 1);
    assert!(svg.contains("data-parent=\"M1\""));
    assert!(svg.contains("L29.0 112.0\""), "dangling lane should end at the bottom edge");
}

#[test]
fn text_rendering_draws_lanes_and_labels() {
    let commits = merge_history();
    let layout = build_graph_layout(&commits);
    let rows = build_graph_rows(&layout, None);

    let text = render_text(&layout, &rows);
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(
        lines,
        vec![
            "*  merge (HEAD -> main \u{2713}) Merge branch 'right'",
            "*| left left work",
            "|* right (right) right work",
            "*  base base",
            "*  root initial",
        ]
    );
}
