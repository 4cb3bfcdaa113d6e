pub mod commit;
pub mod config;
pub mod git;
pub mod graph_labels;
pub mod graph_render;
pub mod graph_rows;
pub mod graph_svg;
pub mod graph_tree;
