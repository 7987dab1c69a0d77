use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale;
use super::state::ForceGraphState;

const LINK_COLOR: &str = "rgba(100, 116, 139, 0.6)";
const NODE_STROKE: &str = "#ffffff";
const WORD_COLOR: &str = "#ffffff";
const ROLE_COLOR: &str = "#9ca3af";
const LABEL_X: f64 = 12.0;

#[derive(Clone, Debug, PartialEq)]
pub struct LineShape {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub color: &'static str,
	pub word: String,
	pub role: String,
}

/// Everything one frame draws, in draw order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub lines: Vec<LineShape>,
	pub nodes: Vec<NodeShape>,
}

pub fn scene(state: &ForceGraphState) -> Scene {
	let mut positions = HashMap::new();
	let mut nodes = Vec::new();
	state.graph.visit_nodes(|node| {
		let (x, y) = (node.x() as f64, node.y() as f64);
		let info = &node.data.user_data;
		positions.insert(node.index(), (x, y));
		nodes.push(NodeShape {
			x,
			y,
			radius: info.radius,
			color: scale::group_color(info.group),
			word: info.word.clone(),
			role: info.role.clone(),
		});
	});

	let lines = state
		.links()
		.iter()
		.filter_map(|link| {
			let (x1, y1) = *positions.get(&link.source)?;
			let (x2, y2) = *positions.get(&link.target)?;
			Some(LineShape {
				x1,
				y1,
				x2,
				y2,
				width: scale::link_width(link.value),
			})
		})
		.collect();

	Scene { lines, nodes }
}

pub fn paint(scene: &Scene, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.clear_rect(0.0, 0.0, width, height);

	ctx.set_stroke_style_str(LINK_COLOR);
	for line in &scene.lines {
		ctx.set_line_width(line.width);
		ctx.begin_path();
		ctx.move_to(line.x1, line.y1);
		ctx.line_to(line.x2, line.y2);
		ctx.stroke();
	}

	for node in &scene.nodes {
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.color);
		ctx.fill();
		ctx.set_stroke_style_str(NODE_STROKE);
		ctx.set_line_width(1.5);
		ctx.stroke();

		ctx.set_fill_style_str(WORD_COLOR);
		ctx.set_font("10px monospace");
		let _ = ctx.fill_text(&node.word, node.x + LABEL_X, node.y + 3.0);
		ctx.set_fill_style_str(ROLE_COLOR);
		ctx.set_font("8px sans-serif");
		let _ = ctx.fill_text(&node.role, node.x + LABEL_X, node.y + 14.0);
	}
}
