//! Visual encoding of graph data: weight → radius, group → color,
//! link value → stroke width. Palette changes stay in this file.

const SUBJECT_COLOR: &str = "#3b82f6";
const PREDICATE_COLOR: &str = "#ef4444";
const OTHER_COLOR: &str = "#10b981";

const BASE_RADIUS: f64 = 15.0;
const WEIGHT_RADIUS: f64 = 10.0;

/// Circle radius for a node weight. Weights outside `[0, 1]` are clamped.
pub fn node_radius(weight: f64) -> f64 {
	let weight = if weight.is_finite() {
		weight.clamp(0.0, 1.0)
	} else {
		0.0
	};
	BASE_RADIUS + weight * WEIGHT_RADIUS
}

/// Fill color for a node group.
pub fn group_color(group: i64) -> &'static str {
	match group {
		1 => SUBJECT_COLOR,
		2 => PREDICATE_COLOR,
		_ => OTHER_COLOR,
	}
}

/// Stroke width for a link value. Missing-looking values (zero, negative,
/// NaN) draw as strength 1.
pub fn link_width(value: f64) -> f64 {
	let value = if value.is_finite() && value > 0.0 {
		value
	} else {
		1.0
	};
	value.sqrt() * 2.0
}
