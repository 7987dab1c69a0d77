use serde::{Deserialize, Serialize};

/// A word in the sentence graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
	/// Unique within one graph.
	pub id: String,
	/// Word as displayed.
	pub word: String,
	/// Free-text grammatical role (Субъект, Предикат, ...).
	pub role: String,
	/// Model-supplied emphasis in `[0, 1]`.
	pub weight: f64,
	/// Color bucket.
	pub group: i64,
}

/// A weighted connection between two nodes, by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyntaxLink {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Connection strength.
	pub value: f64,
}

/// Word/role graph attached to an AI reply.
///
/// Links are not checked against the node set; a link whose endpoint is
/// missing is simply not drawn.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntaxGraph {
	/// Nodes in display order.
	pub nodes: Vec<SyntaxNode>,
	/// Links between node ids.
	pub links: Vec<SyntaxLink>,
}

impl SyntaxGraph {
	/// True when there is nothing to lay out.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
