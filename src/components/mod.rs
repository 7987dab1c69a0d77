pub mod chat_message;
pub mod force_graph;
