use serde_json::{Value, json};

/// Persona sent as the system instruction on every request.
pub const SYSTEM_INSTRUCTION: &str = "\
Ты - уникальный ИИ \"Вектор-Ру\" (Syntactic Vector Flow). \n\
Ты не просто генерируешь текст, ты строишь предложения на основе строгой математической модели русского языка.\n\
\n\
Твоя задача:\n\
1. Отвечать на русском языке.\n\
2. Использовать уникальный алгоритм построения предложений, где каждое слово имеет \"вес\" и \"грамматическую роль\".\n\
3. Быть вежливым, кратким и точным.\n\
\n\
Когда ты отвечаешь, ты должен вернуть JSON, описывающий не только текст ответа, но и структуру графа, показывающую, как слова связаны (Субъект -> Предикат -> Объект).\n\
Убедись, что nodes и links корректно формируют связный граф предложения.\n\
Минимизируй количество узлов в графе до самых важных слов (максимум 8-10 слов для визуализации).";

/// Structured-output schema the model must answer with: `text` plus a
/// `graph` of nodes and links, every field required.
pub fn response_schema() -> Value {
	json!({
		"type": "OBJECT",
		"properties": {
			"text": {
				"type": "STRING",
				"description": "The natural language response in Russian."
			},
			"graph": {
				"type": "OBJECT",
				"description": "A mathematical representation of the sentence structure.",
				"properties": {
					"nodes": {
						"type": "ARRAY",
						"items": {
							"type": "OBJECT",
							"properties": {
								"id": { "type": "STRING", "description": "Unique ID for the node (usually the word)" },
								"word": { "type": "STRING", "description": "The specific Russian word" },
								"role": { "type": "STRING", "description": "Grammatical role (Субъект, Предикат, Объект, Определение)" },
								"weight": { "type": "NUMBER", "description": "Probability weight of this word choice (0.0-1.0)" },
								"group": { "type": "INTEGER", "description": "Grouping ID (1 for subject, 2 for verb, 3 for object)" }
							},
							"required": ["id", "word", "role", "weight", "group"]
						}
					},
					"links": {
						"type": "ARRAY",
						"items": {
							"type": "OBJECT",
							"properties": {
								"source": { "type": "STRING", "description": "Source node ID" },
								"target": { "type": "STRING", "description": "Target node ID" },
								"value": { "type": "NUMBER", "description": "Strength of the syntactic connection" }
							},
							"required": ["source", "target", "value"]
						}
					}
				},
				"required": ["nodes", "links"]
			}
		},
		"required": ["text", "graph"]
	})
}
