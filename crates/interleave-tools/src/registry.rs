//! Tool definitions: names, descriptions and JSON input schemas.

use serde::Serialize;
use serde_json::{json, Value};

/// A callable tool as advertised to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

pub const CREATE_STUDY_PLAN: &str = "create_study_plan";
pub const GENERATE_INTERLEAVED_QUIZ: &str = "generate_interleaved_quiz";
pub const CREATE_FLASHCARD_DECK: &str = "create_flashcard_deck";
pub const GET_SHUFFLED_FLASHCARDS: &str = "get_shuffled_flashcards";
pub const LOG_STUDY_SESSION: &str = "log_study_session";
pub const GET_LEARNING_PROGRESS: &str = "get_learning_progress";
pub const GET_INTERLEAVING_PATTERNS: &str = "get_interleaving_patterns";

/// Collection of the study tools.
pub struct StudyTools;

impl StudyTools {
    /// Every tool definition, in a stable order.
    pub fn all() -> Vec<ToolDefinition> {
        vec![
            Self::create_study_plan(),
            Self::generate_interleaved_quiz(),
            Self::create_flashcard_deck(),
            Self::get_shuffled_flashcards(),
            Self::log_study_session(),
            Self::get_learning_progress(),
            Self::get_interleaving_patterns(),
        ]
    }

    fn create_study_plan() -> ToolDefinition {
        ToolDefinition {
            name: CREATE_STUDY_PLAN,
            description: "Generate an interleaved study schedule that mixes subjects and topics instead of studying them in blocks.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "userId": { "type": "string", "description": "User identifier" },
                    "subjects": {
                        "type": "array",
                        "description": "Subjects to study; each topic becomes its own study unit (at least 2 units)",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "topics": { "type": "array", "items": { "type": "string" } }
                            },
                            "required": ["name"]
                        }
                    },
                    "durationMinutes": {
                        "type": "integer",
                        "minimum": 30,
                        "maximum": 600,
                        "description": "Total study time in minutes"
                    },
                    "pattern": {
                        "type": "string",
                        "description": "Interleaving pattern id or legacy alias (default: systematic_short)"
                    },
                    "breaksEnabled": {
                        "type": "boolean",
                        "description": "Insert a 5-minute break after every 4 blocks (default: true)"
                    }
                },
                "required": ["userId", "subjects", "durationMinutes"]
            }),
        }
    }

    fn generate_interleaved_quiz() -> ToolDefinition {
        ToolDefinition {
            name: GENERATE_INTERLEAVED_QUIZ,
            description: "Create a quiz with questions from multiple topics mixed together for interleaved practice.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "topics": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "questions": {
                                    "type": "array",
                                    "items": {
                                        "type": "object",
                                        "properties": {
                                            "question": { "type": "string" },
                                            "options": { "type": "array", "items": { "type": "string" } },
                                            "correctIndex": { "type": "integer", "minimum": 0 },
                                            "answer": { "type": "string" }
                                        },
                                        "required": ["question"]
                                    }
                                }
                            },
                            "required": ["name", "questions"]
                        }
                    },
                    "quizLength": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 100,
                        "description": "Total number of questions drawn from the shuffled pool"
                    },
                    "questionsPerTopic": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 10,
                        "description": "Number of questions per topic (default: 3)"
                    },
                    "shuffleOptions": { "type": "boolean", "description": "Shuffle answer options (default: false)" },
                    "includeTopicHints": { "type": "boolean", "description": "Show each question's topic (default: true)" }
                },
                "required": ["topics"]
            }),
        }
    }

    fn create_flashcard_deck() -> ToolDefinition {
        ToolDefinition {
            name: CREATE_FLASHCARD_DECK,
            description: "Create a flashcard deck with cards from multiple topics for interleaved review.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "userId": { "type": "string", "description": "User identifier" },
                    "deckName": { "type": "string", "description": "Name for the flashcard deck" },
                    "cards": {
                        "type": "array",
                        "description": "Flashcards with front, back, and topic",
                        "items": {
                            "type": "object",
                            "properties": {
                                "front": { "type": "string" },
                                "back": { "type": "string" },
                                "topic": { "type": "string" }
                            },
                            "required": ["front", "back", "topic"]
                        }
                    }
                },
                "required": ["userId", "deckName", "cards"]
            }),
        }
    }

    fn get_shuffled_flashcards() -> ToolDefinition {
        ToolDefinition {
            name: GET_SHUFFLED_FLASHCARDS,
            description: "Retrieve flashcards in interleaved order, from a named deck or from the user's own subjects.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "userId": { "type": "string", "description": "User identifier" },
                    "deckName": { "type": "string", "description": "Draw from this deck instead of the user's subjects" },
                    "topics": { "type": "array", "items": { "type": "string" }, "description": "Only draw cards from these topics" },
                    "count": { "type": "integer", "minimum": 1, "description": "Number of cards to retrieve (default: all)" },
                    "pattern": {
                        "type": "string",
                        "enum": ["random", "balanced", "systematic"],
                        "description": "How to mix topics (default: random)"
                    }
                },
                "required": ["userId"]
            }),
        }
    }

    fn log_study_session() -> ToolDefinition {
        ToolDefinition {
            name: LOG_STUDY_SESSION,
            description: "Record a completed study session to track learning progress over time.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "userId": { "type": "string", "description": "User identifier" },
                    "topicsStudied": { "type": "array", "items": { "type": "string" }, "description": "Topics covered in the session" },
                    "durationMinutes": { "type": "integer", "minimum": 1, "maximum": 1440, "description": "Duration in minutes" },
                    "quizScore": { "type": "number", "minimum": 0, "maximum": 100, "description": "Quiz score percentage if applicable" },
                    "notes": { "type": "string" }
                },
                "required": ["userId", "topicsStudied", "durationMinutes"]
            }),
        }
    }

    fn get_learning_progress() -> ToolDefinition {
        ToolDefinition {
            name: GET_LEARNING_PROGRESS,
            description: "Retrieve learning progress and statistics for a user, with recommendations for improvement.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "userId": { "type": "string", "description": "User identifier" },
                    "includeRecommendations": { "type": "boolean", "description": "Include recommendations (default: true)" }
                },
                "required": ["userId"]
            }),
        }
    }

    fn get_interleaving_patterns() -> ToolDefinition {
        ToolDefinition {
            name: GET_INTERLEAVING_PATTERNS,
            description: "Get information about available interleaving patterns and their benefits.",
            input_schema: json!({ "type": "object", "properties": {} }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_tools_with_unique_names() {
        let tools = StudyTools::all();
        assert_eq!(tools.len(), 7);
        let mut names: Vec<&str> = tools.iter().map(|t| t.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn schemas_are_objects_with_required_lists() {
        for tool in StudyTools::all() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            if tool.name != GET_INTERLEAVING_PATTERNS {
                assert!(tool.input_schema["required"].is_array(), "{}", tool.name);
            }
        }
    }

    #[test]
    fn serializes_input_schema_in_camel_case() {
        let tool = StudyTools::all()
            .into_iter()
            .find(|t| t.name == LOG_STUDY_SESSION)
            .unwrap();
        let json = serde_json::to_value(tool).unwrap();
        assert!(json.get("inputSchema").is_some());
    }
}
