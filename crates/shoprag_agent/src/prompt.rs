//! Answer prompt assembly.

use shoprag_core::{GenerateRequest, Message};

/// Instructions for the answering model.
pub const ANSWER_SYSTEM_PROMPT: &str = "Ты вежливый агент технической поддержки интернет-магазина. \
Отвечай на вопрос клиента по-русски, опираясь только на контекст и историю диалога. \
Если в контексте нет ответа, честно скажи об этом и предложи обратиться к оператору.";

/// Inputs of one answer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct AnswerPrompt<'a> {
    /// Text emitted by the scenario, empty if none ran
    pub scenario_context: &'a str,
    /// Rendered knowledge-base passages
    pub knowledge_context: &'a str,
    /// Rolling summary of older messages
    pub summary: &'a str,
    /// Rendered recent history
    pub history: &'a str,
    pub question: &'a str,
}

impl AnswerPrompt<'_> {
    /// Scenario text followed by the knowledge-base block.
    pub fn grounding(&self) -> String {
        format!(
            "{}\n\nКонтекст из базы знаний:\n{}",
            self.scenario_context, self.knowledge_context
        )
    }

    /// The user-turn content sent to the model.
    pub fn user_content(&self) -> String {
        let mut content = format!("Контекст:\n{}\n\n", self.grounding());
        if !self.summary.is_empty() {
            content.push_str(&format!(
                "Краткое содержание предыдущего диалога:\n{}\n\n",
                self.summary
            ));
        }
        content.push_str(&format!(
            "История диалога:\n{}\n\nВопрос клиента: {}",
            self.history, self.question
        ));
        content
    }

    pub fn to_request(&self) -> GenerateRequest {
        GenerateRequest::new(vec![
            Message::system(ANSWER_SYSTEM_PROMPT),
            Message::user(self.user_content()),
        ])
    }
}
