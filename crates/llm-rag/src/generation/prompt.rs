//! Prompt template for RAG generation

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved texts into the context block
    pub fn build_context<S: AsRef<str>>(texts: &[S]) -> String {
        texts
            .iter()
            .map(|t| t.as_ref())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the fixed RAG prompt
    ///
    /// An empty context is allowed; the instructions tell the model to answer
    /// normally when the context is unrelated.
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        format!(
            r#"### Question:
{question}

### Context:
{context}
### Instructions:
- Provide a clear and concise response based on the context provided.
- Stay focused on the context and avoid making assumptions beyond the given data.
- Use the context to guide your response and provide a well-reasoned answer.
- Ensure that your response is relevant and addresses the question asked.
- If the question does not relate to the context, answer it as normal.
"#,
            question = question,
            context = context
        )
    }
}
