use crate::engine::llm_client::{LlmClient, LlmError};

/// One embeddings call. Newlines are flattened first; a blank query is
/// replaced by a stand-in so the API always gets real input.
pub fn get_embedding(llm: &dyn LlmClient, text: &str) -> Result<Vec<f32>, LlmError> {
    let flattened = text.replace('\n', " ");
    if flattened.trim().is_empty() {
        llm.embed("this is blank")
    } else {
        llm.embed(&flattened)
    }
}
