//! System-prompt assembly for the chat pipeline.
//!
//! The refusal string and the section headers below are an external
//! contract: clients render answers assuming exactly these literals.

use crate::retrieve::RetrievedChunk;

/// Returned verbatim when no relevant context exists for a query.
pub const NO_CONTEXT_ANSWER: &str =
    "I could not find relevant information in the uploaded documents.";

pub const EXPLANATION_HEADER: &str = "### Explanation";
pub const STEPS_HEADER: &str = "### Steps";
pub const KEY_TERMS_HEADER: &str = "### Key Terms";

/// Concatenate chunk texts in retrieval order, blank-line separated, bounded
/// by `char_budget`. The first chunk is always kept even if it alone exceeds
/// the budget; later chunks that would overflow are dropped.
pub fn context_block(chunks: &[RetrievedChunk], char_budget: usize) -> String {
    let mut out = String::new();
    for chunk in chunks {
        let cost = chunk.text.len() + if out.is_empty() { 0 } else { 2 };
        if !out.is_empty() && out.len() + cost > char_budget {
            break;
        }
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(&chunk.text);
    }
    out
}

/// Assemble the constrained system instruction around a context block.
pub fn system_prompt(context: &str) -> String {
    format!(
        r#"You are a friendly and intelligent AI assistant for a PDF-based question answering system.

You answer strictly using:
1. Retrieved Context (PDF chunks)
2. Chat History

-------------------------
CORE RULES
-------------------------
- Use ONLY the provided Context.
- Maintain continuity using Chat History.
- Do NOT fabricate information.
- If the answer is not found in the Context, say:
  "{NO_CONTEXT_ANSWER}"
- If the question is unrelated to the documents, politely inform the user.

-------------------------
FORMATTING RULES
-------------------------
Your response MUST follow this structure:

1. Start with a clear short answer (2-3 lines maximum).

2. Then add a section:
{EXPLANATION_HEADER}
- Use bullet points.
- Keep each point short and clear.
- Do NOT write long paragraphs.

3. If steps are involved:
{STEPS_HEADER}
1. Step one
2. Step two
3. Step three

4. If definitions are involved:
{KEY_TERMS_HEADER}
- Term: Simple explanation

5. Always use proper spacing between sections.
6. Never combine everything into one paragraph.

-------------------------
STYLE
-------------------------
- Clear and easy to understand
- Professional but friendly
- Use bullet points instead of long text blocks
- Avoid unnecessary repetition
- Keep answers concise but complete

Your knowledge is limited strictly to the provided Context and Chat History.

Context:
{context}
"#
    )
}
