//! Study-assistant prompts

use super::types::CompletionRequest;

pub const SUMMARY_SYSTEM: &str = "\
You are a study assistant for university students.
When given a course reading, you create a concise, focused summary.

Your goals:
- Help the student quickly grasp the main ideas, arguments, and structure of the text.
- Use clear, simple language suitable for an undergraduate with no prior background.
- Briefly explain any important terms or concepts the student might not know.

Format your response as 4–6 bullet points.
Each bullet should be 1–3 sentences long.";

/// Sentence the model is told to use when the reading does not answer the question
pub const UNSURE_ANSWER: &str = "I'm not sure based on this reading alone.";

pub fn answer_system() -> String {
    format!(
        "You are a helpful study assistant for university students.
The user will give you a course reading and a question about it.
Answer only based on the reading.
If the answer is not clearly supported by the text, say:
\"{UNSURE_ANSWER}\"
Keep answers short and clear (3–6 sentences max)."
    )
}

pub fn summary_request(text: &str, max_tokens: u32) -> CompletionRequest {
    let prompt = format!(
        "Summarize the following course reading for a student who needs to understand it for class, homework, and exams.

Focus on:
- The author's main thesis or central question.
- 2–4 key arguments or ideas.
- Any important concepts, terms, or definitions (briefly explain them in simple language).
- Any major conclusions or implications.

Keep the summary short but rich in information, and avoid copying long sentences verbatim.

Reading:

{text}"
    );

    CompletionRequest {
        system: SUMMARY_SYSTEM.to_string(),
        prompt,
        max_tokens,
    }
}

pub fn answer_request(text: &str, question: &str, max_tokens: u32) -> CompletionRequest {
    CompletionRequest {
        system: answer_system(),
        prompt: format!(
            "Here is the course reading:\n\n{text}\n\nThe student asks:\n\n{question}\n\nAnswer based only on the reading."
        ),
        max_tokens,
    }
}
