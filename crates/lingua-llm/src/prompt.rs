//! Prompt builders for the explanation and formality requests.

use serde_json::json;

use crate::model::GenerateRequest;

pub const NO_THINK: &str = "/no_think";

/// Render context words as `"w1", "w2", "w3"`
pub fn format_context<S: AsRef<str>>(context: &[S]) -> String {
    context
        .iter()
        .map(|word| format!("\"{}\"", word.as_ref().replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(", ")
}

fn with_directive(prompt: String, suppress_reasoning: bool) -> String {
    if suppress_reasoning {
        format!("{NO_THINK}\n{prompt}")
    } else {
        prompt
    }
}

/// Streamed request asking for a context-aware translation of `word`
pub fn explanation_request<S: AsRef<str>>(
    model: &str,
    word: &str,
    context: &[S],
    target_language: &str,
    suppress_reasoning: bool,
) -> GenerateRequest {
    let prompt = format!(
        r#"Task: Translate the target word into the target language, taking into account the context: the list of words shown together with it on the same screen.
If the meaning of the word changes under the influence of the context or gains an additional shade, point this out in the translation and explain what exactly changes.

Input format:
Target word: "word to translate"
Context (words shown on screen together with the target word): ["word1", "word2", "word3", ...]
Target language: for example, English

Instructions:
- Analyze the general meaning of the target word.
- Consider every word of the context: they affect the meaning and shade of the target word.
- If the meaning changes or a new shade appears, highlight it and explain how the context affects the translation.
- Give the translation of the word with the context taken into account.
- Add a short explanation of the translation if needed.
- Do NOT use Markdown

Example:
Target word: "замок"
Context: ["ключ", "дверь", "открыть", "король"]
Target language: English

Answer:
The word "замок" here is related to "ключ", "дверь", "открыть", which points to the meaning "lock" (a locking mechanism), not "castle" (a fortress). So the correct translation is "lock". The context stresses the meaning related to security and locking.

Target word: "{word}"
Context: [{context}]
Target language: {target_language}

Answer:
"#,
        context = format_context(context),
    );

    GenerateRequest {
        model: model.to_string(),
        prompt: with_directive(prompt, suppress_reasoning),
        stream: true,
        format: None,
    }
}

/// Structured request scoring the formality of `word` from 0 to 1
pub fn formality_request<S: AsRef<str>>(
    model: &str,
    word: &str,
    context: &[S],
    suppress_reasoning: bool,
) -> GenerateRequest {
    let prompt = format!(
        r#"Task: Rate the formality level of the target word in the given context.
Formality is rated on a scale from 0 to 1, where 0 is completely informal and 1 is maximally formal.
The context is the list of words shown together with the target word on the same screen; it may affect how formal the word is perceived.

Input format:
Target word: "word to rate"
Context (words shown on screen together with the target word): ["word1", "word2", "word3", ...]

Instructions:
- Analyze the target word and its typical formality.
- Take the influence of the context into account (professional vocabulary, jargon, colloquialisms and so on).
- Give a numeric formality score from 0 to 1 with two decimal places.
- Answer strictly in JSON format: {{"formality": number}}

Example:
Target word: "привет"
Context: ["здравствуйте", "добрый", "вечер"]

Answer:
{{"formality": 0.2}}

Target word: "{word}"
Context: [{context}]

Answer:
"#,
        context = format_context(context),
    );

    GenerateRequest {
        model: model.to_string(),
        prompt: with_directive(prompt, suppress_reasoning),
        stream: false,
        format: Some(json!({
            "type": "object",
            "properties": {
                "formality": { "type": "number" }
            },
            "required": ["formality"]
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_quoted_and_comma_joined() {
        assert_eq!(
            format_context(&["ключ", "дверь", "say \"hi\""]),
            r#""ключ", "дверь", "say \"hi\"""#
        );
        assert_eq!(format_context::<&str>(&[]), "");
    }

    #[test]
    fn test_explanation_request_shape() {
        let request =
            explanation_request("qwen3:32b", "замок", &["ключ", "замок"], "English", false);

        assert_eq!(request.model, "qwen3:32b");
        assert!(request.stream);
        assert!(request.format.is_none());
        assert!(!request.prompt.starts_with(NO_THINK));
        assert!(request.prompt.contains("Target word: \"замок\"\nContext: [\"ключ\", \"замок\"]"));
        assert!(request.prompt.contains("Target language: English\n\nAnswer:"));
    }

    #[test]
    fn test_suppressed_reasoning_prefixes_directive() {
        let request = explanation_request("m", "lock", &["lock"], "Russian", true);
        assert!(request.prompt.starts_with("/no_think\n"));

        let request = formality_request("m", "lock", &["lock"], true);
        assert!(request.prompt.starts_with("/no_think\n"));
    }

    #[test]
    fn test_formality_request_is_structured() {
        let request = formality_request("m", "hello", &["hello", "world"], false);

        assert!(!request.stream);
        let format = request.format.unwrap();
        assert_eq!(format["properties"]["formality"]["type"], "number");
        assert_eq!(format["required"][0], "formality");
        assert!(request.prompt.contains("{\"formality\": number}"));
    }
}
