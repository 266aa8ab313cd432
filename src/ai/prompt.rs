//! Prompt construction and clean-up of generated code.

use regex::Regex;
use std::sync::LazyLock;

use super::GenerationRequest;

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const VERSE_HEADER: &str = "using { /Script/FortniteGame }";

/// Sample requests offered to users who do not know where to start
pub const PROMPT_EXAMPLES: &[&str] = &[
    "Create a weather system that cycles through sunny, cloudy, and rainy conditions every few minutes",
    "Design a checkpoint race system where players compete for the fastest time",
    "Create a resource gathering system where players can collect wood, stone, and metal",
    "Build a capture the flag game mode with two teams and scoring",
    "Make a wave-based zombie defense game with increasing difficulty",
];

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```verse|```\n").expect("valid fence regex"));
static CODE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//|/\*|using\s+\{|#").expect("valid code start regex"));

const PERSONA: &str = "\
You are VerseGPT, an expert in the Verse programming language and in building \
gameplay systems for Fortnite Creative with UEFN. You know the UEFN devices, \
the Verse API and the performance rules of the game runtime.

Before writing code, work out what the request is for, which devices and \
entities it touches, which events trigger it, what data it keeps and which \
edge cases can break it.

Requirements for the code you produce:
- Syntax valid for the current UEFN release, with no deprecated constructs.
- Compiles in UEFN without errors or warnings.
- Uses a `class(creative_device):` device unless another shape is requested.
- Marks configurable values and device references with `@editable`.
- Comments every major part of the code.
- Handles failure cases with `if`, `[]` and `?` (e.g. agents that are not a \
`fort_character`, devices that are not set).
- Avoids unbounded loops and manages `<suspends>` functions carefully.
- Is clean and readable for another Verse developer.";

const CLOSING: &str = "\
Return ONLY the Verse code, with no explanation before or after it. The code \
must be ready to paste into a .verse file in UEFN.";

/// Map short model aliases to API model names
pub fn normalize_model(model: Option<&str>) -> String {
    match model.map(str::trim) {
        None | Some("") => DEFAULT_MODEL.to_string(),
        Some("gemini-flash") => "gemini-1.5-flash".to_string(),
        Some("gemini-pro") => "gemini-1.5-pro".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Requested temperature, defaulted and clamped to `0.0..=1.0`
pub fn resolve_temperature(temperature: Option<f32>) -> f32 {
    match temperature {
        Some(t) if t.is_finite() => t.clamp(0.0, 1.0),
        _ => DEFAULT_TEMPERATURE,
    }
}

/// Full prompt text for a request.
///
/// Editing takes precedence over continuing, which takes precedence over
/// integrating a pasted snippet.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let task = match (
        request.edit_instructions.as_deref(),
        request.continue_code.as_deref(),
        request.insert_code.as_deref(),
    ) {
        (Some(instructions), _, code) => format!(
            "Modify the existing Verse code below according to these instructions: \"{}\"\n\n\
             Original request: \"{}\"\n\n\
             Existing code:\n```verse\n{}\n```\n\n\
             Return the complete updated code.",
            instructions,
            request.prompt,
            code.unwrap_or_default()
        ),
        (None, Some(code), _) => format!(
            "Continue the following Verse code. Keep everything that is already there \
             and extend it to fulfil this request: \"{}\"\n\n\
             Existing code:\n```verse\n{}\n```",
            request.prompt, code
        ),
        (None, None, Some(code)) => format!(
            "Generate complete, functional Verse code for this request: \"{}\"\n\n\
             Integrate the following code into the result:\n```verse\n{}\n```",
            request.prompt, code
        ),
        (None, None, None) => format!(
            "Generate complete, functional Verse code for this request: \"{}\"",
            request.prompt
        ),
    };

    format!("{}\n\n{}\n\n{}", PERSONA, task, CLOSING)
}

/// Strip markdown fences and leading prose from model output and make
/// sure the result starts with a `using` header.
pub fn clean_generated_code(code: &str) -> String {
    let unfenced = CODE_FENCE.replace_all(code, "").replace("```", "");

    let start = CODE_START.find(&unfenced).map_or(0, |m| m.start());
    let cleaned = unfenced[start..].trim();

    if cleaned.contains("using {") {
        cleaned.to_string()
    } else {
        format!("{}\n\n{}", VERSE_HEADER, cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_model() {
        assert_eq!(normalize_model(None), "gemini-1.5-pro");
        assert_eq!(normalize_model(Some("")), "gemini-1.5-pro");
        assert_eq!(normalize_model(Some("gemini-flash")), "gemini-1.5-flash");
        assert_eq!(normalize_model(Some("gemini-pro")), "gemini-1.5-pro");
        assert_eq!(normalize_model(Some("gemini-1.5-flash")), "gemini-1.5-flash");
    }

    #[test]
    fn test_resolve_temperature() {
        assert_eq!(resolve_temperature(None), 0.7);
        assert_eq!(resolve_temperature(Some(0.0)), 0.0);
        assert_eq!(resolve_temperature(Some(1.7)), 1.0);
        assert_eq!(resolve_temperature(Some(-0.5)), 0.0);
        assert_eq!(resolve_temperature(Some(f32::NAN)), 0.7);
    }

    #[test]
    fn test_new_prompt() {
        let prompt = build_prompt(&request("a gold granter"));
        assert!(prompt.starts_with("You are VerseGPT"));
        assert!(prompt.contains("for this request: \"a gold granter\""));
        assert!(prompt.ends_with("file in UEFN."));
        assert!(!prompt.contains("Existing code"));
    }

    #[test]
    fn test_continue_prompt() {
        let mut req = request("add a timer");
        req.continue_code = Some("x := 1".into());
        let prompt = build_prompt(&req);
        assert!(prompt.contains("Continue the following Verse code"));
        assert!(prompt.contains("```verse\nx := 1\n```"));
    }

    #[test]
    fn test_edit_prompt_wins() {
        let mut req = request("gold");
        req.continue_code = Some("ignored".into());
        req.edit_instructions = Some("rename the device".into());
        req.insert_code = Some("old := 1".into());
        let prompt = build_prompt(&req);
        assert!(prompt.contains("instructions: \"rename the device\""));
        assert!(prompt.contains("```verse\nold := 1\n```"));
        assert!(!prompt.contains("ignored"));
    }

    #[test]
    fn test_insert_prompt() {
        let mut req = request("gold");
        req.insert_code = Some("snippet := 2".into());
        let prompt = build_prompt(&req);
        assert!(prompt.contains("Integrate the following code"));
        assert!(prompt.contains("snippet := 2"));
    }

    #[test]
    fn test_clean_strips_fences_and_prose() {
        let raw = "Here is your code:\n```verse\nusing { /Verse.org/Simulation }\n\nx := 1\n```\nEnjoy!";
        assert_eq!(
            clean_generated_code(raw),
            "using { /Verse.org/Simulation }\n\nx := 1\nEnjoy!"
        );
    }

    #[test]
    fn test_clean_adds_header() {
        assert_eq!(
            clean_generated_code("  # counter\ncount : int = 0  "),
            "using { /Script/FortniteGame }\n\n# counter\ncount : int = 0"
        );
    }

    #[test]
    fn test_clean_keeps_code_without_markers() {
        assert_eq!(
            clean_generated_code("x := 1"),
            "using { /Script/FortniteGame }\n\nx := 1"
        );
    }

    #[test]
    fn test_clean_accepts_spaced_using() {
        let cleaned = clean_generated_code("Sure!\nusing   { /Fortnite.com/Devices }\nusing { /Verse.org }");
        assert!(cleaned.starts_with("using   {"));
    }
}
