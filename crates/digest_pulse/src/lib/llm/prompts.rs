use crate::{ContentOrigin, LinkType};

const ARTICLE_PROMPT: &str = include_str!("./prompts/article.txt");
const CANDIDATE_PROMPT: &str = include_str!("./prompts/candidate.txt");
const JOB_PROMPT: &str = include_str!("./prompts/job.txt");
const COMPANY_PROMPT: &str = include_str!("./prompts/company.txt");
const VOICE_PROMPT: &str = include_str!("./prompts/voice.txt");

/// Appended to every system prompt
pub const JSON_ONLY_DIRECTIVE: &str = "IMPORTANT: Return ONLY valid JSON.";

/// Language summaries are written in unless configured otherwise
pub const DEFAULT_OUTPUT_LANGUAGE: &str = "Russian";

/// System prompt template for a link category
pub fn prompt_for_link(link_type: LinkType) -> &'static str {
    match link_type {
        LinkType::Candidate => CANDIDATE_PROMPT,
        LinkType::Job => JOB_PROMPT,
        LinkType::Company => COMPANY_PROMPT,
        LinkType::Unknown => ARTICLE_PROMPT,
    }
}

/// System prompt template for content of the given origin
pub fn prompt_for(origin: ContentOrigin) -> &'static str {
    match origin {
        ContentOrigin::Voice => VOICE_PROMPT,
        ContentOrigin::Web(link_type) => prompt_for_link(link_type),
    }
}

/// Full system message: template, the output language line, then the
/// JSON-only directive
pub fn system_message(origin: ContentOrigin, output_language: &str) -> String {
    format!(
        "{}\n\n{}\n\n{JSON_ONLY_DIRECTIVE}",
        prompt_for(origin).trim_end(),
        language_line(output_language)
    )
}

/// Pins the reply language regardless of the source material's language
pub fn language_line(output_language: &str) -> String {
    format!("LANGUAGE: write every field in {output_language}, whatever the language of the input.")
}
