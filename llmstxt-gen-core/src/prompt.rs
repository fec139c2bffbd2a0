//! Prompt construction for llms.txt generation.

use crate::contract::ProjectAnalysis;

/// Documentation paths listed in the prompt.
pub const PROMPT_DOC_FILES: usize = 15;

/// Characters of the readme excerpt quoted in the prompt.
pub const PROMPT_README_CHARS: usize = 200;

const LLMSTXT_DIRECTIVES: &str = "\
Generate a valid llms.txt file following the llmstxt.org specification:
- Start with # [Project Name]
- Add a > blockquote summary (2-3 sentences)
- Include 3-5 well-organized sections with H2 headings
- Add 3-6 relevant links per section with descriptions
- Make descriptions specific and under 100 characters
- Include an ## Optional section for supplementary links

Important:
- Focus on key documentation and guides
- Be specific in descriptions (not vague)
- Follow Markdown format exactly
- Links should point to actual doc files or resources
- Make it LLM-friendly and concise

Generate only the llms.txt content, no explanations:";

/// Build the generation prompt for `analysis`. Pure: the same analysis always yields
/// the same prompt.
pub fn build_prompt(analysis: &ProjectAnalysis) -> String {
    let docs_list = analysis
        .doc_files
        .iter()
        .take(PROMPT_DOC_FILES)
        .map(|doc| format!("  - {doc}"))
        .collect::<Vec<_>>()
        .join("\n");
    let readme: String = analysis
        .readme_excerpt
        .chars()
        .take(PROMPT_README_CHARS)
        .collect();

    format!(
        "Create an llms.txt file for this {project_type} project.

Project: {path}
Documentation files ({count} found):
{docs_list}

Project Description (from README):
{readme}...

{LLMSTXT_DIRECTIVES}",
        project_type = analysis.project_type,
        path = analysis.root_path.display(),
        count = analysis.file_count,
    )
}
