//! Prompt Templates
//!
//! The planner and solver prompts are plain data with `$name` placeholders.
//! Rendering is a single pass over the template, so substituted values are
//! never expanded again and `$$` yields a literal `$`.

use serde::{Deserialize, Serialize};

const PLANNER_EN: &str = r#"You are an excellent AI assistant who is good at solving the user's problems. You break the user's question down into smaller sub-questions, each of which can be solved by one tool call. For every tool call give the tool name, the reason for calling it and the parameters it takes. Your output must look like [{"tool_name": "tool name", "reason": "why the tool is called", "params": {"param1": 1}}].
Do not include anything else in your output, only the tool calls.

The tools you can call and their descriptions are:

$tool_desc

You may only choose tools from the list above.

Here is an example:

User question: How can I quickly learn a new field?
Output: [{"tool_name": "GoogleSearch", "reason": "search for knowledge about the field", "params": {"query": "how to quickly learn a new field"}}]

Now the user's question: $question
Output:
"#;

const SOLVER_EN: &str = r#"You are an excellent AI assistant. You answer the user's question based on the question itself and the reference information.

User question: $question
Reference information: $reference

Answer the user's question based on the question and the reference information:
"#;

const PLANNER_ZH: &str = r#"你是一位出色的AI助手，擅长解决用户的问题，你的做法是将用户的问题分解为更小的子问题，
每个子问题都可以通过一个工具调用解决，每个工具需要提供工具名称、调用该工具的原因以及接受的参数，你的输出格式形如 [{"tool_name": "工具名称", "reason": "调用工具的原因", "params": {"param1": 1}}]。
注意，输出不要包含额外的信息，只需要提供工具调用的信息。

你可以调用的工具列表及其描述如下：

$tool_desc

注意，你只能从上面给出的工具中选择合适的工具。

下面是示例：

用户的问题：如何快速掌握一个领域的知识？
输出：[{"tool_name": "GoogleSearch", "reason": "搜索领域知识", "params": {"query": "如何快速掌握一个领域的知识"}}]

接下来是用户的问题：$question
输出：
"#;

const SOLVER_ZH: &str = r#"你是一位出色的AI助手，你可以基于用户的问题以及参考信息来回答用户的问题。

用户的问题：$question
参考信息：$reference

请基于用户的问题以及参考信息输出回答：
"#;

/// Language of the built-in prompt templates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptLanguage {
    #[default]
    En,
    Zh,
}

impl std::str::FromStr for PromptLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(PromptLanguage::En),
            "zh" | "chinese" => Ok(PromptLanguage::Zh),
            other => Err(format!("unsupported prompt language: {}", other)),
        }
    }
}

/// The pair of templates an agent renders from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplates {
    /// Placeholders: `$tool_desc`, `$question`
    pub planner: String,
    /// Placeholders: `$question`, `$reference`
    pub solver: String,
}

impl PromptTemplates {
    pub fn for_language(language: PromptLanguage) -> Self {
        let (planner, solver) = match language {
            PromptLanguage::En => (PLANNER_EN, SOLVER_EN),
            PromptLanguage::Zh => (PLANNER_ZH, SOLVER_ZH),
        };
        Self {
            planner: planner.into(),
            solver: solver.into(),
        }
    }

    pub fn render_planner(&self, question: &str, tool_descriptions: &str) -> String {
        render(&self.planner, &[("tool_desc", tool_descriptions), ("question", question)])
    }

    pub fn render_solver(&self, question: &str, reference_json: &str) -> String {
        render(&self.solver, &[("question", question), ("reference", reference_json)])
    }
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::for_language(PromptLanguage::default())
    }
}

/// Render the default planning prompt
pub fn render_planner_prompt(question: &str, tool_descriptions: &str) -> String {
    PromptTemplates::default().render_planner(question, tool_descriptions)
}

/// Render the default solving prompt
pub fn render_solver_prompt(question: &str, reference_json: &str) -> String {
    PromptTemplates::default().render_solver(question, reference_json)
}

/// Substitute `$name` placeholders in one pass
///
/// Unknown placeholders are left as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
            continue;
        }

        let ident_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let ident = &after[..ident_len];

        match vars.iter().find(|(key, _)| *key == ident) {
            Some((_, value)) if !ident.is_empty() => out.push_str(value),
            _ => {
                out.push('$');
                out.push_str(ident);
            }
        }
        rest = &after[ident_len..];
    }

    out.push_str(rest);
    out
}
