//! Built-in prompt templates and `[PLACEHOLDER]` handling.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::PromptTemplate;

/// The template set seeded into an empty store.
pub fn default_templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate::new(
            "1",
            "Explain Concept",
            "Please explain the concept of [TOPIC] in simple terms.",
            "Learning",
        ),
        PromptTemplate::new(
            "2",
            "Code Review",
            "Can you review this code and suggest improvements?\n\n[CODE]",
            "Development",
        ),
        PromptTemplate::new(
            "3",
            "Meeting Summary",
            "Summarize the key points from this meeting: [MEETING_NOTES]",
            "Business",
        ),
        PromptTemplate::new(
            "4",
            "Creative Writing",
            "Write a creative story about [TOPIC] in [STYLE] style.",
            "Creative",
        ),
        PromptTemplate::new(
            "5",
            "Problem Solving",
            "Help me solve this problem step by step: [PROBLEM]",
            "General",
        ),
    ]
}

fn placeholder_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([A-Z][A-Z0-9_]*)\]").ok()).as_ref()
}

impl PromptTemplate {
    /// Distinct placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let Some(re) = placeholder_re() else {
            return names;
        };
        for cap in re.captures_iter(&self.content) {
            let name = &cap[1];
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Substitute placeholders with the supplied values.
    ///
    /// Names are matched case-insensitively; markers without a value are left
    /// in place.
    pub fn fill(&self, values: &HashMap<String, String>) -> String {
        let upper: HashMap<String, &str> = values
            .iter()
            .map(|(k, v)| (k.to_uppercase(), v.as_str()))
            .collect();

        let Some(re) = placeholder_re() else {
            return self.content.clone();
        };
        re.replace_all(&self.content, |cap: &regex::Captures| match upper.get(&cap[1]) {
            Some(value) => value.to_string(),
            None => cap[0].to_string(),
        })
        .into_owned()
    }

    /// Whether every placeholder has a value in `values`.
    pub fn is_complete(&self, values: &HashMap<String, String>) -> bool {
        let keys: Vec<String> = values.keys().map(|k| k.to_uppercase()).collect();
        self.placeholders().iter().all(|p| keys.contains(p))
    }
}

/// Parse `KEY=VALUE` arguments into a placeholder map.
///
/// A word without a `KEY=` prefix continues the previous value, so
/// `topic=rust ownership` fills `TOPIC` with `rust ownership`. Words before
/// the first assignment are ignored.
pub fn parse_assignments<S: AsRef<str>>(args: &[S]) -> HashMap<String, String> {
    let mut values: HashMap<String, String> = HashMap::new();
    let mut last_key: Option<String> = None;

    for arg in args {
        let arg = arg.as_ref();
        match arg.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => {
                let key = k.trim().to_uppercase();
                values.insert(key.clone(), v.to_string());
                last_key = Some(key);
            }
            _ => {
                if let Some(value) = last_key.as_ref().and_then(|k| values.get_mut(k)) {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(arg);
                }
            }
        }
    }
    values
}
