//! Placeholder substitution for `text` nodes.

use crate::ToolResults;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{=@(\w+)\.(\w+)=\}").expect("placeholder pattern is a valid regex")
});

/// Replace `{=@TOOL.FIELD=}` tokens with fields of earlier tool outputs.
///
/// A token whose tool has produced output is replaced by the field value, or
/// by the empty string when the field is missing. A token naming a tool that
/// has not run is left verbatim, as is anything that is not a well-formed
/// token.
///
/// # Examples
///
/// ```
/// use shoprag_scenario::{ToolOutput, ToolResults, substitute};
///
/// let mut results = ToolResults::new();
/// results.insert(
///     "get_user_data".to_string(),
///     ToolOutput::from([("name".to_string(), "Антон".to_string())]),
/// );
///
/// assert_eq!(
///     substitute("Привет, {=@get_user_data.name=}!", &results),
///     "Привет, Антон!"
/// );
/// assert_eq!(substitute("{=@other.x=}", &results), "{=@other.x=}");
/// ```
pub fn substitute(text: &str, tool_results: &ToolResults) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| match tool_results.get(&caps[1]) {
            Some(output) => output.get(&caps[2]).cloned().unwrap_or_default(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolOutput;

    fn results() -> ToolResults {
        ToolResults::from([(
            "get_user_data".to_string(),
            ToolOutput::from([
                ("name".to_string(), "Антон".to_string()),
                ("age".to_string(), "25".to_string()),
            ]),
        )])
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let text = "{=@get_user_data.name=}, {=@get_user_data.name=} ({=@get_user_data.age=})";
        assert_eq!(substitute(text, &results()), "Антон, Антон (25)");
    }

    #[test]
    fn test_missing_field_becomes_empty() {
        assert_eq!(substitute("[{=@get_user_data.email=}]", &results()), "[]");
    }

    #[test]
    fn test_unknown_tool_is_left_verbatim() {
        let text = "Привет, {=@unknownTool.x=}";
        assert_eq!(substitute(text, &results()), text);
    }

    #[test]
    fn test_malformed_tokens_pass_through() {
        for text in [
            "{@get_user_data.name=}",
            "{=get_user_data.name=}",
            "{=@get_user_data name=}",
            "{=@get_user_data.name}",
            "{=@get-user.name=}",
        ] {
            assert_eq!(substitute(text, &results()), text);
        }
    }

    #[test]
    fn test_text_without_placeholders_is_fixed_point() {
        let text = "Здравствуйте! Чем могу помочь? {не плейсхолдер} @ = .";
        let once = substitute(text, &results());
        assert_eq!(once, text);
        assert_eq!(substitute(&once, &results()), once);
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let results = ToolResults::from([(
            "a".to_string(),
            ToolOutput::from([("x".to_string(), "{=@a.y=}".to_string())]),
        )]);
        assert_eq!(substitute("{=@a.x=}", &results), "{=@a.y=}");
    }
}
