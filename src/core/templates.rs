use crate::config::FALLBACK_KEY;
use crate::domain::model::Review;
use crate::utils::error::{ResponderError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// 連 fallback 都沒有設定時使用
pub const ULTIMATE_DEFAULT_TEMPLATE: &str = "Thanks for your feedback, {name}!";

/// Substituted when the reviewer has no display name.
pub const ANONYMOUS_NAME: &str = "there";

const NAME_PLACEHOLDER: &str = "name";

// `{{` / `}}` escapes, `{placeholder}`, or a stray brace.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").expect("valid template token pattern")
});

/// 依星等挑選模板：先找星等鍵，再找 fallback，最後用內建預設
pub fn choose_template(templates: &HashMap<String, String>, star_rating: u8) -> &str {
    let non_empty = |key: &str| templates.get(key).filter(|t| !t.is_empty());

    non_empty(&star_rating.to_string())
        .or_else(|| templates.get(FALLBACK_KEY))
        .map(String::as_str)
        .unwrap_or(ULTIMATE_DEFAULT_TEMPLATE)
}

/// Replaces `{name}` with the reviewer name, or "there" when absent.
/// Any other placeholder fails instead of being left in the reply.
pub fn render_template(template: &str, reviewer_name: Option<&str>) -> Result<String> {
    let name = reviewer_name
        .filter(|n| !n.is_empty())
        .unwrap_or(ANONYMOUS_NAME);

    let mut rendered = String::with_capacity(template.len() + name.len());
    let mut last = 0;

    for caps in TOKEN_PATTERN.captures_iter(template) {
        let Some(token) = caps.get(0) else { continue };
        rendered.push_str(&template[last..token.start()]);
        last = token.end();

        match (token.as_str(), caps.get(1)) {
            ("{{", _) => rendered.push('{'),
            ("}}", _) => rendered.push('}'),
            (_, Some(placeholder)) if placeholder.as_str() == NAME_PLACEHOLDER => {
                rendered.push_str(name)
            }
            (_, Some(placeholder)) => {
                return Err(ResponderError::TemplateRender {
                    template: template.to_string(),
                    reason: format!("undefined placeholder {{{}}}", placeholder.as_str()),
                })
            }
            (brace, None) => {
                return Err(ResponderError::TemplateRender {
                    template: template.to_string(),
                    reason: format!("single '{}' encountered in template", brace),
                })
            }
        }
    }

    rendered.push_str(&template[last..]);
    Ok(rendered)
}

pub fn build_reply(templates: &HashMap<String, String>, review: &Review) -> Result<String> {
    let template = choose_template(templates, review.star_rating);
    render_template(template, review.reviewer_name.as_deref())
}
