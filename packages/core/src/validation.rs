// ABOUTME: Input validation for user-supplied requirement, subtask and version fields
// ABOUTME: Length limits, allow-lists, HTML sanitization and search term checks

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum lengths per field class (in characters)
pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;
pub const MAX_COMMENT_LENGTH: usize = 1000;
pub const MAX_SEARCH_TERM_LENGTH: usize = 100;
pub const MAX_VERSION_NUMBER_LENGTH: usize = 50;
pub const MAX_PLATFORM_LENGTH: usize = 50;

pub const PRIORITY_VALUES: &[&str] = &["高", "中", "低"];
pub const REVIEW_STATUS_VALUES: &[&str] = &["待评审", "评审中", "评审通过", "评审不通过"];
pub const OPERATIONAL_FLAG_VALUES: &[&str] = &["是", "否"];

static SCRIPT_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"));
static IFRAME_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe\s*>").expect("valid regex"));
// Unclosed or self-closing leftovers after the paired forms are removed
static DANGLING_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?\s*(script|iframe)\b[^>]*>").expect("valid regex"));
static JAVASCRIPT_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)javascript\s*:").expect("valid regex"));
static SQL_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(select|insert|update|delete|drop|union|alter|create|truncate|exec|execute)\b",
    )
    .expect("valid regex")
});
static VERSION_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[vV]?\d+(\.\d+)*$").expect("valid regex"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Empty(String),

    #[error("{field} exceeds maximum length of {max} characters (got {actual})")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("{0} contains invalid null bytes")]
    NullByte(String),

    #[error("Invalid {field}: {value}. Must be one of: {allowed}")]
    NotAllowed {
        field: String,
        value: String,
        allowed: String,
    },

    #[error("Search term contains disallowed SQL syntax")]
    SqlSyntax,

    #[error("Invalid version number: {0}")]
    InvalidVersionNumber(String),
}

/// Outcome of validating a single field, in the `{valid, error, value}` shape the
/// dashboard consumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ValidationOutcome {
    pub fn accepted(value: impl Into<String>) -> Self {
        Self {
            valid: true,
            error: None,
            value: Some(value.into()),
        }
    }

    pub fn rejected(error: &ValidationError) -> Self {
        Self {
            valid: false,
            error: Some(error.to_string()),
            value: None,
        }
    }
}

impl From<Result<String, ValidationError>> for ValidationOutcome {
    fn from(result: Result<String, ValidationError>) -> Self {
        match result {
            Ok(value) => ValidationOutcome::accepted(value),
            Err(err) => ValidationOutcome::rejected(&err),
        }
    }
}

/// Remove script and iframe elements plus `javascript:` URLs from free text.
///
/// This is defense in depth for stored text; rendering must still escape output.
pub fn sanitize_html(input: &str) -> String {
    let without_scripts = SCRIPT_ELEMENT.replace_all(input, "");
    let without_iframes = IFRAME_ELEMENT.replace_all(&without_scripts, "");
    let without_dangling = DANGLING_TAG.replace_all(&without_iframes, "");
    JAVASCRIPT_URL.replace_all(&without_dangling, "").into_owned()
}

/// Validate a requirement or version title
pub fn validate_title(input: &str) -> Result<String, ValidationError> {
    validate_text_field(input, "Title", MAX_TITLE_LENGTH, true)
}

/// Validate a subtask or person name
pub fn validate_name(input: &str) -> Result<String, ValidationError> {
    validate_text_field(input, "Name", MAX_NAME_LENGTH, true)
}

/// Validate an optional description; blank input becomes `None`
pub fn validate_description(input: Option<&str>) -> Result<Option<String>, ValidationError> {
    match input {
        Some(text) if !text.trim().is_empty() => Ok(Some(validate_text_field(
            text,
            "Description",
            MAX_DESCRIPTION_LENGTH,
            false,
        )?)),
        _ => Ok(None),
    }
}

/// Validate a comment or reply body
pub fn validate_comment(input: &str) -> Result<String, ValidationError> {
    validate_text_field(input, "Comment", MAX_COMMENT_LENGTH, true)
}

/// Validate a search box term. Empty terms are allowed (they clear the filter).
pub fn validate_search_term(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    check_length("Search term", trimmed, MAX_SEARCH_TERM_LENGTH)?;
    check_null_bytes("Search term", trimmed)?;

    if SQL_KEYWORD.is_match(trimmed)
        || trimmed.contains("--")
        || trimmed.contains(';')
        || trimmed.contains("/*")
    {
        return Err(ValidationError::SqlSyntax);
    }

    Ok(sanitize_html(trimmed))
}

/// Validate a version number such as `2.1.0` or `v3.4`
pub fn validate_version_number(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty("Version number".to_string()));
    }
    check_length("Version number", trimmed, MAX_VERSION_NUMBER_LENGTH)?;

    if !VERSION_NUMBER.is_match(trimmed) {
        return Err(ValidationError::InvalidVersionNumber(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validate a platform label (e.g. `iOS`, `小程序`)
pub fn validate_platform(input: &str) -> Result<String, ValidationError> {
    validate_text_field(input, "Platform", MAX_PLATFORM_LENGTH, true)
}

pub fn validate_priority(input: &str) -> Result<String, ValidationError> {
    validate_enum("priority", input, PRIORITY_VALUES)
}

pub fn validate_review_status(input: &str) -> Result<String, ValidationError> {
    validate_enum("review status", input, REVIEW_STATUS_VALUES)
}

pub fn validate_operational_flag(input: &str) -> Result<String, ValidationError> {
    validate_enum("operational flag", input, OPERATIONAL_FLAG_VALUES)
}

fn validate_enum(field: &str, input: &str, allowed: &[&str]) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if allowed.contains(&trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::NotAllowed {
            field: field.to_string(),
            value: trimmed.to_string(),
            allowed: allowed.join(", "),
        })
    }
}

/// Trim, bound, reject NUL, then sanitize
fn validate_text_field(
    input: &str,
    field_name: &str,
    max_length: usize,
    required: bool,
) -> Result<String, ValidationError> {
    let trimmed = input.trim();

    if required && trimmed.is_empty() {
        return Err(ValidationError::Empty(field_name.to_string()));
    }

    check_length(field_name, trimmed, max_length)?;
    check_null_bytes(field_name, trimmed)?;

    let sanitized = sanitize_html(trimmed);
    let sanitized = sanitized.trim();

    // Text that was nothing but markup is as good as empty
    if required && sanitized.is_empty() {
        return Err(ValidationError::Empty(field_name.to_string()));
    }

    Ok(sanitized.to_string())
}

fn check_length(field_name: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field_name.to_string(),
            max,
            actual,
        });
    }
    Ok(())
}

fn check_null_bytes(field_name: &str, value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        return Err(ValidationError::NullByte(field_name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_search_term_rejects_sql() {
        let outcome = ValidationOutcome::from(validate_search_term("SELECT * FROM users"));
        assert!(!outcome.valid);
        assert!(outcome.error.is_some());
        assert!(outcome.value.is_none());
    }

    #[test]
    fn test_search_term_accepts_plain_text() {
        let outcome = ValidationOutcome::from(validate_search_term("正常搜索词"));
        assert_eq!(outcome, ValidationOutcome::accepted("正常搜索词"));
    }

    #[rstest]
    #[case("drop table requirements")]
    #[case("1 UNION all")]
    #[case("name' --")]
    #[case("a; b")]
    #[case("/* comment */")]
    fn test_search_term_rejects_sql_fragments(#[case] term: &str) {
        assert_eq!(validate_search_term(term), Err(ValidationError::SqlSyntax));
    }

    #[test]
    fn test_search_term_keyword_inside_word_allowed() {
        // "selection" and "updated" are not keywords on their own
        assert!(validate_search_term("selection updated").is_ok());
    }

    #[test]
    fn test_search_term_empty_allowed() {
        assert_eq!(validate_search_term("   "), Ok(String::new()));
    }

    #[test]
    fn test_search_term_too_long() {
        let term = "搜".repeat(MAX_SEARCH_TERM_LENGTH + 1);
        assert!(matches!(
            validate_search_term(&term),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_sanitize_html_strips_script_and_iframe() {
        let input = "需求<script>alert('x')</script>说明<IFRAME src=\"evil\"></IFRAME>结束";
        assert_eq!(sanitize_html(input), "需求说明结束");
    }

    #[test]
    fn test_sanitize_html_strips_unclosed_tags_and_js_urls() {
        assert_eq!(sanitize_html("a<script src=x>b"), "ab");
        assert_eq!(
            sanitize_html("<a href=\"javascript:alert(1)\">x</a>"),
            "<a href=\"alert(1)\">x</a>"
        );
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("  登录页改版  "), Ok("登录页改版".to_string()));
        assert!(validate_title("").is_err());
        assert!(validate_title("<script>x</script>").is_err());
        assert!(validate_title(&"a".repeat(MAX_TITLE_LENGTH + 1)).is_err());
        assert!(validate_title("bad\0title").is_err());
    }

    #[test]
    fn test_validate_title_counts_characters_not_bytes() {
        let title = "需".repeat(MAX_TITLE_LENGTH);
        assert!(validate_title(&title).is_ok());
    }

    #[test]
    fn test_validate_description() {
        assert_eq!(validate_description(None), Ok(None));
        assert_eq!(validate_description(Some("   ")), Ok(None));
        assert_eq!(
            validate_description(Some("详情<script>x</script>")),
            Ok(Some("详情".to_string()))
        );
    }

    #[test]
    fn test_validate_comment() {
        assert!(validate_comment("看起来不错").is_ok());
        assert!(validate_comment(&"x".repeat(MAX_COMMENT_LENGTH + 1)).is_err());
    }

    #[rstest]
    #[case("高", true)]
    #[case("中", true)]
    #[case(" 低 ", true)]
    #[case("紧急", false)]
    #[case("high", false)]
    fn test_validate_priority(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(validate_priority(input).is_ok(), ok);
    }

    #[test]
    fn test_validate_review_status_and_flag() {
        assert!(validate_review_status("评审通过").is_ok());
        assert!(validate_review_status("通过").is_err());
        assert!(validate_operational_flag("是").is_ok());
        assert!(validate_operational_flag("yes").is_err());
    }

    #[rstest]
    #[case("1.0.0", true)]
    #[case("v2.3", true)]
    #[case("10", true)]
    #[case("1..0", false)]
    #[case("beta", false)]
    #[case("", false)]
    fn test_validate_version_number(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(validate_version_number(input).is_ok(), ok);
    }

    #[test]
    fn test_outcome_serialization_omits_missing_fields() {
        let json = serde_json::to_string(&ValidationOutcome::accepted("ok")).unwrap();
        assert_eq!(json, r#"{"valid":true,"value":"ok"}"#);
    }
}
