use crate::utils::error::{ResponderError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.is_empty() {
        return Err(ResponderError::invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str).map_err(|e| {
        ResponderError::invalid(field_name, url_str, format!("Invalid URL format: {}", e))
    })?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ResponderError::invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            ))
        }
    }

    if url.cannot_be_a_base() {
        return Err(ResponderError::invalid(
            field_name,
            url_str,
            "URL cannot be used as a base",
        ));
    }

    Ok(url)
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ResponderError::invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(ResponderError::invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ResponderError::invalid(
            field_name,
            value.to_string(),
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// 解析正整數設定值，錯誤時回報欄位名稱
pub fn parse_positive_number(field_name: &str, raw: &str) -> Result<usize> {
    let value = raw.trim().parse::<usize>().map_err(|e| {
        ResponderError::invalid(field_name, raw, format!("Not a positive integer: {}", e))
    })?;
    validate_positive_number(field_name, value, 1)?;
    Ok(value)
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ResponderError::invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("REVIEWS_API_BASE_URL", "https://example.com/v4").is_ok());
        assert!(validate_url("REVIEWS_API_BASE_URL", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("REVIEWS_API_BASE_URL", "").is_err());
        assert!(validate_url("REVIEWS_API_BASE_URL", "invalid-url").is_err());
        assert!(validate_url("REVIEWS_API_BASE_URL", "ftp://example.com").is_err());
    }

    #[test]
    fn test_parse_positive_number() {
        assert_eq!(parse_positive_number("REVIEWS_PAGE_SIZE", " 25 ").unwrap(), 25);
        assert!(parse_positive_number("REVIEWS_PAGE_SIZE", "0").is_err());
        assert!(parse_positive_number("REVIEWS_PAGE_SIZE", "-3").is_err());

        match parse_positive_number("MAX_REVIEWS_PER_LOCATION", "lots") {
            Err(ResponderError::InvalidConfigValue { field, value, .. }) => {
                assert_eq!(field, "MAX_REVIEWS_PER_LOCATION");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("DEFAULT_LANGUAGE", "en").is_ok());
        assert!(validate_non_empty_string("DEFAULT_LANGUAGE", "   ").is_err());
        assert!(validate_path("DATABASE_PATH", "").is_err());
        assert!(validate_path("DATABASE_PATH", "state.sqlite3").is_ok());
    }
}
