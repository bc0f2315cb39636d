use crate::cli::utils::*;
use crate::hooks::Pagination;

#[test]
fn test_truncate_with_ellipsis_short_string() {
    assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
}

#[test]
fn test_truncate_with_ellipsis_exact_length() {
    assert_eq!(truncate_with_ellipsis("hello", 5), "hello");
}

#[test]
fn test_truncate_with_ellipsis_long_string() {
    let result = truncate_with_ellipsis("Shree Mahavir Seva Trust Annual Meet", 10);
    assert_eq!(result, "Shree M...");
}

#[test]
fn test_truncate_with_ellipsis_unicode() {
    assert_eq!(truncate_with_ellipsis("नमस्ते दुनिया", 13), "नमस्ते दुनिया");
    assert_eq!(truncate_with_ellipsis("hello 世界", 7), "hell...");
}

#[test]
fn test_format_optional() {
    assert_eq!(format_optional(None), "-");
    assert_eq!(format_optional(Some("  ")), "-");
    assert_eq!(format_optional(Some(" Mulund ")), "Mulund");
}

#[test]
fn test_parse_filter_splits_on_first_equals() {
    let (column, value) = parse_filter("gender = Female").unwrap();
    assert_eq!(column, "gender");
    assert_eq!(value, "Female");

    let (column, value) = parse_filter("note=a=b").unwrap();
    assert_eq!(column, "note");
    assert_eq!(value, "a=b");
}

#[test]
fn test_parse_filter_rejects_missing_column() {
    assert!(parse_filter("gender").is_err());
    assert!(parse_filter("=Female").is_err());
}

#[test]
fn test_page_footer() {
    let pagination = Pagination::new(2, 10);
    assert_eq!(page_footer(&pagination, 25), "Page 2 of 3 (25 total)");
    assert_eq!(page_footer(&Pagination::new(1, 10), 0), "Page 1 of 1 (0 total)");
}
