use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_display_is_the_code_name() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E3001.as_str(), "E3001");
    assert_eq!(format!("[{}]", ErrorCode::E2006), "[E2006]");
}

#[test]
fn test_leading_digit_names_the_phase() {
    for &code in ErrorCode::ALL {
        let expected = match &code.as_str()[..2] {
            "E0" => Phase::Lex,
            "E1" => Phase::Parse,
            "E2" => Phase::Check,
            "E3" => Phase::Load,
            other => panic!("unexpected prefix {other}"),
        };
        assert_eq!(code.phase(), expected, "{code}");
    }
}

#[test]
fn test_codes_are_sorted_and_unique() {
    let names: Vec<&str> = ErrorCode::ALL.iter().map(|c| c.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(names, sorted);
}

#[test]
fn test_descriptions() {
    assert_eq!(ErrorCode::E2012.description(), "constants cannot declare a type");
    assert!(ErrorCode::ALL.iter().all(|c| !c.description().is_empty()));
}
