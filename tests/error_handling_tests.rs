use bracket_css::{
    generate, parse_class, CompilerError, CssGenerator, GenerateOptions, GeneratorConfig, ParseError,
};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn rejection(token: &str) -> (String, String) {
    let response = generate(vec![token], &GenerateOptions::default());
    let stats = response.stats().expect("per-token errors never fail the call");
    let rejected = stats
        .rejected
        .first()
        .unwrap_or_else(|| panic!("{} should have been rejected", token));
    (rejected.kind.clone(), rejected.reason.clone())
}

#[test]
fn test_helpful_messages_for_parse_errors() {
    let cases = [
        ("p-2rem", "missing bracketed value"),
        ("p-[]", "empty bracketed value"),
        ("p-[1px", "unbalanced brackets"),
        ("p-[[1px]]", "nested brackets"),
        ("p-[1px]x", "unexpected characters after closing bracket"),
        ("wiggle:p-[1px]", "unknown modifier 'wiggle'"),
        ("hover:md:p-[1px]", "out of order"),
        ("m-[1px,,2px]", "empty value segment"),
        ("-[1px]", "missing property name"),
    ];
    for (token, message) in cases {
        let (kind, reason) = rejection(token);
        assert_eq!(kind, "parse", "{}", token);
        assert!(reason.contains(message), "{}: {}", token, reason);
    }
}

#[test]
fn test_validation_messages() {
    let (kind, reason) = rejection("outline-[2px,2px,solid,red]");
    assert_eq!(kind, "validation");
    assert!(reason.contains("duplicate"), "{}", reason);

    let (kind, reason) = rejection("m-[1px,2px,3px,4px,5px]");
    assert_eq!(kind, "validation");
    assert!(reason.contains("at most 4 values"), "{}", reason);

    let (kind, _) = rejection("opacity-[red]");
    assert_eq!(kind, "validation");

    let (kind, _) = rejection("font-[bold,Open-Sans]");
    assert_eq!(kind, "validation");
}

#[test]
fn test_parse_error_values() {
    assert_eq!(parse_class("").unwrap_err(), ParseError::Empty);
    assert_eq!(parse_class("p-4").unwrap_err(), ParseError::MissingBracket);
    assert!(matches!(
        parse_class(&format!("w-[{}]", "1".repeat(600))).unwrap_err(),
        ParseError::TooLong { .. }
    ));
}

#[test]
fn test_input_shape_errors_are_structured() {
    let generator = CssGenerator::default();
    for value in [json!(1), json!(true), json!({"tokens": ["p-[1px]"]}), json!([1, 2])] {
        let response = generator.generate_value(&value);
        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(response.error.as_deref().unwrap_or_default().starts_with("Invalid input shape"));
    }

    // zero valid classes is still a success
    let response = generator.generate_value(&json!(["nope"]));
    assert!(response.success);
    assert_eq!(response.stats().unwrap().valid_classes, 0);
}

#[test]
fn test_failed_response_json_shape() {
    let response = CssGenerator::default().generate_value(&json!(42));
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["success"], false);
    assert!(value.get("data").is_none());
    assert!(value["error"].is_string());
}

#[test]
fn test_config_errors() {
    let file = NamedTempFile::with_suffix(".toml").unwrap();
    let err = GeneratorConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, CompilerError::ConfigError { .. }));
    assert!(err.to_string().contains("Unsupported config file format"));

    let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
    writeln!(file, "options: [not, a, map]").unwrap();
    assert!(GeneratorConfig::from_file(file.path()).is_err());

    let missing = std::path::Path::new("/definitely/not/here.json");
    assert!(GeneratorConfig::from_file(missing).is_err());
}
