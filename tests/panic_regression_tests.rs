//! Regression tests to ensure malformed or hostile tokens never panic.
//! Every token must come back as either CSS or a collected rejection.

use bracket_css::{generate, parse_class, GenerateOptions, ValueValidator};

fn assert_handled(tokens: &[&str]) {
    for token in tokens {
        let response = generate(vec![*token], &GenerateOptions::default());
        assert!(response.success, "'{}' failed the whole call: {:?}", token, response.error);
        let stats = response.stats().unwrap();
        assert!(
            stats.total_classes() <= 1,
            "'{}' produced {} classes",
            token,
            stats.total_classes()
        );
    }
}

#[test]
fn test_bracket_edge_cases_no_panic() {
    assert_handled(&[
        "[", "]", "[]", "-[", "p-[", "p-]", "p-][", "p-[]]", "p-[[", "]p-[1px]",
        "p-[1px]]", "p-[(]", "p-[)]", "p-[(((]", "p-[)))]", ":", "::", ":p-[1px]",
        "p-[1px]:", "!", "!!", "!p-[1px]!", "p-[1px]!important!", "!-[1px]",
    ]);
}

#[test]
fn test_unicode_tokens_no_panic() {
    assert_handled(&[
        "p-[é]", "p-[1é]", "p-[1px]é", "é:p-[1px]", "ß-[1px]", "content-['日本語']",
        "w-[calc(1px+é)]", "color-[#ééé]", "font-[bold,18px,Ünïcödé]", "p-[١٢px]",
        "content-['\u{200b}']", "bg-[u(https://例え.jp/a.png)]", "w-[1\u{0301}px]",
    ]);
}

#[test]
fn test_malformed_functions_no_panic() {
    assert_handled(&[
        "w-[calc(]", "w-[calc()]", "w-[calc(1px+)]", "w-[calc(*1px)]", "w-[calc(1px 2px)]",
        "color-[rgb()]", "color-[rgb(1,2)]", "color-[hsl(,,)]", "color-[rgba(1,2,3,4,5)]",
        "transform-[rotate()]", "transform-[translate(1px,2px,3px)]", "grid-cols-[repeat(,1fr)]",
        "background-image-[linear-gradient()]", "background-image-[linear-gradient(to)]",
        "clip-path-[polygon()]", "filter-[drop-shadow()]", "content-[counter()]",
        "bg-image-[u()]", "bg-image-[u(]", "bg-image-[u('')]", "p-[var()]", "p-[var(--)]",
        "p-[var(--x,)]", "transition-[,]", "animation-[1s,1s,1s]",
    ]);
}

#[test]
fn test_numeric_edge_cases_no_panic() {
    assert_handled(&[
        "p-[.px]", "p-[1.px]", "p-[1..2px]", "p-[-]", "p-[+]", "p-[1e999px]",
        "opacity-[99999999999999999999999999]", "z-[-99999999999999999999]", "p-[NaNpx]",
        "rotate-[infdeg]", "flex-grow-[-0]",
    ]);
}

#[test]
fn test_parser_and_validator_agree_on_garbage() {
    let validator = ValueValidator::default();
    for token in ["p-[,]", "m-[_]", "font-[,,,]", "border-[___]", "shadow-[,,]"] {
        if let Ok(parsed) = parse_class(token) {
            assert!(validator.validate_class(&parsed).is_err(), "'{}' should not validate", token);
        }
    }
}
