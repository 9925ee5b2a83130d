use bracket_css::{extract_tokens_parallel, CacheConfig, CssGenerator, GeneratorConfig};
use std::time::{Duration, Instant};

fn token_set(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 5 {
            0 => format!("p-[{}px]", i),
            1 => format!("hover:color-[rgb({},{},0)]", i % 256, i / 256),
            2 => format!("md:border-[{}px,solid,#{:06x}]", i % 10 + 1, i * 997 % 0xffffff),
            3 => format!("font-[bold,{}px,Open-Sans,sans-serif]", i),
            _ => format!("box-shadow-[0_{}px_{}px_rgba(0,0,0,0.5)]", i % 8, i),
        })
        .collect()
}

#[test]
fn test_performance_1000_tokens_under_5_seconds() {
    let generator = CssGenerator::default();
    let tokens = token_set(1000);

    let start = Instant::now();
    let response = generator.generate(tokens.clone());
    let elapsed = start.elapsed();

    let stats = response.stats().unwrap();
    assert_eq!(stats.valid_classes, 1000, "rejected: {:?}", stats.rejected.first());
    assert!(elapsed < Duration::from_secs(5), "took {:?}", elapsed);
}

#[test]
fn test_cached_call_is_cheaper() {
    let generator = CssGenerator::default();
    let tokens = token_set(500);

    let start = Instant::now();
    let first = generator.generate(tokens.clone());
    let cold = start.elapsed();

    let start = Instant::now();
    let second = generator.generate(tokens);
    let warm = start.elapsed();

    assert!(second.stats().unwrap().from_cache);
    assert_eq!(first.css(), second.css());
    assert!(warm <= cold, "warm {:?} vs cold {:?}", warm, cold);
}

#[test]
fn test_cache_stays_bounded() {
    let config = GeneratorConfig {
        cache: CacheConfig {
            max_entries: 10,
            ..CacheConfig::default()
        },
        ..GeneratorConfig::default()
    };
    let generator = CssGenerator::new(config);
    for i in 0..50 {
        generator.generate(vec![format!("w-[{}px]", i)]);
    }

    let stats = generator.cache().stats();
    assert_eq!(stats.entries, 10);
    assert_eq!(stats.evictions, 40);
}

#[test]
fn test_deduplication_of_repeated_tokens() {
    let generator = CssGenerator::default();
    let tokens: Vec<String> = (0..10_000).map(|i| format!("p-[{}px]", i % 10)).collect();
    let response = generator.generate(tokens);
    let stats = response.stats().unwrap();
    assert_eq!(stats.total_classes(), 10);
    assert_eq!(stats.rule_count, 10);
}

#[test]
fn test_parallel_markup_extraction() {
    let documents: Vec<String> = (0..200)
        .map(|i| format!(r#"<div class="p-[{}px] m-[1px]"><span class="w-[{}px]"></span></div>"#, i, i + 1))
        .collect();

    let start = Instant::now();
    let tokens = extract_tokens_parallel(&documents);
    assert!(start.elapsed() < Duration::from_secs(2));

    // p-[0..199], w-[1..200] and m-[1px] overlap only on m-[1px]
    assert_eq!(tokens.len(), 200 + 200 + 1);
    assert_eq!(tokens[0], "p-[0px]");
    assert_eq!(tokens[1], "m-[1px]");
}
