use bracket_css::{
    extract_tokens_parallel, CacheConfig, ClassCompiler, CssGenerator, GenerateOptions, GeneratorConfig,
    SecurityConfig, ValueValidator,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Mixed token set covering the main validator families
fn create_tokens(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 6 {
            0 => format!("p-[{}px,{}rem]", i, i % 4),
            1 => format!("hover:bg-[#{:06x}]", i * 4099 % 0xffffff),
            2 => format!("md:border-[{}px,solid,rgb({},0,0)]", i % 5 + 1, i % 256),
            3 => format!("font-[italic,bold,{}px/1.5,Open-Sans,serif]", 8 + i),
            4 => format!("transition-[opacity,{}ms,ease-in-out]", i),
            _ => format!("w-[calc(100%-{}px)]", i),
        })
        .collect()
}

fn create_markup(count: usize) -> Vec<String> {
    create_tokens(count)
        .chunks(10)
        .map(|chunk| format!(r#"<div class="{}"><span>text</span></div>"#, chunk.join(" ")))
        .collect()
}

fn uncached_config() -> GeneratorConfig {
    GeneratorConfig {
        cache: CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        },
        ..GeneratorConfig::default()
    }
}

fn benchmark_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    group.sample_size(20);

    for count in [10, 100, 1000].iter() {
        let tokens = create_tokens(*count);
        let compiler = ClassCompiler::new(&GenerateOptions::default(), &SecurityConfig::default());
        group.bench_with_input(BenchmarkId::new("tokens", count), &tokens, |b, tokens| {
            b.iter(|| compiler.compile(black_box(tokens.as_slice())).unwrap());
        });
    }

    let tokens = create_tokens(1000);
    let generator = CssGenerator::new(uncached_config());
    group.bench_function("generate_uncached_1000", |b| {
        b.iter(|| generator.generate(black_box(tokens.clone())));
    });

    let generator = CssGenerator::default();
    generator.generate(tokens.clone());
    group.bench_function("generate_cached_1000", |b| {
        b.iter(|| generator.generate(black_box(tokens.clone())));
    });

    group.finish();
}

fn benchmark_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let validator = ValueValidator::default();

    let cases = [
        ("length", "margin", "1rem 2rem 3rem 4rem"),
        ("color", "color", "rgba(10,20,30,0.5)"),
        ("font", "font", "italic,bold,16px/1.5,Open-Sans,sans-serif"),
        ("shadow", "box-shadow", "0_1px_2px_red,0_2px_4px_blue"),
        ("gradient", "background-image", "linear-gradient(to_right,red,blue_50%,green)"),
        ("url", "background-image", "u(https://example.com/image.png)"),
    ];
    for (name, property, value) in cases.iter() {
        group.bench_function(*name, |b| {
            b.iter(|| validator.validate(black_box(value), black_box(property)))
        });
    }

    group.finish();
}

fn benchmark_markup_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("markup_extraction");
    group.sample_size(20);

    for docs in [10, 100, 500].iter() {
        let markup = create_markup(docs * 10);
        group.bench_with_input(BenchmarkId::new("documents", docs), &markup, |b, markup| {
            b.iter(|| extract_tokens_parallel(black_box(markup.as_slice())));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_compile, benchmark_validation, benchmark_markup_extraction);
criterion_main!(benches);
