use criterion::{black_box, criterion_group, criterion_main, Criterion};
use css_devendor::Cleaner;

fn synthetic_stylesheet(rules: usize) -> String {
    let mut css = String::new();
    for i in 0..rules {
        css.push_str(&format!(
            ".item-{i} {{\n  -webkit-transform: translate({i}px, 0);\n  \
             transform: translate({i}px, 0);\n  -moz-box-sizing: border-box;\n  \
             background: -webkit-linear-gradient(to left, #fff, #000);\n  \
             background: linear-gradient(to left, #fff, #000);\n}}\n"
        ));
        if i % 10 == 0 {
            css.push_str(&format!(
                "@-webkit-keyframes anim-{i} {{\n  0% {{ -webkit-transform: rotate(0); }}\n  \
                 100% {{ -webkit-transform: rotate(360deg); }}\n}}\n\
                 @keyframes anim-{i} {{\n  0%, 50% {{ transform: rotate(0); }}\n}}\n"
            ));
        }
    }
    css
}

fn bench_clean(c: &mut Criterion) {
    let small = synthetic_stylesheet(50);
    let large = synthetic_stylesheet(500);

    c.bench_function("clean_50_rules", |b| {
        b.iter(|| {
            let mut cleaner = Cleaner::new();
            cleaner.clean(black_box(&small)).unwrap()
        })
    });

    c.bench_function("clean_500_rules", |b| {
        b.iter(|| {
            let mut cleaner = Cleaner::new();
            cleaner.clean(black_box(&large)).unwrap()
        })
    });
}

criterion_group!(benches, bench_clean);
criterion_main!(benches);
