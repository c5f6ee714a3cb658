use addr::classify;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::net::IpAddr;

fn benchmark_classify_special(c: &mut Criterion) {
    let addrs: Vec<IpAddr> = ["10.1.2.3", "169.254.9.9", "fe80::1", "2001:db8::1"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();

    c.bench_function("classify_special_purpose", |b| {
        b.iter(|| {
            for ip in &addrs {
                black_box(classify(black_box(*ip)));
            }
        })
    });
}

fn benchmark_classify_global(c: &mut Criterion) {
    // Global addresses walk the whole table
    let addrs: Vec<IpAddr> = ["1.1.1.1", "8.8.8.8", "2606:4700::1111", "2001:4860::8888"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();

    c.bench_function("classify_global", |b| {
        b.iter(|| {
            for ip in &addrs {
                black_box(classify(black_box(*ip)));
            }
        })
    });
}

fn benchmark_classify_mapped(c: &mut Criterion) {
    let ip: IpAddr = "::ffff:192.168.1.1".parse().unwrap();

    c.bench_function("classify_ipv4_mapped", |b| {
        b.iter(|| black_box(classify(black_box(ip))))
    });
}

criterion_group!(
    benches,
    benchmark_classify_special,
    benchmark_classify_global,
    benchmark_classify_mapped
);
criterion_main!(benches);
