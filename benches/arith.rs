use std::hint::black_box;

use bigratio::modular;
use bigratio::{Int, Round};
use criterion::{Criterion, criterion_group, criterion_main};

fn big(limbs: usize, salt: u64) -> Int {
    let mut v = Int::from(salt | 1);
    for i in 0..limbs {
        v = v
            .shift(32)
            .add(&Int::from((i as u64).wrapping_mul(0x9e37_79b9).wrapping_add(salt)));
    }
    v
}

fn bench_multiply(c: &mut Criterion) {
    let a = big(64, 0xdead);
    let b = big(64, 0xbeef);
    c.bench_function("mul_64_limbs", |bench| {
        bench.iter(|| black_box(&a).mul(black_box(&b)))
    });

    let a = big(512, 0xfeed);
    let b = big(512, 0xface);
    c.bench_function("mul_512_limbs", |bench| {
        bench.iter(|| black_box(&a).mul(black_box(&b)))
    });

    let a = big(512, 0xaaaa);
    c.bench_function("square_512_limbs", |bench| {
        bench.iter(|| black_box(&a).square())
    });
}

fn bench_divide(c: &mut Criterion) {
    let a = big(256, 0x1234);
    let b = big(96, 0x5678);
    c.bench_function("divmod_256_by_96", |bench| {
        bench.iter(|| black_box(&a).divmod(black_box(&b), Round::DOWN).unwrap())
    });
}

fn bench_powmod(c: &mut Criterion) {
    let m = big(8, 0x4242).bit_or(&Int::one());
    let base = big(6, 0x1111);
    let e = big(8, 0x2222);
    c.bench_function("powmod_redc_256_bit", |bench| {
        bench.iter(|| modular::powermod(black_box(&base), black_box(&e), black_box(&m)).unwrap())
    });

    let m = Int::from(1_000_000_007u64);
    c.bench_function("powmod_word_modulus", |bench| {
        bench.iter(|| {
            modular::powermod(black_box(&Int::two()), black_box(&Int::from(1_000_000u64)), &m)
                .unwrap()
        })
    });
}

fn bench_gcd(c: &mut Criterion) {
    let a = big(128, 0x9999);
    let b = big(127, 0x7777);
    c.bench_function("gcd_128_limbs", |bench| {
        bench.iter(|| black_box(&a).gcd(black_box(&b)))
    });
}

criterion_group!(benches, bench_multiply, bench_divide, bench_powmod, bench_gcd);
criterion_main!(benches);
