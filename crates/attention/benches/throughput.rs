//! Throughput benchmark for masked multi-head attention.
//! Run with: `cargo bench -p attention throughput`

use attention::masks::build_causal_mask;
use attention::{Config, MultiHeadAttention};
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_attention(c: &mut Criterion) {
    let device = Device::Cpu;
    let batch = 2usize;
    let cases = [(128usize, 4usize, 32usize), (256, 8, 64), (512, 8, 100)];

    let mut group = c.benchmark_group("attention/causal");
    for &(embed_size, heads, seq_len) in &cases {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let attention =
            MultiHeadAttention::new(Config::new(embed_size, heads), vb).expect("attention init");
        let hidden =
            Tensor::randn(0f32, 1.0, (batch, seq_len, embed_size), &device).expect("input");
        let mask = build_causal_mask(&device, batch, seq_len).expect("mask");

        group.throughput(Throughput::Elements((batch * seq_len) as u64));
        group.bench_with_input(
            BenchmarkId::new(format!("e{embed_size}_h{heads}"), seq_len),
            &hidden,
            |b, hidden| {
                b.iter(|| {
                    let out = attention
                        .forward(hidden, hidden, hidden, Some(&mask))
                        .expect("forward");
                    black_box(out);
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_attention);
criterion_main!(benches);
