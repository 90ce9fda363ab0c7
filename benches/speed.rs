use std::io::{Read, Write};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use base91::*;
use rand::{rngs::SmallRng, RngCore, SeedableRng};

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = SmallRng::from_entropy();

    c.bench_function("round-trip 32", |b| {
        let setup = || {
            let mut data = [0; 32];
            rng.fill_bytes(&mut data);
            data
        };
        let routine = |bytes| {
            let encoded = encode(bytes);
            let decoded = decode(&encoded);
            (encoded, decoded)
        };
        b.iter_batched(setup, routine, BatchSize::SmallInput)
    });

    let mut data = vec![0; 64 * 1024];
    rng.fill_bytes(&mut data);
    let encoded = encode(&data);

    let mut group = c.benchmark_group("64 KiB");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("encode", |b| b.iter(|| encode(&data)));
    group.bench_function("decode", |b| b.iter(|| decode(&encoded)));
    group.bench_function("stream encode", |b| b.iter(|| {
        let mut encoder = STANDARD.encoder(Vec::with_capacity(encoded.len()));
        for chunk in data.chunks(4096) {
            encoder.write_all(chunk).unwrap();
        }
        encoder.finish().unwrap()
    }));
    group.bench_function("stream decode", |b| b.iter(|| {
        let mut decoded = Vec::with_capacity(data.len());
        STANDARD.decoder(encoded.as_bytes()).read_to_end(&mut decoded).unwrap();
        decoded
    }));
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
