//! Decoder throughput: streaming yEnc and gzip inflation

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nntp_stream::YencDecoder;
use std::io::Write;

fn yenc_fixture(size: usize) -> Vec<u8> {
    let plain: Vec<u8> = (0u8..=255).cycle().take(size).collect();
    let mut encoded = Vec::with_capacity(size + size / 64);
    for &b in &plain {
        let e = b.wrapping_add(42);
        if matches!(e, 0x00 | 0x0A | 0x0D | 0x3D) {
            encoded.push(b'=');
            encoded.push(e.wrapping_add(64));
        } else {
            encoded.push(e);
        }
    }
    encoded
}

fn bench_yenc_decode(c: &mut Criterion) {
    let encoded = yenc_fixture(768 * 1024);
    c.bench_function("yenc_decode_768k", |b| {
        b.iter(|| {
            let mut decoder = YencDecoder::new();
            let mut total = 0;
            for chunk in encoded.chunks(128) {
                total += decoder.decode(black_box(chunk)).len();
            }
            black_box((total, decoder.crc32()))
        })
    });
}

fn bench_gzip_inflate(c: &mut Criterion) {
    let overview: Vec<u8> = (0..10_000)
        .flat_map(|i| {
            format!("{i}\tsubject {i}\tposter@example.com\t<{i}@example.com>\t\t120\t7\r\n")
                .into_bytes()
        })
        .collect();
    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&overview).unwrap();
    let compressed = encoder.finish().unwrap();

    c.bench_function("gzip_inflate_overview", |b| {
        b.iter(|| {
            let mut decoder = flate2::write::GzDecoder::new(Vec::new());
            decoder.write_all(black_box(&compressed)).unwrap();
            black_box(decoder.finish().unwrap().len())
        })
    });
}

criterion_group!(benches, bench_yenc_decode, bench_gzip_inflate);
criterion_main!(benches);
