use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use monster_textbuf::buffer::{GapBuffer, SegmentedBuffer};

fn buffer_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_insertion");

    static TEXT: &[u8] = b"The quick brown fox jumps over the lazy dog. ";
    group.throughput(Throughput::Bytes(TEXT.len() as u64));
    group.bench_function("add_small", |b| {
        b.iter_batched(
            || GapBuffer::new(1024).unwrap(),
            |mut buf| {
                buf.add(black_box(TEXT)).unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });

    // Repeated inserts at one point stay on the cheap path
    group.bench_function("add_repeated", |b| {
        b.iter_batched(
            || GapBuffer::new(1024).unwrap(),
            |mut buf| {
                for _ in 0..100 {
                    buf.add(black_box(b"word ")).unwrap();
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });

    // Alternating edit points force gap moves
    group.bench_function("insert_alternating_points", |b| {
        b.iter_batched(
            || {
                let mut buf = GapBuffer::new(1024).unwrap();
                buf.add(&vec![b'x'; 64 * 1024]).unwrap();
                buf
            },
            |mut buf| {
                for k in 0..50 {
                    let point = if k % 2 == 0 { 0 } else { buf.len() / 2 };
                    buf.set_point(point);
                    buf.insert(black_box(b"y")).unwrap();
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn buffer_deletion(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_deletion");

    let setup_buf = || {
        let mut buf = GapBuffer::new(1024).unwrap();
        for _ in 0..100 {
            buf.add(b"Some text to delete. ").unwrap();
        }
        buf.set_point(0);
        buf
    };

    group.bench_function("delete_forward", |b| {
        b.iter_batched(
            setup_buf,
            |mut buf| {
                for _ in 0..50 {
                    buf.delete(black_box(4));
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn buffer_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_reads");

    let setup_buf = || {
        let mut buf = GapBuffer::new(1024).unwrap();
        buf.add(&vec![b'a'; 256 * 1024]).unwrap();
        // Park the gap in the middle so reads have to splice
        buf.set_point(128 * 1024);
        buf.insert(b"b").unwrap();
        buf
    };

    let buf = setup_buf();
    group.throughput(Throughput::Bytes(buf.len() as u64));
    group.bench_function("get_range_whole", |b| {
        let mut out = vec![0u8; buf.len()];
        b.iter(|| black_box(buf.get_range(0, &mut out)))
    });

    group.bench_function("find_next_scan", |b| {
        b.iter(|| black_box(buf.find_next(0, b'b')))
    });

    group.finish();
}

fn segmented_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmented_insertion");

    static CHUNK: usize = 4 * 1024 * 1024;
    group.throughput(Throughput::Bytes(CHUNK as u64));
    group.bench_function("bulk_insert_4mib", |b| {
        let data = vec![b'z'; CHUNK];
        b.iter_batched(
            || SegmentedBuffer::new().unwrap(),
            |mut buf| {
                buf.insert(black_box(&data)).unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    buffer_insertion,
    buffer_deletion,
    buffer_reads,
    segmented_insertion
);
criterion_main!(benches);
