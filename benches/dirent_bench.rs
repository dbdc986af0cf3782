use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use parawalk::dirent::EntryDecoder;
use std::hint::black_box;
use std::path::Path;

/// `d_ino(8) + d_off(8) + d_reclen(2) + d_type(1)`, matching the layout
/// `dirent::raw::EntryDecoder` expects.
const HEADER_LEN: usize = 19;

const fn round_up_8(n: usize) -> usize {
    (n + 7) & !7
}

/// Packs one synthetic `dirent64` record (NUL-terminated name, padded to
/// an 8-byte reclen) into `buf`, returning the record length.
fn push_record(buf: &mut Vec<u8>, ino: u64, d_type: u8, name: &str) -> usize {
    let name_len = name.len();
    let reclen = round_up_8(HEADER_LEN + name_len + 1);

    buf.extend_from_slice(&ino.to_ne_bytes());
    buf.extend_from_slice(&0u64.to_ne_bytes()); // d_off, unused by the decoder
    buf.extend_from_slice(&(reclen as u16).to_ne_bytes());
    buf.push(d_type);
    buf.extend_from_slice(name.as_bytes());
    buf.push(0);
    buf.resize(buf.len() + (reclen - HEADER_LEN - name_len - 1), 0);

    reclen
}

/// Builds a buffer holding one record per name, as `getdents64` would
/// return for a directory containing exactly these entries.
fn build_buffer(names: &[&str]) -> Vec<u8> {
    let mut buf = Vec::new();
    for (i, name) in names.iter().enumerate() {
        push_record(&mut buf, i as u64, libc::DT_REG, name);
    }
    buf
}

fn bench_decode(c: &mut Criterion) {
    let cases: &[(&str, &[&str])] = &[
        ("empty", &[]),
        ("few_short_names", &["a", "b", "c", "d", "e"]),
        (
            "many_short_names",
            &[
                "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s", "t",
            ],
        ),
        ("few_long_names", &["a_file_with_a_fairly_long_but_realistic_name.rs", "another_long_filename_for_testing.txt"]),
    ];

    let path = Path::new("/bench/dir");
    let mut group = c.benchmark_group("dirent_decode");

    for (label, names) in cases {
        let buf = build_buffer(names);
        group.throughput(Throughput::Elements(names.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode_entries", label), &buf, |b, buf| {
            b.iter(|| {
                let mut count = 0u64;
                for decoded in EntryDecoder::new(black_box(buf), buf.len(), path) {
                    count += u64::from(decoded.is_ok());
                }
                black_box(count)
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(200)
        .warm_up_time(std::time::Duration::from_millis(500))
        .measurement_time(std::time::Duration::from_secs(3));
    targets = bench_decode
}
criterion_main!(benches);
