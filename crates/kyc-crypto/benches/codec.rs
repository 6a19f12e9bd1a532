use kyc_crypto::{generate_file_hash, DerivedKey, EncryptionConfig, FileCodec};

fn make_data(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8)
        .collect()
}

fn bench_codec() -> FileCodec {
    FileCodec::new(EncryptionConfig::from_key(DerivedKey::from_bytes([0xABu8; 32])))
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_encrypt(bencher: divan::Bencher, size: usize) {
    let codec = bench_codec();
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| codec.encrypt(divan::black_box(&data)).unwrap());
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_decrypt(bencher: divan::Bencher, size: usize) {
    let codec = bench_codec();
    let container = codec.encrypt(&make_data(size)).unwrap().container;
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| codec.decrypt(divan::black_box(&container)).unwrap());
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_file_hash(bencher: divan::Bencher, size: usize) {
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| generate_file_hash(divan::black_box(&data)));
}

fn main() {
    divan::main();
}
