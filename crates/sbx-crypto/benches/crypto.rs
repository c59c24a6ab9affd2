use sbx_crypto::{decrypt_content, encrypt_content};

fn make_data(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8)
        .collect()
}

fn master_key() -> [u8; 32] {
    [0xA5u8; 32]
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_encrypt_content(bencher: divan::Bencher, size: usize) {
    let key = master_key();
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| {
            encrypt_content(
                divan::black_box(&data),
                divan::black_box(&key),
                "bench-content",
            )
            .unwrap()
        });
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_decrypt_content(bencher: divan::Bencher, size: usize) {
    let key = master_key();
    let data = make_data(size);
    let blob = encrypt_content(&data, &key, "bench-content").unwrap();
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| {
            decrypt_content(
                divan::black_box(&blob),
                divan::black_box(&key),
                "bench-content",
            )
            .unwrap()
        });
}

fn main() {
    divan::main();
}
