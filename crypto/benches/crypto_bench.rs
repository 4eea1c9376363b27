use criterion::{black_box, criterion_group, criterion_main, Criterion};

use badged_crypto::{CertificateEnvelope, keypair_from_seed};

const REQUEST: &[u8] =
    br#"{"serial":"1024","offer":"Free Coffee","holder":"alice","project":"Cafe"}"#;

fn ed25519_sign_bench(c: &mut Criterion) {
    let kp = badged_crypto::generate_keypair();
    let msg = [42u8; 128];

    c.bench_function("ed25519_sign_128B", |b| {
        b.iter(|| badged_crypto::sign_message(black_box(&msg), &kp.private))
    });
}

fn envelope_decode_bench(c: &mut Criterion) {
    let kp = keypair_from_seed(&[3u8; 32]);
    let bytes = CertificateEnvelope::issue("cafe", REQUEST, &kp)
        .to_bytes()
        .unwrap();

    c.bench_function("envelope_decode", |b| {
        b.iter(|| CertificateEnvelope::from_bytes(black_box(&bytes)).unwrap())
    });
}

fn envelope_verify_bench(c: &mut Criterion) {
    let kp = keypair_from_seed(&[3u8; 32]);
    let envelope = CertificateEnvelope::issue("cafe", REQUEST, &kp);
    let trusted = [kp.public];

    c.bench_function("envelope_verify", |b| {
        b.iter(|| black_box(&envelope).verify(&trusted).unwrap())
    });
}

criterion_group!(
    benches,
    ed25519_sign_bench,
    envelope_decode_bench,
    envelope_verify_bench
);
criterion_main!(benches);
