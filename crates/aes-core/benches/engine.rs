use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use aes_core::{expand_key, CipherConfig, Construction, Context, Key, SboxTable};

fn bench_key_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_schedule");
    for len in [16usize, 24, 32] {
        let key = Key::try_from(&vec![0x2bu8; len][..]).expect("valid key length");
        group.bench_with_input(BenchmarkId::from_parameter(len * 8), &key, |b, key| {
            b.iter(|| expand_key(key, &SboxTable::STANDARD));
        });
    }
    group.finish();
}

fn bench_constructions(c: &mut Criterion) {
    let key = Key::from([0u8; 16]);
    let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
    let mut block = [0u8; 16];
    rng.fill_bytes(&mut block);

    let configs = [
        ("standard", CipherConfig::default()),
        (
            "alt_mix",
            CipherConfig {
                sbox: SboxTable::EXPERIMENTAL,
                construction: Construction::AlternateMix(SboxTable::ALTERNATE),
            },
        ),
        (
            "composed",
            CipherConfig {
                sbox: SboxTable::EXPERIMENTAL,
                construction: Construction::ComposedSubstitution(SboxTable::ALTERNATE),
            },
        ),
    ];

    let mut group = c.benchmark_group("encrypt_block");
    for (name, config) in configs {
        let ctx = Context::new(&key, &config);
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut data = block;
                ctx.encrypt_block_ecb(&mut data);
                data
            });
        });
    }
    group.finish();
}

fn bench_modes(c: &mut Criterion) {
    let key = Key::from([1u8; 32]);
    let iv: [u8; 16] = core::array::from_fn(|i| i as u8);
    let mut payload = vec![0u8; 4096];
    ChaCha20Rng::from_seed([4u8; 32]).fill_bytes(&mut payload);

    let mut group = c.benchmark_group("modes_aes256");
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("cbc_encrypt", |b| {
        let mut ctx = Context::with_iv(&key, &iv, &CipherConfig::default());
        b.iter(|| {
            let mut data = payload.clone();
            ctx.encrypt_cbc(&mut data).expect("aligned payload");
            data
        });
    });
    group.bench_function("ctr_xcrypt", |b| {
        let mut ctx = Context::with_iv(&key, &iv, &CipherConfig::default());
        b.iter(|| {
            let mut data = payload.clone();
            ctx.xcrypt_ctr(&mut data);
            data
        });
    });
    group.finish();
}

criterion_group!(benches, bench_key_schedule, bench_constructions, bench_modes);
criterion_main!(benches);
