use artmint_flows::reward::RewardSchedule;
use artmint_flows::TokenMetadataCache;
use artmint_flows::{StaticTokenList, TokenMetadata};
use artmint_chain::Pubkey;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

fn bench_reward(c: &mut Criterion) {
    let schedule = RewardSchedule::default();
    let mut group = c.benchmark_group("reward");

    for amount in [1.0, 999.0, 1_000.0, 50_000.0] {
        group.bench_with_input(BenchmarkId::new("reward_for", amount), &amount, |b, &amount| {
            b.iter(|| schedule.reward_for(black_box(amount)));
        });
    }

    group.bench_function("quote", |b| {
        b.iter(|| schedule.quote(black_box(1_234.5)));
    });

    group.finish();
}

fn bench_metadata_cache(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut entries = HashMap::new();
    for i in 0..100u8 {
        entries.insert(
            Pubkey::new([i; 32]),
            TokenMetadata {
                symbol: format!("T{}", i),
                name: format!("Token {}", i),
                logo_uri: None,
            },
        );
    }
    let cache = TokenMetadataCache::new(Arc::new(StaticTokenList::new(entries)), Duration::from_secs(300));
    let mint = Pubkey::new([42u8; 32]);
    rt.block_on(async { cache.get(&mint).await.unwrap() });

    c.bench_function("metadata_cache_hit", |b| {
        b.iter(|| rt.block_on(async { cache.get(black_box(&mint)).await.unwrap() }));
    });
}

criterion_group!(benches, bench_reward, bench_metadata_cache);
criterion_main!(benches);
