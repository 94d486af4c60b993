use std::sync::Arc;

use comprehension::adapters::embeddings::HashingEmbeddingProvider;
use comprehension::adapters::sqlite::{create_migrated_test_pool, SqliteSimilarityEdgeRepository};
use comprehension::adapters::vector::{cosine_distance, InMemoryVectorIndex};
use comprehension::{AccumulationTracker, EmbeddingProvider, VectorIndex};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tokio::runtime::Runtime;

const DIM: usize = 384;
const DOMAINS: [&str; 6] = ["api", "database", "auth", "ui", "infra", "billing"];

fn runtime() -> Runtime {
    Runtime::new().unwrap()
}

fn bench_cosine_distance(c: &mut Criterion) {
    let a: Vec<f32> = (0..DIM).map(|i| (i as f32).sin()).collect();
    let b: Vec<f32> = (0..DIM).map(|i| (i as f32).cos()).collect();

    c.bench_function("cosine_distance_384", |bench| {
        bench.iter(|| cosine_distance(&a, &b));
    });
}

fn bench_hashing_embed(c: &mut Criterion) {
    let rt = runtime();
    let provider = HashingEmbeddingProvider::new(DIM);

    c.bench_function("hashing_embed_sentence", |b| {
        b.to_async(&rt).iter(|| async {
            provider
                .embed("retry with exponential backoff when the upstream returns 503")
                .await
                .unwrap()
        });
    });
}

fn bench_knn(c: &mut Criterion) {
    let rt = runtime();
    let provider = HashingEmbeddingProvider::new(DIM);
    let mut group = c.benchmark_group("in_memory_knn");

    for size in [100usize, 1_000, 5_000] {
        let index = InMemoryVectorIndex::new(DIM);
        rt.block_on(async {
            for i in 0..size {
                let text = format!("belief {i} about {} pattern {}", DOMAINS[i % DOMAINS.len()], i % 37);
                let v = provider.embed(&text).await.unwrap();
                index.upsert(&format!("comp-{i}"), &v).await.unwrap();
            }
        });
        let query = rt.block_on(provider.embed("belief about api pattern 3")).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.to_async(&rt).iter(|| async { index.knn(&query, 15).await.unwrap() });
        });
    }
    group.finish();
}

fn bench_hotspots(c: &mut Criterion) {
    let rt = runtime();
    let tracker = rt.block_on(async {
        let pool = create_migrated_test_pool().await.unwrap();
        let tracker = AccumulationTracker::new(Arc::new(SqliteSimilarityEdgeRepository::new(pool)));
        for i in 0..2_000 {
            let domain = DOMAINS[i % DOMAINS.len()];
            tracker
                .record_similarity(&format!("src-{i}"), &format!("target-{}", i % 50), 0.8, domain, "patterns")
                .await
                .unwrap();
        }
        tracker
    });

    c.bench_function("hotspots_2000_edges", |b| {
        b.to_async(&rt).iter(|| async { tracker.get_hotspots(2, 3).await.unwrap() });
    });
}

criterion_group!(benches, bench_cosine_distance, bench_hashing_embed, bench_knn, bench_hotspots);
criterion_main!(benches);
