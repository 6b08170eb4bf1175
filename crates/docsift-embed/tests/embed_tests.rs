use docsift_core::traits::Embedder;
use docsift_embed::HashingEmbedder;

fn cosine(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

#[test]
fn hashing_embedder_shapes_and_determinism() {
    let embedder = HashingEmbedder::new(384).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 384, "embedding dim is 384");
    assert_eq!(embedder.dim(), 384);

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn shared_words_score_higher_than_disjoint_ones() {
    let embedder = HashingEmbedder::new(256).expect("embedder");
    let q = embedder.embed_text("machine learning applications");
    let near = embedder.embed_text("Applications of machine learning in medicine");
    let far = embedder.embed_text("bread baking schedule");
    assert!(cosine(&q, &near) > cosine(&q, &far));
}

#[test]
fn empty_text_is_zero_vector_and_zero_dim_is_rejected() {
    let embedder = HashingEmbedder::new(8).expect("embedder");
    assert!(embedder.embed_text("  ").iter().all(|x| *x == 0.0));
    assert!(HashingEmbedder::new(0).is_err());
}
