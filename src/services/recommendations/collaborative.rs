use std::collections::{HashMap, HashSet};

use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{Product, ProductId, UserId},
};

/// Products bought by users whose purchases overlap with the subject's
///
/// 1. Seed with every product the user bought; no purchases, no result.
/// 2. Take the `neighbor_limit` other buyers sharing the most of those products.
/// 3. Rank what those neighbours bought, minus the user's own purchases and
///    `exclude`, by how many distinct neighbours bought it, then by rating.
pub async fn recommend(
    store: &dyn CatalogStore,
    user_id: UserId,
    limit: usize,
    exclude: Option<ProductId>,
    neighbor_limit: usize,
) -> AppResult<Vec<Product>> {
    let owned: HashSet<ProductId> = store
        .purchased_product_ids(user_id)
        .await?
        .into_iter()
        .collect();
    if owned.is_empty() {
        tracing::debug!(user_id, "No purchase history for collaborative filtering");
        return Ok(Vec::new());
    }

    let seed: Vec<ProductId> = owned.iter().copied().collect();
    let neighbours = store
        .overlapping_buyers(user_id, &seed, neighbor_limit)
        .await?;
    if neighbours.is_empty() {
        tracing::debug!(user_id, "No overlapping buyers");
        return Ok(Vec::new());
    }

    let neighbour_ids: Vec<UserId> = neighbours.iter().map(|n| n.user_id).collect();
    let mut buyers: HashMap<ProductId, HashSet<UserId>> = HashMap::new();
    for purchase in store.purchases_by_users(&neighbour_ids).await? {
        if owned.contains(&purchase.product_id) || Some(purchase.product_id) == exclude {
            continue;
        }
        buyers
            .entry(purchase.product_id)
            .or_default()
            .insert(purchase.user_id);
    }
    if buyers.is_empty() {
        return Ok(Vec::new());
    }

    let candidate_ids: Vec<ProductId> = buyers.keys().copied().collect();
    let candidates = store.products_by_ids(&candidate_ids).await?;
    let products = rank_by_buyers(candidates, &buyers, limit);

    tracing::debug!(
        user_id,
        neighbours = neighbour_ids.len(),
        candidates = candidate_ids.len(),
        count = products.len(),
        "Collaborative recommendations"
    );
    Ok(products)
}

/// Orders recommendable candidates by distinct buyer count, then rating,
/// then id, and keeps the first `limit`
fn rank_by_buyers(
    candidates: Vec<Product>,
    buyers: &HashMap<ProductId, HashSet<UserId>>,
    limit: usize,
) -> Vec<Product> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<(usize, Product)> = candidates
        .into_iter()
        .filter(|p| p.is_recommendable() && seen.insert(p.id))
        .map(|p| (buyers.get(&p.id).map_or(0, HashSet::len), p))
        .collect();

    ranked.sort_by(|(freq_a, a), (freq_b, b)| {
        freq_b
            .cmp(freq_a)
            .then_with(|| b.avg_rating.total_cmp(&a.avg_rating))
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked.truncate(limit);
    ranked.into_iter().map(|(_, p)| p).collect()
}
