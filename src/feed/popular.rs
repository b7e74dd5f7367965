use crate::api::Article;

/// Maximum size of the popular subset.
pub const POPULAR_LIMIT: usize = 8;

/// Pick the articles for the "Popular" panel.
///
/// Featured articles win: when at least one is featured, the first
/// `POPULAR_LIMIT` featured items are returned in their existing order.
/// With none featured, the first `POPULAR_LIMIT` items of the list are used
/// instead, so the panel is empty only when the list is.
pub fn compute_popular(articles: &[Article]) -> Vec<Article> {
    let featured: Vec<Article> = articles
        .iter()
        .filter(|a| a.featured)
        .take(POPULAR_LIMIT)
        .cloned()
        .collect();

    if !featured.is_empty() {
        return featured;
    }

    articles.iter().take(POPULAR_LIMIT).cloned().collect()
}
