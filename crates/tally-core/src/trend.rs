//! Category trends: per-category review statistics ranked by average rating.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// How many categories a trend listing returns.
pub const TREND_LIMIT: usize = 5;

/// Aggregate statistics for one category, as computed by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
  pub category:      Category,
  pub total_reviews: u64,
  /// `None` when the category has no reviews.
  pub average_stars: Option<f64>,
}

/// One entry of a trend listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTrend {
  pub id:            i64,
  pub name:          String,
  pub description:   String,
  pub average_stars: f64,
  pub total_reviews: u64,
}

/// Rank categories by average stars, highest first, keeping at most `limit`.
///
/// Categories without reviews have no average and are skipped. Equal
/// averages are ordered by category id, ascending.
pub fn rank(
  stats: impl IntoIterator<Item = CategoryStats>,
  limit: usize,
) -> Vec<CategoryTrend> {
  let mut trends: Vec<CategoryTrend> = stats
    .into_iter()
    .filter(|s| s.total_reviews > 0)
    .filter_map(|s| {
      let average_stars = s.average_stars?;
      Some(CategoryTrend {
        id: s.category.id,
        name: s.category.name,
        description: s.category.description,
        average_stars,
        total_reviews: s.total_reviews,
      })
    })
    .collect();

  trends.sort_by(|a, b| {
    b.average_stars
      .partial_cmp(&a.average_stars)
      .unwrap_or(Ordering::Equal)
      .then(a.id.cmp(&b.id))
  });
  trends.truncate(limit);
  trends
}

#[cfg(test)]
mod tests {
  use super::*;

  fn stats(id: i64, stars: &[i64]) -> CategoryStats {
    let total = stars.len() as u64;
    CategoryStats {
      category:      Category {
        id,
        name:        format!("category-{id}"),
        description: String::new(),
      },
      total_reviews: total,
      average_stars: (total > 0)
        .then(|| stars.iter().sum::<i64>() as f64 / total as f64),
    }
  }

  #[test]
  fn empty_categories_are_excluded() {
    let out = rank([stats(1, &[]), stats(2, &[4]), stats(3, &[])], TREND_LIMIT);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, 2);
  }

  #[test]
  fn sorted_descending_and_bounded() {
    let input = [
      stats(1, &[1]),
      stats(2, &[5, 4]),
      stats(3, &[3]),
      stats(4, &[2, 2, 3]),
      stats(5, &[5]),
      stats(6, &[4, 4]),
      stats(7, &[1, 2]),
    ];
    let out = rank(input, TREND_LIMIT);
    assert_eq!(out.len(), TREND_LIMIT);
    assert!(out.windows(2).all(|w| w[0].average_stars >= w[1].average_stars));
    assert_eq!(out[0].id, 5);
    assert_eq!(out[1].id, 2);
  }

  #[test]
  fn average_is_arithmetic_mean() {
    let out = rank([stats(1, &[3, 5, 4])], TREND_LIMIT);
    assert_eq!(out[0].average_stars, 4.0);
    assert_eq!(out[0].total_reviews, 3);
  }

  #[test]
  fn ties_break_by_id() {
    let out = rank([stats(9, &[4]), stats(3, &[4]), stats(5, &[4])], TREND_LIMIT);
    let ids: Vec<i64> = out.iter().map(|t| t.id).collect();
    assert_eq!(ids, [3, 5, 9]);
  }

  #[test]
  fn no_categories_yields_empty() {
    assert!(rank(Vec::new(), TREND_LIMIT).is_empty());
  }
}
