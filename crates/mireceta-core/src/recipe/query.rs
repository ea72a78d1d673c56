//! Pure queries over a recipe collection.
//!
//! The catalog store delegates its read-side operations here so they can be
//! used on any snapshot, not only the live collection.

use serde::{Deserialize, Serialize};

use super::model::{Difficulty, DifficultyFilter, Recipe};

/// Returns true if `recipe` matches the already lower-cased `term` on its
/// name, description or any ingredient.
fn matches_term(recipe: &Recipe, term: &str) -> bool {
    recipe.name.to_lowercase().contains(term)
        || recipe.description.to_lowercase().contains(term)
        || recipe
            .ingredients
            .iter()
            .any(|ingredient| ingredient.to_lowercase().contains(term))
}

/// Case-insensitive substring search over name, description and ingredients.
///
/// A blank query returns the whole collection. The term itself is not
/// trimmed, so `" rice"` only matches text containing a space before "rice".
pub fn search<'a>(recipes: &'a [Recipe], query: &str) -> Vec<&'a Recipe> {
    if query.trim().is_empty() {
        return recipes.iter().collect();
    }
    let term = query.to_lowercase();
    recipes
        .iter()
        .filter(|recipe| matches_term(recipe, &term))
        .collect()
}

/// Exact difficulty match; `DifficultyFilter::All` returns everything.
pub fn filter_by_difficulty(recipes: &[Recipe], filter: DifficultyFilter) -> Vec<&Recipe> {
    recipes
        .iter()
        .filter(|recipe| filter.admits(recipe.difficulty))
        .collect()
}

/// Search followed by a difficulty filter, as the browse view applies them.
pub fn search_and_filter<'a>(
    recipes: &'a [Recipe],
    query: &str,
    filter: DifficultyFilter,
) -> Vec<&'a Recipe> {
    search(recipes, query)
        .into_iter()
        .filter(|recipe| filter.admits(recipe.difficulty))
        .collect()
}

/// Summary figures shown on the favorites view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStats {
    pub count: usize,
    /// Mean preparation time rounded to the nearest minute; 0 when empty.
    pub average_prep_time_minutes: u32,
    /// `None` when there are no favorites.
    pub most_common_difficulty: Option<Difficulty>,
}

/// Computes [`FavoriteStats`] over the given recipes.
///
/// On a tie for the most common difficulty, the level that appeared later
/// (by first occurrence) wins.
pub fn favorite_stats<'a, I>(recipes: I) -> FavoriteStats
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut count = 0usize;
    let mut total_minutes = 0u64;
    // First-seen order matters for tie breaking.
    let mut tally: Vec<(Difficulty, usize)> = Vec::new();

    for recipe in recipes {
        count += 1;
        total_minutes += u64::from(recipe.prep_time_minutes);
        match tally.iter_mut().find(|(level, _)| *level == recipe.difficulty) {
            Some((_, n)) => *n += 1,
            None => tally.push((recipe.difficulty, 1)),
        }
    }

    if count == 0 {
        return FavoriteStats::default();
    }

    let average = (total_minutes as f64 / count as f64).round() as u32;
    let most_common = tally
        .iter()
        .copied()
        .reduce(|best, candidate| if best.1 > candidate.1 { best } else { candidate })
        .map(|(level, _)| level);

    FavoriteStats {
        count,
        average_prep_time_minutes: average,
        most_common_difficulty: most_common,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::seed::sample_recipes;

    #[test]
    fn test_blank_query_returns_everything() {
        let recipes = sample_recipes();
        assert_eq!(search(&recipes, "").len(), 3);
        assert_eq!(search(&recipes, "   ").len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let recipes = sample_recipes();
        let hits = search(&recipes, "PAELLA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Paella Valenciana");
    }

    #[test]
    fn test_search_matches_ingredients_and_description() {
        let recipes = sample_recipes();
        // Peppers appear in the paella and the ratatouille
        let names: Vec<_> = search(&recipes, "pepper").iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Paella Valenciana", "Ratatouille"]);

        let hits = search(&recipes, "mediterranean");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ratatouille");
    }

    #[test]
    fn test_search_without_match_is_empty() {
        let recipes = sample_recipes();
        assert!(search(&recipes, "sushi").is_empty());
    }

    #[test]
    fn test_filter_by_difficulty() {
        let recipes = sample_recipes();
        assert_eq!(filter_by_difficulty(&recipes, DifficultyFilter::All).len(), 3);

        let easy = filter_by_difficulty(&recipes, Difficulty::Easy.into());
        assert_eq!(easy.len(), 1);
        assert_eq!(easy[0].name, "Caesar Salad");
    }

    #[test]
    fn test_search_and_filter_combines_both() {
        let recipes = sample_recipes();
        let hits = search_and_filter(&recipes, "pepper", Difficulty::Hard.into());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ratatouille");
    }

    #[test]
    fn test_favorite_stats() {
        let recipes = sample_recipes();
        let stats = favorite_stats(&recipes);
        assert_eq!(stats.count, 3);
        // (45 + 15 + 60) / 3 = 40
        assert_eq!(stats.average_prep_time_minutes, 40);
        // Three-way tie: the last level seen wins
        assert_eq!(stats.most_common_difficulty, Some(Difficulty::Hard));

        let empty = favorite_stats(std::iter::empty());
        assert_eq!(empty, FavoriteStats::default());
        assert!(empty.most_common_difficulty.is_none());
    }

    #[test]
    fn test_favorite_stats_rounds_average() {
        let recipes = sample_recipes();
        // (45 + 60) / 2 = 52.5 -> 53
        let stats = favorite_stats([&recipes[0], &recipes[2]]);
        assert_eq!(stats.average_prep_time_minutes, 53);
    }
}
