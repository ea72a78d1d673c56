//! Sample recipes seeded into an empty catalog on first run.

use chrono::Utc;

use super::model::{Difficulty, NewRecipe, Recipe};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Returns the three sample recipes with ids `"1"`, `"2"` and `"3"`.
pub fn sample_recipes() -> Vec<Recipe> {
    let now = Utc::now();
    let samples = [
        NewRecipe {
            name: "Paella Valenciana".to_string(),
            description: "Traditional Spanish dish with rice, chicken and vegetables".to_string(),
            ingredients: strings(&["Rice", "Chicken", "Peppers", "Tomato", "Saffron", "Olive oil"]),
            instructions: strings(&[
                "Heat the oil in the paella pan",
                "Brown the chicken",
                "Add the vegetables",
                "Stir in the rice and saffron",
                "Cook for 20 minutes",
            ]),
            difficulty: Difficulty::Intermediate,
            prep_time_minutes: 45,
            image: None,
            creator_id: None,
        },
        NewRecipe {
            name: "Caesar Salad".to_string(),
            description: "Fresh salad with romaine lettuce, chicken and Caesar dressing".to_string(),
            ingredients: strings(&[
                "Romaine lettuce",
                "Grilled chicken",
                "Parmesan",
                "Croutons",
                "Caesar dressing",
            ]),
            instructions: strings(&[
                "Wash and chop the lettuce",
                "Cook the chicken",
                "Toss the ingredients together",
                "Add the dressing",
            ]),
            difficulty: Difficulty::Easy,
            prep_time_minutes: 15,
            image: None,
            creator_id: None,
        },
        NewRecipe {
            name: "Ratatouille".to_string(),
            description: "French stew of Mediterranean vegetables".to_string(),
            ingredients: strings(&[
                "Eggplant",
                "Zucchini",
                "Peppers",
                "Tomato",
                "Onion",
                "Herbes de Provence",
            ]),
            instructions: strings(&[
                "Dice the vegetables",
                "Sauté the onion",
                "Add the remaining vegetables",
                "Simmer over low heat for 30 minutes",
            ]),
            difficulty: Difficulty::Hard,
            prep_time_minutes: 60,
            image: None,
            creator_id: None,
        },
    ];

    samples
        .into_iter()
        .enumerate()
        .map(|(index, new)| Recipe::from_new((index + 1).to_string(), now, new))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_recipes() {
        let recipes = sample_recipes();
        let ids: Vec<_> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        let paella = &recipes[0];
        assert_eq!(paella.name, "Paella Valenciana");
        assert_eq!(paella.prep_time_minutes, 45);
        assert_eq!(paella.difficulty, Difficulty::Intermediate);
        assert_eq!(paella.instructions.len(), 5);
    }
}
