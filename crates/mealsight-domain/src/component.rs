//! Food component module - one identified item within a dish

/// One identified item within a dish.
///
/// Created by a single-frame analysis or by a user "add" correction,
/// mutated by "rename" and "rescale" corrections, and removed either by a
/// "remove" correction or by the aggregator when cross-frame consensus is
/// insufficient.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodComponent {
    /// Human-readable name, title-cased for display
    pub name: String,

    /// Estimated weight in grams
    pub weight_g: u32,

    /// Estimated calories (kcal)
    pub calories: u32,

    /// Protein in grams
    pub protein_g: f64,

    /// Fat in grams
    pub fat_g: f64,

    /// Carbohydrates in grams
    pub carbs_g: f64,

    /// Estimator certainty in [0, 1]. This is confidence in the
    /// identification, not nutritional precision.
    pub confidence: f64,
}

impl FoodComponent {
    /// Create a component with the given name and zeroed nutrition
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight_g: 0,
            calories: 0,
            protein_g: 0.0,
            fat_g: 0.0,
            carbs_g: 0.0,
            confidence: 0.5,
        }
    }

    /// Scale weight, calories, and macros by `factor`.
    ///
    /// Grams and calories round to whole numbers, macros to one decimal,
    /// matching how components are displayed.
    pub fn scale(&mut self, factor: f64) {
        self.weight_g = ((self.weight_g as f64) * factor).round() as u32;
        self.calories = ((self.calories as f64) * factor).round() as u32;
        self.protein_g = round1(self.protein_g * factor);
        self.fat_g = round1(self.fat_g * factor);
        self.carbs_g = round1(self.carbs_g * factor);
    }

    /// Calories implied by the macros (protein*4 + fat*9 + carbs*4)
    pub fn macro_calories(&self) -> f64 {
        self.protein_g * 4.0 + self.fat_g * 9.0 + self.carbs_g * 4.0
    }

    /// Case-insensitive name match: equal, or either name contains the
    /// other. "bread" matches "White Bread" and vice versa.
    pub fn name_matches(&self, other: &str) -> bool {
        let a = self.name.to_lowercase();
        let b = other.to_lowercase();
        a == b || a.contains(&b) || b.contains(&a)
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Title-case a name for display ("mashed potato" -> "Mashed Potato")
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
