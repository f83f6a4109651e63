// Copyright 2023 Remi Bernotavicius

use derive_more::Display;
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel::prelude::Insertable;
use diesel_derive_enum::DbEnum;
use diesel_derive_newtype::DieselNewType;
use strum::EnumIter;

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct MealId(i32);

impl From<i32> for MealId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

/// Stored as lower-case text, matching what the interactive prompts accept.
#[derive(Debug, Display, EnumIter, Hash, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, DbEnum)]
pub enum MealCategory {
    #[display("breakfast")]
    Breakfast,
    #[display("lunch")]
    Lunch,
    #[display("dinner")]
    Dinner,
}

impl MealCategory {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            _ => None,
        }
    }
}

/// Stored capitalized ("Monday") for compatibility with existing plan tables.
#[derive(Debug, Display, EnumIter, Hash, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, DbEnum)]
pub enum DayOfWeek {
    #[display("Monday")]
    #[db_rename = "Monday"]
    Monday,
    #[display("Tuesday")]
    #[db_rename = "Tuesday"]
    Tuesday,
    #[display("Wednesday")]
    #[db_rename = "Wednesday"]
    Wednesday,
    #[display("Thursday")]
    #[db_rename = "Thursday"]
    Thursday,
    #[display("Friday")]
    #[db_rename = "Friday"]
    Friday,
    #[display("Saturday")]
    #[db_rename = "Saturday"]
    Saturday,
    #[display("Sunday")]
    #[db_rename = "Sunday"]
    Sunday,
}

impl DayOfWeek {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

#[derive(Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::database::schema::meals)]
pub struct Meal {
    pub id: MealId,
    pub category: MealCategory,
    pub name: String,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Insertable, Clone)]
#[diesel(belongs_to(Meal))]
#[diesel(primary_key(day_of_week, meal_category))]
#[diesel(table_name = crate::database::schema::plan)]
pub struct PlanEntry {
    pub day_of_week: DayOfWeek,
    pub meal_name: String,
    pub meal_category: MealCategory,
    pub meal_id: MealId,
}

/// A meal with its ingredient list grouped back together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: MealId,
    pub category: MealCategory,
    pub name: String,
    pub ingredients: Vec<String>,
}

impl std::fmt::Display for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Name: {}", self.name)?;
        write!(f, "\nIngredients:")?;
        for ingredient in &self.ingredients {
            write!(f, "\n{ingredient}")?;
        }
        Ok(())
    }
}

#[test]
fn category_and_day_strings() {
    assert_eq!(MealCategory::Breakfast.to_string(), "breakfast");
    assert_eq!(MealCategory::Dinner.to_string(), "dinner");
    assert_eq!(DayOfWeek::Monday.to_string(), "Monday");
    assert_eq!(DayOfWeek::Sunday.to_string(), "Sunday");

    assert_eq!(
        MealCategory::from_input("Breakfast"),
        Some(MealCategory::Breakfast)
    );
    assert_eq!(MealCategory::from_input(" lunch "), Some(MealCategory::Lunch));
    assert_eq!(MealCategory::from_input("brunch"), None);

    assert_eq!(DayOfWeek::iter().count(), 7);
    assert_eq!(DayOfWeek::iter().next(), Some(DayOfWeek::Monday));
}

#[test]
fn recipe_display() {
    let recipe = Recipe {
        id: 1.into(),
        category: MealCategory::Breakfast,
        name: "oatmeal".into(),
        ingredients: vec!["oats".into(), "milk".into()],
    };
    assert_eq!(recipe.to_string(), "Name: oatmeal\nIngredients:\noats\nmilk");
}
