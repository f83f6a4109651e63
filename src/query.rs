// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{DayOfWeek, Meal, MealCategory, MealId, PlanEntry, Recipe};
use diesel::prelude::OptionalExtension as _;
use diesel::Connection as _;
use diesel::ExpressionMethods as _;
use diesel::NullableExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::QueryResult;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

diesel::define_sql_function! {
    fn last_insert_rowid() -> diesel::sql_types::Integer;
}

/// Writes the meal row and its ingredient rows in one transaction, so a
/// failure part-way through can't leave a meal with a partial ingredient set.
pub fn add_meal(
    conn: &mut database::Connection,
    new_category: MealCategory,
    new_name: &str,
    new_ingredients: Vec<String>,
) -> QueryResult<Recipe> {
    conn.transaction(|conn| {
        let new_meal_id: MealId = {
            use database::schema::meals::dsl::*;

            diesel::insert_into(meals)
                .values((category.eq(new_category), name.eq(new_name)))
                .execute(conn)?;
            let raw: i32 = diesel::select(last_insert_rowid()).get_result(conn)?;
            raw.into()
        };

        {
            use database::schema::ingredients::dsl::*;

            for item in &new_ingredients {
                diesel::insert_into(ingredients)
                    .values((ingredient.eq(item.as_str()), meal_id.eq(new_meal_id)))
                    .execute(conn)?;
            }
        }

        Ok(Recipe {
            id: new_meal_id,
            category: new_category,
            name: new_name.into(),
            ingredients: new_ingredients,
        })
    })
}

pub fn load_all_meals(conn: &mut database::Connection) -> QueryResult<Vec<Recipe>> {
    use database::schema::{ingredients, meals};

    let rows: Vec<(Meal, Option<String>)> = meals::table
        .left_join(ingredients::table)
        .select((Meal::as_select(), ingredients::ingredient.nullable()))
        .order((meals::id.asc(), ingredients::id.asc()))
        .load(conn)?;

    Ok(group_recipes(rows))
}

/// Folds join rows (ordered by meal id, then ingredient id) into one `Recipe`
/// per meal. The open group is flushed whenever the meal id changes and once
/// more at end of input.
fn group_recipes(rows: Vec<(Meal, Option<String>)>) -> Vec<Recipe> {
    let mut recipes = vec![];
    let mut open: Option<Recipe> = None;

    for (meal, maybe_ingredient) in rows {
        let same_meal = matches!(&open, Some(current) if current.id == meal.id);
        if !same_meal {
            recipes.extend(open.take());
            open = Some(Recipe {
                id: meal.id,
                category: meal.category,
                name: meal.name,
                ingredients: vec![],
            });
        }

        // a meal with no ingredients joins against a single null row; blank
        // ingredient rows from older databases are skipped the same way
        if let (Some(current), Some(item)) = (open.as_mut(), maybe_ingredient) {
            if !item.trim().is_empty() {
                current.ingredients.push(item);
            }
        }
    }

    recipes.extend(open);
    recipes
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[must_use]
pub enum PlanAssignment {
    Assigned,
    MealNotFound,
}

/// Puts the named meal in the (day, category) slot, replacing whatever was
/// there before. At most one meal per slot at all times.
pub fn assign_to_plan(
    conn: &mut database::Connection,
    assign_name: &str,
    assign_category: MealCategory,
    day: DayOfWeek,
) -> QueryResult<PlanAssignment> {
    let found: Option<MealId> = {
        use database::schema::meals::dsl::*;

        meals
            .select(id)
            .filter(name.eq(assign_name))
            .order(id.asc())
            .first(conn)
            .optional()?
    };
    let Some(found_id) = found else {
        return Ok(PlanAssignment::MealNotFound);
    };

    {
        use database::schema::plan::dsl::*;

        diesel::insert_into(plan)
            .values(PlanEntry {
                day_of_week: day,
                meal_name: assign_name.into(),
                meal_category: assign_category,
                meal_id: found_id,
            })
            .on_conflict((day_of_week, meal_category))
            .do_update()
            .set((meal_name.eq(assign_name), meal_id.eq(found_id)))
            .execute(conn)?;
    }

    Ok(PlanAssignment::Assigned)
}

/// The current plan in day-of-week order, breakfast before lunch before dinner.
pub fn planned_meals(conn: &mut database::Connection) -> QueryResult<Vec<PlanEntry>> {
    use database::schema::plan::dsl::*;

    let mut entries: Vec<PlanEntry> = plan.select(PlanEntry::as_select()).load(conn)?;
    entries.sort_by_key(|e| (e.day_of_week, e.meal_category));
    Ok(entries)
}

#[cfg(test)]
pub(crate) fn assign_ok(
    conn: &mut database::Connection,
    name: &str,
    category: MealCategory,
    day: DayOfWeek,
) {
    assert_eq!(
        assign_to_plan(conn, name, category, day).unwrap(),
        PlanAssignment::Assigned
    );
}

#[cfg(test)]
fn test_meal(id: i32, name: &str) -> Meal {
    Meal {
        id: id.into(),
        category: MealCategory::Lunch,
        name: name.into(),
    }
}

#[test]
fn group_recipes_empty_input() {
    assert_eq!(group_recipes(vec![]), vec![]);
}

#[test]
fn group_recipes_ingredientless_meal() {
    let grouped = group_recipes(vec![(test_meal(1, "tea"), None)]);
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].name, "tea");
    assert_eq!(grouped[0].ingredients, Vec::<String>::new());
}

#[test]
fn group_recipes_flushes_first_and_last_group() {
    let grouped = group_recipes(vec![
        (test_meal(1, "tea"), Some("water".into())),
        (test_meal(2, "toast"), Some("bread".into())),
        (test_meal(2, "toast"), Some("butter".into())),
    ]);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].name, "tea");
    assert_eq!(grouped[0].ingredients, vec!["water"]);
    assert_eq!(grouped[1].name, "toast");
    assert_eq!(grouped[1].ingredients, vec!["bread", "butter"]);
}

#[test]
fn group_recipes_skips_blank_ingredients() {
    let grouped = group_recipes(vec![
        (test_meal(1, "tea"), Some("   ".into())),
        (test_meal(1, "tea"), Some("water".into())),
        (test_meal(2, "toast"), Some("".into())),
    ]);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].ingredients, vec!["water"]);
    assert_eq!(grouped[1].ingredients, Vec::<String>::new());
}

#[test]
fn group_recipes_ingredientless_meal_between_others() {
    let grouped = group_recipes(vec![
        (test_meal(1, "tea"), None),
        (test_meal(2, "toast"), Some("bread".into())),
    ]);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].ingredients, Vec::<String>::new());
    assert_eq!(grouped[1].ingredients, vec!["bread"]);
}

#[test]
fn add_and_load_round_trip() {
    let mut conn = database::test_connection();

    let added = add_meal(
        &mut conn,
        MealCategory::Breakfast,
        "toast",
        vec!["egg".into(), "bread".into()],
    )
    .unwrap();
    assert_eq!(added.name, "toast");
    assert_eq!(added.ingredients, vec!["egg", "bread"]);

    let meals = load_all_meals(&mut conn).unwrap();
    assert_eq!(meals.len(), 1);
    assert_eq!(meals[0].id, added.id);
    assert_eq!(meals[0].category, MealCategory::Breakfast);
    assert_eq!(meals[0].ingredients, vec!["egg", "bread"]);
}

#[test]
fn load_preserves_insertion_order() {
    let mut conn = database::test_connection();

    for name in ["zebra", "apple", "mango"] {
        add_meal(
            &mut conn,
            MealCategory::Dinner,
            name,
            vec![format!("{name} sauce")],
        )
        .unwrap();
    }

    let meals = load_all_meals(&mut conn).unwrap();
    let names: Vec<&str> = meals.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["zebra", "apple", "mango"]);
    assert_eq!(meals[2].ingredients, vec!["mango sauce"]);
}

#[test]
fn plan_slot_upsert_replaces() {
    let mut conn = database::test_connection();

    add_meal(&mut conn, MealCategory::Breakfast, "toast", vec!["bread".into()]).unwrap();
    add_meal(&mut conn, MealCategory::Breakfast, "oatmeal", vec!["oats".into()]).unwrap();

    assert_eq!(
        assign_to_plan(&mut conn, "toast", MealCategory::Breakfast, DayOfWeek::Monday).unwrap(),
        PlanAssignment::Assigned
    );
    assert_eq!(
        assign_to_plan(&mut conn, "oatmeal", MealCategory::Breakfast, DayOfWeek::Monday).unwrap(),
        PlanAssignment::Assigned
    );

    let entries = planned_meals(&mut conn).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].day_of_week, DayOfWeek::Monday);
    assert_eq!(entries[0].meal_category, MealCategory::Breakfast);
    assert_eq!(entries[0].meal_name, "oatmeal");
}

#[test]
fn assigning_unknown_meal_leaves_plan_unchanged() {
    let mut conn = database::test_connection();

    add_meal(&mut conn, MealCategory::Breakfast, "toast", vec!["bread".into()]).unwrap();
    assign_ok(&mut conn, "toast", MealCategory::Breakfast, DayOfWeek::Monday);

    assert_eq!(
        assign_to_plan(&mut conn, "pizza", MealCategory::Dinner, DayOfWeek::Friday).unwrap(),
        PlanAssignment::MealNotFound
    );

    let entries = planned_meals(&mut conn).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].meal_name, "toast");
}

#[test]
fn planned_meals_ordered_by_day_then_category() {
    let mut conn = database::test_connection();

    add_meal(&mut conn, MealCategory::Breakfast, "toast", vec!["bread".into()]).unwrap();
    add_meal(&mut conn, MealCategory::Dinner, "soup", vec!["water".into()]).unwrap();

    assign_ok(&mut conn, "soup", MealCategory::Dinner, DayOfWeek::Tuesday);
    assign_ok(&mut conn, "soup", MealCategory::Dinner, DayOfWeek::Monday);
    assign_ok(&mut conn, "toast", MealCategory::Breakfast, DayOfWeek::Monday);

    let entries = planned_meals(&mut conn).unwrap();
    let slots: Vec<_> = entries
        .iter()
        .map(|e| (e.day_of_week, e.meal_category))
        .collect();
    assert_eq!(
        slots,
        vec![
            (DayOfWeek::Monday, MealCategory::Breakfast),
            (DayOfWeek::Monday, MealCategory::Dinner),
            (DayOfWeek::Tuesday, MealCategory::Dinner),
        ]
    );
}
