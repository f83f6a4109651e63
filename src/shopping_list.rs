// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::MealId;
use crate::query;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::QueryResult;
use diesel::RunQueryDsl as _;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub count: usize,
}

impl std::fmt::Display for ShoppingListItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if self.count > 1 {
            write!(f, " x{}", self.count)?;
        }
        Ok(())
    }
}

/// Counts every ingredient occurrence across the planned meals. Matching is
/// case-sensitive and exact; items keep the order they are first seen in while
/// walking the plan day by day.
pub fn build_shopping_list(
    conn: &mut database::Connection,
) -> QueryResult<Vec<ShoppingListItem>> {
    let entries = query::planned_meals(conn)?;
    let planned_ids: Vec<MealId> = entries.iter().map(|e| e.meal_id).collect();

    let mut ingredients_by_meal: HashMap<MealId, Vec<String>> = HashMap::new();
    {
        use database::schema::ingredients::dsl::*;

        let rows: Vec<(MealId, String)> = ingredients
            .select((meal_id, ingredient))
            .filter(meal_id.eq_any(planned_ids))
            .order(id.asc())
            .load(conn)?;
        for (owner, item) in rows {
            ingredients_by_meal.entry(owner).or_default().push(item);
        }
    }

    let mut items: Vec<ShoppingListItem> = vec![];
    let mut index_by_name: HashMap<String, usize> = HashMap::new();
    for entry in &entries {
        for item in ingredients_by_meal.get(&entry.meal_id).into_iter().flatten() {
            if let Some(&at) = index_by_name.get(item) {
                items[at].count += 1;
            } else {
                index_by_name.insert(item.clone(), items.len());
                items.push(ShoppingListItem {
                    name: item.clone(),
                    count: 1,
                });
            }
        }
    }
    Ok(items)
}

#[cfg(test)]
use crate::database::models::{DayOfWeek, MealCategory};

#[test]
fn shopping_list_item_display() {
    let item = ShoppingListItem {
        name: "egg".into(),
        count: 1,
    };
    assert_eq!(item.to_string(), "egg");

    let item = ShoppingListItem {
        name: "egg".into(),
        count: 3,
    };
    assert_eq!(item.to_string(), "egg x3");
}

#[test]
fn empty_plan_yields_empty_list() {
    let mut conn = database::test_connection();

    query::add_meal(&mut conn, MealCategory::Lunch, "salad", vec!["lettuce".into()]).unwrap();

    assert_eq!(build_shopping_list(&mut conn).unwrap(), vec![]);
}

#[test]
fn shared_ingredients_are_counted() {
    let mut conn = database::test_connection();

    query::add_meal(
        &mut conn,
        MealCategory::Breakfast,
        "toast",
        vec!["egg".into(), "bread".into()],
    )
    .unwrap();
    query::add_meal(
        &mut conn,
        MealCategory::Lunch,
        "omelette",
        vec!["egg".into(), "cheese".into()],
    )
    .unwrap();

    query::assign_ok(&mut conn, "toast", MealCategory::Breakfast, DayOfWeek::Monday);
    query::assign_ok(&mut conn, "omelette", MealCategory::Lunch, DayOfWeek::Monday);

    let lines: Vec<String> = build_shopping_list(&mut conn)
        .unwrap()
        .iter()
        .map(|i| i.to_string())
        .collect();
    assert_eq!(lines, vec!["egg x2", "bread", "cheese"]);
}

#[test]
fn meal_planned_twice_counts_twice() {
    use maplit::hashmap;

    let mut conn = database::test_connection();

    query::add_meal(
        &mut conn,
        MealCategory::Dinner,
        "soup",
        vec!["water".into(), "salt".into()],
    )
    .unwrap();

    query::assign_ok(&mut conn, "soup", MealCategory::Dinner, DayOfWeek::Monday);
    query::assign_ok(&mut conn, "soup", MealCategory::Dinner, DayOfWeek::Tuesday);

    let counts: HashMap<String, usize> = build_shopping_list(&mut conn)
        .unwrap()
        .into_iter()
        .map(|i| (i.name, i.count))
        .collect();
    assert_eq!(
        counts,
        hashmap! {
            "water".into() => 2,
            "salt".into() => 2,
        }
    );
}
