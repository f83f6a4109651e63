// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{DayOfWeek, MealCategory, Recipe};
use crate::query::{self, PlanAssignment};
use crate::shopping_list;
use crate::Result;
use std::io::Write as _;

pub fn run(mut conn: database::Connection) -> Result<()> {
    loop {
        let input = prompt("What would you like to do (add, show, plan, save, exit)?")?;
        match input.to_lowercase().as_str() {
            "add" => add_meal(&mut conn)?,
            "show" => show_meals(&mut conn)?,
            "plan" => plan_week(&mut conn)?,
            "save" => save_shopping_list(&mut conn)?,
            "exit" => {
                println!("Bye!");
                return Ok(());
            }
            _ => {}
        }
    }
}

fn prompt(message: &str) -> Result<String> {
    println!("{message}");
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line)? == 0 {
        return Err("unexpected end of input".into());
    }
    Ok(line.trim().to_string())
}

fn prompt_category(message: &str) -> Result<MealCategory> {
    loop {
        let input = prompt(message)?;
        match MealCategory::from_input(&input) {
            Some(category) => return Ok(category),
            None => println!("Wrong meal category! Choose from: breakfast, lunch, dinner."),
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
}

fn parse_ingredients(input: &str) -> Option<Vec<String>> {
    let valid_chars = input
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == ' ' || c == ',');
    if input.is_empty() || !valid_chars {
        return None;
    }

    let items: Vec<String> = input.split(',').map(|i| i.trim().to_string()).collect();
    items.iter().all(|i| !i.is_empty()).then_some(items)
}

fn add_meal(conn: &mut database::Connection) -> Result<()> {
    let category = prompt_category("Which meal do you want to add (breakfast, lunch, dinner)?")?;

    let name = loop {
        let input = prompt("Input the meal's name:")?;
        if is_valid_name(&input) {
            break input;
        }
        println!("Wrong format. Use letters only!");
    };

    let ingredients = loop {
        let input = prompt("Input the ingredients:")?;
        match parse_ingredients(&input) {
            Some(list) => break list,
            None => println!("Wrong format. Use letters only!"),
        }
    };

    query::add_meal(conn, category, &name, ingredients)?;
    println!("The meal has been added!");
    Ok(())
}

fn show_meals(conn: &mut database::Connection) -> Result<()> {
    let meals = query::load_all_meals(conn)?;
    if meals.is_empty() {
        println!("No meals saved. Add a meal first.");
        return Ok(());
    }

    let category = prompt_category("Which category do you want to print (breakfast, lunch, dinner)?")?;

    let in_category: Vec<&Recipe> = meals.iter().filter(|m| m.category == category).collect();
    if in_category.is_empty() {
        println!("No meals found.");
        return Ok(());
    }

    println!("Category: {category}\n");
    for recipe in in_category {
        println!("{recipe}\n");
    }
    Ok(())
}

fn category_label(category: MealCategory) -> &'static str {
    match category {
        MealCategory::Breakfast => "Breakfast",
        MealCategory::Lunch => "Lunch",
        MealCategory::Dinner => "Dinner",
    }
}

fn category_candidates(meals: &[Recipe], category: MealCategory) -> Vec<&Recipe> {
    let mut candidates: Vec<&Recipe> = meals.iter().filter(|m| m.category == category).collect();
    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    candidates
}

fn is_listed(candidates: &[&Recipe], choice: &str) -> bool {
    candidates.iter().any(|m| m.name == choice)
}

fn plan_week(conn: &mut database::Connection) -> Result<()> {
    let meals = query::load_all_meals(conn)?;

    for day in DayOfWeek::iter() {
        println!("{day}");
        for category in MealCategory::iter() {
            let candidates = category_candidates(&meals, category);

            loop {
                for meal in &candidates {
                    println!("{}", meal.name);
                }
                let choice =
                    prompt(&format!("Choose the {category} for {day} from the list above:"))?;

                // only meals listed for this category may fill its slot
                if !is_listed(&candidates, &choice) {
                    println!("This meal doesn't exist. Choose a meal from the list above.");
                    continue;
                }

                match query::assign_to_plan(conn, &choice, category, day)? {
                    PlanAssignment::Assigned => break,
                    PlanAssignment::MealNotFound => {
                        println!("This meal doesn't exist. Choose a meal from the list above.")
                    }
                }
            }
        }
        println!("Yeah! We planned the meals for {day}.\n");
    }

    let entries = query::planned_meals(conn)?;
    for day in DayOfWeek::iter() {
        println!();
        println!("{day}");
        for category in MealCategory::iter() {
            let chosen = entries
                .iter()
                .find(|e| e.day_of_week == day && e.meal_category == category)
                .map(|e| e.meal_name.as_str())
                .unwrap_or("-");
            println!("{}: {chosen}", category_label(category));
        }
    }
    Ok(())
}

fn save_shopping_list(conn: &mut database::Connection) -> Result<()> {
    let items = shopping_list::build_shopping_list(conn)?;
    if items.is_empty() {
        println!("Unable to save. Plan your meals first.");
        return Ok(());
    }

    let file_name = prompt("Input a filename:")?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&file_name)?;
    for item in &items {
        writeln!(file, "{item}")?;
    }
    log::info!("wrote {} shopping list items to {file_name}", items.len());
    println!("Saved!");
    Ok(())
}

#[cfg(test)]
fn test_recipe(id: i32, category: MealCategory, name: &str) -> Recipe {
    Recipe {
        id: id.into(),
        category,
        name: name.into(),
        ingredients: vec![],
    }
}

#[test]
fn planning_only_accepts_meals_from_the_prompted_category() {
    let meals = vec![
        test_recipe(1, MealCategory::Breakfast, "toast"),
        test_recipe(2, MealCategory::Dinner, "soup"),
    ];

    let candidates = category_candidates(&meals, MealCategory::Breakfast);
    let names: Vec<&str> = candidates.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["toast"]);

    assert!(is_listed(&candidates, "toast"));
    // a dinner meal's name must not fill a breakfast slot
    assert!(!is_listed(&candidates, "soup"));
    assert!(!is_listed(&candidates, "pizza"));
}

#[test]
fn candidates_are_sorted_by_name() {
    let meals = vec![
        test_recipe(1, MealCategory::Lunch, "wrap"),
        test_recipe(2, MealCategory::Lunch, "burger"),
        test_recipe(3, MealCategory::Breakfast, "toast"),
    ];

    let candidates = category_candidates(&meals, MealCategory::Lunch);
    let names: Vec<&str> = candidates.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["burger", "wrap"]);
}

#[test]
fn name_validation() {
    assert!(is_valid_name("chicken soup"));
    assert!(is_valid_name("Toast"));
    assert!(!is_valid_name(""));
    assert!(!is_valid_name("soup 2"));
    assert!(!is_valid_name("mac & cheese"));
}

#[test]
fn ingredient_parsing() {
    assert_eq!(
        parse_ingredients("egg, bread, butter"),
        Some(vec!["egg".into(), "bread".into(), "butter".into()])
    );
    assert_eq!(parse_ingredients("water"), Some(vec!["water".into()]));
    assert_eq!(parse_ingredients(""), None);
    assert_eq!(parse_ingredients("egg,,bread"), None);
    assert_eq!(parse_ingredients("egg, 2 slices of bread"), None);
    assert_eq!(parse_ingredients("egg,"), None);
}
