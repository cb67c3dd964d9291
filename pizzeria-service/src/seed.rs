use diesel::{delete, prelude::*, SqliteConnection};
use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::models::Price;
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::service::{add_pizza, create_pizza, create_restaurant};

const RESTAURANTS: &[(&str, &str)] = &[
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const PIZZAS: &[(&str, &str)] = &[
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

/// (restaurant index, pizza index, price)
const MENU: &[(usize, usize, i32)] = &[(0, 0, 1), (1, 1, 4), (2, 2, 5)];

/// Replaces the database contents with a small sample menu.
#[instrument(skip(conn))]
pub fn seed(conn: &mut SqliteConnection) -> Result<()> {
    conn.transaction::<_, Error, _>(|conn| {
        delete(restaurant_pizzas::table).execute(conn)?;
        delete(pizzas::table).execute(conn)?;
        delete(restaurants::table).execute(conn)?;

        let saved_restaurants = RESTAURANTS
            .iter()
            .map(|&(name, address)| create_restaurant(conn, Some(name), Some(address)))
            .collect::<Result<Vec<_>>>()?;
        let saved_pizzas = PIZZAS
            .iter()
            .map(|&(name, ingredients)| create_pizza(conn, Some(name), Some(ingredients)))
            .collect::<Result<Vec<_>>>()?;

        for &(restaurant, pizza, price) in MENU {
            add_pizza(
                conn,
                &saved_restaurants[restaurant],
                &saved_pizzas[pizza],
                Price::new(price)?,
            )?;
        }

        info!(
            restaurants = saved_restaurants.len(),
            pizzas = saved_pizzas.len(),
            "seeded database"
        );
        Ok(())
    })
}
