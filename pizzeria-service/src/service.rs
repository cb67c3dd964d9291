//! Operations over restaurants, pizzas and the priced links between them.
//!
//! Every function runs against the caller's connection; functions touching
//! more than one row wrap their work in a transaction.

pub mod pizza;
pub mod restaurant;
pub mod restaurant_pizza;

pub use pizza::{create_pizza, delete_pizza, get_pizza, list_pizzas, restaurants_of};
pub use restaurant::{
    create_restaurant, delete_restaurant, get_restaurant, list_restaurants,
    list_restaurants_with_pizzas, pizzas_of, show_restaurant,
};
pub use restaurant_pizza::{
    add_pizza, add_restaurant, create_restaurant_pizza, delete_restaurant_pizza,
    get_restaurant_pizza, get_restaurant_pizza_details, links_of_pizza, links_of_restaurant,
    list_restaurant_pizzas, update_price,
};
