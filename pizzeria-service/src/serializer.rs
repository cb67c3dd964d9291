//! JSON-ready records for restaurants, pizzas and their links.
//!
//! Each direction has its own record type so a nested record never carries
//! the collection that led to it.

use serde::{Deserialize, Serialize};

use crate::models::{Pizza, Price, Restaurant, RestaurantPizza};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RestaurantRecord {
    pub id: i32,
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PizzaRecord {
    pub id: i32,
    pub name: Option<String>,
    pub ingredients: Option<String>,
}

/// A link seen from its restaurant: carries the pizza only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RestaurantLinkRecord {
    pub id: i32,
    pub price: Price,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: PizzaRecord,
}

/// A link seen from its pizza: carries the restaurant only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PizzaLinkRecord {
    pub id: i32,
    pub price: Price,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub restaurant: RestaurantRecord,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RestaurantWithPizzasRecord {
    pub id: i32,
    pub name: Option<String>,
    pub address: Option<String>,
    pub restaurant_pizzas: Vec<RestaurantLinkRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PizzaWithRestaurantsRecord {
    pub id: i32,
    pub name: Option<String>,
    pub ingredients: Option<String>,
    pub restaurant_pizzas: Vec<PizzaLinkRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RestaurantPizzaRecord {
    pub id: i32,
    pub price: Price,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: PizzaRecord,
    pub restaurant: RestaurantRecord,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RestaurantView {
    Base(RestaurantRecord),
    WithPizzas(RestaurantWithPizzasRecord),
}

pub fn serialize_restaurant(restaurant: &Restaurant) -> RestaurantRecord {
    RestaurantRecord {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
    }
}

pub fn serialize_pizza(pizza: &Pizza) -> PizzaRecord {
    PizzaRecord {
        id: pizza.id,
        name: pizza.name.clone(),
        ingredients: pizza.ingredients.clone(),
    }
}

pub fn serialize_restaurant_with_pizzas(
    restaurant: &Restaurant,
    links: &[(RestaurantPizza, Pizza)],
) -> RestaurantWithPizzasRecord {
    RestaurantWithPizzasRecord {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
        restaurant_pizzas: links
            .iter()
            .map(|(link, pizza)| RestaurantLinkRecord {
                id: link.id,
                price: link.price,
                pizza_id: link.pizza_id,
                restaurant_id: link.restaurant_id,
                pizza: serialize_pizza(pizza),
            })
            .collect(),
    }
}

pub fn serialize_pizza_with_restaurants(
    pizza: &Pizza,
    links: &[(RestaurantPizza, Restaurant)],
) -> PizzaWithRestaurantsRecord {
    PizzaWithRestaurantsRecord {
        id: pizza.id,
        name: pizza.name.clone(),
        ingredients: pizza.ingredients.clone(),
        restaurant_pizzas: links
            .iter()
            .map(|(link, restaurant)| PizzaLinkRecord {
                id: link.id,
                price: link.price,
                pizza_id: link.pizza_id,
                restaurant_id: link.restaurant_id,
                restaurant: serialize_restaurant(restaurant),
            })
            .collect(),
    }
}

pub fn serialize_restaurant_pizza(
    link: &RestaurantPizza,
    restaurant: &Restaurant,
    pizza: &Pizza,
) -> RestaurantPizzaRecord {
    RestaurantPizzaRecord {
        id: link.id,
        price: link.price,
        pizza_id: link.pizza_id,
        restaurant_id: link.restaurant_id,
        pizza: serialize_pizza(pizza),
        restaurant: serialize_restaurant(restaurant),
    }
}
