use diesel::{delete, insert_into, prelude::*, update, SqliteConnection};
use tracing::{info, instrument};

use crate::error::{Entity, Error, Result};
use crate::models::{NewRestaurantPizza, Pizza, Price, Restaurant, RestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

/// Offers a pizza at a restaurant for `price`.
///
/// The price is checked before anything touches the database. Both
/// references must resolve, otherwise [`Error::Referential`] is returned and
/// nothing is written.
#[instrument(skip(conn))]
pub fn create_restaurant_pizza(
    conn: &mut SqliteConnection,
    price: i32,
    restaurant_id: i32,
    pizza_id: i32,
) -> Result<RestaurantPizza> {
    let price = Price::new(price)?;

    conn.transaction::<_, Error, _>(|conn| {
        let restaurant = restaurants::table
            .find(restaurant_id)
            .select(Restaurant::as_select())
            .first(conn)
            .optional()?
            .ok_or(Error::Referential {
                entity: Entity::Restaurant,
                id: restaurant_id,
            })?;
        let pizza = pizzas::table
            .find(pizza_id)
            .select(Pizza::as_select())
            .first(conn)
            .optional()?
            .ok_or(Error::Referential {
                entity: Entity::Pizza,
                id: pizza_id,
            })?;

        let link = insert_into(restaurant_pizzas::table)
            .values(NewRestaurantPizza::link(&restaurant, &pizza, price))
            .returning(RestaurantPizza::as_returning())
            .get_result(conn)?;

        info!(id = link.id, restaurant_id, pizza_id, "created restaurant pizza");
        Ok(link)
    })
}

/// Adds `pizza` to the menu of `restaurant`.
pub fn add_pizza(
    conn: &mut SqliteConnection,
    restaurant: &Restaurant,
    pizza: &Pizza,
    price: Price,
) -> Result<RestaurantPizza> {
    create_restaurant_pizza(conn, price.get(), restaurant.id, pizza.id)
}

/// Adds `restaurant` to the places serving `pizza`.
pub fn add_restaurant(
    conn: &mut SqliteConnection,
    pizza: &Pizza,
    restaurant: &Restaurant,
    price: Price,
) -> Result<RestaurantPizza> {
    create_restaurant_pizza(conn, price.get(), restaurant.id, pizza.id)
}

#[instrument(skip(conn))]
pub fn get_restaurant_pizza(conn: &mut SqliteConnection, id: i32) -> Result<RestaurantPizza> {
    restaurant_pizzas::table
        .find(id)
        .select(RestaurantPizza::as_select())
        .first(conn)
        .optional()?
        .ok_or(Error::not_found(Entity::RestaurantPizza, id))
}

/// Loads a link together with both of the records it joins.
#[instrument(skip(conn))]
pub fn get_restaurant_pizza_details(
    conn: &mut SqliteConnection,
    id: i32,
) -> Result<(RestaurantPizza, Restaurant, Pizza)> {
    restaurant_pizzas::table
        .inner_join(restaurants::table)
        .inner_join(pizzas::table)
        .filter(restaurant_pizzas::id.eq(id))
        .select((
            RestaurantPizza::as_select(),
            Restaurant::as_select(),
            Pizza::as_select(),
        ))
        .first(conn)
        .optional()?
        .ok_or(Error::not_found(Entity::RestaurantPizza, id))
}

#[instrument(skip(conn))]
pub fn list_restaurant_pizzas(conn: &mut SqliteConnection) -> Result<Vec<RestaurantPizza>> {
    let results = restaurant_pizzas::table
        .select(RestaurantPizza::as_select())
        .order(restaurant_pizzas::id)
        .load(conn)?;
    Ok(results)
}

/// Links of `restaurant`, each paired with the pizza it offers.
#[instrument(skip(conn))]
pub fn links_of_restaurant(
    conn: &mut SqliteConnection,
    restaurant: &Restaurant,
) -> Result<Vec<(RestaurantPizza, Pizza)>> {
    let results = RestaurantPizza::belonging_to(restaurant)
        .inner_join(pizzas::table)
        .select((RestaurantPizza::as_select(), Pizza::as_select()))
        .order(restaurant_pizzas::id)
        .load(conn)?;
    Ok(results)
}

/// Links of `pizza`, each paired with the restaurant offering it.
#[instrument(skip(conn))]
pub fn links_of_pizza(
    conn: &mut SqliteConnection,
    pizza: &Pizza,
) -> Result<Vec<(RestaurantPizza, Restaurant)>> {
    let results = RestaurantPizza::belonging_to(pizza)
        .inner_join(restaurants::table)
        .select((RestaurantPizza::as_select(), Restaurant::as_select()))
        .order(restaurant_pizzas::id)
        .load(conn)?;
    Ok(results)
}

/// Changes the price of an existing link.
#[instrument(skip(conn))]
pub fn update_price(conn: &mut SqliteConnection, id: i32, price: i32) -> Result<RestaurantPizza> {
    conn.transaction::<_, Error, _>(|conn| {
        let mut link = get_restaurant_pizza(conn, id)?;
        link.set_price(price)?;

        update(restaurant_pizzas::table.find(link.id))
            .set(restaurant_pizzas::price.eq(link.price))
            .execute(conn)?;

        info!(id, price, "updated restaurant pizza price");
        Ok(link)
    })
}

#[instrument(skip(conn))]
pub fn delete_restaurant_pizza(conn: &mut SqliteConnection, id: i32) -> Result<()> {
    let deleted = delete(restaurant_pizzas::table.find(id)).execute(conn)?;
    if deleted == 0 {
        return Err(Error::not_found(Entity::RestaurantPizza, id));
    }

    info!(id, "deleted restaurant pizza");
    Ok(())
}
