use diesel::{delete, insert_into, prelude::*, SqliteConnection};
use tracing::{debug, info, instrument};

use crate::error::{Entity, Error, Result};
use crate::models::{NewRestaurant, Pizza, Restaurant, RestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::serializer::{serialize_restaurant, serialize_restaurant_with_pizzas, RestaurantView};
use crate::service::links_of_restaurant;

#[instrument(skip(conn))]
pub fn create_restaurant(
    conn: &mut SqliteConnection,
    name: Option<&str>,
    address: Option<&str>,
) -> Result<Restaurant> {
    let restaurant = insert_into(restaurants::table)
        .values(NewRestaurant { name, address })
        .returning(Restaurant::as_returning())
        .get_result(conn)?;

    info!(id = restaurant.id, "created restaurant");
    Ok(restaurant)
}

#[instrument(skip(conn))]
pub fn get_restaurant(conn: &mut SqliteConnection, id: i32) -> Result<Restaurant> {
    restaurants::table
        .find(id)
        .select(Restaurant::as_select())
        .first(conn)
        .optional()?
        .ok_or(Error::not_found(Entity::Restaurant, id))
}

#[instrument(skip(conn))]
pub fn list_restaurants(conn: &mut SqliteConnection) -> Result<Vec<Restaurant>> {
    let results = restaurants::table
        .select(Restaurant::as_select())
        .order(restaurants::id)
        .load(conn)?;
    Ok(results)
}

/// Loads every restaurant together with its links and the linked pizzas.
#[instrument(skip(conn))]
pub fn list_restaurants_with_pizzas(
    conn: &mut SqliteConnection,
) -> Result<Vec<(Restaurant, Vec<(RestaurantPizza, Pizza)>)>> {
    let results = list_restaurants(conn)?;

    let links = RestaurantPizza::belonging_to(&results)
        .inner_join(pizzas::table)
        .select((RestaurantPizza::as_select(), Pizza::as_select()))
        .order(restaurant_pizzas::id)
        .load::<(RestaurantPizza, Pizza)>(conn)?
        .grouped_by(&results);

    Ok(results.into_iter().zip(links).collect())
}

/// Deletes the restaurant along with every link referencing it.
#[instrument(skip(conn))]
pub fn delete_restaurant(conn: &mut SqliteConnection, id: i32) -> Result<()> {
    conn.transaction::<_, Error, _>(|conn| {
        let restaurant = get_restaurant(conn, id)?;

        let links = delete(
            restaurant_pizzas::table.filter(restaurant_pizzas::restaurant_id.eq(restaurant.id)),
        )
        .execute(conn)?;
        debug!(id, links, "deleted restaurant links");

        delete(restaurants::table.find(restaurant.id)).execute(conn)?;
        info!(id, "deleted restaurant");
        Ok(())
    })
}

/// Pizzas offered by `restaurant`, in link order.
#[instrument(skip(conn))]
pub fn pizzas_of(conn: &mut SqliteConnection, restaurant: &Restaurant) -> Result<Vec<Pizza>> {
    let results = RestaurantPizza::belonging_to(restaurant)
        .inner_join(pizzas::table)
        .select(Pizza::as_select())
        .order(restaurant_pizzas::id)
        .load(conn)?;
    Ok(results)
}

/// Loads a restaurant and renders it, optionally with its links.
#[instrument(skip(conn))]
pub fn show_restaurant(
    conn: &mut SqliteConnection,
    id: i32,
    include_pizzas: bool,
) -> Result<RestaurantView> {
    let restaurant = get_restaurant(conn, id)?;
    if !include_pizzas {
        return Ok(RestaurantView::Base(serialize_restaurant(&restaurant)));
    }

    let links = links_of_restaurant(conn, &restaurant)?;
    Ok(RestaurantView::WithPizzas(serialize_restaurant_with_pizzas(
        &restaurant,
        &links,
    )))
}
