use diesel::{delete, insert_into, prelude::*, SqliteConnection};
use tracing::{debug, info, instrument};

use crate::error::{Entity, Error, Result};
use crate::models::{NewPizza, Pizza, Restaurant, RestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

#[instrument(skip(conn))]
pub fn create_pizza(
    conn: &mut SqliteConnection,
    name: Option<&str>,
    ingredients: Option<&str>,
) -> Result<Pizza> {
    let pizza = insert_into(pizzas::table)
        .values(NewPizza { name, ingredients })
        .returning(Pizza::as_returning())
        .get_result(conn)?;

    info!(id = pizza.id, "created pizza");
    Ok(pizza)
}

#[instrument(skip(conn))]
pub fn get_pizza(conn: &mut SqliteConnection, id: i32) -> Result<Pizza> {
    pizzas::table
        .find(id)
        .select(Pizza::as_select())
        .first(conn)
        .optional()?
        .ok_or(Error::not_found(Entity::Pizza, id))
}

#[instrument(skip(conn))]
pub fn list_pizzas(conn: &mut SqliteConnection) -> Result<Vec<Pizza>> {
    let results = pizzas::table
        .select(Pizza::as_select())
        .order(pizzas::id)
        .load(conn)?;
    Ok(results)
}

/// Deletes the pizza along with every link referencing it.
#[instrument(skip(conn))]
pub fn delete_pizza(conn: &mut SqliteConnection, id: i32) -> Result<()> {
    conn.transaction::<_, Error, _>(|conn| {
        let pizza = get_pizza(conn, id)?;

        let links =
            delete(restaurant_pizzas::table.filter(restaurant_pizzas::pizza_id.eq(pizza.id)))
                .execute(conn)?;
        debug!(id, links, "deleted pizza links");

        delete(pizzas::table.find(pizza.id)).execute(conn)?;
        info!(id, "deleted pizza");
        Ok(())
    })
}

/// Restaurants offering `pizza`, in link order.
#[instrument(skip(conn))]
pub fn restaurants_of(conn: &mut SqliteConnection, pizza: &Pizza) -> Result<Vec<Restaurant>> {
    let results = RestaurantPizza::belonging_to(pizza)
        .inner_join(restaurants::table)
        .select(Restaurant::as_select())
        .order(restaurant_pizzas::id)
        .load(conn)?;
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{
        create_restaurant, create_restaurant_pizza, get_restaurant, get_restaurant_pizza,
    };
    use crate::test_support::setup_database;

    #[test]
    fn test_create_pizza() {
        let conn = &mut setup_database();

        let pizza = create_pizza(conn, Some("Cheese"), Some("dough, sauce, cheese")).unwrap();
        assert_eq!(pizza.name.as_deref(), Some("Cheese"));
        assert_eq!(pizza.ingredients.as_deref(), Some("dough, sauce, cheese"));
        assert_eq!(get_pizza(conn, pizza.id).unwrap(), pizza);
    }

    #[test]
    fn test_get_pizza_not_found() {
        let conn = &mut setup_database();

        let err = get_pizza(conn, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                entity: Entity::Pizza,
                id: 3
            }
        ));
    }

    #[test]
    fn test_list_pizzas() {
        let conn = &mut setup_database();
        let cheese = create_pizza(conn, Some("Cheese"), None).unwrap();
        let veggie = create_pizza(conn, Some("Veggie"), Some("peppers")).unwrap();

        assert_eq!(list_pizzas(conn).unwrap(), vec![cheese, veggie]);
    }

    #[test]
    fn test_delete_pizza_cascades_links() {
        let conn = &mut setup_database();
        let dinos = create_restaurant(conn, Some("Dino's"), Some("123 Main St")).unwrap();
        let cheese = create_pizza(conn, Some("Cheese"), None).unwrap();
        let veggie = create_pizza(conn, Some("Veggie"), None).unwrap();
        let removed = create_restaurant_pizza(conn, 12, dinos.id, cheese.id).unwrap();
        let kept = create_restaurant_pizza(conn, 14, dinos.id, veggie.id).unwrap();

        delete_pizza(conn, cheese.id).unwrap();

        assert!(get_pizza(conn, cheese.id).unwrap_err().is_not_found());
        assert!(get_restaurant_pizza(conn, removed.id)
            .unwrap_err()
            .is_not_found());
        assert_eq!(get_restaurant_pizza(conn, kept.id).unwrap(), kept);
        assert_eq!(get_restaurant(conn, dinos.id).unwrap(), dinos);
    }

    #[test]
    fn test_delete_pizza_not_found() {
        let conn = &mut setup_database();

        assert!(delete_pizza(conn, 9).unwrap_err().is_not_found());
    }

    #[test]
    fn test_restaurants_of() {
        let conn = &mut setup_database();
        let dinos = create_restaurant(conn, Some("Dino's"), Some("123 Main St")).unwrap();
        let cheese = create_pizza(conn, Some("Cheese"), Some("dough, sauce, cheese")).unwrap();
        let lonely = create_pizza(conn, Some("Lonely"), None).unwrap();
        create_restaurant_pizza(conn, 12, dinos.id, cheese.id).unwrap();

        assert_eq!(restaurants_of(conn, &cheese).unwrap(), vec![dinos]);
        assert!(restaurants_of(conn, &lonely).unwrap().is_empty());
    }
}
