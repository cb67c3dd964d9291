use std::fmt;

use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    prelude::*,
    serialize::{self, Output, ToSql},
    sql_types::Integer,
    sqlite::Sqlite,
};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

pub const MIN_PRICE: i32 = 1;
pub const MAX_PRICE: i32 = 30;

/// Checks that `price` lies within `MIN_PRICE..=MAX_PRICE`.
pub fn validate_price(price: i32) -> Result<i32, ValidationError> {
    if price < MIN_PRICE {
        Err(ValidationError::PriceTooLow(price))
    } else if price > MAX_PRICE {
        Err(ValidationError::PriceTooHigh(price))
    } else {
        Ok(price)
    }
}

/// Price of a pizza at a restaurant, in whole dollars.
///
/// A `Price` can only be built through [`validate_price`], so every value
/// held by a model, read from the database or deserialized is in range.
#[derive(
    AsExpression,
    FromSqlRow,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[diesel(sql_type = Integer)]
#[serde(try_from = "i32", into = "i32")]
pub struct Price(i32);

impl Price {
    pub fn new(value: i32) -> Result<Self, ValidationError> {
        validate_price(value).map(Self)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Price {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Price::new(value)
    }
}

impl From<Price> for i32 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl ToSql<Integer, Sqlite> for Price {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        <i32 as ToSql<Integer, Sqlite>>::to_sql(&self.0, out)
    }
}

impl FromSql<Integer, Sqlite> for Price {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <i32 as FromSql<Integer, Sqlite>>::from_sql(bytes)?;
        Ok(Price::new(value)?)
    }
}

/// Text column as shown in `Display` output; a missing value reads `None`.
fn display_text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = restaurants)]
pub struct Restaurant {
    pub id: i32,
    pub name: Option<String>,
    pub address: Option<String>,
}

impl fmt::Display for Restaurant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Restaurant {}>", display_text(&self.name))
    }
}

#[derive(Insertable, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurant<'a> {
    pub name: Option<&'a str>,
    pub address: Option<&'a str>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = pizzas)]
pub struct Pizza {
    pub id: i32,
    pub name: Option<String>,
    pub ingredients: Option<String>,
}

impl fmt::Display for Pizza {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Pizza {}, {}>",
            display_text(&self.name),
            display_text(&self.ingredients)
        )
    }
}

#[derive(Insertable, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = pizzas)]
pub struct NewPizza<'a> {
    pub name: Option<&'a str>,
    pub ingredients: Option<&'a str>,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq, Eq)]
#[diesel(belongs_to(Restaurant))]
#[diesel(belongs_to(Pizza))]
#[diesel(table_name = restaurant_pizzas)]
pub struct RestaurantPizza {
    pub id: i32,
    pub price: Price,
    pub pizza_id: i32,
    pub restaurant_id: i32,
}

impl RestaurantPizza {
    /// Replaces the price, leaving the record untouched when `price` is out of range.
    pub fn set_price(&mut self, price: i32) -> Result<(), ValidationError> {
        self.price = Price::new(price)?;
        Ok(())
    }
}

impl fmt::Display for RestaurantPizza {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<RestaurantPizza {}>", self.price)
    }
}

#[derive(Insertable, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = restaurant_pizzas)]
pub struct NewRestaurantPizza {
    pub price: Price,
    pub pizza_id: i32,
    pub restaurant_id: i32,
}

impl NewRestaurantPizza {
    pub fn new(price: Price, restaurant_id: i32, pizza_id: i32) -> Self {
        Self {
            price,
            pizza_id,
            restaurant_id,
        }
    }

    /// Builds the join record offering `pizza` at `restaurant`.
    pub fn link(restaurant: &Restaurant, pizza: &Pizza, price: Price) -> Self {
        Self::new(price, restaurant.id, pizza.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_accepts_whole_range() {
        for value in MIN_PRICE..=MAX_PRICE {
            assert_eq!(Price::new(value).unwrap().get(), value);
        }
    }

    #[test]
    fn test_price_rejects_out_of_range() {
        assert_eq!(Price::new(0), Err(ValidationError::PriceTooLow(0)));
        assert_eq!(Price::new(-5), Err(ValidationError::PriceTooLow(-5)));
        assert_eq!(Price::new(31), Err(ValidationError::PriceTooHigh(31)));
        assert_eq!(
            Price::new(0).unwrap_err().to_string(),
            "price need to be over $1"
        );
        assert_eq!(
            Price::new(31).unwrap_err().to_string(),
            "select a price less than $30"
        );
    }

    #[test]
    fn test_set_price_keeps_old_value_on_error() {
        let mut link = RestaurantPizza {
            id: 1,
            price: Price::new(12).unwrap(),
            pizza_id: 1,
            restaurant_id: 1,
        };

        assert!(link.set_price(40).is_err());
        assert_eq!(link.price.get(), 12);

        link.set_price(30).unwrap();
        assert_eq!(link.price.get(), 30);
    }

    #[test]
    fn test_price_deserialize_validates() {
        let price: Price = serde_json::from_str("25").unwrap();
        assert_eq!(price.get(), 25);
        assert!(serde_json::from_str::<Price>("0").is_err());
        assert_eq!(serde_json::to_string(&price).unwrap(), "25");
    }

    #[test]
    fn test_link_builder() {
        let restaurant = Restaurant {
            id: 3,
            name: Some("Dino's".to_string()),
            address: Some("123 Main St".to_string()),
        };
        let pizza = Pizza {
            id: 7,
            name: Some("Cheese".to_string()),
            ingredients: Some("dough, sauce, cheese".to_string()),
        };

        let link = NewRestaurantPizza::link(&restaurant, &pizza, Price::new(12).unwrap());
        assert_eq!(link.restaurant_id, 3);
        assert_eq!(link.pizza_id, 7);
        assert_eq!(link.price.get(), 12);
    }

    #[test]
    fn test_display() {
        let pizza = Pizza {
            id: 1,
            name: Some("Cheese".to_string()),
            ingredients: Some("dough, sauce, cheese".to_string()),
        };
        assert_eq!(pizza.to_string(), "<Pizza Cheese, dough, sauce, cheese>");
        let restaurant = Restaurant {
            id: 1,
            name: Some("Dino's".to_string()),
            address: None,
        };
        assert_eq!(restaurant.to_string(), "<Restaurant Dino's>");
    }

    #[test]
    fn test_display_missing_fields() {
        let restaurant = Restaurant {
            id: 1,
            name: None,
            address: None,
        };
        assert_eq!(restaurant.to_string(), "<Restaurant None>");

        let pizza = Pizza {
            id: 1,
            name: Some("Cheese".to_string()),
            ingredients: None,
        };
        assert_eq!(pizza.to_string(), "<Pizza Cheese, None>");

        let link = RestaurantPizza {
            id: 1,
            price: Price::new(12).unwrap(),
            pizza_id: 1,
            restaurant_id: 1,
        };
        assert_eq!(link.to_string(), "<RestaurantPizza $12>");
    }
}
