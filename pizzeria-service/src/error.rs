use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("price need to be over $1")]
    PriceTooLow(i32),
    #[error("select a price less than $30")]
    PriceTooHigh(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Restaurant,
    Pizza,
    RestaurantPizza,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Restaurant => "Restaurant",
            Entity::Pizza => "Pizza",
            Entity::RestaurantPizza => "RestaurantPizza",
        })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i32 },
    #[error("{entity} {id} does not exist")]
    Referential { entity: Entity, id: i32 },
    #[error("error while executing database query")]
    Database(#[from] diesel::result::Error),
}

impl Error {
    pub fn not_found(entity: Entity, id: i32) -> Self {
        Error::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
