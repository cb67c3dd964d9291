use std::io::{self, Write};

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use diesel::SqliteConnection;
use dotenvy::dotenv;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use pizzeria_service::serializer::{
    serialize_pizza, serialize_pizza_with_restaurants, serialize_restaurant,
    serialize_restaurant_pizza, serialize_restaurant_with_pizzas,
};
use pizzeria_service::{database_url, establish_connection, run_migrations, seed, service};

#[derive(Parser, Debug)]
#[command(version, about = "Manage restaurants, pizzas and the prices they are sold at")]
struct Cli {
    /// Database to operate on; defaults to pizzeria.db
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply pending migrations and exit
    Migrate,
    /// Replace all data with a sample menu
    Seed,
    #[command(subcommand)]
    Restaurants(RestaurantCommand),
    #[command(subcommand)]
    Pizzas(PizzaCommand),
    #[command(subcommand)]
    RestaurantPizzas(RestaurantPizzaCommand),
}

#[derive(Subcommand, Debug)]
enum RestaurantCommand {
    List {
        #[arg(long)]
        with_pizzas: bool,
    },
    Show {
        id: i32,
        #[arg(long)]
        with_pizzas: bool,
    },
    Create {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    Delete {
        id: i32,
    },
}

#[derive(Subcommand, Debug)]
enum PizzaCommand {
    List,
    Show {
        id: i32,
        #[arg(long)]
        with_restaurants: bool,
    },
    Create {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        ingredients: Option<String>,
    },
    Delete {
        id: i32,
    },
}

#[derive(Subcommand, Debug)]
enum RestaurantPizzaCommand {
    Show {
        id: i32,
    },
    Create {
        #[arg(long, allow_negative_numbers = true)]
        price: i32,
        #[arg(long)]
        restaurant_id: i32,
        #[arg(long)]
        pizza_id: i32,
    },
    UpdatePrice {
        id: i32,
        #[arg(long, allow_negative_numbers = true)]
        price: i32,
    },
    Delete {
        id: i32,
    },
}

fn print_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn show_restaurant_pizza<W: Write>(
    conn: &mut SqliteConnection,
    out: &mut W,
    id: i32,
) -> anyhow::Result<()> {
    let (link, restaurant, pizza) = service::get_restaurant_pizza_details(conn, id)?;
    print_json(out, &serialize_restaurant_pizza(&link, &restaurant, &pizza))
}

fn run<W: Write>(
    command: Commands,
    conn: &mut SqliteConnection,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Migrate => {
            let applied = run_migrations(conn).map_err(|e| anyhow!(e))?;
            print_json(out, &json!({ "applied": applied }))
        }
        Commands::Seed => {
            seed::seed(conn)?;
            Ok(())
        }

        Commands::Restaurants(RestaurantCommand::List { with_pizzas: false }) => {
            let records = service::list_restaurants(conn)?
                .iter()
                .map(serialize_restaurant)
                .collect::<Vec<_>>();
            print_json(out, &records)
        }
        Commands::Restaurants(RestaurantCommand::List { with_pizzas: true }) => {
            let records = service::list_restaurants_with_pizzas(conn)?
                .iter()
                .map(|(restaurant, links)| serialize_restaurant_with_pizzas(restaurant, links))
                .collect::<Vec<_>>();
            print_json(out, &records)
        }
        Commands::Restaurants(RestaurantCommand::Show { id, with_pizzas }) => {
            print_json(out, &service::show_restaurant(conn, id, with_pizzas)?)
        }
        Commands::Restaurants(RestaurantCommand::Create { name, address }) => {
            let restaurant =
                service::create_restaurant(conn, name.as_deref(), address.as_deref())?;
            print_json(out, &serialize_restaurant(&restaurant))
        }
        Commands::Restaurants(RestaurantCommand::Delete { id }) => {
            service::delete_restaurant(conn, id)?;
            Ok(())
        }

        Commands::Pizzas(PizzaCommand::List) => {
            let records = service::list_pizzas(conn)?
                .iter()
                .map(serialize_pizza)
                .collect::<Vec<_>>();
            print_json(out, &records)
        }
        Commands::Pizzas(PizzaCommand::Show {
            id,
            with_restaurants,
        }) => {
            let pizza = service::get_pizza(conn, id)?;
            if with_restaurants {
                let links = service::links_of_pizza(conn, &pizza)?;
                print_json(out, &serialize_pizza_with_restaurants(&pizza, &links))
            } else {
                print_json(out, &serialize_pizza(&pizza))
            }
        }
        Commands::Pizzas(PizzaCommand::Create { name, ingredients }) => {
            let pizza = service::create_pizza(conn, name.as_deref(), ingredients.as_deref())?;
            print_json(out, &serialize_pizza(&pizza))
        }
        Commands::Pizzas(PizzaCommand::Delete { id }) => {
            service::delete_pizza(conn, id)?;
            Ok(())
        }

        Commands::RestaurantPizzas(RestaurantPizzaCommand::Show { id }) => {
            show_restaurant_pizza(conn, out, id)
        }
        Commands::RestaurantPizzas(RestaurantPizzaCommand::Create {
            price,
            restaurant_id,
            pizza_id,
        }) => {
            let link = service::create_restaurant_pizza(conn, price, restaurant_id, pizza_id)?;
            show_restaurant_pizza(conn, out, link.id)
        }
        Commands::RestaurantPizzas(RestaurantPizzaCommand::UpdatePrice { id, price }) => {
            let link = service::update_price(conn, id, price)?;
            show_restaurant_pizza(conn, out, link.id)
        }
        Commands::RestaurantPizzas(RestaurantPizzaCommand::Delete { id }) => {
            service::delete_restaurant_pizza(conn, id)?;
            Ok(())
        }
    }
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    dotenv().ok();
    let cli = Cli::parse();
    let database_url = cli.database_url.unwrap_or_else(database_url);

    let mut conn = establish_connection(&database_url)?;
    if !matches!(cli.command, Commands::Migrate) {
        run_migrations(&mut conn).map_err(|e| anyhow!(e))?;
    }

    run(cli.command, &mut conn, &mut io::stdout().lock())
}
