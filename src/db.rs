use mongodb::{Client, options::ClientOptions, Collection};
use std::env;

use crate::models::Product;

/// Connects to MongoDB and returns the products collection handle shared by
/// every handler.
pub async fn connect() -> Collection<Product> {
    // Retrieve the MongoDB connection string from environment variables
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    // Parse the connection string into client options
    let client_options = ClientOptions::parse(&database_url)
        .await
        .expect("Failed to parse MongoDB connection string");

    // Initialize the MongoDB client
    let client = Client::with_options(client_options).expect("Failed to initialize MongoDB client");

    client.database("catalog_db").collection::<Product>("products")
}
