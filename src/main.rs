use actix_web::middleware::Logger;
use actix_web::{web, App, Error, HttpResponse, HttpServer, Responder, Result};
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::bson::doc;
use mongodb::options::FindOptions;
use mongodb::Collection;
use uuid::Uuid;

use models::{ListParams, Product, ProductInput};
use pagination::{assemble_page, PageCursor};
use query::ProductQueryBuilder;

mod db;
mod models;
mod pagination;
mod query;

async fn create_product(db: web::Data<Collection<Product>>, data: web::Json<ProductInput>) -> impl Responder {
    let product = Product {
        _id: Uuid::new_v4().to_string(),
        name: data.name.clone(),
        price: data.price,
        description: data.description.clone(),
        created_at: Some(Utc::now()),
    };

    match db.insert_one(&product, None).await {
        Ok(_) => HttpResponse::Created().json(product),
        Err(e) => {
            log::error!("Failed to insert product: {}", e);
            HttpResponse::InternalServerError().json("Failed to create product")
        }
    }
}

async fn list_products(db: web::Data<Collection<Product>>, params: web::Query<ListParams>) -> Result<HttpResponse, Error> {
    let params = params.into_inner();

    let cursor = match PageCursor::from_params(&params) {
        Ok(cursor) => cursor,
        Err(e) => return Ok(HttpResponse::BadRequest().json(e.to_string())),
    };

    let plan = ProductQueryBuilder::new(&params, &cursor).build();
    let options = FindOptions::builder()
        .sort(plan.sort.clone())
        .limit(plan.limit)
        .build();

    let mut stream = match db.find(plan.filter.clone(), options).await {
        Ok(stream) => stream,
        Err(e) => {
            log::error!("Failed to query products: {}", e);
            return Ok(HttpResponse::InternalServerError().json("Failed to load products"));
        }
    };

    let mut rows = vec![];
    while let Some(result) = stream.next().await {
        match result {
            Ok(product) => rows.push(product),
            Err(e) => {
                log::error!("Failed to read product page: {}", e);
                return Ok(HttpResponse::InternalServerError().json("Failed to load products"));
            }
        }
    }

    let page = cursor.next_page_number(params.direction);
    Ok(HttpResponse::Ok().json(assemble_page(rows, &plan, page)))
}

async fn get_product(db: web::Data<Collection<Product>>, id: web::Path<String>) -> Result<HttpResponse> {
    let id = id.into_inner();
    if id.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json("Missing product id"));
    }

    match db.find_one(doc! { "_id": &id }, None).await {
        Ok(Some(product)) => Ok(HttpResponse::Ok().json(product)),
        Ok(None) => Ok(HttpResponse::NotFound().json("Product not found")),
        Err(e) => {
            log::error!("Failed to load product {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json("Failed to load product"))
        }
    }
}

async fn update_product(db: web::Data<Collection<Product>>, id: web::Path<String>, new_value: web::Json<ProductInput>) -> Result<HttpResponse, Error> {
    let id = id.into_inner();
    if id.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json("Missing product id"));
    }

    // created_at keeps its insertion-time value
    let update = doc! { "$set": {
        "name": new_value.name.clone(),
        "price": new_value.price,
        "description": new_value.description.clone(),
    }};

    match db.update_one(doc! { "_id": &id }, update, None).await {
        Ok(result) if result.matched_count == 1 => Ok(HttpResponse::Ok().json("Product updated successfully")),
        Ok(_) => Ok(HttpResponse::NotFound().json("Product not found")),
        Err(e) => {
            log::error!("Failed to update product {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json("Failed to update product"))
        }
    }
}

async fn delete_product(db: web::Data<Collection<Product>>, id: web::Path<String>) -> Result<HttpResponse, Error> {
    let id = id.into_inner();
    if id.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json("Missing product id"));
    }

    match db.delete_one(doc! { "_id": &id }, None).await {
        Ok(result) if result.deleted_count == 1 => Ok(HttpResponse::Ok().json("Product deleted successfully")),
        Ok(_) => Ok(HttpResponse::NotFound().json("Product not found")),
        Err(e) => {
            log::error!("Failed to delete product {}: {}", id, e);
            Ok(HttpResponse::InternalServerError().json("Failed to delete product"))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok(); // Load environment variables from .env file
    env_logger::init(); // Initialize the logger

    // Connect to the MongoDB products collection
    let products = db::connect().await;

    // Start the Actix-web HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(products.clone())) // Share the collection with handlers
            .route("/products", web::post().to(create_product))
            .route("/products", web::get().to(list_products))
            .route("/products/{id}", web::get().to(get_product))
            .route("/products/{id}", web::put().to(update_product))
            .route("/products/{id}", web::delete().to(delete_product))
    })
    .bind("127.0.0.1:8080")? // Bind the server to localhost on port 8080
    .run() // Run the server
    .await
}
