pub mod seller_products;
