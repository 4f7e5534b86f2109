//! GROQ queries used by the storefront.
//!
//! Projections list every field the ingestion boundary reads, so a schema
//! change in the studio shows up as a rejected record rather than a
//! silently missing value.

/// All products, with the category dereferenced to its id and title.
pub const PRODUCTS: &str = r#"*[_type == "products"]{
  _id,
  _type,
  title,
  price,
  priceWithoutDiscount,
  badge,
  image,
  category->{_id, title},
  description,
  inventory,
  tags
}"#;

/// All categories.
pub const CATEGORIES: &str = r#"*[_type == "categories"]{
  _id,
  _type,
  title,
  image,
  products
}"#;

/// Document type of products.
pub const PRODUCT_TYPE: &str = "products";

/// Document type of categories.
pub const CATEGORY_TYPE: &str = "categories";

/// Document type of placed orders.
pub const ORDER_TYPE: &str = "order";
