//! Static product catalog.
//!
//! The catalog is built once at startup and never mutated afterwards.
//! Handlers resolve products through [`Catalog::lookup`] rather than
//! reaching into the list directly, so a cart entry whose product has
//! disappeared degrades to a skipped line instead of a crash.

use std::collections::HashMap;

use spicejar_core::{ProductId, Rupees};

/// A product in the catalog.
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique, stable product id.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price in whole rupees.
    pub price: Rupees,
    /// Image URL.
    pub image: String,
    /// Short description.
    pub description: String,
}

/// Read-only product catalog with lookup by id.
#[derive(Debug)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from a product list. Later duplicates of an id
    /// are ignored; the first entry wins.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut index = HashMap::with_capacity(products.len());
        for (pos, product) in products.iter().enumerate() {
            index.entry(product.id).or_insert(pos);
        }
        Self { products, index }
    }

    /// The standard Spicejar product range.
    #[must_use]
    pub fn seed() -> Self {
        Self::new(seed_products())
    }

    /// Resolve a product by id.
    #[must_use]
    pub fn lookup(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).and_then(|&pos| self.products.get(pos))
    }

    /// All products, in listing order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }
}

fn product(id: i32, name: &str, price: i64, image: &str, description: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Rupees::new(price),
        image: image.to_string(),
        description: description.to_string(),
    }
}

/// The product range: non-veg pickles, veg pickles, snacks.
fn seed_products() -> Vec<Product> {
    vec![
        // Non-veg pickles
        product(
            1,
            "Chicken Pickle",
            350,
            "https://i0.wp.com/ahahomefoods.com/wp-content/uploads/2024/06/chicken-pickle-with-bone.jpeg",
            "Authentic, spicy, meaty pickle known for its soul-melting taste and organic ingredients.",
        ),
        product(
            2,
            "Gongura Mutton Pickle",
            320,
            "https://andhrapachallu.com/cdn/shop/files/Image-50-scaled.png",
            "Similar to the chicken version, this pickle combines mutton with gongura.",
        ),
        product(
            3,
            "Boti Pickle",
            400,
            "https://chefsarufoods.com/wp-content/uploads/2024/10/gongura-boti-product-image-scaled.jpg",
            "Newly introduced pickle made with boti (tripe).",
        ),
        product(
            4,
            "Fish Pickle",
            380,
            "https://5.imimg.com/data5/ANDROID/Default/2022/1/ZG/CF/RB/145196166/product-jpeg-500x500.jpg",
            "Juicy fish pieces.",
        ),
        // Veg pickles
        product(
            5,
            "Mango Pickle",
            280,
            "https://i0.wp.com/binjalsvegkitchen.com/wp-content/uploads/2024/04/Instant-Mango-Pickle-H1.jpg",
            "A classic Andhra-style pickle made with raw mangoes, mustard seeds, and spices.",
        ),
        product(
            6,
            "Mixed Veg Pickle",
            280,
            "https://s3-ap-south-1.amazonaws.com/betterbutterbucket-silver/divya-r20180620215346113.jpeg",
            "Carrot, cauliflower, lime and mango combo.",
        ),
        product(
            7,
            "Tomato Pickle",
            250,
            "https://www.indianhealthyrecipes.com/wp-content/uploads/2020/06/tomato-pickle-recipe.jpg",
            "Ripe tomatoes with a blend of spices.",
        ),
        product(
            8,
            "Gongura Pickle",
            220,
            "https://vellankifoods.com/cdn/shop/products/gongura_pickle_2.jpg",
            "Tangy sorrel leaves with special spice.",
        ),
        // Snacks
        product(
            9,
            "Madras Mixture",
            230,
            "https://masalamonk.com/wp-content/uploads/2025/02/Unusual-Indian-Pickles.jpg",
            "A spicy and crunchy snack mix from South India.",
        ),
        product(
            10,
            "Murukku Chakki",
            300,
            "https://5.imimg.com/data5/SELLER/Default/2025/3/497746042/ZR/YQ/CF/67465829/muruk-condiments-500x500.png",
            "Roasted murukku with delicious taste.",
        ),
        product(
            11,
            "Ribbon Pakoda",
            220,
            "https://girijapaati.com/cdn/shop/collections/enh_classicribbon.jpg",
            "Classic ribbon-cut savoury snack.",
        ),
        product(
            12,
            "Bombay Mixture",
            150,
            "https://karaikaliyangars.com/cdn/shop/products/BombayMixture.jpg",
            "Crunchy Bombay mixture.",
        ),
    ]
}
