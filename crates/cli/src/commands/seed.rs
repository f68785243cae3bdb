//! Seed the database with demo data.
//!
//! Idempotent: users upsert on email, categories and products on slug, so
//! re-running the command never duplicates rows.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use rosewood_api::services::auth;
use rosewood_core::UserRole;

struct SeedCategory {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    image: &'static str,
}

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    /// Price in minor units (paise); converted to a two-decimal value.
    price_cents: i64,
    compare_price_cents: Option<i64>,
    category_slug: &'static str,
    stock: i32,
    sku: &'static str,
    images: &'static [&'static str],
    sizes: &'static [&'static str],
    colors: &'static [&'static str],
    tags: &'static [&'static str],
    is_featured: bool,
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Beauty & Cosmetics",
        slug: "beauty-cosmetics",
        description: "Premium beauty products and cosmetics",
        image: "https://images.example.com/categories/beauty.jpg",
    },
    SeedCategory {
        name: "Fashion & Clothing",
        slug: "fashion-clothing",
        description: "Trendy fashion and clothing for women",
        image: "https://images.example.com/categories/fashion.jpg",
    },
    SeedCategory {
        name: "Hosiery",
        slug: "hosiery",
        description: "Comfortable and stylish hosiery",
        image: "https://images.example.com/categories/hosiery.jpg",
    },
    SeedCategory {
        name: "Undergarments",
        slug: "undergarments",
        description: "Premium quality undergarments",
        image: "https://images.example.com/categories/undergarments.jpg",
    },
    SeedCategory {
        name: "Baby Clothing",
        slug: "baby-clothing",
        description: "Adorable clothing for babies",
        image: "https://images.example.com/categories/baby.jpg",
    },
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Luxury Lipstick - Ruby Red",
        slug: "luxury-lipstick-ruby-red",
        description: "Long-lasting luxury lipstick with rich color and moisturizing formula",
        price_cents: 59_900,
        compare_price_cents: Some(79_900),
        category_slug: "beauty-cosmetics",
        stock: 50,
        sku: "BEAUTY-LIP-001",
        images: &["https://images.example.com/products/lipstick-1.jpg"],
        sizes: &[],
        colors: &["Ruby Red", "Pink Blush", "Coral"],
        tags: &["makeup", "lipstick", "beauty"],
        is_featured: true,
    },
    SeedProduct {
        name: "Floral Summer Dress",
        slug: "floral-summer-dress",
        description: "Beautiful floral print summer dress with comfortable fit",
        price_cents: 129_900,
        compare_price_cents: Some(179_900),
        category_slug: "fashion-clothing",
        stock: 30,
        sku: "FASHION-DRESS-001",
        images: &["https://images.example.com/products/dress-1.jpg"],
        sizes: &["S", "M", "L", "XL"],
        colors: &["Blue", "Pink"],
        tags: &["dress", "summer", "floral"],
        is_featured: true,
    },
    SeedProduct {
        name: "Sheer Tights - Black",
        slug: "sheer-tights-black",
        description: "Durable sheer tights with reinforced toe",
        price_cents: 29_900,
        compare_price_cents: None,
        category_slug: "hosiery",
        stock: 100,
        sku: "HOSIERY-TIGHT-001",
        images: &["https://images.example.com/products/tights-1.jpg"],
        sizes: &["S", "M", "L"],
        colors: &["Black", "Nude"],
        tags: &["tights", "hosiery"],
        is_featured: false,
    },
    SeedProduct {
        name: "Cotton Comfort Bra",
        slug: "cotton-comfort-bra",
        description: "Soft cotton bra for all-day comfort",
        price_cents: 49_900,
        compare_price_cents: Some(69_900),
        category_slug: "undergarments",
        stock: 75,
        sku: "UNDER-BRA-001",
        images: &["https://images.example.com/products/bra-1.jpg"],
        sizes: &["32B", "34B", "36B", "38C"],
        colors: &["White", "Black", "Beige"],
        tags: &["bra", "cotton", "comfort"],
        is_featured: false,
    },
    SeedProduct {
        name: "Baby Romper Set",
        slug: "baby-romper-set",
        description: "Adorable two-piece romper set in organic cotton",
        price_cents: 89_900,
        compare_price_cents: None,
        category_slug: "baby-clothing",
        stock: 40,
        sku: "BABY-ROMPER-001",
        images: &["https://images.example.com/products/romper-1.jpg"],
        sizes: &["0-3M", "3-6M", "6-12M"],
        colors: &["Yellow", "Mint"],
        tags: &["baby", "romper", "organic"],
        is_featured: true,
    },
];

/// Seed demo accounts, categories and products.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a statement fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    seed_user(
        &pool,
        "admin@example.com",
        "admin123456",
        "Admin",
        "User",
        UserRole::Admin,
    )
    .await?;
    seed_user(
        &pool,
        "customer@example.com",
        "customer123",
        "Jane",
        "Doe",
        UserRole::Customer,
    )
    .await?;
    info!("Seeded demo accounts");

    for category in CATEGORIES {
        sqlx::query(
            r"
            INSERT INTO categories (name, slug, description, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (slug) DO NOTHING
            ",
        )
        .bind(category.name)
        .bind(category.slug)
        .bind(category.description)
        .bind(category.image)
        .execute(&pool)
        .await?;
    }
    info!(count = CATEGORIES.len(), "Seeded categories");

    for product in PRODUCTS {
        let images: Vec<String> = product.images.iter().map(ToString::to_string).collect();
        let sizes: Vec<String> = product.sizes.iter().map(ToString::to_string).collect();
        let colors: Vec<String> = product.colors.iter().map(ToString::to_string).collect();
        let tags: Vec<String> = product.tags.iter().map(ToString::to_string).collect();

        sqlx::query(
            r"
            INSERT INTO products
                (name, slug, description, price, compare_price, category_id,
                 stock, sku, images, sizes, colors, tags, is_featured)
            SELECT $1, $2, $3, $4, $5, c.id, $7, $8, $9, $10, $11, $12, $13
            FROM categories c
            WHERE c.slug = $6
            ON CONFLICT (slug) DO NOTHING
            ",
        )
        .bind(product.name)
        .bind(product.slug)
        .bind(product.description)
        .bind(Decimal::new(product.price_cents, 2))
        .bind(product.compare_price_cents.map(|c| Decimal::new(c, 2)))
        .bind(product.category_slug)
        .bind(product.stock)
        .bind(product.sku)
        .bind(&images)
        .bind(&sizes)
        .bind(&colors)
        .bind(&tags)
        .bind(product.is_featured)
        .execute(&pool)
        .await?;
    }
    info!(count = PRODUCTS.len(), "Seeded products");

    Ok(())
}

async fn seed_user(
    pool: &PgPool,
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
    role: UserRole,
) -> Result<(), Box<dyn std::error::Error>> {
    let password_hash = auth::hash_password(password)?;

    let user_id: Option<(i32,)> = sqlx::query_as(
        r"
        INSERT INTO users (email, password_hash, first_name, last_name, role, is_verified)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        ",
    )
    .bind(email)
    .bind(&password_hash)
    .bind(first_name)
    .bind(last_name)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // New rows get their cart; existing users already have one.
    if let Some((id,)) = user_id {
        sqlx::query("INSERT INTO carts (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(id)
            .execute(pool)
            .await?;
    }

    Ok(())
}
