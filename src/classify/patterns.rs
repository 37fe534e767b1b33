//! Default URL pattern lists
//!
//! These are ordinary regex fragments matched case-insensitively against
//! the full URL string. Both lists are compiled once at startup and never
//! mutated afterwards.

/// Patterns that indicate a product detail page
pub const PRODUCT_PATTERNS: &[&str] = &[
    // Common path patterns
    r"/product[s]?/",
    r"/item[s]?/",
    r"/p/",
    r"pdp/",
    r"/shop/",
    r"product_id=",
    r"sku=",
    // ID-based patterns
    r"/[a-zA-Z0-9-]+/[a-zA-Z0-9-]+-p-\d+",
    r"/product[_-]id[_-]?\d+",
    r"/item[_-]id[_-]?\d+",
    r"/prod\d+",
    r"/pid[_-]?\d+",
    // Platform-specific patterns
    r"/catalog/product/view/id/\d+", // Magento
    r"/products/[\w-]+$",            // Shopify
    r"/shop/[\w-]+/[\w-]+$",         // WooCommerce
];

/// Patterns for navigational and account pages that are never products
pub const IGNORE_PATTERNS: &[&str] = &[
    // Navigation pages
    r"/category/",
    r"/search\?",
    r"sort=",
    r"page=",
    r"/department",
    r"/catalog/",
    r"/brand/",
    // Shopping functions
    r"/cart/",
    r"/checkout/",
    r"/basket/",
    r"/shopping-bag/",
    r"/payment/",
    // User pages
    r"/account/",
    r"/login",
    r"/register",
    r"/wishlist",
    r"/favorites",
    // Support pages
    r"/contact",
    r"/support",
    r"/help",
    r"/faq",
];
