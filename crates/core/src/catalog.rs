//! Product category catalogue used by the listing enhancement steps.
//!
//! Each category carries a display name, the studio backgrounds offered to
//! sellers, and the listing template the content step starts from.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Listing copy produced for a category before SEO optimisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub keywords: &'static str,
    pub category_label: &'static str,
    pub suggested_price: &'static str,
}

/// Top-level product category detected during the analysis step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Fashion,
    Electronics,
    Home,
    Beauty,
    Jewelry,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::Fashion,
        ProductCategory::Electronics,
        ProductCategory::Home,
        ProductCategory::Beauty,
        ProductCategory::Jewelry,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ProductCategory::Fashion => "Fashion & Clothing",
            ProductCategory::Electronics => "Electronics & Gadgets",
            ProductCategory::Home => "Home & Decor",
            ProductCategory::Beauty => "Beauty & Cosmetics",
            ProductCategory::Jewelry => "Jewelry & Accessories",
        }
    }

    /// Background styles suggested for this category. The first entry is
    /// the default applied by the enhancement step.
    pub fn backgrounds(self) -> &'static [&'static str] {
        match self {
            ProductCategory::Fashion => &[
                "Studio gradient (Neutral)",
                "Lifestyle setting (Model wearing)",
                "Clean white studio",
                "Soft pastel gradient",
                "Minimalist backdrop",
            ],
            ProductCategory::Electronics => &[
                "Modern tech desk",
                "Clean geometric background",
                "Futuristic gradient",
                "Professional workspace",
                "Minimalist tech surface",
            ],
            ProductCategory::Home => &[
                "Complementary room setting",
                "Neutral surface texture",
                "Cozy home environment",
                "Modern interior backdrop",
                "Natural lighting setup",
            ],
            ProductCategory::Beauty => &[
                "Elegant marble texture",
                "Soft lighting gradient",
                "Premium silk backdrop",
                "Luxury spa setting",
                "Rose gold accent background",
            ],
            ProductCategory::Jewelry => &[
                "Luxury velvet texture",
                "Dramatic lighting setup",
                "Premium silk backdrop",
                "Elegant gradient",
                "High-end jewelry display",
            ],
        }
    }

    /// Extra search terms appended during SEO optimisation.
    pub fn seo_terms(self) -> &'static [&'static str] {
        match self {
            ProductCategory::Fashion => &["festive wear", "trending ethnic", "best price"],
            ProductCategory::Electronics => &["latest gadget", "fast delivery", "best price"],
            ProductCategory::Home => &["home makeover", "gift idea", "best price"],
            ProductCategory::Beauty => &["skin care routine", "gift idea", "best price"],
            ProductCategory::Jewelry => &["wedding collection", "gift idea", "best price"],
        }
    }

    pub fn content_template(self) -> ContentTemplate {
        match self {
            ProductCategory::Fashion => ContentTemplate {
                title: "Premium Cotton Kurta Set - Traditional Ethnic Wear",
                description: "Elegant and comfortable cotton kurta set perfect for festive \
                    occasions. Features intricate embroidery work, premium quality fabric, and \
                    traditional design. Available in multiple sizes with matching dupatta. Ideal \
                    for festivals, parties, and cultural events.",
                keywords: "cotton kurta, ethnic wear, traditional dress, festival wear, \
                    embroidered kurta, Indian clothing",
                category_label: "Women's Ethnic Wear",
                suggested_price: "₹1,299",
            },
            ProductCategory::Electronics => ContentTemplate {
                title: "Wireless Bluetooth Earbuds - Premium Sound Quality",
                description: "High-quality wireless earbuds with crystal clear sound, noise \
                    cancellation, and long battery life. Perfect for music, calls, and workouts. \
                    Comes with charging case and multiple ear tip sizes for comfortable fit.",
                keywords: "wireless earbuds, bluetooth headphones, noise cancellation, premium \
                    audio, wireless charging",
                category_label: "Electronics & Accessories",
                suggested_price: "₹2,499",
            },
            ProductCategory::Home => ContentTemplate {
                title: "Decorative Wall Art Canvas - Modern Abstract Design",
                description: "Beautiful modern abstract wall art perfect for living room, \
                    bedroom, or office decoration. High-quality canvas print with vibrant colors \
                    and contemporary design. Ready to hang with included mounting hardware.",
                keywords: "wall art, canvas print, home decor, abstract art, modern design, \
                    interior decoration",
                category_label: "Home & Garden",
                suggested_price: "₹899",
            },
            ProductCategory::Beauty => ContentTemplate {
                title: "Natural Face Serum - Anti-Aging & Hydrating Formula",
                description: "Premium anti-aging face serum with natural ingredients for deep \
                    hydration and skin rejuvenation. Reduces fine lines, improves skin texture, \
                    and provides lasting moisture. Suitable for all skin types.",
                keywords: "face serum, anti-aging, natural skincare, hydrating serum, beauty \
                    products, skin care",
                category_label: "Beauty & Personal Care",
                suggested_price: "₹1,799",
            },
            ProductCategory::Jewelry => ContentTemplate {
                title: "Gold Plated Necklace Set - Traditional Indian Jewelry",
                description: "Exquisite gold plated necklace set with matching earrings. \
                    Features traditional Indian design with intricate patterns and premium \
                    finish. Perfect for weddings, festivals, and special occasions.",
                keywords: "gold plated jewelry, necklace set, traditional jewelry, Indian \
                    jewelry, wedding jewelry",
                category_label: "Jewelry & Accessories",
                suggested_price: "₹3,299",
            },
        }
    }

    /// Detect a category from the resource locator.
    ///
    /// Deterministic: the first byte of the SHA-256 digest of the locator
    /// selects a category, so resubmitting the same image yields the same
    /// listing.
    pub fn detect(resource_locator: &str) -> ProductCategory {
        let digest = locator_digest(resource_locator);
        Self::ALL[digest[0] as usize % Self::ALL.len()]
    }
}

/// SHA-256 digest of a resource locator.
///
/// Shared by category detection and confidence scoring so both derive from
/// the same input.
pub fn locator_digest(resource_locator: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(resource_locator.as_bytes());
    hasher.finalize().into()
}
