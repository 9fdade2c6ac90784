//! Small shared utilities: timestamps, row IDs, slugs.

/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER so admin
/// frontends can round-trip IDs without strings):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at admin scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Derive a URL slug from a display name, deterministically.
///
/// Lowercases, maps runs of non-alphanumeric characters to a single `-`,
/// and trims leading/trailing dashes. The same name always yields the same
/// slug, so re-saving a product without renaming it keeps its URL stable.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true; // suppress a leading dash
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_is_deterministic_and_url_safe() {
        assert_eq!(slugify("Blue T-Shirt (XL)"), "blue-t-shirt-xl");
        assert_eq!(slugify("  Café --- Crème  "), "café-crème");
        assert_eq!(slugify("Blue T-Shirt (XL)"), slugify("Blue T-Shirt (XL)"));
    }

    #[test]
    fn slugify_handles_empty_and_symbol_only_names() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn snowflake_ids_fit_in_js_safe_integer_range() {
        for _ in 0..64 {
            let id = snowflake_id();
            assert!(id > 0);
            assert!(id < (1 << 53));
        }
    }
}
