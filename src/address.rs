//! Page address construction.
//!
//! Minutes pages live at a predictable location:
//!
//! ```text
//! {base}/monetary-policy-summary-and-minutes/{year}/{month}-{year}
//! ```
//!
//! e.g. `https://www.bankofengland.co.uk/monetary-policy-summary-and-minutes/2023/march-2023`.

use crate::models::PageAddress;

/// Site the minutes are published on.
pub const DEFAULT_BASE_URL: &str = "https://www.bankofengland.co.uk";

/// Path segment shared by every minutes page.
pub const MINUTES_PATH: &str = "monetary-policy-summary-and-minutes";

/// Canonical month names, in calendar order.
pub const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Build the address of the minutes page for `year` and `month_name` on the
/// default site.
///
/// The month name is case-insensitive. It is not checked against
/// [`MONTHS`]; an unknown name just yields an address that will not resolve.
///
/// # Examples
///
/// ```
/// use mpc_minutes::address::build_address;
///
/// let address = build_address(2023, "March");
/// assert!(address.as_str().ends_with("/2023/march-2023"));
/// ```
pub fn build_address(year: i32, month_name: &str) -> PageAddress {
    build_address_with_base(DEFAULT_BASE_URL, year, month_name)
}

/// Same as [`build_address`] against an arbitrary base URL.
pub fn build_address_with_base(base: &str, year: i32, month_name: &str) -> PageAddress {
    let month_slug = month_slug(month_name);
    PageAddress::new(format!(
        "{}/{MINUTES_PATH}/{year}/{month_slug}-{year}",
        base.trim_end_matches('/')
    ))
}

/// Lowercased month name, as used in addresses and row labels.
pub fn month_slug(month_name: &str) -> String {
    month_name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_build_address_format() {
        assert_eq!(
            build_address(2023, "march").as_str(),
            "https://www.bankofengland.co.uk/monetary-policy-summary-and-minutes/2023/march-2023"
        );
    }

    #[test]
    fn test_build_address_is_case_insensitive() {
        let upper = build_address(2023, "March");
        let lower = build_address(2023, "march");
        assert_eq!(upper, lower);
        assert!(upper.as_str().ends_with("march-2023"));
    }

    #[test]
    fn test_build_address_is_deterministic() {
        assert_eq!(build_address(2019, "june"), build_address(2019, "june"));
    }

    #[test]
    fn test_build_address_is_injective_over_grid() {
        let mut seen = HashSet::new();
        for year in 2015..=2025 {
            for month in MONTHS {
                assert!(seen.insert(build_address(year, month)), "{year} {month}");
            }
        }
        assert_eq!(seen.len(), 11 * 12);
    }

    #[test]
    fn test_build_address_with_base_ignores_trailing_slash() {
        let a = build_address_with_base("http://127.0.0.1:8080/", 2024, "May");
        let b = build_address_with_base("http://127.0.0.1:8080", 2024, "may");
        assert_eq!(a, b);
        assert_eq!(
            a.as_str(),
            "http://127.0.0.1:8080/monetary-policy-summary-and-minutes/2024/may-2024"
        );
    }

    #[test]
    fn test_unknown_month_is_passed_through() {
        let address = build_address(2023, "Smarch");
        assert!(address.as_str().ends_with("/2023/smarch-2023"));
    }
}
