//! Race-name to country-code lookup
//!
//! Race names embed the host country or city ("Bahrain Grand Prix",
//! "Miami Grand Prix"), so a substring match against a static table is
//! enough to pick the ISO 3166-1 alpha-2 code a flag renderer wants.

/// Substring of a race name, paired with the host country's code. Checked in
/// order; city-named races precede their country's generic entry.
const COUNTRY_TABLE: &[(&str, &str)] = &[
    ("Abu Dhabi", "AE"),
    ("Australian", "AU"),
    ("Austrian", "AT"),
    ("Styrian", "AT"),
    ("Azerbaijan", "AZ"),
    ("Bahrain", "BH"),
    ("Sakhir", "BH"),
    ("Belgian", "BE"),
    ("Brazilian", "BR"),
    ("São Paulo", "BR"),
    ("Sao Paulo", "BR"),
    ("British", "GB"),
    ("70th Anniversary", "GB"),
    ("Canadian", "CA"),
    ("Chinese", "CN"),
    ("Dutch", "NL"),
    ("Eifel", "DE"),
    ("German", "DE"),
    ("French", "FR"),
    ("Hungarian", "HU"),
    ("Emilia Romagna", "IT"),
    ("Tuscan", "IT"),
    ("Italian", "IT"),
    ("Japanese", "JP"),
    ("Korean", "KR"),
    ("Indian", "IN"),
    ("Las Vegas", "US"),
    ("Miami", "US"),
    ("United States", "US"),
    ("Malaysian", "MY"),
    ("Mexico City", "MX"),
    ("Mexican", "MX"),
    ("Monaco", "MC"),
    ("Portuguese", "PT"),
    ("Qatar", "QA"),
    ("Russian", "RU"),
    ("Saudi Arabian", "SA"),
    ("Singapore", "SG"),
    ("Spanish", "ES"),
    ("Turkish", "TR"),
    ("Vietnamese", "VN"),
    ("European", "EU"),
];

/// ISO country code for a race, by substring match against its name.
pub fn country_code_for_race(race_name: &str) -> Option<&'static str> {
    COUNTRY_TABLE
        .iter()
        .find(|(fragment, _)| race_name.contains(fragment))
        .map(|(_, code)| *code)
}
