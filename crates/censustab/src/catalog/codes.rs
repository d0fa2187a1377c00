//! Static code tables: states, summary levels and geographic components.

/// A state (or state-equivalent) with its FIPS code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateCode {
    pub abbr: &'static str,
    pub fips: &'static str,
    pub name: &'static str,
}

/// States, DC, Puerto Rico and the nationwide aggregate.
pub static STATES: &[StateCode] = &[
    StateCode { abbr: "AL", fips: "01", name: "Alabama" },
    StateCode { abbr: "AK", fips: "02", name: "Alaska" },
    StateCode { abbr: "AZ", fips: "04", name: "Arizona" },
    StateCode { abbr: "AR", fips: "05", name: "Arkansas" },
    StateCode { abbr: "CA", fips: "06", name: "California" },
    StateCode { abbr: "CO", fips: "08", name: "Colorado" },
    StateCode { abbr: "CT", fips: "09", name: "Connecticut" },
    StateCode { abbr: "DE", fips: "10", name: "Delaware" },
    StateCode { abbr: "DC", fips: "11", name: "District of Columbia" },
    StateCode { abbr: "FL", fips: "12", name: "Florida" },
    StateCode { abbr: "GA", fips: "13", name: "Georgia" },
    StateCode { abbr: "HI", fips: "15", name: "Hawaii" },
    StateCode { abbr: "ID", fips: "16", name: "Idaho" },
    StateCode { abbr: "IL", fips: "17", name: "Illinois" },
    StateCode { abbr: "IN", fips: "18", name: "Indiana" },
    StateCode { abbr: "IA", fips: "19", name: "Iowa" },
    StateCode { abbr: "KS", fips: "20", name: "Kansas" },
    StateCode { abbr: "KY", fips: "21", name: "Kentucky" },
    StateCode { abbr: "LA", fips: "22", name: "Louisiana" },
    StateCode { abbr: "ME", fips: "23", name: "Maine" },
    StateCode { abbr: "MD", fips: "24", name: "Maryland" },
    StateCode { abbr: "MA", fips: "25", name: "Massachusetts" },
    StateCode { abbr: "MI", fips: "26", name: "Michigan" },
    StateCode { abbr: "MN", fips: "27", name: "Minnesota" },
    StateCode { abbr: "MS", fips: "28", name: "Mississippi" },
    StateCode { abbr: "MO", fips: "29", name: "Missouri" },
    StateCode { abbr: "MT", fips: "30", name: "Montana" },
    StateCode { abbr: "NE", fips: "31", name: "Nebraska" },
    StateCode { abbr: "NV", fips: "32", name: "Nevada" },
    StateCode { abbr: "NH", fips: "33", name: "New Hampshire" },
    StateCode { abbr: "NJ", fips: "34", name: "New Jersey" },
    StateCode { abbr: "NM", fips: "35", name: "New Mexico" },
    StateCode { abbr: "NY", fips: "36", name: "New York" },
    StateCode { abbr: "NC", fips: "37", name: "North Carolina" },
    StateCode { abbr: "ND", fips: "38", name: "North Dakota" },
    StateCode { abbr: "OH", fips: "39", name: "Ohio" },
    StateCode { abbr: "OK", fips: "40", name: "Oklahoma" },
    StateCode { abbr: "OR", fips: "41", name: "Oregon" },
    StateCode { abbr: "PA", fips: "42", name: "Pennsylvania" },
    StateCode { abbr: "RI", fips: "44", name: "Rhode Island" },
    StateCode { abbr: "SC", fips: "45", name: "South Carolina" },
    StateCode { abbr: "SD", fips: "46", name: "South Dakota" },
    StateCode { abbr: "TN", fips: "47", name: "Tennessee" },
    StateCode { abbr: "TX", fips: "48", name: "Texas" },
    StateCode { abbr: "UT", fips: "49", name: "Utah" },
    StateCode { abbr: "VT", fips: "50", name: "Vermont" },
    StateCode { abbr: "VA", fips: "51", name: "Virginia" },
    StateCode { abbr: "WA", fips: "53", name: "Washington" },
    StateCode { abbr: "WV", fips: "54", name: "West Virginia" },
    StateCode { abbr: "WI", fips: "55", name: "Wisconsin" },
    StateCode { abbr: "WY", fips: "56", name: "Wyoming" },
    StateCode { abbr: "PR", fips: "72", name: "Puerto Rico" },
    StateCode { abbr: "US", fips: "", name: "United States" },
];

/// Look up a state by abbreviation (case-insensitive).
pub fn state_by_abbr(abbr: &str) -> Option<&'static StateCode> {
    let abbr = abbr.trim();
    STATES.iter().find(|s| s.abbr.eq_ignore_ascii_case(abbr))
}

/// Look up a state by its two-digit FIPS code.
pub fn state_by_fips(fips: &str) -> Option<&'static StateCode> {
    STATES.iter().find(|s| !s.fips.is_empty() && s.fips == fips)
}

/// A summary level: the geographic granularity of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLevel {
    pub code: &'static str,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

pub static SUMMARY_LEVELS: &[SummaryLevel] = &[
    SummaryLevel { code: "010", name: "nation", aliases: &["us", "united states"] },
    SummaryLevel { code: "020", name: "region", aliases: &[] },
    SummaryLevel { code: "030", name: "division", aliases: &[] },
    SummaryLevel { code: "040", name: "state", aliases: &[] },
    SummaryLevel { code: "050", name: "county", aliases: &[] },
    SummaryLevel { code: "060", name: "county subdivision", aliases: &["cousub"] },
    SummaryLevel { code: "067", name: "subminor civil division", aliases: &["submcd"] },
    SummaryLevel { code: "101", name: "block", aliases: &[] },
    SummaryLevel { code: "140", name: "tract", aliases: &["census tract"] },
    SummaryLevel { code: "150", name: "block group", aliases: &["blkgrp"] },
    SummaryLevel { code: "160", name: "place", aliases: &["city"] },
    SummaryLevel { code: "170", name: "consolidated city", aliases: &["concit"] },
    SummaryLevel { code: "230", name: "alaska native regional corporation", aliases: &["anrc"] },
    SummaryLevel { code: "250", name: "american indian area", aliases: &["aianhh"] },
    SummaryLevel {
        code: "310",
        name: "metropolitan/micropolitan statistical area",
        aliases: &["cbsa", "metro", "metro area"],
    },
    SummaryLevel { code: "314", name: "metropolitan division", aliases: &["metdiv"] },
    SummaryLevel { code: "330", name: "combined statistical area", aliases: &["csa"] },
    SummaryLevel { code: "400", name: "urban area", aliases: &["ua"] },
    SummaryLevel { code: "500", name: "congressional district", aliases: &["cd"] },
    SummaryLevel { code: "610", name: "state legislative district (upper)", aliases: &["sldu"] },
    SummaryLevel { code: "620", name: "state legislative district (lower)", aliases: &["sldl"] },
    SummaryLevel { code: "795", name: "public use microdata area", aliases: &["puma"] },
    SummaryLevel { code: "860", name: "zip code tabulation area", aliases: &["zcta", "zip code"] },
    SummaryLevel { code: "950", name: "school district (elementary)", aliases: &["sdelm"] },
    SummaryLevel { code: "960", name: "school district (secondary)", aliases: &["sdsec"] },
    SummaryLevel { code: "970", name: "school district (unified)", aliases: &["sduni"] },
];

/// A geographic component: an urban/rural or similar slice of a geography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoComponent {
    pub code: &'static str,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

pub static GEO_COMPONENTS: &[GeoComponent] = &[
    GeoComponent { code: "00", name: "total", aliases: &["all"] },
    GeoComponent { code: "01", name: "urban", aliases: &[] },
    GeoComponent { code: "04", name: "urbanized area", aliases: &["in urbanized area"] },
    GeoComponent { code: "28", name: "urban cluster", aliases: &["in urban cluster"] },
    GeoComponent { code: "43", name: "rural", aliases: &[] },
    GeoComponent { code: "44", name: "rural in place", aliases: &[] },
    GeoComponent { code: "45", name: "rural not in place", aliases: &[] },
    GeoComponent {
        code: "C0",
        name: "in metropolitan or micropolitan statistical area",
        aliases: &["in cbsa"],
    },
    GeoComponent {
        code: "C1",
        name: "in metropolitan statistical area",
        aliases: &["in metro"],
    },
    GeoComponent {
        code: "C2",
        name: "in metropolitan statistical area in principal city",
        aliases: &["in metro principal city"],
    },
    GeoComponent {
        code: "C3",
        name: "in metropolitan statistical area not in principal city",
        aliases: &["in metro not principal city"],
    },
    GeoComponent {
        code: "C5",
        name: "in micropolitan statistical area",
        aliases: &["in micro"],
    },
    GeoComponent {
        code: "C6",
        name: "in micropolitan statistical area in principal city",
        aliases: &["in micro principal city"],
    },
    GeoComponent {
        code: "C7",
        name: "in micropolitan statistical area not in principal city",
        aliases: &["in micro not principal city"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_state_lookup() {
        assert_eq!(state_by_abbr("ri").unwrap().fips, "44");
        assert_eq!(state_by_fips("25").unwrap().abbr, "MA");
        assert!(state_by_fips("").is_none());
        assert!(state_by_abbr("XX").is_none());
    }

    #[test]
    fn test_code_tables_have_unique_codes() {
        let levels: HashSet<_> = SUMMARY_LEVELS.iter().map(|l| l.code).collect();
        assert_eq!(levels.len(), SUMMARY_LEVELS.len());
        assert!(SUMMARY_LEVELS.iter().all(|l| l.code.len() == 3));

        let comps: HashSet<_> = GEO_COMPONENTS.iter().map(|c| c.code).collect();
        assert_eq!(comps.len(), GEO_COMPONENTS.len());
        assert!(GEO_COMPONENTS.iter().all(|c| c.code.len() == 2));
    }
}
