//! Application constants for the frost ranking
//!
//! File names, board markup tokens and the KNMI station table used by the
//! default station registry.

// =============================================================================
// Persisted Files
// =============================================================================

/// Default name of the persisted ranking state file
pub const DEFAULT_RANKING_FILE: &str = "ranking.txt";

/// Default name of the rendered board file
pub const DEFAULT_BOARD_FILE: &str = "board_update.txt";

/// Default prefix for notification subjects
pub const DEFAULT_SUBJECT_PREFIX: &str = "Frost ranking";

/// Application directory name under the user config directory
pub const APP_DIR_NAME: &str = "frost-ranking";

/// Configuration file name inside the application config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the data directory
pub const ENV_DATA_DIR: &str = "FROST_RANKING_DATA_DIR";

/// Environment variable overriding the notification outbox directory
pub const ENV_OUTBOX_DIR: &str = "FROST_RANKING_OUTBOX";

// =============================================================================
// Board Markup
// =============================================================================

pub mod markup {
    pub const ORANGE_OPEN: &str = "[color=orange]";
    pub const GREEN_OPEN: &str = "[color=green]";
    pub const RED_OPEN: &str = "[color=red]";
    pub const GREY_OPEN: &str = "[color=grey]";
    pub const COLOR_CLOSE: &str = "[/color]";
    pub const ITALIC_OPEN: &str = "[i]";
    pub const ITALIC_CLOSE: &str = "[/i]";

    /// Previous rank that gets an extra space inside the parentheses.
    ///
    /// Historic boards showed eight entries; this keeps their alignment.
    /// Candidate for removal once the board layout is confirmed.
    pub const PADDED_PREVIOUS_RANK: u32 = 8;
}

// =============================================================================
// Dates
// =============================================================================

/// Compact date format used by KNMI exports and the CLI
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// ISO date format accepted by the CLI
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// KNMI Stations
// =============================================================================

/// KNMI automatic weather stations included in the ranking, id to display name
pub const KNMI_STATIONS: &[(&str, &str)] = &[
    ("215", "Voorschoten"),
    ("235", "De Kooy"),
    ("240", "Schiphol"),
    ("242", "Vlieland"),
    ("249", "Berkhout"),
    ("251", "Hoorn (Terschelling)"),
    ("257", "Wijk aan Zee"),
    ("260", "De Bilt"),
    ("267", "Stavoren"),
    ("269", "Lelystad"),
    ("270", "Leeuwarden"),
    ("273", "Marknesse"),
    ("275", "Deelen"),
    ("277", "Lauwersoog"),
    ("278", "Heino"),
    ("279", "Hoogeveen"),
    ("280", "Eelde"),
    ("283", "Hupsel"),
    ("286", "Nieuw-Beerta"),
    ("290", "Twente"),
    ("310", "Vlissingen"),
    ("319", "Westdorpe"),
    ("323", "Wilhelminadorp"),
    ("330", "Hoek van Holland"),
    ("340", "Woensdrecht"),
    ("344", "Rotterdam"),
    ("348", "Cabauw"),
    ("350", "Gilze-Rijen"),
    ("356", "Herwijnen"),
    ("370", "Eindhoven"),
    ("375", "Volkel"),
    ("377", "Ell"),
    ("380", "Maastricht"),
    ("391", "Arcen"),
];
