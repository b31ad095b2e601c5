/// Persona system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the identifier field carried by identified list items.
pub const ITEM_ID_FIELD: &str = "id";

/// Name of the discriminator field carried by variant list items.
pub const ITEM_KIND_FIELD: &str = "type";

/// Serialized names of the store-managed profile fields.
pub const PROFILE_ID_FIELD: &str = "id";
pub const CREATION_TS_FIELD: &str = "_creationTs";
pub const LAST_UPDATE_TS_FIELD: &str = "_lastUpdateTs";

/// Number of most recent rating events averaged by the recency strategy.
pub const RECENCY_WINDOW: usize = 5;

/// Maximum length of any identifier carried by a rating event.
pub const MAX_IDENTIFIER_LENGTH: usize = 255;
