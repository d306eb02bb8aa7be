/// Constants module to avoid magic numbers in the codebase

// Completion service
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4";
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: usize = 1000;
pub const MAX_TEMPERATURE: f32 = 2.0;

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 120;

// Config locations
pub const APP_NAME: &str = "food-scout";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOCAL_CONFIG_DIR: &str = ".food-scout";
pub const ENV_PREFIX: &str = "FOOD_SCOUT_";

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;
pub const UI_DEFAULT_VIEWPORT_HEIGHT: u16 = 20;
pub const DEFAULT_EXAMPLE_PROMPT: &str = "Best eateries in New York City";
pub const INPUT_PLACEHOLDER: &str = "Try something like: 'Find vegan brunch in Austin'...";

/// Apology prefix used when a completion attempt fails
pub const APOLOGY_PREFIX: &str = "I apologize, but I encountered an error:";

// Closed vocabularies for keyword slots. Order matters: candidates are
// reported in list order, not text order.
pub const CUISINE_TYPES: &[&str] = &[
    "italian",
    "chinese",
    "mexican",
    "japanese",
    "thai",
    "indian",
    "mediterranean",
    "french",
    "korean",
    "vietnamese",
    "greek",
    "american",
];

pub const DIET_TERMS: &[&str] = &[
    "vegetarian",
    "vegan",
    "gluten-free",
    "halal",
    "kosher",
    "pescatarian",
];

pub const MOOD_TERMS: &[&str] = &[
    "romantic",
    "casual",
    "fancy",
    "family",
    "date",
    "party",
    "quiet",
    "trendy",
    "cozy",
];

/// Words after which a capitalized phrase is read as a place.
/// "at" is left out: it mostly introduces a venue ("at Olive Garden").
pub const LOCATION_PREPOSITIONS: &[&str] = &["in", "near", "around", "from"];

/// Nationality adjectives beyond the cuisine list; never read as places
pub const NATIONALITY_ADJECTIVES: &[&str] = &[
    "spanish",
    "german",
    "turkish",
    "lebanese",
    "ethiopian",
    "peruvian",
    "brazilian",
    "cuban",
    "caribbean",
    "british",
    "irish",
    "african",
    "asian",
    "european",
    "latin",
    "persian",
];

/// Words that mark a capitalized phrase as a venue name rather than a place
pub const VENUE_WORDS: &[&str] = &[
    "restaurant",
    "cafe",
    "café",
    "grill",
    "bar",
    "bistro",
    "kitchen",
    "diner",
    "garden",
    "tavern",
    "pizzeria",
    "steakhouse",
    "bakery",
    "eatery",
    "pub",
    "cantina",
    "trattoria",
    "food",
    "cuisine",
];

/// Generic areas that are tagged as locations rather than named places
pub const GENERIC_AREAS: &[&str] = &["downtown", "midtown", "uptown"];

/// Built-in gazetteer of place names for the location tagger
pub const KNOWN_PLACES: &[&str] = &[
    // US cities
    "New York City",
    "New York",
    "Los Angeles",
    "LA",
    "San Francisco",
    "San Diego",
    "San Jose",
    "San Antonio",
    "Chicago",
    "Houston",
    "Austin",
    "Dallas",
    "Phoenix",
    "Philadelphia",
    "Seattle",
    "Portland",
    "Denver",
    "Boston",
    "Miami",
    "Atlanta",
    "Nashville",
    "New Orleans",
    "Las Vegas",
    "Washington",
    "Detroit",
    "Minneapolis",
    "Brooklyn",
    "Manhattan",
    "Queens",
    // US states
    "California",
    "Texas",
    "Florida",
    "Illinois",
    "Oregon",
    "Colorado",
    "Massachusetts",
    "Georgia",
    // International cities
    "London",
    "Paris",
    "Tokyo",
    "Berlin",
    "Rome",
    "Madrid",
    "Barcelona",
    "Amsterdam",
    "Toronto",
    "Vancouver",
    "Montreal",
    "Mexico City",
    "Sydney",
    "Melbourne",
    "Singapore",
    "Hong Kong",
    "Seoul",
    "Bangkok",
    "Mumbai",
    "Delhi",
    "Dubai",
    "Istanbul",
    "Lisbon",
    // Countries
    "USA",
    "United States",
    "Canada",
    "Mexico",
    "France",
    "Italy",
    "Spain",
    "Japan",
    "China",
    "India",
    "Germany",
    "England",
    "Thailand",
    "Vietnam",
    "Korea",
    "Greece",
];
