pub const DEFAULT_RELAY_URL: &str =
    "https://docs.google.com/forms/d/e/1FAIpQLSc0E_Z_2n5xMD7KO0Oim-20UjHZ4hLXRZzvyMXzfzzwMYR2aQ/formResponse";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

pub const NAME_FIELD: &str = "entry.1909378626";
pub const PHONE_FIELD: &str = "entry.850620478";
pub const EMAIL_FIELD: &str = "entry.308547054";
pub const PRIZE_FIELD: &str = "entry.1057627581";

pub const INVALID_NAME_ERROR: &str = "Please enter your full name";
pub const INVALID_CONTACT_ERROR: &str = "Please enter a valid contact number (8-15 digits)";
pub const INVALID_EMAIL_ERROR: &str = "Please enter a valid email address";
pub const INVALID_CITY_ERROR: &str = "Please choose a city from the list";
pub const INVALID_STORE_ERROR: &str = "Please choose a store in the selected city";
pub const NETWORK_ERROR: &str = "Network error. Please try again";
pub const DUPLICATE_PHONE_ERROR: &str = "This number has already been used to spin the wheel";
pub const SUBMISSION_ERROR: &str = "We couldn't record your entry. Please try again";
pub const NOT_RESOLVED_ERROR: &str = "Spin the wheel before claiming a prize";

pub const MIN_PHONE_DIGITS: usize = 8;
pub const MIN_CONTACT_LENGTH: usize = 8;
pub const MAX_CONTACT_LENGTH: usize = 15;
