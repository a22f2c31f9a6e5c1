// Tour, stop, and asset identifiers are opaque strings assigned by the
// remote catalog; they are passed around as plain `String`s.

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
