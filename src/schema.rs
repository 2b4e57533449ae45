/// Canonical result fields, in output column order. `VIN` comes first so the
/// reconciled identity leads every row; the remaining fields mirror the lot
/// and vehicle attributes the auction feed publishes.
pub const CANONICAL_FIELDS: [&str; 24] = [
    "VIN",
    "Lot number",
    "Lot name",
    "Auction type",
    "Auction form",
    "Lot status",
    "Trading platform",
    "Publication date",
    "Modification date",
    "Starting price",
    "Notice number",
    "Property category",
    "Make",
    "Model",
    "Year",
    "Registration plate",
    "Registration plate date",
    "Mileage",
    "Vehicle type",
    "Engine volume",
    "Engine power",
    "Transmission",
    "Drivetrain",
    "Emissions class",
];

/// Header row of the output store: VIN, status, then the data fields.
pub fn header() -> Vec<&'static str> {
    let mut columns = vec![CANONICAL_FIELDS[0], "status"];
    columns.extend_from_slice(&CANONICAL_FIELDS[1..]);
    columns
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum CheckStatus {
    Success,
    NotFound,
    Error,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Success => "success",
            CheckStatus::NotFound => "not_found",
            CheckStatus::Error => "error",
        }
    }
}

impl Default for CheckStatus {
    fn default() -> Self {
        CheckStatus::NotFound
    }
}

/// One finished check. `vin` and `status` are always set; `fields` holds the
/// values for `CANONICAL_FIELDS[1..]` in the same order, empty when unknown.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckResult {
    pub vin: String,
    pub status: CheckStatus,
    pub fields: Vec<String>,
}

impl CheckResult {
    pub fn with_status(vin: &str, status: CheckStatus) -> Self {
        CheckResult {
            vin: vin.to_string(),
            status,
            fields: vec![String::new(); CANONICAL_FIELDS.len() - 1],
        }
    }

    pub fn not_found(vin: &str) -> Self {
        Self::with_status(vin, CheckStatus::NotFound)
    }

    pub fn error(vin: &str) -> Self {
        Self::with_status(vin, CheckStatus::Error)
    }

    /// The output row in header order.
    pub fn row(&self) -> Vec<&str> {
        let mut row = vec![self.vin.as_str(), self.status.as_str()];
        row.extend(self.fields.iter().map(String::as_str));
        row
    }
}
