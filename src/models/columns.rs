use serde::Deserialize;

/// Physical header names of the logical transaction fields.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnMapping {
    pub country: String,
    pub service_type: String,
    pub volume: String,
    pub transaction_count: String,
    pub customer_id: String,
    pub transaction_month: String,
    pub customer_created_month: String
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            country: "country".to_string(),
            service_type: "PAYMENT_SERVICE_DIV".to_string(),
            volume: "VOLUMN".to_string(),
            transaction_count: "TRX_COUNT".to_string(),
            customer_id: "CUSTOMERID".to_string(),
            transaction_month: "TRANSACTION_APPROVED_MONTH".to_string(),
            customer_created_month: "CUSTOMER_CREATEDDATE_MONTH".to_string()
        }
    }
}

impl ColumnMapping {
    pub fn required(&self) -> [&str; 4] {
        [&self.country, &self.service_type, &self.volume, &self.transaction_count]
    }
}
