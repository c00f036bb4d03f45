use super::{
    client::{ApiClient, ApiRequest},
    types::{ApiError, Delivery},
};

pub const CARRIER_DASHBOARD_PATH: &str = "/carrier/dashboard";

pub fn mark_delivered_path(delivery_id: &str) -> String {
    format!("/shipments/{}/mark-delivered", delivery_id)
}

impl ApiClient {
    pub async fn carrier_deliveries(&self) -> Result<Vec<Delivery>, ApiError> {
        self.get_json(CARRIER_DASHBOARD_PATH).await
    }

    pub async fn mark_delivered(&self, delivery_id: &str) -> Result<(), ApiError> {
        if delivery_id.trim().is_empty() {
            return Err(ApiError::validation("Delivery id is required."));
        }
        self.send_empty(ApiRequest::patch(mark_delivered_path(delivery_id)))
            .await
    }
}
