use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub window: Option<String>,
}
