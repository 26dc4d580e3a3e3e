use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw struct deserilized from yaml
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub prices: Option<HashMap<String, Money>>,
    pub wish_markers: Option<Vec<String>>,
}
