use crate::storage::TipCalculationStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TipCalculationStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TipCalculationStore>) -> Self {
        Self { store }
    }
}
