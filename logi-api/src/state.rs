use std::sync::Arc;

use logi_core::{CatalogService, EventPublisher, OrderService, Repositories, ShipmentService};
use logi_order::ConsolidationPlanner;
use logi_store::app_config::BusinessRules;
use logi_store::EventBroadcaster;

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub catalog: Arc<CatalogService>,
    pub orders: Arc<OrderService>,
    pub shipments: Arc<ShipmentService>,
    pub events: EventBroadcaster,
    pub business_rules: BusinessRules,
}

impl AppState {
    /// Wires the services over one set of repositories. Every service
    /// publishes through the same broadcaster the SSE feed subscribes to.
    pub fn new(repos: Repositories, business_rules: BusinessRules, events: EventBroadcaster) -> Self {
        let publisher: Arc<dyn EventPublisher> = Arc::new(events.clone());
        let planner = ConsolidationPlanner::new(business_rules.urgent_surcharge_rate);

        Self {
            catalog: Arc::new(CatalogService::new(repos.clone(), business_rules.low_stock_threshold)),
            orders: Arc::new(OrderService::new(repos.clone(), publisher.clone())),
            shipments: Arc::new(ShipmentService::new(repos.shipments.clone(), planner, publisher)),
            repos,
            events,
            business_rules,
        }
    }
}
