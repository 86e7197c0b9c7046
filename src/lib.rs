// rfqflow - RFQ Workflow Engine & Status Watcher
// This exposes the core components for testing and integration

pub mod api;
pub mod config;
pub mod model;
pub mod observability;
pub mod reconcile;
pub mod telemetry;
pub mod watch;
pub mod workflow;

// Re-export key types for easy access
pub use api::{InMemoryRfqApi, NotificationSink, RecordingSink, RfqApi};
pub use config::{config, init_config, RfqflowConfig};
pub use model::{
    Approval, ApprovalAction, PoId, PoLine, PoStatus, PurchaseOrder, QuoteLine, QuoteLineInput,
    Rfq, RfqId, RfqItem, VendorQuote,
};
pub use observability::{watcher_metrics, OperationTimer, WatcherMetrics, WatcherStats};
pub use reconcile::{
    audience_for, diff, NotificationDedupCache, NotificationEvent, Snapshot, StatusChange,
    TargetAudience,
};
pub use telemetry::{generate_correlation_id, init_telemetry, shutdown_telemetry};
pub use watch::{DebouncedPoller, PollFailure, PollerHandle, PollerSettings, RfqWatcher};
pub use workflow::{
    allowed_actions, derive_purchase_order, is_legal, RfqAction, RfqStatus, TransitionRule,
    WorkflowEngine, WorkflowError, TRANSITION_TABLE,
};
